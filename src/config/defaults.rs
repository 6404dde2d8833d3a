/// Configuration default values
///
/// This module contains all the default values for configuration options,
/// making them easily changeable in one central location.
// Web server defaults
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_STATIC_DIR: &str = "./static";
pub const DEFAULT_INDEX_FILE: &str = "./index.html";

// Storage defaults
pub const DEFAULT_CATALOG_ROOT: &str = "./wallpapers";
pub const DEFAULT_THUMBNAIL_DIR: &str = "./thumbnails";
pub const DEFAULT_CACHE_FILE: &str = "./wallpaper_cache.json";

// Catalog defaults
pub const DEFAULT_ALLOWED_EXTENSIONS: &[&str] = &[".jpg", ".jpeg", ".png", ".gif", ".webp", ".bmp"];
pub const DEFAULT_PAGE_SIZE: usize = 30;
pub const DEFAULT_THUMBNAIL_MAX_EDGE: u32 = 300;
pub const DEFAULT_THUMBNAIL_QUALITY: u8 = 85;
pub const DEFAULT_THUMBNAIL_MAX_AGE_SECS: u64 = 31_536_000; // one year

// Classifier defaults (consumed by the external rename pipeline)
pub const DEFAULT_CLASSIFIER_API_KEY: &str = "your_api_key_here";
pub const DEFAULT_CLASSIFIER_ENDPOINT: &str = "https://open.bigmodel.cn/api/paas/v4/chat/completions";

// Environment layering
pub const ENV_PREFIX: &str = "WALLPAPER_";
pub const ENV_NESTING_SEPARATOR: &str = "__";
