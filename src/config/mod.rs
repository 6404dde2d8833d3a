use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

pub mod defaults;

use defaults::*;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub web: WebConfig,
    pub storage: StorageConfig,
    pub catalog: CatalogConfig,
    pub classifier: ClassifierConfig,
    pub wallpaper: WallpaperConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WebConfig {
    pub host: String,
    pub port: u16,
    /// Directory served under `/static`
    pub static_dir: PathBuf,
    /// Page served at `/`
    pub index_file: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Root of the image tree that gets indexed and served under `/images`
    pub catalog_root: PathBuf,
    /// Provisioned at startup for rendered thumbnails; the renderer does not write to it
    pub thumbnail_dir: PathBuf,
    /// Persisted scan cache
    pub cache_file: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Lowercase extensions including the leading dot
    pub allowed_extensions: Vec<String>,
    pub page_size: usize,
    pub thumbnail_max_edge: u32,
    pub thumbnail_quality: u8,
    pub thumbnail_max_age_secs: u64,
}

/// Credentials for the external classification pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    pub api_key: String,
    pub api_endpoint: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WallpaperConfig {
    /// Program and leading arguments; the image path is appended as the last argument
    pub command: Option<Vec<String>>,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            static_dir: PathBuf::from(DEFAULT_STATIC_DIR),
            index_file: PathBuf::from(DEFAULT_INDEX_FILE),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            catalog_root: PathBuf::from(DEFAULT_CATALOG_ROOT),
            thumbnail_dir: PathBuf::from(DEFAULT_THUMBNAIL_DIR),
            cache_file: PathBuf::from(DEFAULT_CACHE_FILE),
        }
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            allowed_extensions: DEFAULT_ALLOWED_EXTENSIONS
                .iter()
                .map(|ext| ext.to_string())
                .collect(),
            page_size: DEFAULT_PAGE_SIZE,
            thumbnail_max_edge: DEFAULT_THUMBNAIL_MAX_EDGE,
            thumbnail_quality: DEFAULT_THUMBNAIL_QUALITY,
            thumbnail_max_age_secs: DEFAULT_THUMBNAIL_MAX_AGE_SECS,
        }
    }
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            api_key: DEFAULT_CLASSIFIER_API_KEY.to_string(),
            api_endpoint: DEFAULT_CLASSIFIER_ENDPOINT.to_string(),
        }
    }
}

impl ClassifierConfig {
    /// Whether a real key was supplied by the environment or the config file
    pub fn is_configured(&self) -> bool {
        !self.api_key.trim().is_empty() && self.api_key != DEFAULT_CLASSIFIER_API_KEY
    }
}

impl Config {
    /// Resolve configuration from defaults, the TOML file, then the environment.
    ///
    /// Each layer is merged and validated on its own. A layer that makes
    /// extraction fail is skipped with a warning, so a malformed file or an
    /// ill-typed variable never prevents startup.
    pub fn load_from_file<P: AsRef<Path>>(config_file: P) -> Self {
        let config_file = config_file.as_ref();
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if config_file.exists() {
            if let Some(merged) = Self::merge_layer(&figment, Toml::file(config_file), "config file")
            {
                info!("Configuration file layer: {}", config_file.display());
                figment = merged;
            }
        } else {
            debug!(
                "Config file {} not found, using defaults",
                config_file.display()
            );
        }

        if let Some(merged) = Self::merge_layer(
            &figment,
            Env::prefixed(ENV_PREFIX).split(ENV_NESTING_SEPARATOR),
            "environment",
        ) {
            figment = merged;
        }

        // The defaults layer alone always extracts
        figment.extract::<Self>().unwrap_or_default()
    }

    /// `base` with `layer` merged on top, or `None` when the result no longer extracts
    fn merge_layer<P: figment::Provider>(base: &Figment, layer: P, name: &str) -> Option<Figment> {
        let candidate = base.clone().merge(layer);
        match candidate.extract::<Self>() {
            Ok(_) => Some(candidate),
            Err(e) => {
                warn!("Ignoring {} configuration layer: {}", name, e);
                None
            }
        }
    }

    /// Create the catalog root and the thumbnail directory if missing
    pub fn ensure_directories(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.storage.catalog_root)?;
        std::fs::create_dir_all(&self.storage.thumbnail_dir)?;
        Ok(())
    }
}
