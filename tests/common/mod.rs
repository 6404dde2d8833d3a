//! Shared fixtures for the HTTP integration tests

#![allow(dead_code)]

use axum_test::TestServer;
use image::{ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

use wallpaper_catalog::{
    config::Config,
    services::WallpaperSetter,
    web::{AppState, create_router},
};

pub struct TestCatalog {
    // Keeps the directory alive for the duration of the test
    _dir: TempDir,
    pub root: PathBuf,
    pub cache_file: PathBuf,
    pub index_file: PathBuf,
    pub server: TestServer,
}

pub fn test_config(dir: &Path) -> Config {
    let mut config = Config::default();
    config.storage.catalog_root = dir.join("wallpapers");
    config.storage.thumbnail_dir = dir.join("thumbnails");
    config.storage.cache_file = dir.join("wallpaper_cache.json");
    config.web.index_file = dir.join("index.html");
    config.web.static_dir = dir.join("static");
    config
}

pub fn catalog() -> TestCatalog {
    build(None)
}

pub fn catalog_with_setter(setter: Arc<dyn WallpaperSetter>) -> TestCatalog {
    build(Some(setter))
}

fn build(setter: Option<Arc<dyn WallpaperSetter>>) -> TestCatalog {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path());
    config.ensure_directories().unwrap();
    std::fs::write(&config.web.index_file, "<html><body>wallpapers</body></html>").unwrap();

    let root = config.storage.catalog_root.clone();
    let cache_file = config.storage.cache_file.clone();
    let index_file = config.web.index_file.clone();

    let mut state = AppState::new(config);
    if let Some(setter) = setter {
        state = state.with_wallpaper_setter(setter);
    }
    let server = TestServer::new(create_router(state)).unwrap();

    TestCatalog {
        _dir: dir,
        root,
        cache_file,
        index_file,
        server,
    }
}

/// Write an opaque image; the format follows the extension
pub fn write_image(root: &Path, relative_path: &str, width: u32, height: u32) -> PathBuf {
    let path = root.join(relative_path);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, (relative_path.len() % 256) as u8])
    })
    .save(&path)
    .unwrap();
    path
}

/// Write PNG data regardless of the extension in `relative_path`
pub fn write_png_as(root: &Path, relative_path: &str, width: u32, height: u32) -> PathBuf {
    let path = root.join(relative_path);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    RgbImage::from_pixel(width, height, Rgb([30, 90, 150]))
        .save_with_format(&path, ImageFormat::Png)
        .unwrap();
    path
}

/// Write a half-transparent PNG
pub fn write_transparent_png(root: &Path, relative_path: &str, width: u32, height: u32) -> PathBuf {
    let path = root.join(relative_path);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    RgbaImage::from_fn(width, height, |x, _| {
        Rgba([200, 40, 40, if x % 2 == 0 { 0 } else { 255 }])
    })
    .save(&path)
    .unwrap();
    path
}
