//! Desktop background target
//!
//! Maps a public `/images/...` URL back onto the catalog root and hands the
//! resulting file to a [`WallpaperSetter`]. How the background is actually
//! changed is up to the setter; the shipped one runs an operator-configured
//! command.

use async_trait::async_trait;
use std::path::{Component, Path, PathBuf};
use tokio::process::Command;
use tracing::{info, warn};

use crate::config::WallpaperConfig;
use crate::errors::{AppError, AppResult};

pub const IMAGE_URL_PREFIX: &str = "/images/";

/// Resolve a public image URL to a file under `root`.
///
/// Only `/images/<relative path>` is accepted, and the relative path may not
/// climb out of the root.
pub fn resolve_image_url(root: &Path, url: &str) -> AppResult<PathBuf> {
    let relative = url
        .strip_prefix(IMAGE_URL_PREFIX)
        .ok_or_else(|| AppError::validation(format!("Unsupported image URL: {url}")))?;

    let relative_path = Path::new(relative);
    let mut segments = 0;
    for component in relative_path.components() {
        match component {
            Component::Normal(_) => segments += 1,
            Component::CurDir => {}
            _ => {
                return Err(AppError::validation(format!(
                    "Image URL escapes the catalog: {url}"
                )));
            }
        }
    }
    if segments == 0 {
        return Err(AppError::validation("Image URL names no file"));
    }

    let resolved = root.join(relative_path);
    if !resolved.is_file() {
        return Err(AppError::not_found("image", relative));
    }
    Ok(resolved)
}

/// Sets the desktop background to a local image
#[async_trait]
pub trait WallpaperSetter: Send + Sync {
    /// Returns a human-readable confirmation
    async fn set_wallpaper(&self, path: &Path) -> AppResult<String>;
}

/// Runs `command[0] command[1..] <path>`
#[derive(Debug, Clone, Default)]
pub struct CommandWallpaperSetter {
    command: Option<Vec<String>>,
}

impl CommandWallpaperSetter {
    pub fn new(command: Option<Vec<String>>) -> Self {
        Self {
            command: command.filter(|argv| !argv.is_empty()),
        }
    }

    pub fn from_config(config: &WallpaperConfig) -> Self {
        Self::new(config.command.clone())
    }
}

#[async_trait]
impl WallpaperSetter for CommandWallpaperSetter {
    async fn set_wallpaper(&self, path: &Path) -> AppResult<String> {
        let Some((program, args)) = self.command.as_ref().and_then(|argv| argv.split_first())
        else {
            return Err(AppError::external_service(
                "wallpaper",
                "Setting the wallpaper is not supported: no wallpaper command configured",
            ));
        };

        let output = Command::new(program)
            .args(args)
            .arg(path)
            .output()
            .await
            .map_err(|e| {
                AppError::external_service("wallpaper", format!("Failed to run {program}: {e}"))
            })?;

        if output.status.success() {
            info!("Wallpaper set to {}", path.display());
            Ok("Wallpaper set successfully".to_string())
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr);
            warn!(
                "Wallpaper command {} exited with {}: {}",
                program,
                output.status,
                stderr.trim()
            );
            Err(AppError::external_service(
                "wallpaper",
                format!("{program} exited with {}: {}", output.status, stderr.trim()),
            ))
        }
    }
}
