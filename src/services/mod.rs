//! Catalog services
//!
//! The indexing engine ([`CacheStore`], [`Indexer`], category aggregation)
//! and the request-facing services built on it.

pub mod cache_store;
pub mod catalog;
pub mod categories;
pub mod indexer;
pub mod thumbnail;
pub mod wallpaper;

pub use cache_store::CacheStore;
pub use catalog::{CatalogService, CategoryFilter};
pub use categories::aggregate_categories;
pub use indexer::{Indexer, ScanOutcome, ScanReport};
pub use thumbnail::{Thumbnail, ThumbnailRenderer};
pub use wallpaper::{CommandWallpaperSetter, WallpaperSetter, resolve_image_url};

use crate::errors::{AppError, AppResult};

/// Run filesystem-bound work on the blocking pool.
///
/// A panicked task surfaces as an internal error instead of taking the
/// worker down.
pub async fn run_blocking<F, T>(task: F) -> AppResult<T>
where
    F: FnOnce() -> AppResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(task)
        .await
        .map_err(|e| AppError::internal(format!("Background task failed: {e}")))?
}
