//! Centralized error handling for the wallpaper catalog
//!
//! # Error Categories
//!
//! - **Scan Errors**: per-file access and decode failures, cache corruption
//! - **Validation Errors**: malformed request parameters
//! - **Not Found Errors**: unknown fingerprints and image paths
//! - **Internal Errors**: anything that prevents producing a response
//!
//! # Usage
//!
//! ```rust
//! use wallpaper_catalog::errors::{AppError, AppResult};
//!
//! fn example_function() -> AppResult<String> {
//!     Err(AppError::not_found("thumbnail", "deadbeef"))
//! }
//! ```

pub mod types;

pub use types::*;

/// Convenience type alias for Results using AppError
pub type AppResult<T> = Result<T, AppError>;

/// Convenience type alias for indexing engine Results
pub type ScanResult<T> = Result<T, ScanError>;
