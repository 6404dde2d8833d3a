//! Wallpaper catalog
//!
//! Indexes a directory tree of images, keeps an mtime-keyed cache of derived
//! records, and serves the catalog, path-derived categories and on-demand
//! thumbnails over HTTP.

pub mod config;
pub mod errors;
pub mod models;
pub mod services;
pub mod utils;
pub mod web;
