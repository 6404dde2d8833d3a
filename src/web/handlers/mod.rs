//! HTTP handlers organized by domain
//!
//! Handlers stay thin: they validate input, move blocking work onto the
//! blocking pool and shape the response.

pub mod catalog;
pub mod config;
pub mod health;
pub mod thumbnails;
pub mod wallpaper;
