//! Utility modules for the wallpaper catalog
//!
//! Pure helpers used by the indexing engine: extension classification,
//! content fingerprinting and path-derived tags.

pub mod fingerprint;
pub mod path_classifier;
pub mod tags;

// Re-export commonly used types for convenience
pub use fingerprint::FingerprintHasher;
pub use path_classifier::PathClassifier;
pub use tags::{TAG_DELIMITER, UNCATEGORIZED_TAG, extract_tag, loose_tag_match};
