//! Extension-based image classification

use std::collections::HashSet;
use std::path::Path;

use crate::config::CatalogConfig;

/// Decides whether a filename is a supported image type
#[derive(Debug, Clone)]
pub struct PathClassifier {
    /// Lowercase, with the leading dot
    extensions: HashSet<String>,
}

impl PathClassifier {
    pub fn new<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let extensions = extensions
            .into_iter()
            .map(|ext| {
                let ext = ext.as_ref().trim().to_lowercase();
                if ext.starts_with('.') {
                    ext
                } else {
                    format!(".{ext}")
                }
            })
            .collect();
        Self { extensions }
    }

    pub fn from_config(config: &CatalogConfig) -> Self {
        Self::new(&config.allowed_extensions)
    }

    /// Case-insensitive suffix match on the file name
    pub fn is_image(&self, file_name: &str) -> bool {
        let lower = file_name.to_lowercase();
        self.extensions.iter().any(|ext| lower.ends_with(ext.as_str()))
    }

    pub fn is_image_path(&self, path: &Path) -> bool {
        path.file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| self.is_image(name))
    }

    /// Sorted for stable reporting
    pub fn extensions(&self) -> Vec<String> {
        let mut extensions: Vec<_> = self.extensions.iter().cloned().collect();
        extensions.sort();
        extensions
    }
}

impl Default for PathClassifier {
    fn default() -> Self {
        Self::from_config(&CatalogConfig::default())
    }
}
