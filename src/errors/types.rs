//! Error type definitions for the wallpaper catalog
//!
//! Two layers of errors exist. [`ScanError`] describes failures of the
//! indexing engine for a single file or for the persisted cache; they are
//! logged and contained by the scanner. [`AppError`] is what the service
//! layer hands to the web layer, where it is mapped to an HTTP status.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level application error type
///
/// Every operation reachable from an HTTP handler returns this type. The
/// web layer maps each variant onto a status code in
/// [`crate::web::responses::handle_error`].
#[derive(Error, Debug)]
pub enum AppError {
    /// Indexing engine errors that escaped per-file containment
    #[error("Scan error: {0}")]
    Scan(#[from] ScanError),

    /// Validation errors (malformed request parameters)
    #[error("Validation error: {message}")]
    Validation { message: String },

    /// Resource not found errors
    #[error("Not found: {resource} with id {id}")]
    NotFound { resource: String, id: String },

    /// External collaborator errors (desktop background setter)
    #[error("External service error: {service} - {message}")]
    ExternalService { service: String, message: String },

    /// Filesystem errors outside of a scan
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Image decoding or encoding errors outside of a scan
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// Generic internal errors
    #[error("Internal error: {message}")]
    Internal { message: String },
}

/// Indexing engine errors
///
/// `FileAccess` and `Decode` are per-file: the scanner logs them and moves
/// on. `CacheCorruption` is never fatal, the cache is treated as empty.
#[derive(Error, Debug)]
pub enum ScanError {
    /// Unreadable file, permission denied or vanished mid-scan
    #[error("Cannot access {path}: {source}")]
    FileAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Corrupt or unsupported image bytes
    #[error("Cannot decode {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// Unparsable persisted cache file
    #[error("Cache file {path} is corrupt: {source}")]
    CacheCorruption {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Failure writing the persisted cache file
    #[error("Cannot persist cache to {path}: {message}")]
    CachePersist { path: PathBuf, message: String },
}

/// Convenience methods for creating common error types
impl AppError {
    /// Create a validation error with a custom message
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a not found error for a specific resource
    pub fn not_found<R: Into<String>, I: Into<String>>(resource: R, id: I) -> Self {
        Self::NotFound {
            resource: resource.into(),
            id: id.into(),
        }
    }

    /// Create an external service error
    pub fn external_service<S: Into<String>, M: Into<String>>(service: S, message: M) -> Self {
        Self::ExternalService {
            service: service.into(),
            message: message.into(),
        }
    }

    /// Create an internal error
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

impl ScanError {
    pub fn file_access<P: Into<PathBuf>>(path: P, source: std::io::Error) -> Self {
        Self::FileAccess {
            path: path.into(),
            source,
        }
    }

    pub fn decode<P: Into<PathBuf>>(path: P, source: image::ImageError) -> Self {
        Self::Decode {
            path: path.into(),
            source,
        }
    }

    /// Whether the scanner should skip the file and keep going
    pub fn is_per_file(&self) -> bool {
        matches!(self, Self::FileAccess { .. } | Self::Decode { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message() {
        let err = AppError::not_found("thumbnail", "abc123");
        assert_eq!(err.to_string(), "Not found: thumbnail with id abc123");
    }

    #[test]
    fn test_per_file_classification() {
        let access = ScanError::file_access(
            "a.jpg",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(access.is_per_file());

        let persist = ScanError::CachePersist {
            path: PathBuf::from("cache.json"),
            message: "disk full".to_string(),
        };
        assert!(!persist.is_per_file());
    }

    #[test]
    fn test_scan_error_converts_into_app_error() {
        let scan = ScanError::CachePersist {
            path: PathBuf::from("cache.json"),
            message: "read-only filesystem".to_string(),
        };
        let app: AppError = scan.into();
        assert!(matches!(app, AppError::Scan(_)));
        assert!(app.to_string().contains("read-only filesystem"));
    }
}
