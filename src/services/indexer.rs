//! Incremental catalog indexer
//!
//! Walks the catalog root in file-name order, reuses cached records whose
//! modification time is unchanged and recomputes everything else. A file
//! that cannot be read or decoded is logged and left out of the result; it
//! never aborts the scan. The cache is persisted once per scan.

use chrono::{DateTime, Utc};
use std::fs::Metadata;
use std::path::{Component, Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};
use walkdir::WalkDir;

use crate::errors::{ScanError, ScanResult};
use crate::models::{CacheEntry, ImageRecord};
use crate::services::cache_store::CacheStore;
use crate::utils::{FingerprintHasher, PathClassifier, extract_tag};

/// Counters for one scan
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanReport {
    /// Records served from the cache
    pub reused: usize,
    /// Records (re)computed from the file
    pub recomputed: usize,
    /// Image files left out because of a per-file error
    pub skipped: usize,
    pub duration: Duration,
}

impl ScanReport {
    pub fn indexed(&self) -> usize {
        self.reused + self.recomputed
    }
}

#[derive(Debug, Clone, Default)]
pub struct ScanOutcome {
    /// In traversal order
    pub records: Vec<ImageRecord>,
    pub report: ScanReport,
}

/// How a single file was resolved
enum Indexed {
    Reused(ImageRecord),
    Recomputed(ImageRecord),
}

#[derive(Debug, Clone)]
pub struct Indexer {
    root: PathBuf,
    classifier: PathClassifier,
}

impl Indexer {
    pub fn new<P: Into<PathBuf>>(root: P, classifier: PathClassifier) -> Self {
        Self {
            root: root.into(),
            classifier,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn classifier(&self) -> &PathClassifier {
        &self.classifier
    }

    /// Full traversal of the catalog root.
    ///
    /// Blocking; callers on the async runtime go through
    /// [`crate::services::run_blocking`]. Concurrent scans against the same
    /// store must be serialized by the caller.
    pub fn scan(&self, store: &CacheStore) -> ScanOutcome {
        let started = Instant::now();
        let mut outcome = ScanOutcome::default();

        if self.root.is_dir() {
            self.walk(store, &mut outcome);
        } else {
            warn!(
                "Catalog root {} does not exist, the catalog is empty",
                self.root.display()
            );
        }

        if let Err(e) = store.save() {
            error!("Failed to persist scan cache: {}", e);
        }

        outcome.report.duration = started.elapsed();
        info!(
            "Scan of {} complete: {} images ({} reused, {} recomputed, {} skipped) in {:?}",
            self.root.display(),
            outcome.report.indexed(),
            outcome.report.reused,
            outcome.report.recomputed,
            outcome.report.skipped,
            outcome.report.duration
        );
        outcome
    }

    fn walk(&self, store: &CacheStore, outcome: &mut ScanOutcome) {
        for entry in WalkDir::new(&self.root).sort_by_file_name() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Skipping unreadable part of the catalog: {}", e);
                    continue;
                }
            };

            if entry.file_type().is_dir() || !self.classifier.is_image_path(entry.path()) {
                continue;
            }

            let Some(relative_path) = relative_key(&self.root, entry.path()) else {
                warn!(
                    "Skipping {}: path is not valid UTF-8",
                    entry.path().display()
                );
                outcome.report.skipped += 1;
                continue;
            };

            match self.index_file(store, entry.path(), relative_path) {
                Ok(Some(Indexed::Reused(record))) => {
                    outcome.report.reused += 1;
                    outcome.records.push(record);
                }
                Ok(Some(Indexed::Recomputed(record))) => {
                    outcome.report.recomputed += 1;
                    outcome.records.push(record);
                }
                Ok(None) => {}
                Err(e) if e.is_per_file() => {
                    warn!("Skipping file: {}", e);
                    outcome.report.skipped += 1;
                }
                Err(e) => {
                    error!("Unexpected failure indexing {}: {}", entry.path().display(), e);
                    outcome.report.skipped += 1;
                }
            }
        }
    }

    fn index_file(
        &self,
        store: &CacheStore,
        path: &Path,
        relative_path: String,
    ) -> ScanResult<Option<Indexed>> {
        let metadata = std::fs::metadata(path).map_err(|e| ScanError::file_access(path, e))?;
        if !metadata.is_file() {
            return Ok(None);
        }
        let modified_at = modified_time(path, &metadata)?;

        if let Some(entry) = store.get(&relative_path) {
            if entry.is_fresh(&modified_at) {
                return Ok(Some(Indexed::Reused(entry.record)));
            }
            debug!("{} changed since last scan", relative_path);
        }

        let record = build_record(path, &relative_path, &metadata, modified_at)?;
        store.insert(
            relative_path,
            CacheEntry {
                modified_at,
                record: record.clone(),
            },
        );
        Ok(Some(Indexed::Recomputed(record)))
    }
}

/// Derive a record from the file on disk
fn build_record(
    path: &Path,
    relative_path: &str,
    metadata: &Metadata,
    modified_at: DateTime<Utc>,
) -> ScanResult<ImageRecord> {
    let (width, height) = image::ImageReader::open(path)
        .and_then(|reader| reader.with_guessed_format())
        .map_err(|e| ScanError::file_access(path, e))?
        .into_dimensions()
        .map_err(|e| ScanError::decode(path, e))?;

    let fingerprint =
        FingerprintHasher::hash_file(path).map_err(|e| ScanError::file_access(path, e))?;

    // Not every filesystem records a birth time
    let created_at = metadata
        .created()
        .map(DateTime::<Utc>::from)
        .unwrap_or(modified_at);

    Ok(ImageRecord {
        url: ImageRecord::image_url(relative_path),
        thumbnail: ImageRecord::thumbnail_url(&fingerprint),
        tag: extract_tag(relative_path),
        relative_path: relative_path.to_string(),
        fingerprint,
        width,
        height,
        size_bytes: metadata.len(),
        created_at,
    })
}

fn modified_time(path: &Path, metadata: &Metadata) -> ScanResult<DateTime<Utc>> {
    metadata
        .modified()
        .map(DateTime::<Utc>::from)
        .map_err(|e| ScanError::file_access(path, e))
}

/// `/`-separated path of `path` below `root`
fn relative_key(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let mut segments = Vec::new();
    for component in relative.components() {
        match component {
            Component::Normal(segment) => segments.push(segment.to_str()?),
            _ => return None,
        }
    }
    if segments.is_empty() {
        None
    } else {
        Some(segments.join("/"))
    }
}
