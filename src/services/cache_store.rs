//! Persisted scan cache
//!
//! Maps a `/`-separated relative path to the modification time observed at
//! the last index and the record derived at that time. The store is the
//! only long-lived mutable state of the catalog. It is loaded once at
//! startup, rewritten after every full scan, and can be cleared or pruned
//! on operator request.
//!
//! The mapping lives behind an [`RwLock`]: thumbnail lookups share the read
//! lock, scans and maintenance take the write lock for each mutation. The
//! read-modify-persist sequence of a whole scan is serialized one level up,
//! in [`crate::services::CatalogService`].

use std::collections::BTreeMap;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

use crate::errors::{ScanError, ScanResult};
use crate::models::CacheEntry;

pub type CacheMapping = BTreeMap<String, CacheEntry>;

pub struct CacheStore {
    path: PathBuf,
    entries: RwLock<CacheMapping>,
}

impl CacheStore {
    /// Load the persisted mapping, falling back to an empty cache.
    ///
    /// A missing file is the normal first-run case. A corrupt file is
    /// logged and ignored; the next scan rebuilds it from the filesystem.
    pub fn load<P: Into<PathBuf>>(path: P) -> Self {
        let path = path.into();
        let entries = match Self::read_mapping(&path) {
            Ok(entries) => {
                info!(
                    "Loaded scan cache from {} ({} entries)",
                    path.display(),
                    entries.len()
                );
                entries
            }
            Err(e) => {
                warn!("{}; starting with an empty cache", e);
                CacheMapping::new()
            }
        };

        Self {
            path,
            entries: RwLock::new(entries),
        }
    }

    /// An empty store that will persist to `path`
    pub fn empty<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            path: path.into(),
            entries: RwLock::new(CacheMapping::new()),
        }
    }

    fn read_mapping(path: &Path) -> ScanResult<CacheMapping> {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("No scan cache at {}", path.display());
                return Ok(CacheMapping::new());
            }
            Err(e) => return Err(ScanError::file_access(path, e)),
        };

        serde_json::from_str(&contents).map_err(|source| ScanError::CacheCorruption {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> RwLockReadGuard<'_, CacheMapping> {
        self.entries.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, CacheMapping> {
        self.entries.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn get(&self, relative_path: &str) -> Option<CacheEntry> {
        self.read().get(relative_path).cloned()
    }

    pub fn insert(&self, relative_path: String, entry: CacheEntry) {
        self.write().insert(relative_path, entry);
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Copy of the current mapping
    #[cfg(test)]
    pub fn snapshot(&self) -> CacheMapping {
        self.read().clone()
    }

    /// Find the relative path of the entry whose record carries `fingerprint`.
    ///
    /// Linear over the mapping. Several paths can share a fingerprint; the
    /// first in key order wins.
    pub fn lookup_fingerprint(&self, fingerprint: &str) -> Option<String> {
        self.read()
            .iter()
            .find(|(_, entry)| entry.record.fingerprint == fingerprint)
            .map(|(relative_path, _)| relative_path.clone())
    }

    /// Serialize the mapping and atomically replace the cache file
    pub fn save(&self) -> ScanResult<()> {
        let json = serde_json::to_string_pretty(&*self.read()).map_err(|e| {
            ScanError::CachePersist {
                path: self.path.clone(),
                message: e.to_string(),
            }
        })?;

        self.write_atomically(json.as_bytes())
            .map_err(|e| ScanError::CachePersist {
                path: self.path.clone(),
                message: e.to_string(),
            })?;

        debug!("Persisted scan cache to {}", self.path.display());
        Ok(())
    }

    fn write_atomically(&self, contents: &[u8]) -> io::Result<()> {
        let parent = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(parent)?;

        let mut temp = NamedTempFile::new_in(parent)?;
        temp.write_all(contents)?;
        temp.as_file().sync_all()?;
        temp.persist(&self.path).map_err(|e| e.error)?;
        Ok(())
    }

    /// Empty the mapping and delete the cache file.
    ///
    /// The next scan recomputes every record.
    pub fn clear(&self) -> io::Result<()> {
        let removed = {
            let mut entries = self.write();
            let count = entries.len();
            entries.clear();
            count
        };

        match std::fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(e),
        }

        info!(
            "Scan cache cleared ({} entries), next scan recomputes every record",
            removed
        );
        Ok(())
    }

    /// Drop entries whose source file no longer exists under `root` and persist.
    ///
    /// Scans never do this on their own.
    pub fn prune(&self, root: &Path) -> ScanResult<usize> {
        let removed = {
            let mut entries = self.write();
            let before = entries.len();
            entries.retain(|relative_path, _| root.join(relative_path).is_file());
            before - entries.len()
        };

        if removed > 0 {
            self.save()?;
        }
        info!("Pruned {} vanished entries from the scan cache", removed);
        Ok(removed)
    }
}
