//! Catalog service
//!
//! Owns the scan cache and the indexer and exposes the operations the HTTP
//! layer needs. Every mutation of the cache that spans more than one lock
//! acquisition (a scan, a clear, a prune) runs under a single writer mutex,
//! so two concurrent catalog requests never interleave their
//! read-modify-persist sequences.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, info};

use crate::config::Config;
use crate::errors::AppResult;
use crate::models::{CatalogPage, Category, ImageRecord};
use crate::services::cache_store::CacheStore;
use crate::services::categories::aggregate_categories;
use crate::services::indexer::{Indexer, ScanOutcome};
use crate::utils::{PathClassifier, loose_tag_match};

/// Sentinel accepted for "no category filter"
pub const ALL_CATEGORIES: &str = "all";

/// Category filter of a catalog query
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryFilter {
    All,
    Category(String),
}

impl CategoryFilter {
    /// Parse the `cid` query parameter; empty and `all` mean no filter
    pub fn from_param(cid: Option<&str>) -> Self {
        match cid {
            None | Some("") | Some(ALL_CATEGORIES) => Self::All,
            Some(id) => Self::Category(id.to_string()),
        }
    }

    pub fn matches(&self, record: &ImageRecord) -> bool {
        match self {
            Self::All => true,
            Self::Category(id) => loose_tag_match(&record.tag, id),
        }
    }
}

/// Slice `[start, start + count)` of the filtered records
pub fn paginate(records: Vec<ImageRecord>, start: usize, count: usize) -> CatalogPage {
    let total = records.len();
    let items = records.into_iter().skip(start).take(count).collect();
    CatalogPage {
        items,
        total,
        has_more: start.saturating_add(count) < total,
    }
}

struct CatalogInner {
    store: CacheStore,
    indexer: Indexer,
    writer: Mutex<()>,
}

/// Shared handle to the catalog; cheap to clone
#[derive(Clone)]
pub struct CatalogService {
    inner: Arc<CatalogInner>,
}

impl CatalogService {
    pub fn new(store: CacheStore, indexer: Indexer) -> Self {
        Self {
            inner: Arc::new(CatalogInner {
                store,
                indexer,
                writer: Mutex::new(()),
            }),
        }
    }

    /// Load the persisted cache and wire the indexer from configuration
    pub fn from_config(config: &Config) -> Self {
        let store = CacheStore::load(&config.storage.cache_file);
        let indexer = Indexer::new(
            &config.storage.catalog_root,
            PathClassifier::from_config(&config.catalog),
        );
        Self::new(store, indexer)
    }

    pub fn store(&self) -> &CacheStore {
        &self.inner.store
    }

    pub fn root(&self) -> &Path {
        self.inner.indexer.root()
    }

    pub fn classifier(&self) -> &PathClassifier {
        self.inner.indexer.classifier()
    }

    fn lock_writer(&self) -> MutexGuard<'_, ()> {
        self.inner
            .writer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Run a full incremental scan. Blocking.
    pub fn scan(&self) -> ScanOutcome {
        let _writer = self.lock_writer();
        self.inner.indexer.scan(&self.inner.store)
    }

    /// Fresh scan, category filter, then pagination. Blocking.
    pub fn query(&self, filter: &CategoryFilter, start: usize, count: usize) -> CatalogPage {
        let records: Vec<ImageRecord> = self
            .scan()
            .records
            .into_iter()
            .filter(|record| filter.matches(record))
            .collect();

        let page = paginate(records, start, count);
        debug!(
            "Catalog query {:?} start={} count={}: {} of {} records",
            filter,
            start,
            count,
            page.items.len(),
            page.total
        );
        page
    }

    /// Fresh scan, then category aggregation. Blocking.
    pub fn categories(&self) -> Vec<Category> {
        aggregate_categories(&self.scan().records)
    }

    /// Drop every cached record and delete the cache file. Blocking.
    pub fn clear_cache(&self) -> AppResult<()> {
        let _writer = self.lock_writer();
        self.inner.store.clear()?;
        Ok(())
    }

    /// Remove cache entries whose file is gone. Blocking.
    pub fn prune_cache(&self) -> AppResult<usize> {
        let _writer = self.lock_writer();
        Ok(self.inner.store.prune(self.root())?)
    }

    /// Source file of the image with `fingerprint`, without a rescan.
    ///
    /// `None` when the fingerprint is unknown or its file has disappeared.
    pub fn resolve_fingerprint(&self, fingerprint: &str) -> Option<PathBuf> {
        let relative_path = self.inner.store.lookup_fingerprint(fingerprint)?;
        let source = self.root().join(&relative_path);
        if source.is_file() {
            Some(source)
        } else {
            info!(
                "Fingerprint {} maps to {}, which no longer exists",
                fingerprint, relative_path
            );
            None
        }
    }
}
