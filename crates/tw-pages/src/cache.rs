//! Snapshot page cache.
//!
//! [`PageCache`] serves lookups and searches from the committed [`PageMap`]
//! while [`PageCache::reload`] builds a replacement from a fresh archive.
//!
//! # Thread Safety
//!
//! - `get()` and `search()` clone the current `Arc<PageMap>` under a
//!   momentary read lock and never wait on I/O
//! - `reload()` holds a `Mutex<()>` across fetch, build and swap, so
//!   overlapping reloads run one after another
//! - The swap replaces the `Arc` in a single write; readers holding the old
//!   snapshot keep using it until they drop it

use std::sync::{Arc, Mutex, RwLock};
use std::time::{Duration, Instant};

use tw_archive::{ArchiveReader, ArchiveSource, DEFAULT_MAX_ENTRY_BYTES};

use crate::builder::PageIndexBuilder;
use crate::error::{MIN_QUERY_CHARS, PageError};
use crate::page::{Page, PageMeta};
use crate::page_map::PageMap;

/// Configuration for [`PageCache`].
#[derive(Clone, Debug)]
pub struct PageCacheConfig {
    /// Largest archive entry accepted during reload.
    pub max_entry_bytes: u64,
}

impl Default for PageCacheConfig {
    fn default() -> Self {
        Self {
            max_entry_bytes: DEFAULT_MAX_ENTRY_BYTES,
        }
    }
}

/// Outcome of a successful reload.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReloadStats {
    /// Number of pages in the newly committed map.
    pub pages: usize,
    /// Wall time for fetch, build and swap.
    pub elapsed: Duration,
}

/// Page store with atomic snapshot replacement.
pub struct PageCache {
    source: Arc<dyn ArchiveSource>,
    max_entry_bytes: u64,
    /// Serializes reload operations.
    reload_lock: Mutex<()>,
    /// Committed page map (atomically swappable).
    current: RwLock<Arc<PageMap>>,
}

impl PageCache {
    /// Create a cache with an empty committed map.
    ///
    /// Nothing is fetched until [`reload`](Self::reload) is called.
    #[must_use]
    pub fn new(source: Arc<dyn ArchiveSource>, config: PageCacheConfig) -> Self {
        Self {
            source,
            max_entry_bytes: config.max_entry_bytes,
            reload_lock: Mutex::new(()),
            current: RwLock::new(Arc::new(PageMap::new())),
        }
    }

    /// Current committed snapshot.
    ///
    /// # Panics
    ///
    /// Panics if the internal `RwLock` is poisoned.
    #[must_use]
    pub fn snapshot(&self) -> Arc<PageMap> {
        self.current.read().unwrap().clone()
    }

    /// Fetch a fresh snapshot, build a new page map and commit it.
    ///
    /// On any failure the committed map is left exactly as it was.
    ///
    /// # Errors
    ///
    /// Returns `PageError::Archive` if the download or archive reading fails
    /// and `PageError::Parse` if a document has malformed front matter.
    ///
    /// # Panics
    ///
    /// Panics if internal locks are poisoned.
    pub fn reload(&self) -> Result<ReloadStats, PageError> {
        let _guard = self.reload_lock.lock().unwrap();
        let start = Instant::now();

        let map = self.build_from_source().inspect_err(|e| {
            tracing::warn!(source = %self.source.describe(), error = %e, "Reload failed");
        })?;

        let pages = map.len();
        *self.current.write().unwrap() = Arc::new(map);

        let elapsed = start.elapsed();
        tracing::info!(
            source = %self.source.describe(),
            pages,
            elapsed_ms = elapsed.as_secs_f64() * 1000.0,
            "Pages reloaded"
        );

        Ok(ReloadStats { pages, elapsed })
    }

    /// Build a working map from a freshly fetched archive.
    fn build_from_source(&self) -> Result<PageMap, PageError> {
        let archive = self.source.fetch()?;
        let mut reader =
            ArchiveReader::open(archive.path())?.with_max_entry_bytes(self.max_entry_bytes);

        let mut builder = PageIndexBuilder::new();
        while let Some(entry) = reader.next_entry() {
            let entry = entry?;
            let path = entry.path().to_vec();
            let raw = entry.read_to_string()?;
            builder.ingest(&path, &raw)?;
        }

        Ok(builder.build())
    }

    /// Look up a page by request path.
    ///
    /// A trailing `.md` is ignored, an empty path means `index`, and a
    /// directory path falls back to its `index` page.
    ///
    /// # Panics
    ///
    /// Panics if the internal `RwLock` is poisoned.
    #[must_use]
    pub fn get(&self, path: &str) -> Option<Page> {
        let page = self.snapshot().resolve(path).cloned();
        tracing::debug!(path, found = page.is_some(), "Page lookup");
        page
    }

    /// Metadata of pages containing `query`, in insertion order.
    ///
    /// Matches the canonical path, `name`, `description` and body text as
    /// case-sensitive substrings.
    ///
    /// # Errors
    ///
    /// Returns `PageError::InvalidQuery` if `query` is shorter than three
    /// characters.
    ///
    /// # Panics
    ///
    /// Panics if the internal `RwLock` is poisoned.
    pub fn search(&self, query: &str) -> Result<Vec<PageMeta>, PageError> {
        if query.chars().count() < MIN_QUERY_CHARS {
            return Err(PageError::InvalidQuery(query.to_owned()));
        }

        let results = self.snapshot().search(query);
        tracing::debug!(query, results = results.len(), "Search");
        Ok(results)
    }
}
