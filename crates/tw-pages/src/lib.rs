//! Page index and snapshot cache for thinwiki.
//!
//! This crate turns a repository snapshot into servable pages:
//!
//! - [`front_matter::parse`] splits a Markdown document into its YAML front
//!   matter and body
//! - [`PageIndexBuilder`] derives canonical paths and parent/child links
//!   while documents stream out of the archive, in any order
//! - [`PageCache`] holds the committed [`PageMap`] and answers `get` and
//!   `search` while [`PageCache::reload`] builds and swaps in a replacement
//!
//! # Quick Start
//!
//! ```ignore
//! use std::sync::Arc;
//! use tw_archive::{ArchiveFetcher, FetcherConfig, RepositoryArchive};
//! use tw_pages::{PageCache, PageCacheConfig};
//!
//! let fetcher = ArchiveFetcher::new(FetcherConfig::default());
//! let source = Arc::new(RepositoryArchive::new(fetcher, "acme/handbook".to_owned(), None));
//! let cache = PageCache::new(source, PageCacheConfig::default());
//!
//! cache.reload()?;
//! let home = cache.get("");
//! let hits = cache.search("deploy")?;
//! ```

mod builder;
mod cache;
mod error;
pub mod front_matter;
mod page;
mod page_map;

pub use builder::{PageIndexBuilder, canonical_path, parent_path};
pub use cache::{PageCache, PageCacheConfig, ReloadStats};
pub use error::{MIN_QUERY_CHARS, PageError};
pub use front_matter::FrontMatterError;
pub use page::{Page, PageMeta};
pub use page_map::PageMap;
