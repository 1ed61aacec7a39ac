//! Repository snapshot download and archive reading for thinwiki.
//!
//! This crate provides the I/O half of the reload pipeline:
//!
//! - [`ArchiveFetcher`] downloads a branch snapshot of a repository as a
//!   zip archive into a scoped temporary file ([`DownloadedArchive`])
//! - [`ArchiveReader`] walks the downloaded archive entry by entry, yielding
//!   only Markdown files outside hidden directories
//! - [`ArchiveSource`] is the seam the page cache fetches through, with
//!   [`RepositoryArchive`] as the network implementation and
//!   [`MockArchiveSource`] for testing (behind `mock` feature flag)
//!
//! # Example
//!
//! ```ignore
//! use std::time::Duration;
//! use tw_archive::{ArchiveFetcher, ArchiveReader, FetcherConfig};
//!
//! let fetcher = ArchiveFetcher::new(FetcherConfig::default());
//! let archive = fetcher.fetch("acme/handbook", Some("main"))?;
//! let mut reader = ArchiveReader::open(archive.path())?;
//! while let Some(entry) = reader.next_entry() {
//!     let entry = entry?;
//!     let path = entry.path().join("/");
//!     let text = entry.read_to_string()?;
//!     println!("{path}: {} bytes", text.len());
//! }
//! ```

mod error;
mod fetch;
#[cfg(any(test, feature = "mock"))]
mod mock;
mod reader;
mod source;

pub use error::ArchiveError;
pub use fetch::{ArchiveFetcher, DownloadedArchive, FetcherConfig};
#[cfg(any(test, feature = "mock"))]
pub use mock::{MockArchiveSource, write_zip};
pub use reader::{ArchiveEntry, ArchiveReader, DEFAULT_MAX_ENTRY_BYTES};
pub use source::{ArchiveSource, RepositoryArchive};
