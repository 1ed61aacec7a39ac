//! Archive source trait.
//!
//! The page cache fetches snapshots through [`ArchiveSource`] so reload logic
//! can be tested without a network connection.

use crate::{ArchiveError, ArchiveFetcher, DownloadedArchive};

/// Something that can produce a fresh snapshot archive on demand.
pub trait ArchiveSource: Send + Sync {
    /// Download a new snapshot.
    ///
    /// Each call produces an independent temporary archive.
    fn fetch(&self) -> Result<DownloadedArchive, ArchiveError>;

    /// Human-readable description for logs (e.g., `acme/handbook@main`).
    fn describe(&self) -> String;
}

/// A repository branch fetched over HTTP.
pub struct RepositoryArchive {
    fetcher: ArchiveFetcher,
    repository: String,
    reference: Option<String>,
}

impl RepositoryArchive {
    /// Create a source for `repository` at `reference`.
    ///
    /// With `reference = None` the fetcher's default branch is used.
    #[must_use]
    pub fn new(fetcher: ArchiveFetcher, repository: String, reference: Option<String>) -> Self {
        Self {
            fetcher,
            repository,
            reference,
        }
    }
}

impl ArchiveSource for RepositoryArchive {
    fn fetch(&self) -> Result<DownloadedArchive, ArchiveError> {
        self.fetcher
            .fetch(&self.repository, self.reference.as_deref())
    }

    fn describe(&self) -> String {
        let reference = self
            .reference
            .as_deref()
            .unwrap_or(self.fetcher.default_branch());
        format!("{}@{reference}", self.repository)
    }
}
