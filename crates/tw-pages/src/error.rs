//! Error type for page index operations.

use tw_archive::ArchiveError;

/// Shortest query accepted by [`PageCache::search`](crate::PageCache::search).
pub const MIN_QUERY_CHARS: usize = 3;

/// Error returned by page cache operations.
#[derive(Debug, thiserror::Error)]
pub enum PageError {
    /// Fetching or reading the snapshot archive failed.
    #[error(transparent)]
    Archive(#[from] ArchiveError),

    /// A document has malformed front matter.
    #[error("Malformed front matter in {path}: {message}")]
    Parse {
        /// Archive path of the offending document.
        path: String,
        /// Decoder message.
        message: String,
    },

    /// Search query is too short.
    #[error("Search query must be at least {MIN_QUERY_CHARS} characters, got {0:?}")]
    InvalidQuery(String),
}

impl PageError {
    /// True if the caller supplied invalid input rather than the reload failing.
    #[must_use]
    pub fn is_invalid_query(&self) -> bool {
        matches!(self, Self::InvalidQuery(_))
    }

    /// HTTP status returned by the archive host, if the download was refused.
    #[must_use]
    pub fn download_status(&self) -> Option<u16> {
        match self {
            Self::Archive(e) => e.download_status(),
            _ => None,
        }
    }
}
