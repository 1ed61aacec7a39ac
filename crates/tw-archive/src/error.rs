//! Error type for archive download and reading.

/// Error returned while fetching or reading a repository archive.
#[derive(Debug, thiserror::Error)]
pub enum ArchiveError {
    /// No repository identifier was supplied.
    #[error("Repository identifier is not configured")]
    MissingRepository,

    /// The archive host answered with a non-success status.
    #[error("Failed to download archive of {repository} @ {reference}: HTTP {status}")]
    Download {
        /// Repository identifier (`owner/name`).
        repository: String,
        /// Branch or ref that was requested.
        reference: String,
        /// HTTP status code returned by the host.
        status: u16,
    },

    /// Transport-level failure (DNS, TLS, timeout, connection reset).
    #[error("HTTP error fetching {url}: {source}")]
    Http {
        /// Requested URL.
        url: String,
        /// Underlying transport error.
        #[source]
        source: Box<ureq::Error>,
    },

    /// I/O error on the temporary archive file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The downloaded file is not a readable zip archive.
    #[error("Invalid archive: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// An entry is larger than the configured bound.
    #[error("Archive entry {path} exceeds size limit ({limit} bytes)")]
    EntryTooLarge {
        /// Entry path relative to the archive root.
        path: String,
        /// Configured limit in bytes.
        limit: u64,
    },
}

impl ArchiveError {
    /// HTTP status returned by the archive host, if this is a download error.
    #[must_use]
    pub fn download_status(&self) -> Option<u16> {
        match self {
            Self::Download { status, .. } => Some(*status),
            _ => None,
        }
    }
}
