//! Archive download over HTTP.
//!
//! Downloads `{archive_url}/{repository}/zipball/{reference}` into a scoped
//! temporary file. Redirects are followed by the transport, and the whole
//! request is bounded by the configured timeout.

use std::io::{Seek, SeekFrom, Write};
use std::path::Path;
use std::time::{Duration, Instant};

use tempfile::NamedTempFile;
use ureq::Agent;
use ureq::http::StatusCode;

use crate::ArchiveError;

/// Configuration for [`ArchiveFetcher`].
#[derive(Clone, Debug)]
pub struct FetcherConfig {
    /// Base URL of the archive host (e.g., `https://github.com`).
    pub archive_url: String,
    /// Branch used when the caller does not name one.
    pub default_branch: String,
    /// `User-Agent` header sent with every request.
    pub user_agent: String,
    /// Timeout for the whole request including the body transfer.
    pub timeout: Duration,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            archive_url: "https://github.com".to_owned(),
            default_branch: "main".to_owned(),
            user_agent: concat!("thinwiki/", env!("CARGO_PKG_VERSION")).to_owned(),
            timeout: Duration::from_secs(60),
        }
    }
}

/// A downloaded archive in a temporary file.
///
/// The file is removed when this value is dropped, on every exit path.
#[derive(Debug)]
pub struct DownloadedArchive {
    file: NamedTempFile,
    bytes: u64,
}

impl DownloadedArchive {
    /// Wrap an already written temporary file.
    pub(crate) fn new(file: NamedTempFile, bytes: u64) -> Self {
        Self { file, bytes }
    }

    /// Location of the archive on disk.
    #[must_use]
    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Size of the archive in bytes.
    #[must_use]
    pub fn len(&self) -> u64 {
        self.bytes
    }

    /// True if the archive is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes == 0
    }
}

/// Downloads repository snapshots as zip archives.
pub struct ArchiveFetcher {
    agent: Agent,
    config: FetcherConfig,
}

impl ArchiveFetcher {
    /// Create a fetcher with its own HTTP agent.
    #[must_use]
    pub fn new(config: FetcherConfig) -> Self {
        let agent = Agent::config_builder()
            .timeout_global(Some(config.timeout))
            .http_status_as_error(false)
            .build()
            .into();
        Self { agent, config }
    }

    /// Branch used when `fetch` is called without a reference.
    #[must_use]
    pub fn default_branch(&self) -> &str {
        &self.config.default_branch
    }

    /// Build the archive URL for a repository and reference.
    fn archive_url(&self, repository: &str, reference: &str) -> String {
        format!(
            "{}/{repository}/zipball/{reference}",
            self.config.archive_url.trim_end_matches('/')
        )
    }

    /// Download `repository` at `reference` into a temporary file.
    ///
    /// `reference` defaults to the configured branch.
    ///
    /// # Errors
    ///
    /// Returns `ArchiveError::MissingRepository` if `repository` is empty,
    /// `ArchiveError::Download` if the host answers with anything but 200,
    /// `ArchiveError::Http` on transport failures and `ArchiveError::Io` if
    /// the body cannot be written to disk.
    pub fn fetch(
        &self,
        repository: &str,
        reference: Option<&str>,
    ) -> Result<DownloadedArchive, ArchiveError> {
        let repository = repository.trim();
        if repository.is_empty() {
            return Err(ArchiveError::MissingRepository);
        }
        let reference = reference.unwrap_or(&self.config.default_branch);

        let start = Instant::now();
        let url = self.archive_url(repository, reference);

        let mut response = self
            .agent
            .get(&url)
            .header("User-Agent", self.config.user_agent.as_str())
            .call()
            .map_err(|e| ArchiveError::Http {
                url: url.clone(),
                source: Box::new(e),
            })?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(ArchiveError::Download {
                repository: repository.to_owned(),
                reference: reference.to_owned(),
                status: status.as_u16(),
            });
        }

        let mut file = NamedTempFile::new()?;
        let bytes = std::io::copy(&mut response.body_mut().as_reader(), &mut file)?;
        file.flush()?;
        file.seek(SeekFrom::Start(0))?;

        tracing::info!(
            repository,
            reference,
            bytes,
            elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Downloaded archive"
        );

        Ok(DownloadedArchive::new(file, bytes))
    }
}
