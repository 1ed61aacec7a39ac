//! Mock archive source for testing.
//!
//! Provides [`MockArchiveSource`] for testing reload logic without network
//! access, and [`write_zip`] for building archives in tests.

use std::io::{Seek, Write};
use std::sync::RwLock;
use std::sync::atomic::{AtomicUsize, Ordering};

use tempfile::NamedTempFile;
use zip::CompressionMethod;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use crate::{ArchiveError, ArchiveSource, DownloadedArchive};

/// Write a zip archive containing `entries` to `writer`.
///
/// Names ending in `/` become directory entries. Entries are stored
/// uncompressed in the given order.
///
/// # Errors
///
/// Returns `ArchiveError::Zip` or `ArchiveError::Io` if writing fails.
pub fn write_zip<W: Write + Seek>(
    writer: W,
    entries: &[(String, Vec<u8>)],
) -> Result<(), ArchiveError> {
    let mut zip = ZipWriter::new(writer);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);

    for (name, content) in entries {
        if name.ends_with('/') {
            zip.add_directory(name.as_str(), options)?;
        } else {
            zip.start_file(name.as_str(), options)?;
            zip.write_all(content)?;
        }
    }

    zip.finish()?;
    Ok(())
}

/// Mock archive source for testing.
///
/// Serves an in-memory file list as a freshly written zip archive on every
/// fetch. Files are placed under a synthetic root directory like real
/// repository snapshots.
///
/// # Example
///
/// ```ignore
/// use tw_archive::{ArchiveSource, MockArchiveSource};
///
/// let source = MockArchiveSource::new()
///     .with_file("index.md", "---\nname: Home\n---\nWelcome")
///     .with_file("docs/setup.md", "Setup steps");
///
/// let archive = source.fetch().unwrap();
/// ```
#[derive(Debug)]
pub struct MockArchiveSource {
    root: String,
    files: RwLock<Vec<(String, Vec<u8>)>>,
    failure: RwLock<Option<u16>>,
    fetches: AtomicUsize,
}

impl Default for MockArchiveSource {
    fn default() -> Self {
        Self {
            root: "acme-wiki-1a2b3c4".to_owned(),
            files: RwLock::new(Vec::new()),
            failure: RwLock::new(None),
            fetches: AtomicUsize::new(0),
        }
    }
}

impl MockArchiveSource {
    /// Create a new empty mock source.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file at `path` relative to the snapshot root.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_file(self, path: impl Into<String>, content: impl Into<String>) -> Self {
        self.files
            .write()
            .unwrap()
            .push((path.into(), content.into().into_bytes()));
        self
    }

    /// Replace the whole file list served by later fetches.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn set_files<P, C>(&self, files: impl IntoIterator<Item = (P, C)>)
    where
        P: Into<String>,
        C: Into<String>,
    {
        *self.files.write().unwrap() = files
            .into_iter()
            .map(|(path, content)| (path.into(), content.into().into_bytes()))
            .collect();
    }

    /// Make later fetches fail with the given HTTP status.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn fail_with_status(&self, status: u16) {
        *self.failure.write().unwrap() = Some(status);
    }

    /// Make later fetches succeed again.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn clear_failure(&self) {
        *self.failure.write().unwrap() = None;
    }

    /// Number of fetches performed so far.
    #[must_use]
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

impl ArchiveSource for MockArchiveSource {
    fn fetch(&self) -> Result<DownloadedArchive, ArchiveError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);

        if let Some(status) = *self.failure.read().unwrap() {
            return Err(ArchiveError::Download {
                repository: "acme/wiki".to_owned(),
                reference: "main".to_owned(),
                status,
            });
        }

        let mut entries = vec![(format!("{}/", self.root), Vec::new())];
        entries.extend(
            self.files
                .read()
                .unwrap()
                .iter()
                .map(|(path, content)| (format!("{}/{path}", self.root), content.clone())),
        );

        let mut file = NamedTempFile::new()?;
        write_zip(file.as_file_mut(), &entries)?;
        let bytes = file.as_file().metadata()?.len();

        Ok(DownloadedArchive::new(file, bytes))
    }

    fn describe(&self) -> String {
        "acme/wiki@main".to_owned()
    }
}
