//! Sequential Markdown entry reader for repository archives.
//!
//! Repository snapshots wrap every file in a synthetic root directory
//! (`owner-repo-sha/...`). The reader strips that first segment and yields
//! only entries that:
//! - have no path segment starting with `.` (dotfiles and dot-directories)
//! - end in `.md`
//!
//! Entries come out in the archive's storage order. [`ArchiveReader::next_entry`]
//! borrows the reader mutably, so the previous entry must be consumed or
//! dropped before the next one is pulled.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use zip::ZipArchive;

use crate::ArchiveError;

/// Default upper bound for a single entry (8 MiB).
///
/// `tw_config::DEFAULT_MAX_ENTRY_BYTES` mirrors this value for the config file.
pub const DEFAULT_MAX_ENTRY_BYTES: u64 = 8 * 1024 * 1024;

/// Split an archive entry name into its wiki-relative segments.
///
/// Returns `None` if the entry should be skipped.
pub(crate) fn markdown_path(name: &str) -> Option<Vec<String>> {
    let mut segments = name.split('/');
    // Synthetic root wrapper directory
    segments.next()?;

    let segments: Vec<&str> = segments.collect();
    let file_name = segments.last()?;

    if segments.iter().any(|segment| segment.starts_with('.')) {
        return None;
    }
    if !file_name.ends_with(".md") {
        return None;
    }

    Some(segments.into_iter().map(str::to_owned).collect())
}

/// A Markdown entry pulled from an [`ArchiveReader`].
pub struct ArchiveEntry<'a> {
    path: Vec<String>,
    content: Box<dyn Read + 'a>,
    max_bytes: u64,
}

impl ArchiveEntry<'_> {
    /// Path segments relative to the archive root (wrapper stripped).
    #[must_use]
    pub fn path(&self) -> &[String] {
        &self.path
    }

    /// Read the whole entry as text.
    ///
    /// Invalid UTF-8 sequences are replaced with `U+FFFD`.
    ///
    /// # Errors
    ///
    /// Returns `ArchiveError::EntryTooLarge` if the entry exceeds the reader's
    /// size limit, or `ArchiveError::Io` if decompression fails.
    pub fn read_to_string(self) -> Result<String, ArchiveError> {
        let Self {
            path,
            content,
            max_bytes,
        } = self;

        let mut buf = Vec::new();
        content.take(max_bytes + 1).read_to_end(&mut buf)?;
        if buf.len() as u64 > max_bytes {
            return Err(ArchiveError::EntryTooLarge {
                path: path.join("/"),
                limit: max_bytes,
            });
        }

        Ok(String::from_utf8(buf).unwrap_or_else(|e| {
            tracing::warn!(path = %path.join("/"), "Entry is not valid UTF-8, decoding lossily");
            String::from_utf8_lossy(e.as_bytes()).into_owned()
        }))
    }
}

/// Pull-based reader over the Markdown entries of a zip archive.
///
/// Single pass: once exhausted, open the archive again to restart.
pub struct ArchiveReader {
    archive: ZipArchive<File>,
    position: usize,
    max_entry_bytes: u64,
}

impl ArchiveReader {
    /// Open an archive file.
    ///
    /// # Errors
    ///
    /// Returns `ArchiveError::Io` if the file cannot be opened and
    /// `ArchiveError::Zip` if it is not a zip archive.
    pub fn open(path: &Path) -> Result<Self, ArchiveError> {
        let file = File::open(path)?;
        let archive = ZipArchive::new(file)?;
        Ok(Self {
            archive,
            position: 0,
            max_entry_bytes: DEFAULT_MAX_ENTRY_BYTES,
        })
    }

    /// Set the largest entry [`ArchiveEntry::read_to_string`] accepts.
    #[must_use]
    pub fn with_max_entry_bytes(mut self, max_entry_bytes: u64) -> Self {
        self.max_entry_bytes = max_entry_bytes;
        self
    }

    /// Number of raw entries in the archive, including skipped ones.
    #[must_use]
    pub fn raw_len(&self) -> usize {
        self.archive.len()
    }

    /// Pull the next Markdown entry.
    ///
    /// Returns `None` once every entry has been visited.
    pub fn next_entry(&mut self) -> Option<Result<ArchiveEntry<'_>, ArchiveError>> {
        while self.position < self.archive.len() {
            let index = self.position;
            self.position += 1;

            let name = match self.archive.by_index_raw(index) {
                Ok(file) => file.name().to_owned(),
                Err(e) => return Some(Err(e.into())),
            };

            let Some(path) = markdown_path(&name) else {
                tracing::debug!(entry = %name, "Skipping archive entry");
                continue;
            };

            let max_bytes = self.max_entry_bytes;
            return Some(
                self.archive
                    .by_index(index)
                    .map(|file| ArchiveEntry {
                        path,
                        content: Box::new(file),
                        max_bytes,
                    })
                    .map_err(ArchiveError::from),
            );
        }

        None
    }
}
