//! VPK archive extraction.
//!
//! A `.vpk` is a plain ZIP container. Entries are written one by one, in
//! archive order, below the destination directory. A failure part-way leaves
//! a partially populated tree behind; the installer wipes the staging root
//! before every attempt, so nothing here tries to roll back.

use crate::stager::ensure_dirs;
use camino::{Utf8Component, Utf8Path, Utf8PathBuf};
use log::debug;
use std::fs::{File, OpenOptions};
use std::io::{BufReader, Read, Write};

/// Trait for extracting package archives, enabling test mocking.
///
/// # Examples
///
/// ```
/// use vpk_installer::extraction::ZipExtractor;
///
/// let extractor = ZipExtractor;
/// // Use extractor.extract(archive_path, dest_dir) in production
/// ```
#[cfg_attr(test, mockall::automock)]
pub trait ArchiveExtractor {
    /// Extract the archive at `archive_path` into `dest_dir`.
    ///
    /// Returns the relative paths of the files that were written.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractionError::Open`] if the container cannot be opened,
    /// [`ExtractionError::Decode`] if an entry cannot be read, and
    /// [`ExtractionError::Write`] if a destination file cannot be written
    /// in full.
    fn extract(
        &self,
        archive_path: &Utf8Path,
        dest_dir: &Utf8Path,
    ) -> Result<Vec<Utf8PathBuf>, ExtractionError>;
}

/// Errors arising from archive extraction.
#[derive(Debug, thiserror::Error)]
pub enum ExtractionError {
    /// The archive could not be opened or is not a ZIP container.
    #[error("cannot open {path}: {reason}")]
    Open {
        /// Archive path.
        path: Utf8PathBuf,
        /// Description of the failure.
        reason: String,
    },

    /// An entry could not be read or its name is unusable.
    #[error("cannot read entry {entry}: {reason}")]
    Decode {
        /// Entry name, or `#<index>` when the name is not yet known.
        entry: String,
        /// Description of the failure.
        reason: String,
    },

    /// A destination file could not be opened or fully written.
    #[error("cannot write {path}: {reason}")]
    Write {
        /// Destination path.
        path: Utf8PathBuf,
        /// Description of the failure.
        reason: String,
    },
}

impl From<ExtractionError> for crate::error::InstallerError {
    fn from(err: ExtractionError) -> Self {
        match err {
            ExtractionError::Open { path, reason } => Self::ArchiveOpen { path, reason },
            ExtractionError::Decode { entry, reason } => Self::ArchiveDecode { entry, reason },
            ExtractionError::Write { path, reason } => Self::WriteFailed { path, reason },
        }
    }
}

/// Default extractor backed by the `zip` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct ZipExtractor;

impl ArchiveExtractor for ZipExtractor {
    fn extract(
        &self,
        archive_path: &Utf8Path,
        dest_dir: &Utf8Path,
    ) -> Result<Vec<Utf8PathBuf>, ExtractionError> {
        let open_error = |reason: String| ExtractionError::Open {
            path: archive_path.to_owned(),
            reason,
        };
        let file = File::open(archive_path).map_err(|e| open_error(e.to_string()))?;
        let mut archive =
            zip::ZipArchive::new(BufReader::new(file)).map_err(|e| open_error(e.to_string()))?;

        let mut written = Vec::with_capacity(archive.len());
        for index in 0..archive.len() {
            let mut entry = archive.by_index(index).map_err(|e| ExtractionError::Decode {
                entry: format!("#{index}"),
                reason: e.to_string(),
            })?;
            let name = entry.name().to_owned();
            let relative = validate_entry_name(&name)?;
            let dest_path = dest_dir.join(&relative);

            if entry.is_dir() {
                ensure_dirs(&dest_path);
                continue;
            }
            if let Some(parent) = dest_path.parent() {
                ensure_dirs(parent);
            }

            let mut file = open_destination(&dest_path)?;
            let declared = entry.size();
            // Sized by what the entry yields, not by its declared size.
            let mut contents = Vec::new();
            entry
                .read_to_end(&mut contents)
                .map_err(|e| ExtractionError::Decode {
                    entry: name.clone(),
                    reason: e.to_string(),
                })?;

            write_contents(&mut file, &dest_path, &contents, declared)?;
            debug!("extracted {relative} ({declared} bytes)");
            written.push(relative);
        }

        Ok(written)
    }
}

/// Open `dest_path` for writing, truncating any existing file.
fn open_destination(dest_path: &Utf8Path) -> Result<File, ExtractionError> {
    OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(dest_path)
        .map_err(|e| ExtractionError::Write {
            path: dest_path.to_owned(),
            reason: format!("open failed: {e}"),
        })
}

/// Write an entry's `contents` in one go and check them against the
/// size the archive declares.
fn write_contents(
    file: &mut File,
    dest_path: &Utf8Path,
    contents: &[u8],
    declared: u64,
) -> Result<(), ExtractionError> {
    let write_error = |reason: String| ExtractionError::Write {
        path: dest_path.to_owned(),
        reason,
    };

    file
        .write_all(contents)
        .map_err(|e| write_error(e.to_string()))?;

    let actual = u64::try_from(contents.len()).unwrap_or(u64::MAX);
    if actual != declared {
        return Err(write_error(format!(
            "wrote {actual} bytes, entry declares {declared}"
        )));
    }
    Ok(())
}

/// Validate that an entry name stays below the destination directory.
fn validate_entry_name(name: &str) -> Result<Utf8PathBuf, ExtractionError> {
    let path = Utf8Path::new(name);
    let escapes = path.is_absolute()
        || path
            .components()
            .any(|c| matches!(c, Utf8Component::ParentDir | Utf8Component::Prefix(_)));
    if escapes || name.is_empty() {
        return Err(ExtractionError::Decode {
            entry: name.to_owned(),
            reason: "entry path escapes the destination directory".to_owned(),
        });
    }
    Ok(path
        .components()
        .filter(|c| !matches!(c, Utf8Component::CurDir))
        .collect())
}
