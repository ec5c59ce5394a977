//! Error types for the VPK installer.
//!
//! Every stage of the pipeline returns an [`InstallerError`] on failure. The
//! `Display` text of each variant is the message shown to the user, and
//! [`InstallerError::status_code`] carries the raw platform status where one
//! exists so the result sink can surface both.

use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors that can occur while installing a package.
#[derive(Debug, Error)]
pub enum InstallerError {
    /// The archive could not be opened or identified as a ZIP container.
    #[error("failed to open archive {path}: {reason}")]
    ArchiveOpen {
        /// Path of the archive that failed to open.
        path: Utf8PathBuf,
        /// Description of the container error.
        reason: String,
    },

    /// An archive entry could not be read, or the cursor could not advance.
    #[error("failed to decode archive entry {entry}: {reason}")]
    ArchiveDecode {
        /// Name of the entry being read, or its index when the name is unknown.
        entry: String,
        /// Description of the decode failure.
        reason: String,
    },

    /// Writing a file into the staging tree failed or was short.
    #[error("failed writing {path}: {reason}")]
    WriteFailed {
        /// Destination that could not be written.
        path: Utf8PathBuf,
        /// Description of the I/O fault or length mismatch.
        reason: String,
    },

    /// The archive already ships `sce_sys/package/head.bin`.
    #[error("Please remove sce_sys/package/head.bin from your vpk")]
    HeadBinPresent {
        /// Location of the offending file inside the staging tree.
        path: Utf8PathBuf,
    },

    /// `param.sfo` is missing, unreadable, or carries no `TITLE_ID`.
    #[error("Failed to obtain title id, check that param.sfo is correct")]
    MissingTitleId {
        /// Location the metadata was read from.
        path: Utf8PathBuf,
    },

    /// A platform service call returned a negative status.
    #[error("{call} failed: 0x{code:08x}")]
    Service {
        /// Name of the platform call that failed.
        call: &'static str,
        /// Raw status returned by the call.
        code: i32,
    },

    /// The installer service completed but reported a negative result.
    #[error("Failed to install the package: 0x{code:08x}")]
    InstallFailed {
        /// Result code reported by the installer service.
        code: i32,
    },

    /// Another installation currently holds the staging root.
    #[error("another installation is already using {staging_root}")]
    Busy {
        /// Staging root guarded by the lock.
        staging_root: Utf8PathBuf,
    },

    /// The configuration file could not be read or parsed.
    #[error("invalid configuration {path}: {reason}")]
    Config {
        /// Path of the configuration file.
        path: Utf8PathBuf,
        /// Description of the parse or read error.
        reason: String,
    },

    /// An I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl InstallerError {
    /// Return the platform status code associated with this error, if any.
    ///
    /// # Examples
    ///
    /// ```
    /// use vpk_installer::error::InstallerError;
    ///
    /// let err = InstallerError::Service { call: "scePromoterUtilityInit", code: -5 };
    /// assert_eq!(err.status_code(), Some(-5));
    /// ```
    #[must_use]
    pub fn status_code(&self) -> Option<i32> {
        match self {
            Self::Service { code, .. } | Self::InstallFailed { code } => Some(*code),
            _ => None,
        }
    }
}

impl Clone for InstallerError {
    fn clone(&self) -> Self {
        match self {
            Self::ArchiveOpen { path, reason } => Self::ArchiveOpen {
                path: path.clone(),
                reason: reason.clone(),
            },
            Self::ArchiveDecode { entry, reason } => Self::ArchiveDecode {
                entry: entry.clone(),
                reason: reason.clone(),
            },
            Self::WriteFailed { path, reason } => Self::WriteFailed {
                path: path.clone(),
                reason: reason.clone(),
            },
            Self::HeadBinPresent { path } => Self::HeadBinPresent { path: path.clone() },
            Self::MissingTitleId { path } => Self::MissingTitleId { path: path.clone() },
            Self::Service { call, code } => Self::Service { call, code: *code },
            Self::InstallFailed { code } => Self::InstallFailed { code: *code },
            Self::Busy { staging_root } => Self::Busy {
                staging_root: staging_root.clone(),
            },
            Self::Config { path, reason } => Self::Config {
                path: path.clone(),
                reason: reason.clone(),
            },
            // Lossy: only the kind and message survive.
            Self::Io(source) => Self::Io(std::io::Error::new(source.kind(), source.to_string())),
        }
    }
}

/// Result type alias using [`InstallerError`].
pub type Result<T> = std::result::Result<T, InstallerError>;
