//! The install pipeline.
//!
//! One attempt runs four stages in order: wipe the staging root, extract
//! the archive into `<staging_root>/pkg`, synthesize `head.bin`, and
//! promote the package. The first failing stage ends the attempt; its
//! error is reported to the progress sink and returned. Partial staging
//! output is left for the next attempt's wipe.
//!
//! Only one attempt may own a staging root at a time. [`InstallGate`]
//! enforces this with an advisory lock next to the root, so a second
//! installer, in this process or another, fails fast with
//! [`InstallerError::Busy`] instead of wiping a tree that is in use.

use crate::config::InstallConfig;
use crate::error::{InstallerError, Result};
use crate::extraction::ArchiveExtractor;
use crate::head_bin::synthesize;
use crate::progress::{InstallOutcome, MonotonicProgress, ProgressSink};
use crate::promoter::{PromoterService, PromotionConfig, PromotionReport, promote};
use crate::stager::{Stager, ensure_dirs};
use camino::{Utf8Path, Utf8PathBuf};
use fs2::FileExt;
use log::{debug, info, warn};
use std::fs::{File, OpenOptions};
use std::thread::JoinHandle;

/// Progress once the staging root has been wiped.
pub const PROGRESS_START: u8 = 0;
/// Progress when extraction begins.
pub const PROGRESS_EXTRACTING: u8 = 10;
/// Progress once every entry has been written.
pub const PROGRESS_EXTRACTED: u8 = 30;
/// Progress once `head.bin` is on disk.
pub const PROGRESS_HEADER: u8 = 40;
/// Progress reported on success.
pub const PROGRESS_COMPLETE: u8 = 100;

/// Name of the worker thread started by [`Installer::spawn`].
pub const WORKER_THREAD_NAME: &str = "vpk-install";

/// Exclusive claim on a staging root.
///
/// The lock lives in `<staging_root>.lock`, beside the root rather than in
/// it, so wiping the root leaves the lock alone. Dropping the gate releases
/// the claim.
#[derive(Debug)]
pub struct InstallGate {
    file: File,
    path: Utf8PathBuf,
}

impl InstallGate {
    /// Path of the lock file guarding `staging_root`.
    #[must_use]
    pub fn lock_path(staging_root: &Utf8Path) -> Utf8PathBuf {
        Utf8PathBuf::from(format!("{}.lock", staging_root.as_str().trim_end_matches('/')))
    }

    /// Claim `staging_root` without blocking.
    ///
    /// # Errors
    ///
    /// Returns [`InstallerError::Busy`] if another installer holds the
    /// claim, or [`InstallerError::Io`] if the lock file cannot be opened.
    pub fn try_acquire(staging_root: &Utf8Path) -> Result<Self> {
        let path = Self::lock_path(staging_root);
        if let Some(parent) = path.parent() {
            ensure_dirs(parent);
        }
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&path)?;

        match FileExt::try_lock_exclusive(&file) {
            Ok(()) => {
                debug!("claimed {path}");
                Ok(Self { file, path })
            }
            Err(e) if e.raw_os_error() == fs2::lock_contended_error().raw_os_error() => {
                Err(InstallerError::Busy {
                    staging_root: staging_root.to_owned(),
                })
            }
            Err(e) => Err(InstallerError::Io(e)),
        }
    }

    /// Path of the held lock file.
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }
}

impl Drop for InstallGate {
    fn drop(&mut self) {
        if let Err(e) = FileExt::unlock(&self.file) {
            debug!("unlocking {}: {e}", self.path);
        }
    }
}

/// Summary of a successful install.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallReport {
    /// Directory handed to the promoter.
    pub package_dir: Utf8PathBuf,
    /// Files written by extraction, relative to the package directory.
    pub files: Vec<Utf8PathBuf>,
    /// The synthesized header.
    pub head_bin: Utf8PathBuf,
    /// What the promoter reported.
    pub promotion: PromotionReport,
}

/// Installs `.vpk` archives.
///
/// The extractor and service are seams: production code passes
/// [`ZipExtractor`](crate::extraction::ZipExtractor) and a real
/// [`PromoterService`]; tests pass doubles.
#[derive(Debug)]
pub struct Installer<E, S> {
    config: InstallConfig,
    extractor: E,
    service: S,
}

impl<E, S> Installer<E, S>
where
    E: ArchiveExtractor,
    S: PromoterService,
{
    /// Create an installer.
    pub fn new(config: InstallConfig, extractor: E, service: S) -> Self {
        Self {
            config,
            extractor,
            service,
        }
    }

    /// Settings in effect.
    pub fn config(&self) -> &InstallConfig {
        &self.config
    }

    /// The promoter service.
    pub fn service(&self) -> &S {
        &self.service
    }

    /// Install `archive` on the calling thread.
    ///
    /// Progress and the final outcome go to `sink`. On failure the sink
    /// receives the error's message and status code before the error is
    /// returned.
    ///
    /// # Errors
    ///
    /// Returns the error of the first stage that failed.
    pub fn run(
        &mut self,
        archive: &Utf8Path,
        sink: &mut dyn ProgressSink,
    ) -> Result<InstallReport> {
        let mut progress = MonotonicProgress::new(sink);
        let result = self.install(archive, &mut progress);
        match &result {
            Ok(_) => {
                info!("installed {archive}");
                progress.finish(&InstallOutcome::Succeeded);
            }
            Err(e) => {
                warn!("installing {archive} failed: {e}");
                progress.finish(&InstallOutcome::from(e));
            }
        }
        result
    }

    fn install(
        &mut self,
        archive: &Utf8Path,
        progress: &mut dyn ProgressSink,
    ) -> Result<InstallReport> {
        let _gate = InstallGate::try_acquire(&self.config.staging_root)?;
        let stager = Stager::new(self.config.staging_root.clone());

        if let Err(e) = stager.reset() {
            warn!("could not wipe {}: {e}", stager.staging_root());
        }
        progress.set_progress(PROGRESS_START);

        let package_dir = stager.package_dir();
        ensure_dirs(&package_dir);
        info!("extracting {archive} to {package_dir}");
        progress.set_progress(PROGRESS_EXTRACTING);
        let files = self.extractor.extract(archive, &package_dir)?;
        debug!("extracted {} file(s)", files.len());
        progress.set_progress(PROGRESS_EXTRACTED);

        let head_bin = synthesize(&package_dir)?;
        progress.set_progress(PROGRESS_HEADER);

        let promotion_config = PromotionConfig {
            poll_interval: self.config.poll_interval,
        };
        let promotion = promote(&mut self.service, &package_dir, &promotion_config, progress)?;

        progress.set_progress(PROGRESS_COMPLETE);
        if !self.config.settle_delay.is_zero() {
            std::thread::sleep(self.config.settle_delay);
        }

        Ok(InstallReport {
            package_dir,
            files,
            head_bin,
            promotion,
        })
    }
}

impl<E, S> Installer<E, S>
where
    E: ArchiveExtractor + Send + 'static,
    S: PromoterService + Send + 'static,
{
    /// Install `archive` on a dedicated worker thread.
    ///
    /// The handle yields the installer back together with the result, so
    /// callers can inspect the service afterwards.
    ///
    /// # Errors
    ///
    /// Returns an error if the thread cannot be started.
    pub fn spawn<P>(
        mut self,
        archive: Utf8PathBuf,
        mut sink: P,
    ) -> std::io::Result<JoinHandle<(Self, Result<InstallReport>)>>
    where
        P: ProgressSink + Send + 'static,
    {
        std::thread::Builder::new()
            .name(WORKER_THREAD_NAME.to_owned())
            .spawn(move || {
                let result = self.run(&archive, &mut sink);
                (self, result)
            })
    }
}

#[cfg(test)]
#[path = "install_tests.rs"]
mod tests;
