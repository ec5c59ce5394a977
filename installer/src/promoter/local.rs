//! Host-side installer service.
//!
//! Off device there is no platform promoter, so [`LocalPromoter`] plays its
//! part: it checks the package directory the way the promoter would and
//! copies it to `<install_root>/<TITLE_ID>` on a background thread, so the
//! driver's polling loop sees a real asynchronous job.

use super::{Facility, PromoterService, STATE_DONE, ServiceResult, StatusCode};
use crate::sfo::read_title_id;
use crate::stager::{ensure_dirs, head_bin_path, param_sfo_path, remove_tree};
use camino::{Utf8Component, Utf8Path, Utf8PathBuf};
use log::{debug, info, warn};
use std::collections::HashSet;
use std::fs;
use std::thread::JoinHandle;

/// State reported while the copy job runs.
pub const STATE_RUNNING: i32 = 1;

const fn status(code: u32) -> StatusCode {
    i32::from_ne_bytes(code.to_ne_bytes())
}

/// A call was made before the facility was loaded.
pub const ERROR_NOT_LOADED: StatusCode = status(0x8080_2001);
/// A call was made outside an open session.
pub const ERROR_NOT_INITIALIZED: StatusCode = status(0x8080_2002);
/// A package was submitted while another job is running.
pub const ERROR_BUSY: StatusCode = status(0x8080_2003);
/// The result was requested without a submitted job.
pub const ERROR_NO_JOB: StatusCode = status(0x8080_2004);
/// The package directory has no `head.bin`.
pub const ERROR_HEAD_BIN_MISSING: StatusCode = status(0x8087_0001);
/// `param.sfo` is missing, has no `TITLE_ID`, or the id is not a plain
/// directory name.
pub const ERROR_BAD_PARAM_SFO: StatusCode = status(0x8087_0002);
/// Copying the package failed.
pub const ERROR_COPY_FAILED: StatusCode = status(0x8087_0003);
/// The copy thread panicked.
pub const ERROR_JOB_ABORTED: StatusCode = status(0x8087_0004);

/// Installs packages by copying them below an install root.
#[derive(Debug)]
pub struct LocalPromoter {
    install_root: Utf8PathBuf,
    loaded: HashSet<Facility>,
    initialized: bool,
    job: Option<JoinHandle<i32>>,
}

impl LocalPromoter {
    /// Create a service installing into `install_root`.
    #[must_use]
    pub fn new(install_root: Utf8PathBuf) -> Self {
        Self {
            install_root,
            loaded: HashSet::new(),
            initialized: false,
            job: None,
        }
    }

    /// Directory a package with `title_id` is installed to.
    #[must_use]
    pub fn app_dir(&self, title_id: &str) -> Utf8PathBuf {
        self.install_root.join(title_id)
    }

    fn require_session(&self) -> ServiceResult<()> {
        if !self.loaded.contains(&Facility::PromoterUtil) {
            return Err(ERROR_NOT_LOADED);
        }
        if !self.initialized {
            return Err(ERROR_NOT_INITIALIZED);
        }
        Ok(())
    }
}

impl PromoterService for LocalPromoter {
    fn load_facility(&mut self, facility: Facility) -> ServiceResult<()> {
        debug!("load {facility:?}");
        self.loaded.insert(facility);
        Ok(())
    }

    fn unload_facility(&mut self, facility: Facility) -> ServiceResult<()> {
        if !self.loaded.remove(&facility) {
            return Err(ERROR_NOT_LOADED);
        }
        Ok(())
    }

    fn init(&mut self) -> ServiceResult<()> {
        if !self.loaded.contains(&Facility::PromoterUtil) {
            return Err(ERROR_NOT_LOADED);
        }
        self.initialized = true;
        Ok(())
    }

    fn promote_pkg(&mut self, package_dir: &Utf8Path) -> ServiceResult<()> {
        self.require_session()?;
        if self.job.as_ref().is_some_and(|job| !job.is_finished()) {
            return Err(ERROR_BUSY);
        }

        let source = package_dir.to_owned();
        let install_root = self.install_root.clone();
        let job = std::thread::Builder::new()
            .name("local-promoter".to_owned())
            .spawn(move || install_package(&source, &install_root))
            .map_err(|e| {
                warn!("cannot start promoter job: {e}");
                ERROR_COPY_FAILED
            })?;
        self.job = Some(job);
        Ok(())
    }

    fn get_state(&mut self) -> ServiceResult<i32> {
        self.require_session()?;
        match &self.job {
            Some(job) if !job.is_finished() => Ok(STATE_RUNNING),
            _ => Ok(STATE_DONE),
        }
    }

    fn get_result(&mut self) -> ServiceResult<i32> {
        self.require_session()?;
        let job = self.job.take().ok_or(ERROR_NO_JOB)?;
        Ok(job.join().unwrap_or(ERROR_JOB_ABORTED))
    }

    fn exit(&mut self) -> ServiceResult<()> {
        if !self.initialized {
            return Err(ERROR_NOT_INITIALIZED);
        }
        self.initialized = false;
        Ok(())
    }
}

/// Validate `package_dir` and copy it into place. Returns the result code.
fn install_package(package_dir: &Utf8Path, install_root: &Utf8Path) -> i32 {
    if !head_bin_path(package_dir).is_file() {
        return ERROR_HEAD_BIN_MISSING;
    }
    let Some(title_id) = read_title_id(&param_sfo_path(package_dir)) else {
        return ERROR_BAD_PARAM_SFO;
    };
    if !is_plain_name(&title_id) {
        warn!("refusing title id {title_id:?}: not a single path component");
        return ERROR_BAD_PARAM_SFO;
    }

    let dest = install_root.join(&title_id);
    if remove_tree(&dest).is_err() {
        return ERROR_COPY_FAILED;
    }
    match copy_tree(package_dir, &dest) {
        Ok(files) => {
            info!("installed {title_id} to {dest} ({files} files)");
            0
        }
        Err(e) => {
            warn!("copying {package_dir} to {dest} failed: {e}");
            ERROR_COPY_FAILED
        }
    }
}

/// Whether `title_id` names exactly one directory below the install root.
fn is_plain_name(title_id: &str) -> bool {
    let mut components = Utf8Path::new(title_id).components();
    matches!(
        (components.next(), components.next()),
        (Some(Utf8Component::Normal(name)), None) if name == title_id
    )
}

/// Recursively copy `from` into `to`, returning the number of files.
fn copy_tree(from: &Utf8Path, to: &Utf8Path) -> std::io::Result<usize> {
    ensure_dirs(to);
    let mut files = 0;
    for entry in from.read_dir_utf8()? {
        let entry = entry?;
        let target = to.join(entry.file_name());
        if entry.file_type()?.is_dir() {
            files += copy_tree(entry.path(), &target)?;
        } else {
            fs::copy(entry.path(), &target)?;
            files += 1;
        }
    }
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::head_bin::synthesize;
    use crate::test_utils::SfoBuilder;
    use rstest::rstest;
    use std::time::{Duration, Instant};
    use tempfile::TempDir;

    fn package(title_id: &str, with_head_bin: bool) -> (TempDir, Utf8PathBuf) {
        let guard = tempfile::tempdir().expect("temp dir");
        let root = Utf8PathBuf::try_from(guard.path().to_path_buf()).expect("utf8");
        write_package(&root.join("pkg"), title_id, with_head_bin);
        (guard, root)
    }

    fn write_package(pkg: &Utf8Path, title_id: &str, with_head_bin: bool) {
        let sfo = param_sfo_path(pkg);
        ensure_dirs(sfo.parent().expect("parent"));
        fs::write(&sfo, SfoBuilder::new().entry("TITLE_ID", title_id).build()).expect("sfo");
        fs::write(pkg.join("eboot.bin"), b"eboot").expect("eboot");
        if with_head_bin {
            synthesize(pkg).expect("synthesize");
        }
    }

    fn wait_done(service: &mut LocalPromoter) {
        let deadline = Instant::now() + Duration::from_secs(10);
        while service.get_state().expect("state") != STATE_DONE {
            assert!(Instant::now() < deadline, "promoter job never finished");
            std::thread::sleep(Duration::from_millis(5));
        }
    }

    fn open_session(service: &mut LocalPromoter) {
        service
            .load_facility(Facility::PromoterUtil)
            .expect("load");
        service.init().expect("init");
    }

    #[test]
    fn installs_package_below_install_root() {
        let (_guard, root) = package("PCSX00001", true);
        let mut service = LocalPromoter::new(root.join("app"));
        open_session(&mut service);

        service.promote_pkg(&root.join("pkg")).expect("promote");
        wait_done(&mut service);

        assert_eq!(service.get_result(), Ok(0));
        let app = service.app_dir("PCSX00001");
        assert!(app.join("eboot.bin").is_file());
        assert!(head_bin_path(&app).is_file());
    }

    #[test]
    fn missing_head_bin_is_negative_result() {
        let (_guard, root) = package("PCSX00001", false);
        let mut service = LocalPromoter::new(root.join("app"));
        open_session(&mut service);

        service.promote_pkg(&root.join("pkg")).expect("promote");
        wait_done(&mut service);

        assert_eq!(service.get_result(), Ok(ERROR_HEAD_BIN_MISSING));
        assert!(ERROR_HEAD_BIN_MISSING < 0);
    }

    #[rstest]
    #[case::parent_dir(false)]
    #[case::absolute(true)]
    fn title_id_cannot_leave_install_root(#[case] absolute: bool) {
        let guard = tempfile::tempdir().expect("temp dir");
        let root = Utf8PathBuf::try_from(guard.path().to_path_buf()).expect("utf8");
        let victim = root.join("victim");
        ensure_dirs(&victim);
        fs::write(victim.join("precious.txt"), b"keep").expect("precious");
        let title_id = if absolute {
            victim.to_string()
        } else {
            "../victim".to_owned()
        };
        write_package(&root.join("pkg"), &title_id, true);
        let mut service = LocalPromoter::new(root.join("app"));
        open_session(&mut service);

        service.promote_pkg(&root.join("pkg")).expect("promote");
        wait_done(&mut service);

        assert_eq!(service.get_result(), Ok(ERROR_BAD_PARAM_SFO));
        assert!(victim.join("precious.txt").is_file());
        assert!(!victim.join("eboot.bin").exists());
    }

    #[rstest]
    #[case::title_id("PCSX00001", true)]
    #[case::empty("", false)]
    #[case::current_dir(".", false)]
    #[case::nested("A/B", false)]
    #[case::trailing_slash("PCSX00001/", false)]
    fn plain_names_are_single_components(#[case] title_id: &str, #[case] plain: bool) {
        assert_eq!(is_plain_name(title_id), plain);
    }

    #[test]
    fn calls_require_loaded_facility_and_session() {
        let mut service = LocalPromoter::new(Utf8PathBuf::from("/nonexistent"));

        assert_eq!(service.init(), Err(ERROR_NOT_LOADED));
        service
            .load_facility(Facility::PromoterUtil)
            .expect("load");
        assert_eq!(service.get_state(), Err(ERROR_NOT_INITIALIZED));
        assert_eq!(service.exit(), Err(ERROR_NOT_INITIALIZED));
    }

    #[test]
    fn result_without_job_is_an_error() {
        let mut service = LocalPromoter::new(Utf8PathBuf::from("/nonexistent"));
        open_session(&mut service);

        assert_eq!(service.get_result(), Err(ERROR_NO_JOB));
    }

    #[test]
    fn unload_of_unloaded_facility_fails() {
        let mut service = LocalPromoter::new(Utf8PathBuf::from("/nonexistent"));
        assert_eq!(service.unload_facility(Facility::Paf), Err(ERROR_NOT_LOADED));
    }
}
