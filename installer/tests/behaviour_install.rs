//! Behaviour-driven tests for installing VPK archives.
//!
//! These scenarios drive the real extractor and header synthesis against a
//! scripted installer service.

use camino::{Utf8Path, Utf8PathBuf};
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use std::cell::RefCell;
use std::time::Duration;
use tempfile::TempDir;
use vpk_installer::config::InstallConfig;
use vpk_installer::error::InstallerError;
use vpk_installer::extraction::{ArchiveExtractor, ZipExtractor};
use vpk_installer::install::{InstallReport, Installer};
use vpk_installer::progress::{InstallOutcome, RecordingProgress};
use vpk_installer::promoter::ScriptedPromoter;
use vpk_installer::test_utils::{SfoBuilder, write_minimal_vpk, write_vpk};

/// Parse a status written as `0x%08x` into the platform's signed form.
fn parse_status(text: &str) -> i32 {
    let digits = text.trim_start_matches("0x");
    let raw = u32::from_str_radix(digits, 16).expect("hex status");
    i32::from_ne_bytes(raw.to_ne_bytes())
}

// ---------------------------------------------------------------------------
// Install world
// ---------------------------------------------------------------------------

struct InstallWorld {
    _temp_dir: TempDir,
    root: Utf8PathBuf,
    service: RefCell<Option<ScriptedPromoter>>,
    extracted: RefCell<Vec<Utf8PathBuf>>,
    sink: RefCell<RecordingProgress>,
    result: RefCell<Option<Result<InstallReport, InstallerError>>>,
    polls: RefCell<usize>,
    calls: RefCell<Vec<String>>,
}

impl InstallWorld {
    fn archive(&self) -> Utf8PathBuf {
        self.root.join("app.vpk")
    }

    fn package_dir(&self) -> Utf8PathBuf {
        self.root.join("extracted")
    }

    fn config(&self) -> InstallConfig {
        InstallConfig {
            staging_root: self.root.join("ptmp"),
            install_root: self.root.join("app"),
            poll_interval: Duration::ZERO,
            settle_delay: Duration::ZERO,
        }
    }

    fn error(&self) -> InstallerError {
        let result = self.result.borrow();
        match result.as_ref().expect("install not run") {
            Ok(report) => panic!("expected failure, got {report:?}"),
            Err(err) => err.clone(),
        }
    }
}

#[fixture]
fn install_world() -> InstallWorld {
    let temp_dir = tempfile::tempdir().expect("temp dir");
    let root = Utf8PathBuf::try_from(temp_dir.path().to_path_buf()).expect("UTF-8 path");
    InstallWorld {
        _temp_dir: temp_dir,
        root,
        service: RefCell::new(None),
        extracted: RefCell::new(Vec::new()),
        sink: RefCell::new(RecordingProgress::default()),
        result: RefCell::new(None),
        polls: RefCell::new(0),
        calls: RefCell::new(Vec::new()),
    }
}

#[given("a VPK for title \"{title_id}\"")]
fn given_vpk(install_world: &InstallWorld, title_id: String) {
    write_minimal_vpk(&install_world.archive(), &title_id);
}

#[given("a VPK for title \"{title_id}\" with a bundled head.bin")]
fn given_vpk_with_head_bin(install_world: &InstallWorld, title_id: String) {
    let sfo = SfoBuilder::new().entry("TITLE_ID", &title_id).build();
    write_vpk(
        &install_world.archive(),
        &[
            ("eboot.bin", b"eboot".as_slice()),
            ("sce_sys/param.sfo", sfo.as_slice()),
            ("sce_sys/package/head.bin", b"vendor header".as_slice()),
        ],
    );
}

#[given("an installer service that finishes after {busy} polls with result \"{result}\"")]
fn given_service(install_world: &InstallWorld, busy: usize, result: String) {
    install_world
        .service
        .replace(Some(ScriptedPromoter::new(busy, parse_status(&result))));
}

#[given("the service call \"{call}\" fails with \"{code}\"")]
fn given_failing_call(install_world: &InstallWorld, call: String, code: String) {
    let service = install_world
        .service
        .take()
        .expect("service configured")
        .failing(call, parse_status(&code));
    install_world.service.replace(Some(service));
}

#[when("the archive is extracted")]
fn when_extracted(install_world: &InstallWorld) {
    let files = ZipExtractor
        .extract(&install_world.archive(), &install_world.package_dir())
        .expect("extraction succeeds");
    install_world.extracted.replace(files);
}

#[when("the archive is installed")]
fn when_installed(install_world: &InstallWorld) {
    let service = install_world
        .service
        .take()
        .expect("service configured");
    let mut installer = Installer::new(install_world.config(), ZipExtractor, service);
    let mut sink = install_world.sink.borrow_mut();

    let result = installer.run(&install_world.archive(), &mut *sink);

    install_world.polls.replace(installer.service().state_queries());
    install_world
        .calls
        .replace(installer.service().calls().to_vec());
    install_world.result.replace(Some(result));
}

#[then("the package directory contains \"{path}\"")]
fn then_package_contains(install_world: &InstallWorld, path: String) {
    let path = Utf8Path::new(&path);
    assert!(install_world.package_dir().join(path).is_file());
    assert!(
        install_world
            .extracted
            .borrow()
            .iter()
            .any(|file| file.as_path() == path),
        "{path} not reported as extracted"
    );
}

#[then("the install succeeds")]
fn then_install_succeeds(install_world: &InstallWorld) {
    let result = install_world.result.borrow();
    let result = result.as_ref().expect("install not run");
    assert!(result.is_ok(), "expected success, got {result:?}");
    assert_eq!(
        install_world.sink.borrow().outcome,
        Some(InstallOutcome::Succeeded)
    );
}

#[then("the install fails with \"{message}\"")]
fn then_install_fails_with(install_world: &InstallWorld, message: String) {
    assert_eq!(install_world.error().to_string(), message);
    let sink = install_world.sink.borrow();
    match &sink.outcome {
        Some(InstallOutcome::Failed { reason, .. }) => assert_eq!(reason, &message),
        other => panic!("expected failed outcome, got {other:?}"),
    }
}

#[then("the reported status code is \"{code}\"")]
fn then_status_code(install_world: &InstallWorld, code: String) {
    let expected = parse_status(&code);
    assert_eq!(install_world.error().status_code(), Some(expected));
    let sink = install_world.sink.borrow();
    assert!(matches!(
        sink.outcome,
        Some(InstallOutcome::Failed { code: Some(c), .. }) if c == expected
    ));
}

#[then("the installer service was not called")]
fn then_service_not_called(install_world: &InstallWorld) {
    assert!(install_world.calls.borrow().is_empty());
}

#[then("the installer service was polled {count} times")]
fn then_polled(install_world: &InstallWorld, count: usize) {
    assert_eq!(*install_world.polls.borrow(), count);
}

#[then("the progress never decreases and ends at {last}")]
fn then_progress_monotonic(install_world: &InstallWorld, last: u8) {
    let sink = install_world.sink.borrow();
    assert!(sink.values.windows(2).all(|pair| pair[0] <= pair[1]));
    assert_eq!(sink.values.last(), Some(&last));
}

// ---------------------------------------------------------------------------
// Scenario bindings
// ---------------------------------------------------------------------------

#[scenario(
    path = "tests/features/vpk_install.feature",
    name = "Extracting a VPK into the package directory"
)]
fn scenario_extract_vpk(install_world: InstallWorld) {
    let _ = install_world;
}

#[scenario(
    path = "tests/features/vpk_install.feature",
    name = "Rejecting a VPK that bundles head.bin"
)]
fn scenario_reject_bundled_head_bin(install_world: InstallWorld) {
    let _ = install_world;
}

#[scenario(
    path = "tests/features/vpk_install.feature",
    name = "Installing against a scripted service"
)]
fn scenario_scripted_install(install_world: InstallWorld) {
    let _ = install_world;
}

#[scenario(
    path = "tests/features/vpk_install.feature",
    name = "Promotion result failure surfaces the status code"
)]
fn scenario_promotion_result_failure(install_world: InstallWorld) {
    let _ = install_world;
}

#[scenario(
    path = "tests/features/vpk_install.feature",
    name = "Failed service call names the call"
)]
fn scenario_failed_service_call(install_world: InstallWorld) {
    let _ = install_world;
}
