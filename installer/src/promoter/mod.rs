//! Package promotion.
//!
//! Promotion hands a prepared package directory to the platform installer
//! service and waits for it to finish. The driver walks a fixed sequence of
//! service calls:
//!
//! ```text
//! Idle -> FacilitiesLoading -> Initialized -> Submitted -> Polling
//!      -> ResultRetrieved -> FacilitiesUnloaded -> Done(code)
//! ```
//!
//! A negative status from any call aborts the sequence with
//! [`InstallerError::Service`] naming the call. The promoter facility and
//! the service session are held by a [`PromotionSession`] guard, so they are
//! released on every exit path.
//!
//! Polling has no upper bound: a stuck service blocks the worker
//! indefinitely, which matches how the platform behaves.

mod local;
#[cfg(any(test, feature = "test-support"))]
mod scripted;
mod session;

pub use local::LocalPromoter;
#[cfg(any(test, feature = "test-support"))]
pub use scripted::ScriptedPromoter;
pub use session::PromotionSession;

use crate::error::{InstallerError, Result};
use crate::progress::ProgressSink;
use camino::Utf8Path;
use log::{debug, info, warn};
use std::time::Duration;

/// Status returned by a failed service call. Always negative.
pub type StatusCode = i32;

/// Result of a single service call.
pub type ServiceResult<T> = std::result::Result<T, StatusCode>;

/// Installer state reported once the service has finished.
pub const STATE_DONE: i32 = 0;

/// Name of the facility load call.
pub const LOAD_MODULE: &str = "sceSysmoduleLoadModuleInternal";
/// Name of the facility unload call.
pub const UNLOAD_MODULE: &str = "sceSysmoduleUnloadModuleInternal";
/// Name of the session initialisation call.
pub const INIT: &str = "scePromoterUtilityInit";
/// Name of the package submission call.
pub const PROMOTE_PKG: &str = "scePromoterUtilityPromotePkg";
/// Name of the state query.
pub const GET_STATE: &str = "scePromoterUtilityGetState";
/// Name of the result query.
pub const GET_RESULT: &str = "scePromoterUtilityGetResult";
/// Name of the session shutdown call.
pub const EXIT: &str = "scePromoterUtilityExit";

/// Platform facilities promotion depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Facility {
    /// Application framework needed by the promoter. Loaded best-effort
    /// and left loaded.
    Paf,
    /// The promoter utility itself.
    PromoterUtil,
}

/// The platform installer service.
///
/// Every call mirrors one platform entry point. `Err` carries the negative
/// status the platform returned.
#[cfg_attr(test, mockall::automock)]
pub trait PromoterService {
    /// Load a facility.
    ///
    /// # Errors
    ///
    /// Returns the platform status if loading fails.
    fn load_facility(&mut self, facility: Facility) -> ServiceResult<()>;

    /// Unload a facility loaded by [`PromoterService::load_facility`].
    ///
    /// # Errors
    ///
    /// Returns the platform status if unloading fails.
    fn unload_facility(&mut self, facility: Facility) -> ServiceResult<()>;

    /// Open a promoter session.
    ///
    /// # Errors
    ///
    /// Returns the platform status if the session cannot be opened.
    fn init(&mut self) -> ServiceResult<()>;

    /// Submit `package_dir` for installation. Returns immediately.
    ///
    /// # Errors
    ///
    /// Returns the platform status if the submission is refused.
    fn promote_pkg(&mut self, package_dir: &Utf8Path) -> ServiceResult<()>;

    /// Query the installer state; [`STATE_DONE`] once finished.
    ///
    /// # Errors
    ///
    /// Returns the platform status if the query fails.
    fn get_state(&mut self) -> ServiceResult<i32>;

    /// Fetch the installation result; negative values are failures.
    ///
    /// # Errors
    ///
    /// Returns the platform status if the query itself fails.
    fn get_result(&mut self) -> ServiceResult<i32>;

    /// Close the promoter session.
    ///
    /// # Errors
    ///
    /// Returns the platform status if the session cannot be closed.
    fn exit(&mut self) -> ServiceResult<()>;
}

/// Position of the driver in the promotion sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromotionStage {
    /// Nothing has happened yet.
    Idle,
    /// Facilities are being loaded.
    FacilitiesLoading,
    /// A promoter session is open.
    Initialized,
    /// The package has been submitted.
    Submitted,
    /// Waiting for the service to finish.
    Polling,
    /// The final result has been fetched.
    ResultRetrieved,
    /// The session is closed and the facility unloaded.
    FacilitiesUnloaded,
    /// Promotion finished with the given result.
    Done(i32),
}

/// Settings for one promotion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PromotionConfig {
    /// Pause between state queries.
    pub poll_interval: Duration,
}

impl Default for PromotionConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(300),
        }
    }
}

/// Summary of a successful promotion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PromotionReport {
    /// Number of state queries issued, including the one reporting done.
    pub polls: u32,
    /// Non-negative result reported by the service.
    pub result: i32,
}

/// Progress shown once the promoter facility is loaded.
pub const PROGRESS_LOADED: u8 = 45;
/// Progress shown once the session is open.
pub const PROGRESS_INITIALIZED: u8 = 50;
/// Progress shown once the package is submitted.
pub const PROGRESS_SUBMITTED: u8 = 55;
/// Ceiling while polling and value once the result is in.
pub const PROGRESS_RESULT: u8 = 95;
/// Progress once everything is released.
pub const PROGRESS_DONE: u8 = 100;

/// Percentage shown after the `polls`-th state query.
///
/// Grows by one per poll from the submission checkpoint and never reaches
/// completion until the result is in.
#[must_use]
pub fn poll_progress(polls: u32) -> u8 {
    let step = u8::try_from(polls).unwrap_or(u8::MAX);
    PROGRESS_SUBMITTED.saturating_add(step).min(PROGRESS_RESULT)
}

/// Drives one promotion of `package_dir` through `service`.
///
/// # Errors
///
/// Returns [`InstallerError::Service`] for the first call that reports a
/// negative status, and [`InstallerError::InstallFailed`] when the service
/// completes with a negative result. The facility is unloaded in every
/// case.
pub fn promote<S>(
    service: &mut S,
    package_dir: &Utf8Path,
    config: &PromotionConfig,
    progress: &mut dyn ProgressSink,
) -> Result<PromotionReport>
where
    S: PromoterService + ?Sized,
{
    let mut stage = PromotionStage::Idle;
    debug!("promotion {stage:?}");

    stage = PromotionStage::FacilitiesLoading;
    debug!("promotion {stage:?}");
    if let Err(code) = service.load_facility(Facility::Paf) {
        warn!("loading the application framework returned 0x{code:08x}; continuing");
    }
    service
        .load_facility(Facility::PromoterUtil)
        .map_err(service_error(LOAD_MODULE))?;
    let mut session = PromotionSession::new(service);
    progress.set_progress(PROGRESS_LOADED);

    session.init().map_err(service_error(INIT))?;
    stage = PromotionStage::Initialized;
    debug!("promotion {stage:?}");
    progress.set_progress(PROGRESS_INITIALIZED);

    session
        .service()
        .promote_pkg(package_dir)
        .map_err(service_error(PROMOTE_PKG))?;
    stage = PromotionStage::Submitted;
    debug!("promotion {stage:?}: {package_dir}");
    progress.set_progress(PROGRESS_SUBMITTED);

    stage = PromotionStage::Polling;
    let mut polls: u32 = 0;
    loop {
        let state = session
            .service()
            .get_state()
            .map_err(service_error(GET_STATE))?;
        polls = polls.saturating_add(1);
        debug!("promotion {stage:?}: poll {polls} state {state}");
        progress.set_progress(poll_progress(polls));
        if !config.poll_interval.is_zero() {
            std::thread::sleep(config.poll_interval);
        }
        if state == STATE_DONE {
            break;
        }
    }

    let result = session
        .service()
        .get_result()
        .map_err(service_error(GET_RESULT))?;
    stage = PromotionStage::ResultRetrieved;
    debug!("promotion {stage:?}: result {result}");
    progress.set_progress(PROGRESS_RESULT);

    session.release()?;
    stage = PromotionStage::FacilitiesUnloaded;
    debug!("promotion {stage:?}");
    progress.set_progress(PROGRESS_DONE);

    stage = PromotionStage::Done(result);
    info!("promotion {stage:?} after {polls} poll(s)");
    if result < 0 {
        return Err(InstallerError::InstallFailed { code: result });
    }
    Ok(PromotionReport { polls, result })
}

/// Map a failed status from `call` into an installer error.
fn service_error(call: &'static str) -> impl Fn(StatusCode) -> InstallerError {
    move |code| InstallerError::Service { call, code }
}
