//! A promoter service that replays a fixed script.

use super::{
    EXIT, Facility, GET_RESULT, GET_STATE, INIT, LOAD_MODULE, PROMOTE_PKG, PromoterService,
    STATE_DONE, ServiceResult, StatusCode, UNLOAD_MODULE,
};
use camino::Utf8Path;
use std::collections::VecDeque;

/// Replays scripted states and a final result, recording each call.
///
/// Calls are logged by platform name, with the facility appended for the
/// module calls (`sceSysmoduleLoadModuleInternal(Paf)`). Once the state
/// script is exhausted every query reports done.
#[derive(Debug, Clone, Default)]
pub struct ScriptedPromoter {
    states: VecDeque<i32>,
    result: i32,
    failures: Vec<(String, StatusCode)>,
    calls: Vec<String>,
}

impl ScriptedPromoter {
    /// A service that finishes after `busy_polls` running states with `result`.
    #[must_use]
    pub fn new(busy_polls: usize, result: i32) -> Self {
        Self {
            states: std::iter::repeat_n(1, busy_polls).collect(),
            result,
            ..Self::default()
        }
    }

    /// Make every call logged as `call` fail with `code`.
    #[must_use]
    pub fn failing(mut self, call: impl Into<String>, code: StatusCode) -> Self {
        self.failures.push((call.into(), code));
        self
    }

    /// Calls received so far, in order.
    #[must_use]
    pub fn calls(&self) -> &[String] {
        &self.calls
    }

    /// Number of state queries received.
    #[must_use]
    pub fn state_queries(&self) -> usize {
        self.calls.iter().filter(|c| *c == GET_STATE).count()
    }

    fn record(&mut self, call: String) -> ServiceResult<()> {
        let failure = self
            .failures
            .iter()
            .find(|(name, _)| *name == call)
            .map(|(_, code)| *code);
        self.calls.push(call);
        failure.map_or(Ok(()), Err)
    }
}

impl PromoterService for ScriptedPromoter {
    fn load_facility(&mut self, facility: Facility) -> ServiceResult<()> {
        self.record(format!("{LOAD_MODULE}({facility:?})"))
    }

    fn unload_facility(&mut self, facility: Facility) -> ServiceResult<()> {
        self.record(format!("{UNLOAD_MODULE}({facility:?})"))
    }

    fn init(&mut self) -> ServiceResult<()> {
        self.record(INIT.to_owned())
    }

    fn promote_pkg(&mut self, _package_dir: &Utf8Path) -> ServiceResult<()> {
        self.record(PROMOTE_PKG.to_owned())
    }

    fn get_state(&mut self) -> ServiceResult<i32> {
        self.record(GET_STATE.to_owned())?;
        Ok(self.states.pop_front().unwrap_or(STATE_DONE))
    }

    fn get_result(&mut self) -> ServiceResult<i32> {
        self.record(GET_RESULT.to_owned())?;
        Ok(self.result)
    }

    fn exit(&mut self) -> ServiceResult<()> {
        self.record(EXIT.to_owned())
    }
}
