//! Progress and result reporting.
//!
//! The pipeline pushes coarse percentages at named checkpoints and one final
//! [`InstallOutcome`]. Sinks are wrapped in [`MonotonicProgress`] so the bar
//! never moves backwards, whatever the stages report.

use crate::error::InstallerError;
use crate::output::write_stderr_line;
use std::io::Write;

/// State of an installation as seen by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallOutcome {
    /// Still running, with the last reported percentage.
    InProgress(u8),
    /// The package was installed.
    Succeeded,
    /// The installation stopped at a failed stage.
    Failed {
        /// User-facing message.
        reason: String,
        /// Platform status code, when the failure came from a service call.
        code: Option<i32>,
    },
}

impl From<&InstallerError> for InstallOutcome {
    fn from(err: &InstallerError) -> Self {
        Self::Failed {
            reason: err.to_string(),
            code: err.status_code(),
        }
    }
}

/// Receives progress updates and the final outcome of an installation.
pub trait ProgressSink {
    /// Show `percent` (0 to 100) on the progress bar.
    fn set_progress(&mut self, percent: u8);

    /// Show the final outcome; called exactly once per attempt.
    fn finish(&mut self, outcome: &InstallOutcome);
}

impl<S: ProgressSink + ?Sized> ProgressSink for &mut S {
    fn set_progress(&mut self, percent: u8) {
        (**self).set_progress(percent);
    }

    fn finish(&mut self, outcome: &InstallOutcome) {
        (**self).finish(outcome);
    }
}

impl<S: ProgressSink + ?Sized> ProgressSink for Box<S> {
    fn set_progress(&mut self, percent: u8) {
        (**self).set_progress(percent);
    }

    fn finish(&mut self, outcome: &InstallOutcome) {
        (**self).finish(outcome);
    }
}

/// Clamps updates to `0..=100` and drops any value below the last one.
#[derive(Debug)]
pub struct MonotonicProgress<S> {
    inner: S,
    last: Option<u8>,
}

impl<S: ProgressSink> MonotonicProgress<S> {
    /// Wrap `inner`.
    #[must_use]
    pub fn new(inner: S) -> Self {
        Self { inner, last: None }
    }

    /// Last value forwarded to the inner sink.
    #[must_use]
    pub fn last(&self) -> Option<u8> {
        self.last
    }

    /// Unwrap the inner sink.
    #[must_use]
    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S: ProgressSink> ProgressSink for MonotonicProgress<S> {
    fn set_progress(&mut self, percent: u8) {
        let percent = percent.min(100);
        if self.last.is_some_and(|last| percent < last) {
            return;
        }
        self.last = Some(percent);
        self.inner.set_progress(percent);
    }

    fn finish(&mut self, outcome: &InstallOutcome) {
        self.inner.finish(outcome);
    }
}

/// Writes progress lines and the final outcome to a terminal stream.
pub struct StderrProgress<W: Write> {
    out: W,
    quiet: bool,
    last: Option<u8>,
}

impl<W: Write> StderrProgress<W> {
    /// Create a sink writing to `out`; `quiet` suppresses progress lines
    /// but still reports failures.
    pub fn new(out: W, quiet: bool) -> Self {
        Self {
            out,
            quiet,
            last: None,
        }
    }
}

impl<W: Write> ProgressSink for StderrProgress<W> {
    fn set_progress(&mut self, percent: u8) {
        if self.quiet || self.last == Some(percent) {
            return;
        }
        self.last = Some(percent);
        write_stderr_line(&mut self.out, format!("[{percent:>3}%]"));
    }

    fn finish(&mut self, outcome: &InstallOutcome) {
        match outcome {
            InstallOutcome::Succeeded => {
                if !self.quiet {
                    write_stderr_line(&mut self.out, "Package installed.");
                }
            }
            InstallOutcome::Failed { reason, .. } => write_stderr_line(&mut self.out, reason),
            InstallOutcome::InProgress(_) => {}
        }
    }
}

/// Records every update; useful for embedding and in tests.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RecordingProgress {
    /// Every percentage received, in order.
    pub values: Vec<u8>,
    /// The final outcome, once reported.
    pub outcome: Option<InstallOutcome>,
}

impl ProgressSink for RecordingProgress {
    fn set_progress(&mut self, percent: u8) {
        self.values.push(percent);
    }

    fn finish(&mut self, outcome: &InstallOutcome) {
        self.outcome = Some(outcome.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn monotonic_drops_regressions_and_clamps() {
        let mut sink = MonotonicProgress::new(RecordingProgress::default());
        for value in [0, 30, 20, 40, 40, 150] {
            sink.set_progress(value);
        }

        assert_eq!(sink.last(), Some(100));
        assert_eq!(sink.into_inner().values, vec![0, 30, 40, 40, 100]);
    }

    #[test]
    fn outcome_from_service_error_keeps_code() {
        let err = InstallerError::Service {
            call: "scePromoterUtilityExit",
            code: -9,
        };

        let outcome = InstallOutcome::from(&err);

        assert_eq!(
            outcome,
            InstallOutcome::Failed {
                reason: "scePromoterUtilityExit failed: 0xfffffff7".to_owned(),
                code: Some(-9),
            }
        );
    }

    #[test]
    fn stderr_sink_prints_changes_once() {
        let mut out = Vec::new();
        {
            let mut sink = StderrProgress::new(&mut out, false);
            sink.set_progress(10);
            sink.set_progress(10);
            sink.set_progress(30);
            sink.finish(&InstallOutcome::Succeeded);
        }
        let text = String::from_utf8(out).expect("utf8");
        assert_eq!(text, "[ 10%]\n[ 30%]\nPackage installed.\n");
    }

    #[test]
    fn quiet_stderr_sink_still_reports_failures() {
        let mut out = Vec::new();
        {
            let mut sink = StderrProgress::new(&mut out, true);
            sink.set_progress(50);
            sink.finish(&InstallOutcome::Failed {
                reason: "boom".to_owned(),
                code: None,
            });
        }
        assert_eq!(String::from_utf8(out).expect("utf8"), "boom\n");
    }
}
