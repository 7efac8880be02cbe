//! Measurement sessions
//!
//! A [`Session`] is either recording or a no-op. Host code calls
//! [`Session::step`] and [`Session::stop`] unconditionally; when analysis is
//! off the calls cost one branch.

use crate::config::StepConfig;
use crate::error::StepResult;
use crate::report::StepReport;
use crate::timer::Timer;

/// One measurement run from start to its final stop.
///
/// # Example
///
/// ```rust
/// use stepwatch::{SharedBuffer, StepConfig};
///
/// let out = SharedBuffer::new();
/// let config = StepConfig::new().enabled(true).with_writer(out.clone());
///
/// let mut session = config.start("build");
/// let _pages: Vec<String> = (0..100).map(|i| i.to_string()).collect();
/// session.step("render pages");
/// session.stop("write output");
///
/// assert_eq!(out.lines().len(), 3);
/// ```
#[derive(Default)]
pub enum Session {
    /// Recording session
    Active(Box<Timer>),
    /// Gated-off session; every operation is a no-op
    #[default]
    Inactive,
}

impl Session {
    /// Start a session with `config`, writing the header line.
    ///
    /// The condition is evaluated here, once, and the sink and counter are
    /// captured. Only the enable flag stays live: while it is off, steps and
    /// stops do nothing.
    pub fn start(config: &StepConfig, title: &str) -> Session {
        if !config.is_enabled() {
            tracing::debug!(target: "stepwatch", title, "step analysis disabled");
            return Session::Inactive;
        }
        if !config.should_record() {
            tracing::debug!(target: "stepwatch", title, "session rejected by condition");
            return Session::Inactive;
        }

        let mut timer = Box::new(Timer::new(config));
        if let Err(err) = timer.write_header(title) {
            tracing::warn!(target: "stepwatch", title, error = %err, "failed to write header");
        }
        timer.reset_timer();
        timer.start_timer();
        Session::Active(timer)
    }

    /// Check whether this session records anything.
    #[inline]
    pub fn is_active(&self) -> bool {
        matches!(self, Session::Active(_))
    }

    /// Record the segment since the previous step and start a new one.
    pub fn step(&mut self, label: &str) {
        if let Err(err) = self.try_step(label) {
            tracing::warn!(target: "stepwatch", label, error = %err, "failed to write step");
        }
    }

    /// Record the final segment without starting a new one.
    pub fn stop(&mut self, label: &str) {
        if let Err(err) = self.try_stop(label) {
            tracing::warn!(target: "stepwatch", label, error = %err, "failed to write stop");
        }
    }

    /// Like [`step`](Self::step), returning the report or the write error.
    ///
    /// Counters are reset and the next segment started even if writing fails.
    pub fn try_step(&mut self, label: &str) -> StepResult<Option<StepReport>> {
        let Session::Active(timer) = self else {
            return Ok(None);
        };
        if !timer.is_enabled() {
            return Ok(None);
        }

        timer.stop_timer();
        let written = timer.write(label);
        timer.reset_timer();
        timer.start_timer();
        written.map(Some)
    }

    /// Like [`stop`](Self::stop), returning the report or the write error.
    pub fn try_stop(&mut self, label: &str) -> StepResult<Option<StepReport>> {
        let Session::Active(timer) = self else {
            return Ok(None);
        };
        if !timer.is_enabled() {
            return Ok(None);
        }

        timer.stop_timer();
        timer.write(label).map(Some)
    }

    /// Current report for an active session.
    pub fn results(&self) -> Option<StepReport> {
        match self {
            Session::Active(timer) => Some(timer.results()),
            Session::Inactive => None,
        }
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Session::Active(timer) => f
                .debug_struct("Active")
                .field("enabled", &timer.is_enabled())
                .field("running", &timer.is_running())
                .field("elapsed", &timer.elapsed())
                .finish(),
            Session::Inactive => f.write_str("Inactive"),
        }
    }
}
