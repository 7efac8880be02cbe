//! Segment timer with allocation tracking

use crate::alloc::{AllocCounter, AllocSnapshot};
use crate::config::{Sink, StepConfig};
use crate::error::{StepError, StepResult};
use crate::report::{self, StepReport};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// State of one measurement session.
///
/// A `Timer` only exists for sessions that passed gating, so every
/// primitive here operates on live state.
pub struct Timer {
    /// When the session started
    initial: Instant,
    /// When the current segment started
    start: Instant,
    /// Accumulated segment time since the last reset
    duration: Duration,
    running: bool,
    /// Counters captured when the current segment started
    start_allocs: AllocSnapshot,
    /// Net allocations accumulated since the last reset
    net: AllocSnapshot,
    /// Enable flag of the configuration this session started from
    enabled: Arc<AtomicBool>,
    sink: Sink,
    alloc_counter: Arc<dyn AllocCounter>,
}

impl Timer {
    /// Create a stopped timer capturing the sink and counters of `config`.
    pub(crate) fn new(config: &StepConfig) -> Self {
        let now = Instant::now();
        Self {
            initial: now,
            start: now,
            duration: Duration::ZERO,
            running: false,
            start_allocs: AllocSnapshot::default(),
            net: AllocSnapshot::default(),
            enabled: config.enabled_flag(),
            sink: config.sink(),
            alloc_counter: config.alloc_counter(),
        }
    }

    /// Begin timing a segment. No-op if one is already running.
    pub(crate) fn start_timer(&mut self) {
        if !self.running {
            self.start_allocs = self.alloc_counter.snapshot();
            self.start = Instant::now();
            self.running = true;
        }
    }

    /// End the current segment and accumulate it. No-op if not running.
    pub(crate) fn stop_timer(&mut self) {
        if self.running {
            self.duration += self.start.elapsed();
            let delta = self.alloc_counter.snapshot().since(&self.start_allocs);
            self.net.allocs = self.net.allocs.saturating_add(delta.allocs);
            self.net.bytes = self.net.bytes.saturating_add(delta.bytes);
            self.running = false;
        }
    }

    /// Zero accumulated time and allocations.
    ///
    /// Does not affect whether the timer is running; a running segment gets
    /// fresh baselines.
    pub(crate) fn reset_timer(&mut self) {
        if self.running {
            self.start_allocs = self.alloc_counter.snapshot();
            self.start = Instant::now();
        }
        self.duration = Duration::ZERO;
        self.net = AllocSnapshot::default();
    }

    /// Check whether the originating configuration is still enabled.
    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::SeqCst)
    }

    /// Check whether a segment is being timed.
    #[inline]
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Time since the session started.
    #[inline]
    pub fn elapsed(&self) -> Duration {
        self.initial.elapsed()
    }

    /// Snapshot the session total and the counters since the last reset.
    pub fn results(&self) -> StepReport {
        StepReport {
            total: self.initial.elapsed(),
            during: self.duration,
            mem_allocs: self.net.allocs,
            mem_bytes: self.net.bytes,
        }
    }

    pub(crate) fn write_header(&self, title: &str) -> StepResult<()> {
        self.emit(&report::header_line(title))
    }

    pub(crate) fn write(&self, label: &str) -> StepResult<StepReport> {
        let r = self.results();
        self.emit(&r.line(label))?;

        tracing::trace!(
            target: "stepwatch",
            label,
            during_us = r.during.as_micros() as u64,
            total_us = r.total.as_micros() as u64,
            mem_bytes = r.mem_bytes,
            mem_allocs = r.mem_allocs,
            "step recorded"
        );
        Ok(r)
    }

    fn emit(&self, line: &str) -> StepResult<()> {
        let mut sink = self.sink.lock().map_err(|_| StepError::SinkPoisoned)?;
        sink.write_all(line.as_bytes())?;
        sink.flush()?;
        Ok(())
    }
}
