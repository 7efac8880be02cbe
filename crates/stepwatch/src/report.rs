//! Report records and line formatting

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Column titles written in the header line, in output order.
pub const COLUMNS: [&str; 4] = ["during", "total", "memBytes", "memAllocs"];

/// Width every numeric column is right-aligned to.
pub const COLUMN_WIDTH: usize = 9;

/// Snapshot of a session at the end of a segment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepReport {
    /// Time since the session started
    pub total: Duration,
    /// Accumulated segment time since the last reset
    pub during: Duration,
    /// Net number of allocations since the last reset
    pub mem_allocs: u64,
    /// Net number of bytes allocated since the last reset
    pub mem_bytes: u64,
}

impl StepReport {
    /// Format this report as a data line ending in `\n`.
    pub fn line(&self, label: &str) -> String {
        format!(
            "{:>w$}\t{:>w$}\t{:>w$}\t{:>w$}\t{}\n",
            format_duration(self.during),
            format_duration(self.total),
            self.mem_bytes,
            self.mem_allocs,
            label,
            w = COLUMN_WIDTH,
        )
    }
}

impl fmt::Display for StepReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "during={} total={} memBytes={} memAllocs={}",
            format_duration(self.during),
            format_duration(self.total),
            self.mem_bytes,
            self.mem_allocs
        )
    }
}

/// Format the header line for a session titled `title`, ending in `\n`.
pub fn header_line(title: &str) -> String {
    format!(
        "{:>w$}\t{:>w$}\t{:>w$}\t{:>w$}\t{}\n",
        COLUMNS[0],
        COLUMNS[1],
        COLUMNS[2],
        COLUMNS[3],
        title,
        w = COLUMN_WIDTH,
    )
}

/// Render a duration with a unit suffix: `ns`, `µs`, `ms` or `s`.
///
/// Sub-microsecond values are printed as whole nanoseconds, larger values
/// with three decimals. The unit is picked after rounding, so a value never
/// reads `1000.000` of a smaller unit.
pub fn format_duration(d: Duration) -> String {
    let nanos = d.as_nanos();
    if nanos < 1_000 {
        return format!("{}ns", nanos);
    }
    if nanos < 1_000_000 {
        return format!("{}.{:03}µs", nanos / 1_000, nanos % 1_000);
    }

    let micros = (nanos + 500) / 1_000;
    if micros < 1_000_000 {
        return format!("{}.{:03}ms", micros / 1_000, micros % 1_000);
    }

    let millis = (nanos + 500_000) / 1_000_000;
    format!("{}.{:03}s", millis / 1_000, millis % 1_000)
}

/// Parse a duration produced by [`format_duration`].
///
/// Also accepts `us` for microseconds. Returns `None` for anything else.
pub fn parse_duration(s: &str) -> Option<Duration> {
    let s = s.trim();
    // Scale is in nanoseconds per unit.
    let (value, scale) = if let Some(v) = s.strip_suffix("ns") {
        (v, 1.0)
    } else if let Some(v) = s.strip_suffix("µs").or_else(|| s.strip_suffix("us")) {
        (v, 1e3)
    } else if let Some(v) = s.strip_suffix("ms") {
        (v, 1e6)
    } else if let Some(v) = s.strip_suffix('s') {
        (v, 1e9)
    } else {
        return None;
    };

    let value: f64 = value.parse().ok()?;
    if !value.is_finite() || value < 0.0 {
        return None;
    }
    let nanos = (value * scale).round();
    if nanos > u64::MAX as f64 {
        return None;
    }
    Some(Duration::from_nanos(nanos as u64))
}
