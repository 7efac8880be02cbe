//! Allocation counter sources
//!
//! Rust has no built-in allocation statistics, so counters come from an
//! instrumented global allocator installed by the host. The timer only ever
//! reads cumulative values through [`AllocCounter`] and works with deltas.

use serde::{Deserialize, Serialize};
use stats_alloc::StatsAlloc;
use std::alloc::System;
use std::fmt;

/// Cumulative allocation counters at a point in time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocSnapshot {
    /// Number of allocations performed since process start
    pub allocs: u64,
    /// Number of bytes allocated since process start
    pub bytes: u64,
}

impl AllocSnapshot {
    /// Create a snapshot from raw counters.
    pub fn new(allocs: u64, bytes: u64) -> Self {
        Self { allocs, bytes }
    }

    /// Counters accumulated between `earlier` and `self`.
    ///
    /// Saturates at zero if the source went backwards.
    pub fn since(&self, earlier: &AllocSnapshot) -> AllocSnapshot {
        AllocSnapshot {
            allocs: self.allocs.saturating_sub(earlier.allocs),
            bytes: self.bytes.saturating_sub(earlier.bytes),
        }
    }
}

/// A source of cumulative allocation counters.
pub trait AllocCounter: Send + Sync {
    /// Read the current cumulative counters.
    fn snapshot(&self) -> AllocSnapshot;
}

/// Counter source that always reports zero.
///
/// Used when the host has not installed an instrumented allocator.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAllocCounter;

impl AllocCounter for NoAllocCounter {
    #[inline]
    fn snapshot(&self) -> AllocSnapshot {
        AllocSnapshot::default()
    }
}

/// Counter source backed by a [`stats_alloc::StatsAlloc`] global allocator.
///
/// # Example
///
/// ```rust,no_run
/// use stats_alloc::{StatsAlloc, INSTRUMENTED_SYSTEM};
/// use std::alloc::System;
/// use stepwatch::StatsAllocCounter;
///
/// #[global_allocator]
/// static GLOBAL: &StatsAlloc<System> = &INSTRUMENTED_SYSTEM;
///
/// fn main() {
///     stepwatch::set_alloc_counter(StatsAllocCounter::new(&INSTRUMENTED_SYSTEM));
/// }
/// ```
#[derive(Clone, Copy)]
pub struct StatsAllocCounter {
    alloc: &'static StatsAlloc<System>,
}

impl StatsAllocCounter {
    /// Wrap an instrumented allocator.
    pub fn new(alloc: &'static StatsAlloc<System>) -> Self {
        Self { alloc }
    }

    /// Counter for the crate-provided `INSTRUMENTED_SYSTEM` allocator.
    pub fn system() -> Self {
        Self::new(&stats_alloc::INSTRUMENTED_SYSTEM)
    }
}

impl fmt::Debug for StatsAllocCounter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StatsAllocCounter")
            .field("stats", &self.alloc.stats())
            .finish()
    }
}

impl AllocCounter for StatsAllocCounter {
    fn snapshot(&self) -> AllocSnapshot {
        let stats = self.alloc.stats();
        // Reallocations are counted like mallocs, growth counts as new bytes.
        AllocSnapshot {
            allocs: (stats.allocations + stats.reallocations) as u64,
            bytes: stats.bytes_allocated as u64,
        }
    }
}
