//! Step Analysis
//!
//! Quick performance analysis for comparing drafts of a function, or phases of
//! a program, against each other:
//! - Sessions that report wall-clock time between named steps
//! - Net allocation counts and bytes per step, read from an instrumented
//!   global allocator
//! - Gating by an enable flag and a start condition, so sessions cost
//!   nothing when analysis is off
//!
//! # Feature Flags
//!
//! - `cli` (default): `clap` binding for the `--step-analysis` switch
//! - `demo`: builds the `stepwatch-demo` binary (adds `anyhow`, `rand` and
//!   `tracing-subscriber`)
//!
//! # Example
//!
//! ```rust
//! use stepwatch::SharedBuffer;
//!
//! let out = SharedBuffer::new();
//! stepwatch::set_writer(out.clone());
//! stepwatch::set_enabled(true);
//!
//! let mut timer = stepwatch::start("site build");
//! // ... prepare templates ...
//! timer.step("initialize & template prep");
//! // ... create pages ...
//! timer.stop("import pages");
//!
//! assert_eq!(out.lines().len(), 3);
//! ```
//!
//! Output is tab separated, one line per call:
//!
//! ```text
//!    during	    total	 memBytes	memAllocs	site build
//!  41.223µs	 52.104µs	     2048	       12	initialize & template prep
//!   3.910µs	 63.877µs	        0	        0	import pages
//! ```

mod alloc;
#[cfg(feature = "cli")]
mod cli;
mod config;
mod error;
pub mod report;
mod session;
mod timer;

pub use alloc::{AllocCounter, AllocSnapshot, NoAllocCounter, StatsAllocCounter};
#[cfg(feature = "cli")]
pub use cli::StepAnalysisArgs;
pub use config::{
    global_config, is_enabled, set_alloc_counter, set_condition, set_enabled, set_writer, start,
    Condition, SharedBuffer, Sink, StepConfig,
};
pub use error::{StepError, StepResult};
pub use report::StepReport;
pub use session::Session;
pub use timer::Timer;
