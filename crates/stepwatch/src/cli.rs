//! Command-line binding for the enable flag

use crate::config::{self, StepConfig};
use clap::Args;

/// Arguments a host can flatten into its own `clap` parser.
///
/// ```rust
/// use clap::Parser;
/// use stepwatch::StepAnalysisArgs;
///
/// #[derive(Parser)]
/// struct Cli {
///     #[command(flatten)]
///     steps: StepAnalysisArgs,
/// }
///
/// let cli = Cli::parse_from(["app", "--step-analysis"]);
/// assert!(cli.steps.step_analysis);
/// ```
#[derive(Debug, Clone, Copy, Default, Args)]
pub struct StepAnalysisArgs {
    /// Display memory and timing of different steps of the program
    #[arg(long = "step-analysis")]
    pub step_analysis: bool,
}

impl StepAnalysisArgs {
    /// Push the flag into the global configuration.
    pub fn apply(&self) {
        config::set_enabled(self.step_analysis);
    }

    /// Build a configuration with this flag and default everything else.
    pub fn to_config(&self) -> StepConfig {
        StepConfig::new().enabled(self.step_analysis)
    }
}
