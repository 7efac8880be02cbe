//! Stepwatch demo
//!
//! Times a few synthetic workloads. Run with `--step-analysis` to see the
//! report.

use anyhow::Result;
use clap::Parser;
use rand::Rng;
use stats_alloc::{StatsAlloc, INSTRUMENTED_SYSTEM};
use std::alloc::System;
use std::collections::BTreeMap;
use std::fs::File;
use std::path::PathBuf;
use stepwatch::{Session, StatsAllocCounter, StepAnalysisArgs};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[global_allocator]
static GLOBAL: &StatsAlloc<System> = &INSTRUMENTED_SYSTEM;

#[derive(Parser)]
#[command(name = "stepwatch-demo", about = "Time and count allocations of a few synthetic steps")]
struct Cli {
    #[command(flatten)]
    steps: StepAnalysisArgs,

    /// Number of items each workload processes
    #[arg(short = 'n', long, default_value = "100000")]
    items: usize,

    /// Number of times to run the workloads
    #[arg(short = 'r', long, default_value = "5")]
    runs: usize,

    /// Analyse roughly one run in this many, picked at random
    #[arg(long, default_value = "1")]
    sample_one_in: u32,

    /// Write the report to this file instead of stdout
    #[arg(short = 'o', long)]
    out: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    if cli.sample_one_in == 0 {
        anyhow::bail!("--sample-one-in must be at least 1");
    }

    cli.steps.apply();
    stepwatch::set_alloc_counter(StatsAllocCounter::new(&INSTRUMENTED_SYSTEM));
    let sample = cli.sample_one_in;
    stepwatch::set_condition(move || rand::thread_rng().gen_range(0..sample) == 0);
    if let Some(path) = &cli.out {
        stepwatch::set_writer(File::create(path)?);
    }

    tracing::info!(
        items = cli.items,
        runs = cli.runs,
        enabled = stepwatch::is_enabled(),
        "starting workloads"
    );

    for run in 0..cli.runs {
        // The condition is drawn again for every run.
        let mut timer = stepwatch::start(&format!("run {run}"));
        let (distinct, total) = word_counts(cli.items, &mut timer);
        tracing::debug!(run, sampled = timer.is_active(), distinct, total, "run finished");
    }

    Ok(())
}

fn word_counts(items: usize, timer: &mut Session) -> (usize, usize) {
    let words: Vec<String> = (0..items).map(|i| format!("word{}", i % 997)).collect();
    timer.step("build words");

    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for word in &words {
        *counts.entry(word.as_str()).or_default() += 1;
    }
    timer.step("count words");

    let total: usize = counts.values().sum();
    timer.stop("sum counts");

    (counts.len(), total)
}
