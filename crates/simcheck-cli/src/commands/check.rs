//! Check command
//!
//! Usage: simcheck check --thresholds <FILE> --input <FILE> [--output <FILE>]

use clap::{Args, ValueEnum};
use simcheck_core::{
    run_batch, BatchOptions, CancellationToken, CombinationPolicy, RuleStore, RunInput,
    ThresholdResolver,
};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum PolicyArg {
    /// Significant only when both thresholds are exceeded
    Both,
    /// Significant when either threshold is exceeded
    Either,
}

impl From<PolicyArg> for CombinationPolicy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::Both => CombinationPolicy::Both,
            PolicyArg::Either => CombinationPolicy::Either,
        }
    }
}

#[derive(Debug, Args)]
pub struct CheckArgs {
    /// Tolerance table
    #[arg(short, long)]
    pub thresholds: PathBuf,

    /// Run input JSON (comparisons and missing properties)
    #[arg(short, long)]
    pub input: PathBuf,

    /// Output file path (default: stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Worker threads for classification (default: one per core)
    #[arg(long)]
    pub threads: Option<usize>,

    /// How absolute and relative thresholds combine
    #[arg(long, value_enum, default_value = "both")]
    pub policy: PolicyArg,

    /// Also list comparisons that stayed within tolerance
    #[arg(long)]
    pub include_passing: bool,
}

/// Execute check command
pub fn execute(args: CheckArgs) -> Result<(), Box<dyn std::error::Error>> {
    // Configuration errors abort before any input is read
    let store = RuleStore::from_path(&args.thresholds)?;
    let resolver = ThresholdResolver::new(store)?;

    let input = RunInput::from_path(&args.input)?;
    let options = BatchOptions {
        threads: args.threads,
        policy: args.policy.into(),
        include_passing: args.include_passing,
    };

    let aggregator = run_batch(&resolver, &input, &options, &CancellationToken::new())?;
    let summary = aggregator.summarize(input.entities_considered());
    tracing::info!(
        affected_entities = summary.affected_entities as u64,
        entities_considered = summary.entities_considered as u64,
        total_issues = summary.total_issues as u64,
        "check complete"
    );

    let json = serde_json::to_string_pretty(&summary)?;
    if let Some(output_path) = args.output {
        std::fs::write(&output_path, format!("{}\n", json))?;
        eprintln!(
            "✓ {} of {} entities affected, summary written to {}",
            summary.affected_entities,
            summary.entities_considered,
            output_path.display()
        );
    } else {
        println!("{}", json);
    }

    Ok(())
}
