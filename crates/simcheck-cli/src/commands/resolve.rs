//! Resolve command
//!
//! Usage: simcheck resolve --thresholds <FILE> --unit <UNIT> --aggregation <AGG>

use clap::Args;
use simcheck_core::{RuleStore, ThresholdResolver, Tier};
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct ResolveArgs {
    /// Tolerance table
    #[arg(short, long)]
    pub thresholds: PathBuf,

    /// Unit token of the value
    #[arg(short, long)]
    pub unit: String,

    /// Aggregation label of the value
    #[arg(short, long)]
    pub aggregation: String,
}

fn tier_label(tier: Tier) -> &'static str {
    match tier {
        Tier::UnitAndAggregation => "unit + aggregation",
        Tier::UnitOnly => "unit",
        Tier::AggregationOnly => "aggregation",
        Tier::Default => "default",
    }
}

/// Execute resolve command
pub fn execute(args: ResolveArgs) -> Result<(), Box<dyn std::error::Error>> {
    let store = RuleStore::from_path(&args.thresholds)?;
    let resolver = ThresholdResolver::new(store)?;
    let resolved = resolver.resolve(&args.unit, &args.aggregation)?;

    println!("{}", resolved.rule);
    println!(
        "  matched: {} (line {})",
        tier_label(resolved.tier),
        resolved.rule.line_no
    );
    if resolved.relative_disabled() {
        println!("  relative check: disabled");
    }

    Ok(())
}
