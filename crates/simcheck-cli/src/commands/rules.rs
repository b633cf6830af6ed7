//! Rules command
//!
//! Usage: simcheck rules --thresholds <FILE>

use clap::Args;
use simcheck_core::RuleStore;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct RulesArgs {
    /// Tolerance table
    #[arg(short, long)]
    pub thresholds: PathBuf,
}

/// Execute rules command
pub fn execute(args: RulesArgs) -> Result<(), Box<dyn std::error::Error>> {
    let store = RuleStore::from_path(&args.thresholds)?;

    print!("{}", store);
    println!("# {} rules, digest {}", store.len(), store.digest());
    if !store.has_default() {
        eprintln!("warning: no `*, *` default rule; `check` will refuse this table");
    }

    Ok(())
}
