//! SimCheck CLI
//!
//! Command-line front end for validating simulation results against
//! reference data under a tolerance table.

use clap::{Parser, Subcommand, ValueEnum};
use simcheck_core::logging_facility::{init, Profile};

mod commands;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogFormat {
    /// Human-readable log lines
    Pretty,
    /// One JSON object per log event
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "simcheck")]
#[command(about = "SimCheck - tolerance-based regression checks for simulation results", long_about = None)]
struct Cli {
    /// Log output format (logs go to stderr; RUST_LOG overrides the level)
    #[arg(long, value_enum, global = true, default_value = "pretty")]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Compare a run against its reference and print the grouped summary
    Check(commands::check::CheckArgs),
    /// Show which tolerance rule applies to a unit and aggregation
    Resolve(commands::resolve::ResolveArgs),
    /// Print the normalized tolerance table and its digest
    Rules(commands::rules::RulesArgs),
}

fn main() {
    let cli = Cli::parse();

    init(match cli.log_format {
        LogFormat::Pretty => Profile::Development,
        LogFormat::Json => Profile::Production,
    });

    let result = match cli.command {
        Commands::Check(args) => commands::check::execute(args),
        Commands::Resolve(args) => commands::resolve::execute(args),
        Commands::Rules(args) => commands::rules::execute(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
