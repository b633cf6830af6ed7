//! SimCheck Core - tolerance-driven validation of simulation results
//!
//! This crate provides the comparison engine used to check simulated series
//! against reference data, including:
//! - A rule store parsed from the plain-text tolerance table
//! - Specificity-ordered threshold resolution per (unit, aggregation)
//! - Absolute/relative difference classification
//! - Deterministic grouping of findings by entity type and entity
//! - A batch runner that fans classification out over a bounded worker pool
//!
//! All components are plain values: a run constructs its own `RuleStore`
//! and `FindingAggregator`, so tests with distinct rule sets can run in
//! parallel.

pub mod batch;
pub mod classify;
pub mod errors;
pub mod findings;
pub mod logging_facility;
pub mod resolve;
pub mod rules;

// Re-export commonly used types
pub use batch::{run_batch, BatchOptions, CancellationToken, RunInput};
pub use classify::{classify, ClassifiedDifference, CombinationPolicy, ComparisonInput};
pub use errors::{ExError, ExErrorKind, Result, SimCheckError};
pub use findings::{AggregatedSummary, Finding, FindingAggregator};
pub use resolve::{resolve_threshold, ResolvedThreshold, ThresholdResolver, Tier};
pub use rules::{RuleStore, Selector, ThresholdRule};
