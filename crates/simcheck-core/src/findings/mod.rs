//! Findings and their deterministic aggregation.
//!
//! ## Guarantees
//!
//! - **Stable order**: entity types, entities within a type, and findings
//!   within an entity are listed in first-seen order.
//! - **Order-independent totals**: per-category totals, issue counts and
//!   affected-entity counts do not depend on insertion order.
//! - **Write once**: findings are never removed or updated after `add`.

pub mod aggregator;
pub mod model;

pub use aggregator::{AggregatedSummary, EntityGroup, EntityTypeGroup, FindingAggregator};
pub use model::{ComparisonSample, DifferenceFinding, Finding, MissingPropertyFinding};
