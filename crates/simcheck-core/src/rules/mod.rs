//! Tolerance table: rule model, line parser and the immutable rule store.

pub mod model;
pub mod parser;
pub mod store;

pub use model::{Selector, ThresholdRule, RELATIVE_DISABLED, WILDCARD};
pub use parser::{parse_rule_line, parse_rules};
pub use store::RuleStore;
