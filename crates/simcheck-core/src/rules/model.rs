use serde::{Deserialize, Serialize};
use std::fmt;

/// Token that matches any unit or aggregation in the tolerance table.
pub const WILDCARD: &str = "*";

/// Relative threshold sentinel: judge by the absolute threshold only.
pub const RELATIVE_DISABLED: f64 = -1.0;

/// The unit or aggregation header of a rule.
///
/// Wildcards are tagged at parse time, so a query token is only ever
/// compared against `Exact` selectors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "token", rename_all = "snake_case")]
pub enum Selector {
    Exact(String),
    Wildcard,
}

impl Selector {
    /// Build a selector from a header token (`*` becomes `Wildcard`).
    pub fn from_token(token: &str) -> Self {
        if token == WILDCARD {
            Selector::Wildcard
        } else {
            Selector::Exact(token.to_string())
        }
    }

    pub fn is_wildcard(&self) -> bool {
        matches!(self, Selector::Wildcard)
    }

    /// True when this is an `Exact` selector for exactly `token`.
    pub fn matches_exact(&self, token: &str) -> bool {
        matches!(self, Selector::Exact(t) if t == token)
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selector::Exact(token) => f.write_str(token),
            Selector::Wildcard => f.write_str(WILDCARD),
        }
    }
}

/// One line of the tolerance table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThresholdRule {
    pub unit: Selector,
    pub aggregation: Selector,
    /// Maximum tolerated raw difference; never negative.
    pub absolute_threshold: f64,
    /// Maximum tolerated difference relative to the reference magnitude,
    /// or [`RELATIVE_DISABLED`].
    pub relative_threshold: f64,
    /// 1-based source line, 0 for rules built in memory.
    #[serde(default)]
    pub line_no: usize,
}

impl ThresholdRule {
    pub fn new(
        unit: Selector,
        aggregation: Selector,
        absolute_threshold: f64,
        relative_threshold: f64,
    ) -> Self {
        Self {
            unit,
            aggregation,
            absolute_threshold,
            relative_threshold,
            line_no: 0,
        }
    }

    pub fn with_line_no(mut self, line_no: usize) -> Self {
        self.line_no = line_no;
        self
    }

    /// Whether the relative check is switched off for this rule.
    pub fn relative_disabled(&self) -> bool {
        self.relative_threshold == RELATIVE_DISABLED
    }

    /// True for the global `*, *` rule.
    pub fn is_default(&self) -> bool {
        self.unit.is_wildcard() && self.aggregation.is_wildcard()
    }
}

/// Serializes back to the table grammar: `unit, aggregation = absolute, relative`.
///
/// `f64`'s `Display` is the shortest representation that parses back to the
/// same value, so a rule survives a print/parse round trip unchanged.
impl fmt::Display for ThresholdRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}, {} = {}, {}",
            self.unit, self.aggregation, self.absolute_threshold, self.relative_threshold
        )
    }
}
