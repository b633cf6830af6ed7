//! Immutable, ordered store of threshold rules.

use crate::errors::{ExError, SimCheckError};
use crate::rules::model::ThresholdRule;
use crate::rules::parser::parse_rules;
use crate::{log_op_end, log_op_error, log_op_start};
use sha2::{Digest as _, Sha256};
use std::fmt;
use std::path::Path;
use std::time::Instant;

/// The parsed tolerance table.
///
/// Rules keep file order because override resolution is order-sensitive
/// within a specificity tier. The store has no mutating methods; build a new
/// one to change the table.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RuleStore {
    rules: Vec<ThresholdRule>,
}

impl RuleStore {
    /// Parse a tolerance table from text.
    ///
    /// # Errors
    ///
    /// `ConfigParse` naming the first malformed line and its content.
    pub fn load(text: &str) -> Result<Self, ExError> {
        Self::from_lines(text.lines())
    }

    /// Parse a tolerance table from individual lines.
    ///
    /// # Errors
    ///
    /// `ConfigParse` naming the first malformed line and its content.
    pub fn from_lines<'a, I>(lines: I) -> Result<Self, ExError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let start = Instant::now();
        log_op_start!("load_rules");

        match parse_rules(lines) {
            Ok(rules) => {
                log_op_end!(
                    "load_rules",
                    duration_ms = start.elapsed().as_millis() as u64,
                    rule_count = rules.len() as u64
                );
                Ok(Self { rules })
            }
            Err(err) => {
                let ex_err = ExError::from(err).with_op("load_rules");
                log_op_error!(
                    "load_rules",
                    ex_err.clone(),
                    duration_ms = start.elapsed().as_millis() as u64,
                    line_no = ex_err.line_no().unwrap_or(0) as u64
                );
                Err(ex_err)
            }
        }
    }

    /// Read and parse a tolerance table file.
    ///
    /// # Errors
    ///
    /// `Io` if the file cannot be read, otherwise as [`RuleStore::load`].
    pub fn from_path(path: &Path) -> Result<Self, ExError> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            ExError::from(SimCheckError::Io {
                path: path.display().to_string(),
                message: e.to_string(),
            })
            .with_op("load_rules")
        })?;
        Self::load(&text).map_err(|e| e.with_path(path.display().to_string()))
    }

    /// Build a store from rules constructed in memory, in the given order.
    pub fn from_rules(rules: Vec<ThresholdRule>) -> Self {
        Self { rules }
    }

    /// All rules in file order.
    pub fn all(&self) -> &[ThresholdRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Whether the table contains a `*, *` rule.
    pub fn has_default(&self) -> bool {
        self.rules.iter().any(ThresholdRule::is_default)
    }

    /// SHA-256 hex digest of the normalized table in file order.
    ///
    /// Comments, blank lines and whitespace do not affect the digest; rule
    /// order does.
    pub fn digest(&self) -> String {
        let mut hasher = Sha256::new();
        for rule in &self.rules {
            hasher.update(rule.to_string().as_bytes());
            hasher.update(b"\n");
        }
        hex::encode(hasher.finalize())
    }
}

/// Normalized table, one rule per line in file order.
impl fmt::Display for RuleStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rule in &self.rules {
            writeln!(f, "{}", rule)?;
        }
        Ok(())
    }
}
