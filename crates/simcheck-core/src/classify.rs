//! Difference classification.
//!
//! Decides whether a candidate value differs significantly from its
//! reference under a resolved threshold. Classification never fails:
//! degenerate input (non-finite values, zero reference) is handled by
//! explicit rules and always yields a result.

use crate::resolve::ResolvedThreshold;
use serde::{Deserialize, Serialize};

/// One reference/candidate pair to judge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonInput {
    pub reference_value: f64,
    pub candidate_value: f64,
    pub unit: String,
    pub aggregation: String,
}

impl ComparisonInput {
    pub fn new(
        reference_value: f64,
        candidate_value: f64,
        unit: impl Into<String>,
        aggregation: impl Into<String>,
    ) -> Self {
        Self {
            reference_value,
            candidate_value,
            unit: unit.into(),
            aggregation: aggregation.into(),
        }
    }
}

/// How the absolute and relative checks combine when both are enabled.
///
/// `Both` is the default: a difference is only significant when it exceeds
/// the absolute AND the relative threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CombinationPolicy {
    #[default]
    Both,
    Either,
}

impl CombinationPolicy {
    /// Parse from string; unknown values yield `None`.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "both" | "and" => Some(CombinationPolicy::Both),
            "either" | "or" => Some(CombinationPolicy::Either),
            _ => None,
        }
    }
}

/// Outcome of classifying one pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassifiedDifference {
    pub abs_diff: f64,
    /// `None` when the reference is zero or either value is non-finite.
    pub rel_diff: Option<f64>,
    pub significant: bool,
}

/// Relative difference, undefined for a zero reference.
fn relative_difference(abs_diff: f64, reference: f64) -> Option<f64> {
    if reference == 0.0 {
        None
    } else {
        Some(abs_diff / reference.abs())
    }
}

/// Classify `input` under `threshold`.
///
/// - relative threshold `-1`: significant iff `abs_diff > absolute`
/// - `Both`: significant iff `abs_diff > absolute` and `rel_diff > relative`
/// - `Either`: significant iff `abs_diff > absolute` or `rel_diff > relative`
///
/// An undefined `rel_diff` never contributes, leaving the absolute check to
/// decide. Non-finite values are always significant.
pub fn classify(
    threshold: &ResolvedThreshold,
    input: &ComparisonInput,
    policy: CombinationPolicy,
) -> ClassifiedDifference {
    let reference = input.reference_value;
    let candidate = input.candidate_value;
    let abs_diff = (candidate - reference).abs();

    if !reference.is_finite() || !candidate.is_finite() {
        return ClassifiedDifference {
            abs_diff,
            rel_diff: None,
            significant: true,
        };
    }

    let rel_diff = relative_difference(abs_diff, reference);
    let exceeds_absolute = abs_diff > threshold.absolute_threshold();

    let significant = if threshold.relative_disabled() {
        exceeds_absolute
    } else {
        match (policy, rel_diff) {
            (_, None) => exceeds_absolute,
            (CombinationPolicy::Both, Some(rel)) => {
                exceeds_absolute && rel > threshold.relative_threshold()
            }
            (CombinationPolicy::Either, Some(rel)) => {
                exceeds_absolute || rel > threshold.relative_threshold()
            }
        }
    };

    ClassifiedDifference {
        abs_diff,
        rel_diff,
        significant,
    }
}
