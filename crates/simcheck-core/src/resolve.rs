//! Threshold resolution.
//!
//! Maps a `(unit, aggregation)` query to exactly one rule of the tolerance
//! table using four specificity tiers, most specific first:
//!
//! 1. exact unit, exact aggregation
//! 2. exact unit, wildcard aggregation
//! 3. wildcard unit, exact aggregation
//! 4. wildcard unit, wildcard aggregation (the global default)
//!
//! Within a tier the last matching rule in file order wins.

use crate::errors::{ExError, SimCheckError};
use crate::rules::{RuleStore, Selector, ThresholdRule};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::RwLock;

/// Specificity tier a rule matched at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    UnitAndAggregation,
    UnitOnly,
    AggregationOnly,
    Default,
}

impl Tier {
    /// All tiers, most specific first.
    pub const ORDER: [Tier; 4] = [
        Tier::UnitAndAggregation,
        Tier::UnitOnly,
        Tier::AggregationOnly,
        Tier::Default,
    ];

    /// Whether `rule` matches the query at exactly this tier.
    fn matches(self, rule: &ThresholdRule, unit: &str, aggregation: &str) -> bool {
        match self {
            Tier::UnitAndAggregation => {
                rule.unit.matches_exact(unit) && rule.aggregation.matches_exact(aggregation)
            }
            Tier::UnitOnly => rule.unit.matches_exact(unit) && rule.aggregation.is_wildcard(),
            Tier::AggregationOnly => {
                rule.unit.is_wildcard() && rule.aggregation.matches_exact(aggregation)
            }
            Tier::Default => rule.unit.is_wildcard() && rule.aggregation.is_wildcard(),
        }
    }
}

/// The rule chosen for one query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedThreshold {
    pub rule: ThresholdRule,
    pub tier: Tier,
    /// Position of `rule` in file order.
    pub index: usize,
}

impl ResolvedThreshold {
    pub fn absolute_threshold(&self) -> f64 {
        self.rule.absolute_threshold
    }

    pub fn relative_threshold(&self) -> f64 {
        self.rule.relative_threshold
    }

    pub fn relative_disabled(&self) -> bool {
        self.rule.relative_disabled()
    }
}

/// Last rule in file order matching the query at `tier`.
fn last_match_in_tier(
    rules: &[ThresholdRule],
    tier: Tier,
    unit: &str,
    aggregation: &str,
) -> Option<usize> {
    let mut found = None;
    for (index, rule) in rules.iter().enumerate() {
        if tier.matches(rule, unit, aggregation) {
            found = Some(index);
        }
    }
    found
}

/// Resolve the threshold for `(unit, aggregation)` against `rules`.
///
/// Pure function of its inputs.
///
/// # Errors
///
/// `NoDefaultThreshold` if no rule matches at any tier, which can only
/// happen when the table lacks a `*, *` rule.
pub fn resolve_threshold(
    rules: &[ThresholdRule],
    unit: &str,
    aggregation: &str,
) -> Result<ResolvedThreshold, ExError> {
    for tier in Tier::ORDER {
        if let Some(index) = last_match_in_tier(rules, tier, unit, aggregation) {
            return Ok(ResolvedThreshold {
                rule: rules[index].clone(),
                tier,
                index,
            });
        }
    }
    Err(ExError::from(SimCheckError::NoDefaultThreshold {
        unit: unit.to_string(),
        aggregation: aggregation.to_string(),
    })
    .with_op("resolve_threshold"))
}

/// Resolver bound to one rule store.
///
/// Construction verifies the default rule exists, so a run with a defective
/// table aborts before any comparison. Resolutions are memoized; the cache
/// is safe to share across worker threads.
#[derive(Debug)]
pub struct ThresholdResolver {
    store: RuleStore,
    cache: RwLock<HashMap<(String, String), ResolvedThreshold>>,
}

impl ThresholdResolver {
    /// # Errors
    ///
    /// `NoDefaultThreshold` if `store` has no `*, *` rule.
    pub fn new(store: RuleStore) -> Result<Self, ExError> {
        if !store.has_default() {
            return Err(ExError::from(SimCheckError::NoDefaultThreshold {
                unit: Selector::Wildcard.to_string(),
                aggregation: Selector::Wildcard.to_string(),
            })
            .with_op("build_resolver"));
        }
        Ok(Self {
            store,
            cache: RwLock::new(HashMap::new()),
        })
    }

    pub fn store(&self) -> &RuleStore {
        &self.store
    }

    /// Resolve `(unit, aggregation)`, consulting the memo first.
    ///
    /// # Errors
    ///
    /// `NoDefaultThreshold`; unreachable for a resolver built with
    /// [`ThresholdResolver::new`] but kept in the signature so the pure and
    /// memoized paths agree.
    pub fn resolve(&self, unit: &str, aggregation: &str) -> Result<ResolvedThreshold, ExError> {
        let key = (unit.to_string(), aggregation.to_string());
        if let Ok(cache) = self.cache.read() {
            if let Some(hit) = cache.get(&key) {
                return Ok(hit.clone());
            }
        }

        let resolved = resolve_threshold(self.store.all(), unit, aggregation)?;
        tracing::debug!(
            unit,
            aggregation,
            tier = ?resolved.tier,
            line_no = resolved.rule.line_no as u64,
            "resolved threshold"
        );
        if let Ok(mut cache) = self.cache.write() {
            cache.insert(key, resolved.clone());
        }
        Ok(resolved)
    }
}
