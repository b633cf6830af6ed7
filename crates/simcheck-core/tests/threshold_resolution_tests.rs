//! Threshold resolution scenarios against the shared tolerance table and
//! property tests over generated rule sets.

#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::fixture_store;
use proptest::prelude::*;
use simcheck_core::errors::ExErrorKind;
use simcheck_core::rules::{parse_rule_line, RELATIVE_DISABLED};
use simcheck_core::{resolve_threshold, RuleStore, Selector, ThresholdResolver, ThresholdRule, Tier};

#[test]
fn test_fixture_default_applies_to_unknown_unit() {
    let store = fixture_store();
    let r = resolve_threshold(store.all(), "Pa", "Hourly").unwrap();
    assert_eq!(r.tier, Tier::Default);
    assert_eq!(r.absolute_threshold(), 0.1);
    assert!(r.relative_disabled());
}

#[test]
fn test_fixture_exact_pair_wins() {
    let store = fixture_store();
    let r = resolve_threshold(store.all(), "K", "Hourly").unwrap();
    assert_eq!(r.tier, Tier::UnitAndAggregation);
    assert_eq!(r.absolute_threshold(), 0.5);
}

#[test]
fn test_fixture_unit_rule_beats_aggregation_rule() {
    let store = fixture_store();
    let r = resolve_threshold(store.all(), "K", "Timestamp").unwrap();
    assert_eq!(r.tier, Tier::UnitOnly);
    assert_eq!(r.absolute_threshold(), 0.2);

    let r = resolve_threshold(store.all(), "Pa", "Timestamp").unwrap();
    assert_eq!(r.tier, Tier::AggregationOnly);
    assert_eq!(r.relative_threshold(), 0.02);
}

#[test]
fn test_fixture_later_line_overrides() {
    let store = fixture_store();
    let r = resolve_threshold(store.all(), "W", "Monthly").unwrap();
    assert_eq!(r.absolute_threshold(), 2.0);
    assert_eq!(r.index, store.len() - 1);
}

#[test]
fn test_precedence_independent_of_file_order() {
    let lines = [
        "*, * = 4, -1",
        "*, Hourly = 3, -1",
        "C, * = 2, -1",
        "C, Hourly = 1, -1",
    ];
    for rotation in 0..lines.len() {
        let mut ordered = lines.to_vec();
        ordered.rotate_left(rotation);
        let store = RuleStore::from_lines(ordered).unwrap();
        let r = resolve_threshold(store.all(), "C", "Hourly").unwrap();
        assert_eq!(r.absolute_threshold(), 1.0, "rotation {}", rotation);
    }
}

#[test]
fn test_table_without_default_is_rejected_up_front() {
    let store = RuleStore::load("K, * = 0.2, -1\nK, Hourly = 0.5, -1").unwrap();
    let err = ThresholdResolver::new(store).unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::NoDefaultThreshold);
    assert!(err.kind().is_configuration_defect());
}

#[test]
fn test_resolver_is_shareable_across_threads() {
    let resolver = std::sync::Arc::new(ThresholdResolver::new(fixture_store()).unwrap());
    let handles: Vec<_> = ["K", "W", "kWh", "Pa"]
        .into_iter()
        .map(|unit| {
            let resolver = resolver.clone();
            std::thread::spawn(move || resolver.resolve(unit, "Monthly").unwrap().tier)
        })
        .collect();
    let tiers: Vec<Tier> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_eq!(
        tiers,
        vec![Tier::UnitOnly, Tier::UnitOnly, Tier::UnitAndAggregation, Tier::Default]
    );
}

fn token() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("*".to_string()),
        Just("C".to_string()),
        Just("K".to_string()),
        Just("Hourly".to_string()),
        Just("Monthly".to_string()),
    ]
}

fn rule() -> impl Strategy<Value = ThresholdRule> {
    (token(), token(), 0.0f64..100.0, prop_oneof![Just(RELATIVE_DISABLED), 0.0f64..1.0])
        .prop_map(|(u, a, abs, rel)| {
            ThresholdRule::new(Selector::from_token(&u), Selector::from_token(&a), abs, rel)
        })
}

proptest! {
    #[test]
    fn prop_resolution_total_with_default(
        mut rules in prop::collection::vec(rule(), 0..12),
        unit in token(),
        aggregation in token(),
    ) {
        rules.insert(0, ThresholdRule::new(Selector::Wildcard, Selector::Wildcard, 0.1, -1.0));
        prop_assert!(resolve_threshold(&rules, &unit, &aggregation).is_ok());
    }

    #[test]
    fn prop_resolved_rule_is_last_of_most_specific_tier(
        mut rules in prop::collection::vec(rule(), 0..12),
        unit in "[A-Z]",
        aggregation in "(Hourly|Monthly)",
    ) {
        rules.push(ThresholdRule::new(Selector::Wildcard, Selector::Wildcard, 0.1, -1.0));
        let r = resolve_threshold(&rules, &unit, &aggregation).unwrap();
        // No later rule matches at the same tier
        for later in &rules[r.index + 1..] {
            let same_tier = match r.tier {
                Tier::UnitAndAggregation => later.unit.matches_exact(&unit) && later.aggregation.matches_exact(&aggregation),
                Tier::UnitOnly => later.unit.matches_exact(&unit) && later.aggregation.is_wildcard(),
                Tier::AggregationOnly => later.unit.is_wildcard() && later.aggregation.matches_exact(&aggregation),
                Tier::Default => later.is_default(),
            };
            prop_assert!(!same_tier);
        }
        // No rule anywhere matches at a more specific tier
        for rule in &rules {
            let exact_pair = rule.unit.matches_exact(&unit) && rule.aggregation.matches_exact(&aggregation);
            if exact_pair {
                prop_assert_eq!(r.tier, Tier::UnitAndAggregation);
            }
        }
    }

    #[test]
    fn prop_rule_display_round_trips(rule in rule()) {
        let text = rule.to_string();
        let parsed = parse_rule_line(1, &text).unwrap().unwrap();
        prop_assert_eq!(&parsed.unit, &rule.unit);
        prop_assert_eq!(&parsed.aggregation, &rule.aggregation);
        prop_assert_eq!(parsed.absolute_threshold, rule.absolute_threshold);
        prop_assert_eq!(parsed.relative_threshold, rule.relative_threshold);
    }
}
