use simcheck_core::classify::ComparisonInput;
use simcheck_core::findings::{ComparisonSample, MissingPropertyFinding};
use simcheck_core::{RuleStore, ThresholdResolver};

/// Tolerance table shared by the integration tests.
#[allow(dead_code)]
pub const THRESHOLDS: &str = include_str!("../fixtures/thresholds.txt");

/// Load the shared tolerance table
#[allow(dead_code)]
pub fn fixture_store() -> RuleStore {
    RuleStore::load(THRESHOLDS).unwrap()
}

/// Resolver over the shared tolerance table
#[allow(dead_code)]
pub fn fixture_resolver() -> ThresholdResolver {
    ThresholdResolver::new(fixture_store()).unwrap()
}

/// Build a comparison sample for a thermal zone
#[allow(dead_code)]
pub fn zone_sample(
    id: &str,
    unit: &str,
    aggregation: &str,
    reference: f64,
    candidate: f64,
) -> ComparisonSample {
    ComparisonSample {
        entity_id: id.to_string(),
        entity_type: "ThermalZone".to_string(),
        location: format!("Building/{}", id),
        input: ComparisonInput::new(reference, candidate, unit, aggregation),
    }
}

/// Build a missing-property event
#[allow(dead_code)]
pub fn missing_property(entity_type: &str, id: &str, property: &str) -> MissingPropertyFinding {
    MissingPropertyFinding {
        entity_id: id.to_string(),
        entity_type: entity_type.to_string(),
        location: "Storey 1".to_string(),
        property_name: property.to_string(),
    }
}
