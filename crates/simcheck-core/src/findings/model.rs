//! Finding types.
//!
//! All types implement `Debug, Clone, Serialize, Deserialize, PartialEq`.

use crate::classify::{ClassifiedDifference, ComparisonInput};
use serde::{Deserialize, Serialize};

/// A comparison pair attributed to a modeled entity, as delivered by the
/// simulation pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonSample {
    pub entity_id: String,
    pub entity_type: String,
    #[serde(default)]
    pub location: String,
    #[serde(flatten)]
    pub input: ComparisonInput,
}

/// Result of classifying one sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DifferenceFinding {
    pub entity_id: String,
    pub entity_type: String,
    pub location: String,
    pub unit: String,
    pub aggregation: String,
    pub reference_value: f64,
    pub candidate_value: f64,
    pub abs_diff: f64,
    pub rel_diff: Option<f64>,
    pub significant: bool,
}

impl DifferenceFinding {
    pub fn new(sample: &ComparisonSample, classified: ClassifiedDifference) -> Self {
        Self {
            entity_id: sample.entity_id.clone(),
            entity_type: sample.entity_type.clone(),
            location: sample.location.clone(),
            unit: sample.input.unit.clone(),
            aggregation: sample.input.aggregation.clone(),
            reference_value: sample.input.reference_value,
            candidate_value: sample.input.candidate_value,
            abs_diff: classified.abs_diff,
            rel_diff: classified.rel_diff,
            significant: classified.significant,
        }
    }
}

/// An expected property that was not found on a modeled entity.
///
/// Doubles as the pipeline's "expected property not found" event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissingPropertyFinding {
    pub entity_id: String,
    pub entity_type: String,
    #[serde(default)]
    pub location: String,
    pub property_name: String,
}

/// One classified discrepancy or missing-property observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Finding {
    Difference(DifferenceFinding),
    MissingProperty(MissingPropertyFinding),
}

impl Finding {
    pub fn entity_id(&self) -> &str {
        match self {
            Finding::Difference(f) => &f.entity_id,
            Finding::MissingProperty(f) => &f.entity_id,
        }
    }

    pub fn entity_type(&self) -> &str {
        match self {
            Finding::Difference(f) => &f.entity_type,
            Finding::MissingProperty(f) => &f.entity_type,
        }
    }

    pub fn location(&self) -> &str {
        match self {
            Finding::Difference(f) => &f.location,
            Finding::MissingProperty(f) => &f.location,
        }
    }

    /// Label used for per-error-kind totals.
    ///
    /// `difference:<unit>/<aggregation>` or `missing_property:<name>`.
    pub fn category(&self) -> String {
        match self {
            Finding::Difference(f) => format!("difference:{}/{}", f.unit, f.aggregation),
            Finding::MissingProperty(f) => format!("missing_property:{}", f.property_name),
        }
    }

    /// A missing property, or a difference judged significant.
    pub fn is_issue(&self) -> bool {
        match self {
            Finding::Difference(f) => f.significant,
            Finding::MissingProperty(_) => true,
        }
    }
}

impl From<DifferenceFinding> for Finding {
    fn from(f: DifferenceFinding) -> Self {
        Finding::Difference(f)
    }
}

impl From<MissingPropertyFinding> for Finding {
    fn from(f: MissingPropertyFinding) -> Self {
        Finding::MissingProperty(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_json_is_flat() {
        let json = r#"{
            "entity_id": "zone-1",
            "entity_type": "ThermalZone",
            "reference_value": 20.0,
            "candidate_value": 20.5,
            "unit": "K",
            "aggregation": "Hourly"
        }"#;
        let sample: ComparisonSample = serde_json::from_str(json).unwrap();
        assert_eq!(sample.location, "");
        assert_eq!(sample.input.unit, "K");
        assert_eq!(sample.input.candidate_value, 20.5);
    }

    #[test]
    fn test_category_labels() {
        let missing: Finding = MissingPropertyFinding {
            entity_id: "w1".to_string(),
            entity_type: "Wall".to_string(),
            location: "Storey 1".to_string(),
            property_name: "u_value".to_string(),
        }
        .into();
        assert_eq!(missing.category(), "missing_property:u_value");
        assert!(missing.is_issue());
        assert_eq!(missing.location(), "Storey 1");
    }

    #[test]
    fn test_finding_serializes_with_kind_tag() {
        let f: Finding = MissingPropertyFinding {
            entity_id: "w1".to_string(),
            entity_type: "Wall".to_string(),
            location: String::new(),
            property_name: "area".to_string(),
        }
        .into();
        let value = serde_json::to_value(&f).unwrap();
        assert_eq!(value["kind"], "missing_property");
        assert_eq!(value["property_name"], "area");
    }
}
