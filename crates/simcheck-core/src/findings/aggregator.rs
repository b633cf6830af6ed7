//! Finding aggregation.
//!
//! The aggregator owns every finding appended during a run and builds the
//! grouped [`AggregatedSummary`] on demand.

use crate::errors::{ExError, SimCheckError};
use crate::findings::model::Finding;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Findings of one entity, in insertion order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityGroup {
    pub entity_id: String,
    pub entity_type: String,
    pub findings: Vec<Finding>,
    pub count: usize,
    pub issue_count: usize,
}

/// Entities of one type, in first-seen order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityTypeGroup {
    pub entity_type: String,
    pub entities: Vec<EntityGroup>,
    pub finding_count: usize,
}

/// Grouped, read-only view over a run's findings.
///
/// Rebuilt from the aggregator on every `summarize` call; never stored
/// independently.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregatedSummary {
    pub entity_types: Vec<EntityTypeGroup>,
    /// Issue count per category label, sorted by label.
    pub category_totals: BTreeMap<String, usize>,
    pub total_findings: usize,
    pub total_issues: usize,
    /// Entities with at least one issue.
    pub affected_entities: usize,
    /// Universe of entities checked, as supplied by the caller.
    pub entities_considered: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thresholds_digest: Option<String>,
}

impl AggregatedSummary {
    /// Issue count for one category label (0 if absent).
    pub fn category_total(&self, label: &str) -> usize {
        self.category_totals.get(label).copied().unwrap_or(0)
    }

    /// Look up an entity group by identity.
    pub fn entity(&self, entity_type: &str, entity_id: &str) -> Option<&EntityGroup> {
        self.entity_types
            .iter()
            .find(|t| t.entity_type == entity_type)?
            .entities
            .iter()
            .find(|e| e.entity_id == entity_id)
    }
}

/// Reject a record whose entity type or id is empty or blank.
pub(crate) fn require_identity(entity_type: &str, entity_id: &str) -> Result<(), SimCheckError> {
    for (field, value) in [("entity_id", entity_id), ("entity_type", entity_type)] {
        if value.trim().is_empty() {
            return Err(SimCheckError::MissingEntityIdentity {
                field: field.to_string(),
            });
        }
    }
    Ok(())
}

/// Append-only collection of findings for one run.
#[derive(Debug, Clone, Default)]
pub struct FindingAggregator {
    findings: Vec<Finding>,
    thresholds_digest: Option<String>,
}

impl FindingAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the digest of the tolerance table the findings were judged under.
    pub fn with_thresholds_digest(mut self, digest: impl Into<String>) -> Self {
        self.thresholds_digest = Some(digest.into());
        self
    }

    /// Append one finding.
    ///
    /// # Errors
    ///
    /// `PreconditionViolation` if the finding's `entity_id` or `entity_type`
    /// is empty. The finding is not recorded.
    pub fn add(&mut self, finding: impl Into<Finding>) -> Result<(), ExError> {
        let finding = finding.into();
        require_identity(finding.entity_type(), finding.entity_id())
            .map_err(|e| ExError::from(e).with_op("add_finding"))?;
        self.findings.push(finding);
        Ok(())
    }

    /// All findings in insertion order.
    pub fn findings(&self) -> &[Finding] {
        &self.findings
    }

    pub fn len(&self) -> usize {
        self.findings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.findings.is_empty()
    }

    /// Build the grouped summary.
    ///
    /// `entities_considered` is the number of entities the caller checked;
    /// the aggregator only sees entities that produced findings. Calling this
    /// repeatedly without an intervening `add` returns equal summaries.
    pub fn summarize(&self, entities_considered: usize) -> AggregatedSummary {
        let mut entity_types: Vec<EntityTypeGroup> = Vec::new();
        let mut type_index: HashMap<&str, usize> = HashMap::new();
        // (entity_type, entity_id) -> (type slot, entity slot)
        let mut entity_index: HashMap<(&str, &str), (usize, usize)> = HashMap::new();
        let mut category_totals: BTreeMap<String, usize> = BTreeMap::new();
        let mut total_issues = 0;

        for finding in &self.findings {
            let entity_type = finding.entity_type();
            let entity_id = finding.entity_id();

            let t = *type_index.entry(entity_type).or_insert_with(|| {
                entity_types.push(EntityTypeGroup {
                    entity_type: entity_type.to_string(),
                    entities: Vec::new(),
                    finding_count: 0,
                });
                entity_types.len() - 1
            });

            let (t, e) = *entity_index
                .entry((entity_type, entity_id))
                .or_insert_with(|| {
                    let entities = &mut entity_types[t].entities;
                    entities.push(EntityGroup {
                        entity_id: entity_id.to_string(),
                        entity_type: entity_type.to_string(),
                        findings: Vec::new(),
                        count: 0,
                        issue_count: 0,
                    });
                    (t, entities.len() - 1)
                });

            let group = &mut entity_types[t];
            group.finding_count += 1;
            let entity = &mut group.entities[e];
            entity.findings.push(finding.clone());
            entity.count += 1;

            if finding.is_issue() {
                entity.issue_count += 1;
                total_issues += 1;
                *category_totals.entry(finding.category()).or_insert(0) += 1;
            }
        }

        let affected_entities = entity_types
            .iter()
            .flat_map(|t| t.entities.iter())
            .filter(|e| e.issue_count > 0)
            .count();

        AggregatedSummary {
            entity_types,
            category_totals,
            total_findings: self.findings.len(),
            total_issues,
            affected_entities,
            entities_considered,
            thresholds_digest: self.thresholds_digest.clone(),
        }
    }
}
