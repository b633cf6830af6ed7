//! Batch runner.
//!
//! Classifies every comparison sample of a run on a bounded rayon pool and
//! appends the results to a [`FindingAggregator`] from a single consumer, in
//! input order. Comparison findings are appended first, then the
//! missing-property findings, both in input order, so the summary is
//! identical for any pool size.

use crate::classify::{classify, CombinationPolicy};
use crate::errors::{ExError, SimCheckError};
use crate::findings::aggregator::require_identity;
use crate::findings::{ComparisonSample, DifferenceFinding, FindingAggregator, MissingPropertyFinding};
use crate::resolve::ThresholdResolver;
use crate::{log_op_end, log_op_error, log_op_start};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Everything the simulation pipeline hands over for one run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunInput {
    pub comparisons: Vec<ComparisonSample>,
    #[serde(default)]
    pub missing_properties: Vec<MissingPropertyFinding>,
    /// Universe of entities checked; defaults to the distinct entities
    /// mentioned in this input.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entities_considered: Option<usize>,
}

impl RunInput {
    /// Parse a run input from JSON.
    ///
    /// # Errors
    ///
    /// `Serialization` if the text is not a valid run input.
    pub fn from_json(text: &str) -> Result<Self, ExError> {
        serde_json::from_str(text)
            .map_err(|e| ExError::from(SimCheckError::from(e)).with_op("read_run_input"))
    }

    /// Read and parse a run input file.
    ///
    /// # Errors
    ///
    /// `Io` if the file cannot be read, `Serialization` if it does not parse.
    pub fn from_path(path: &Path) -> Result<Self, ExError> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            ExError::from(SimCheckError::Io {
                path: path.display().to_string(),
                message: e.to_string(),
            })
            .with_op("read_run_input")
        })?;
        Self::from_json(&text).map_err(|e| e.with_path(path.display().to_string()))
    }

    /// The caller-supplied entity count, or the number of distinct
    /// `(entity_type, entity_id)` pairs in the input.
    pub fn entities_considered(&self) -> usize {
        if let Some(n) = self.entities_considered {
            return n;
        }
        let comparisons = self
            .comparisons
            .iter()
            .map(|s| (s.entity_type.as_str(), s.entity_id.as_str()));
        let missing = self
            .missing_properties
            .iter()
            .map(|m| (m.entity_type.as_str(), m.entity_id.as_str()));
        comparisons.chain(missing).collect::<HashSet<_>>().len()
    }
}

/// Runtime knobs for a batch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchOptions {
    /// Worker threads; `None` uses rayon's default.
    pub threads: Option<usize>,
    pub policy: CombinationPolicy,
    /// Also record comparisons that stayed within tolerance.
    pub include_passing: bool,
}

/// Cooperative cancellation flag, checked between individual comparisons.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

fn cancelled(completed: usize, total: usize) -> ExError {
    ExError::from(SimCheckError::Cancelled { completed, total }).with_op("run_batch")
}

/// Classify `samples` in parallel, returning findings in input order.
///
/// # Errors
///
/// `Cancelled` if `cancel` fires before every sample is classified,
/// `Internal` if the worker pool cannot be built.
pub fn classify_samples(
    resolver: &ThresholdResolver,
    samples: &[ComparisonSample],
    options: &BatchOptions,
    cancel: &CancellationToken,
) -> Result<Vec<DifferenceFinding>, ExError> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(options.threads.unwrap_or(0))
        .build()
        .map_err(|e| {
            ExError::from(SimCheckError::Internal {
                message: format!("failed to build worker pool: {}", e),
            })
            .with_op("run_batch")
        })?;

    let total = samples.len();
    let completed = AtomicUsize::new(0);

    pool.install(|| {
        samples
            .par_iter()
            .map(|sample| {
                if cancel.is_cancelled() {
                    return Err(cancelled(completed.load(Ordering::SeqCst), total));
                }
                let threshold = resolver
                    .resolve(&sample.input.unit, &sample.input.aggregation)
                    .map_err(|e| e.with_entity_id(sample.entity_id.clone()))?;
                let classified = classify(&threshold, &sample.input, options.policy);
                completed.fetch_add(1, Ordering::SeqCst);
                Ok(DifferenceFinding::new(sample, classified))
            })
            .collect()
    })
}

/// Run one comparison batch and return the populated aggregator.
///
/// The aggregator carries the tolerance table digest of `resolver`'s store.
///
/// # Errors
///
/// `Cancelled`, `Internal` (see [`classify_samples`]) or
/// `PreconditionViolation` for an input record without entity identity,
/// checked before any comparison is classified. A failed run yields no
/// partial aggregator.
pub fn run_batch(
    resolver: &ThresholdResolver,
    input: &RunInput,
    options: &BatchOptions,
    cancel: &CancellationToken,
) -> Result<FindingAggregator, ExError> {
    let start = Instant::now();
    log_op_start!(
        "run_batch",
        sample_count = input.comparisons.len() as u64,
        missing_count = input.missing_properties.len() as u64
    );

    let result = run_batch_inner(resolver, input, options, cancel);
    let duration_ms = start.elapsed().as_millis() as u64;
    match &result {
        Ok(aggregator) => {
            log_op_end!(
                "run_batch",
                duration_ms = duration_ms,
                finding_count = aggregator.len() as u64
            );
        }
        Err(err) => {
            log_op_error!("run_batch", err.clone(), duration_ms = duration_ms);
        }
    }
    result
}

/// Every record must carry its entity identity, whether or not its finding
/// ends up in the aggregator.
fn validate_identities(input: &RunInput) -> Result<(), ExError> {
    let comparisons = input
        .comparisons
        .iter()
        .map(|s| (s.entity_type.as_str(), s.entity_id.as_str()));
    let missing = input
        .missing_properties
        .iter()
        .map(|m| (m.entity_type.as_str(), m.entity_id.as_str()));
    for (position, (entity_type, entity_id)) in comparisons.chain(missing).enumerate() {
        require_identity(entity_type, entity_id).map_err(|e| {
            ExError::from(e)
                .with_op("run_batch")
                .with_entity_id(format!("record #{}", position))
        })?;
    }
    Ok(())
}

fn run_batch_inner(
    resolver: &ThresholdResolver,
    input: &RunInput,
    options: &BatchOptions,
    cancel: &CancellationToken,
) -> Result<FindingAggregator, ExError> {
    validate_identities(input)?;
    let differences = classify_samples(resolver, &input.comparisons, options, cancel)?;

    let mut aggregator =
        FindingAggregator::new().with_thresholds_digest(resolver.store().digest());

    for finding in differences {
        if finding.significant {
            tracing::debug!(
                entity_id = %finding.entity_id,
                unit = %finding.unit,
                aggregation = %finding.aggregation,
                abs_diff = finding.abs_diff,
                "significant difference"
            );
        }
        if finding.significant || options.include_passing {
            aggregator.add(finding)?;
        }
    }

    if cancel.is_cancelled() {
        return Err(cancelled(input.comparisons.len(), input.comparisons.len()));
    }

    for missing in &input.missing_properties {
        aggregator.add(missing.clone())?;
    }

    Ok(aggregator)
}
