//! Failure taxonomy for report generation.
//!
//! Every variant aborts the current `generate_report` call. The caller
//! owns retry policy; the aggregator never retries and never returns a
//! partial report.

use crate::models::{MetricCategory, ReportingPeriod};
use thiserror::Error;

/// Errors raised while collecting samples and building a report.
#[derive(Debug, Error)]
pub enum CollectError {
    /// A required metric has no sample for the period.
    #[error("missing sample for metric `{metric}` in {category}: {reason}")]
    IncompleteData {
        category: MetricCategory,
        metric: String,
        reason: String,
    },

    /// A provider returned a sample whose period does not match the request.
    #[error(
        "provider returned a {got} sample for metric `{metric}`, expected {expected}"
    )]
    InconsistentPeriod {
        metric: String,
        expected: ReportingPeriod,
        got: ReportingPeriod,
    },

    /// A provider exceeded the per-call timeout.
    #[error("provider timed out after {timeout_secs}s for metric `{metric}` in {category}")]
    ProviderTimeout {
        category: MetricCategory,
        metric: String,
        timeout_secs: u64,
    },
}

impl CollectError {
    /// Whether this failure means a required metric went unmeasured.
    ///
    /// Timeouts are a specialization of incomplete data: the metric has
    /// no usable sample for the period.
    #[allow(dead_code)] // Classification utility for retrying callers
    pub fn is_incomplete_data(&self) -> bool {
        matches!(
            self,
            CollectError::IncompleteData { .. } | CollectError::ProviderTimeout { .. }
        )
    }

    /// Name of the metric this failure is about.
    #[allow(dead_code)] // Classification utility for retrying callers
    pub fn metric(&self) -> &str {
        match self {
            CollectError::IncompleteData { metric, .. } => metric,
            CollectError::InconsistentPeriod { metric, .. } => metric,
            CollectError::ProviderTimeout { metric, .. } => metric,
        }
    }
}

/// Errors raised while building or loading a metric catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("duplicate metric `{name}` in {category}")]
    DuplicateMetric {
        category: MetricCategory,
        name: String,
    },

    #[error("metric `{name}` has non-positive target {target}")]
    InvalidTarget { name: String, target: f64 },

    #[error("category {category} has no registered metrics")]
    EmptyCategory { category: MetricCategory },
}
