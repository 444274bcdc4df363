//! Report aggregation.
//!
//! `MetricsAggregator` turns one reporting period plus a set of
//! measurement providers into a complete `GovernanceReport`: concurrent
//! sample collection, validation, scoring, and action-item derivation.

pub mod scoring;

use crate::catalog::MetricCatalog;
use crate::error::CollectError;
use crate::models::{
    CategorySummary, GovernanceReport, MeasurementSample, MetricCategory, MetricDefinition,
    MetricReading, PeriodWindow, ReportMetadata, ReportingPeriod,
};
use crate::provider::{ProviderError, ProviderSet};
use chrono::{DateTime, NaiveDate, Utc};
use scoring::ReportPolicy;
use std::time::Duration;
use tracing::debug;

/// Produces governance reports from measurement providers.
///
/// Each `generate_report` call is independent: no cache of prior
/// reports, no shared mutable state between runs.
pub struct MetricsAggregator {
    catalog: MetricCatalog,
    policy: ReportPolicy,
    provider_timeout: Duration,
}

impl MetricsAggregator {
    /// Create an aggregator over a validated catalog.
    pub fn new(catalog: MetricCatalog, policy: ReportPolicy, provider_timeout: Duration) -> Self {
        Self {
            catalog,
            policy,
            provider_timeout,
        }
    }

    /// Produce one report for the period containing `anchor`.
    ///
    /// Every registered metric must yield a sample or the whole call
    /// fails; a partial governance report could be mistaken for a
    /// complete compliance assessment, so none is ever returned. Pure
    /// given its inputs: `generated_at` is caller-supplied and no other
    /// clock is read.
    pub async fn generate_report(
        &self,
        period: ReportingPeriod,
        anchor: NaiveDate,
        generated_at: DateTime<Utc>,
        providers: &ProviderSet,
    ) -> Result<GovernanceReport, CollectError> {
        let window = period.window(anchor);
        let definitions: Vec<&MetricDefinition> = self.catalog.iter().collect();
        debug!(
            "Collecting {} metrics for {} report ({})",
            definitions.len(),
            period,
            window
        );

        // Fan out one request per metric; all must finish before any
        // scoring happens. join_all preserves input order, so the
        // results line up with catalog order regardless of completion
        // order.
        let timeout = self.provider_timeout;
        let requests = definitions.iter().map(|&def| {
            let provider = providers.provider_for(def.category);
            let name = def.name.clone();
            async move {
                tokio::time::timeout(timeout, provider.sample(&name, period, window)).await
            }
        });
        let outcomes = futures::future::join_all(requests).await;

        let mut samples: Vec<(&MetricDefinition, MeasurementSample)> =
            Vec::with_capacity(definitions.len());
        for (&def, outcome) in definitions.iter().zip(outcomes) {
            let sample = match outcome {
                Err(_) => {
                    return Err(CollectError::ProviderTimeout {
                        category: def.category,
                        metric: def.name.clone(),
                        timeout_secs: timeout.as_secs(),
                    })
                }
                Ok(Err(ProviderError::Timeout)) => {
                    return Err(CollectError::ProviderTimeout {
                        category: def.category,
                        metric: def.name.clone(),
                        timeout_secs: timeout.as_secs(),
                    })
                }
                Ok(Err(e)) => {
                    return Err(CollectError::IncompleteData {
                        category: def.category,
                        metric: def.name.clone(),
                        reason: e.to_string(),
                    })
                }
                Ok(Ok(sample)) => sample,
            };

            if sample.period != period {
                return Err(CollectError::InconsistentPeriod {
                    metric: def.name.clone(),
                    expected: period,
                    got: sample.period,
                });
            }

            samples.push((def, sample));
        }

        Ok(self.score(period, window, generated_at, samples))
    }

    /// Score a complete sample set into a report. Pure.
    fn score(
        &self,
        period: ReportingPeriod,
        window: PeriodWindow,
        generated_at: DateTime<Utc>,
        samples: Vec<(&MetricDefinition, MeasurementSample)>,
    ) -> GovernanceReport {
        let metrics_collected = samples.len();
        let mut categories = Vec::with_capacity(MetricCategory::ALL.len());
        let mut action_items = Vec::new();

        for category in MetricCategory::ALL {
            let mut readings = Vec::new();
            let mut contributions = Vec::new();

            for &(def, ref sample) in samples.iter().filter(|(d, _)| d.category == category) {
                let contribution = scoring::contribution(def, sample.value);
                contributions.push(contribution);

                readings.push(MetricReading {
                    name: def.name.clone(),
                    value: sample.value,
                    target: def.target,
                    unit: def.unit,
                    frequency: def.frequency,
                    orientation: def.orientation,
                    contribution,
                });

                if let Some(item) =
                    scoring::derive_action_item(def, sample, contribution, &self.policy)
                {
                    action_items.push(item);
                }
            }

            categories.push(CategorySummary {
                category,
                score: scoring::mean(&contributions) * 100.0,
                readings,
            });
        }

        let category_scores: Vec<f64> = categories.iter().map(|c| c.score).collect();
        let overall_health = scoring::mean(&category_scores);

        scoring::sort_action_items(&mut action_items);
        let compliance = scoring::compliance_for(overall_health, &action_items, &self.policy);

        GovernanceReport {
            metadata: ReportMetadata {
                period,
                window,
                generated_at,
                metrics_collected,
            },
            categories,
            overall_health,
            compliance,
            action_items,
        }
    }
}
