//! Measurement provider contract.
//!
//! One provider serves each metric category. The aggregator does not
//! know how a provider computes its value (analytics backend, survey
//! aggregation, uptime monitor); it only consumes the sample contract
//! defined here.

pub mod http;
pub mod memory;

use crate::models::{MeasurementSample, MetricCategory, PeriodWindow, ReportingPeriod};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use thiserror::Error;

/// Failures a provider can report for a single sample request.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The provider has no measurement for the metric and period.
    #[error("no sample recorded for `{0}`")]
    NoSample(String),

    /// The measurement backend failed or answered with garbage.
    #[error("measurement backend unavailable: {0}")]
    Backend(String),

    /// The provider's own transport timed out.
    #[error("request timed out")]
    Timeout,
}

/// A source of measurements for one category's metrics.
#[async_trait]
pub trait MeasurementProvider: Send + Sync {
    /// Return the measurement for a metric over the given period.
    async fn sample(
        &self,
        metric: &str,
        period: ReportingPeriod,
        window: PeriodWindow,
    ) -> Result<MeasurementSample, ProviderError>;
}

/// Mapping from category to its measurement provider.
///
/// The category set is closed, so a complete set always carries exactly
/// four providers.
#[derive(Clone)]
pub struct ProviderSet {
    providers: BTreeMap<MetricCategory, Arc<dyn MeasurementProvider>>,
}

impl ProviderSet {
    /// Use one provider for all four categories.
    pub fn same(provider: Arc<dyn MeasurementProvider>) -> Self {
        let providers = MetricCategory::ALL
            .into_iter()
            .map(|c| (c, Arc::clone(&provider)))
            .collect();
        Self { providers }
    }

    /// Replace the provider for one category.
    pub fn with(mut self, category: MetricCategory, provider: Arc<dyn MeasurementProvider>) -> Self {
        self.providers.insert(category, provider);
        self
    }

    /// The provider responsible for a category.
    pub fn provider_for(&self, category: MetricCategory) -> Arc<dyn MeasurementProvider> {
        Arc::clone(
            self.providers
                .get(&category)
                .expect("provider set covers every category"),
        )
    }
}
