//! In-memory measurement provider.
//!
//! Serves samples from a fixed table, loaded either programmatically or
//! from a TOML measurement file. This is the offline mode of the CLI
//! and the workhorse of the test suite.

use crate::models::{MeasurementSample, MetricCategory, PeriodWindow, ReportingPeriod};
use crate::provider::{MeasurementProvider, ProviderError, ProviderSet};
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

/// One entry in a measurement file.
#[derive(Debug, Clone, Deserialize)]
pub struct RecordedSample {
    /// Metric the measurement belongs to.
    pub metric: String,
    /// Category slug; entries without one are visible to all categories.
    #[serde(default)]
    pub category: Option<String>,
    /// Measured value.
    pub value: f64,
    /// When the measurement was collected.
    pub collected_at: DateTime<Utc>,
    /// Declared period; defaults to the requested period when absent.
    #[serde(default)]
    pub period: Option<ReportingPeriod>,
}

/// On-disk measurement file: a flat list of recorded samples.
#[derive(Debug, Deserialize)]
struct SampleFile {
    samples: Vec<RecordedSample>,
}

/// Provider backed by a fixed in-memory sample table.
#[derive(Debug, Clone, Default)]
pub struct MemoryProvider {
    samples: HashMap<String, RecordedSample>,
}

impl MemoryProvider {
    /// Create an empty provider.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a sample that inherits the requested period.
    #[allow(dead_code)] // Builder utility for embedding and tests
    pub fn with_sample(mut self, metric: &str, value: f64, collected_at: DateTime<Utc>) -> Self {
        self.samples.insert(
            metric.to_string(),
            RecordedSample {
                metric: metric.to_string(),
                category: None,
                value,
                collected_at,
                period: None,
            },
        );
        self
    }

    /// Add a sample with an explicitly declared period.
    #[allow(dead_code)] // Builder utility for embedding and tests
    pub fn with_periodic_sample(
        mut self,
        metric: &str,
        value: f64,
        collected_at: DateTime<Utc>,
        period: ReportingPeriod,
    ) -> Self {
        self.samples.insert(
            metric.to_string(),
            RecordedSample {
                metric: metric.to_string(),
                category: None,
                value,
                collected_at,
                period: Some(period),
            },
        );
        self
    }

    fn from_records(records: impl IntoIterator<Item = RecordedSample>) -> Self {
        let samples = records
            .into_iter()
            .map(|r| (r.metric.clone(), r))
            .collect();
        Self { samples }
    }
}

#[async_trait]
impl MeasurementProvider for MemoryProvider {
    async fn sample(
        &self,
        metric: &str,
        period: ReportingPeriod,
        _window: PeriodWindow,
    ) -> Result<MeasurementSample, ProviderError> {
        let recorded = self
            .samples
            .get(metric)
            .ok_or_else(|| ProviderError::NoSample(metric.to_string()))?;

        Ok(MeasurementSample {
            metric: recorded.metric.clone(),
            period: recorded.period.unwrap_or(period),
            value: recorded.value,
            collected_at: recorded.collected_at,
        })
    }
}

/// Build a per-category provider set from a TOML measurement file.
///
/// Entries carrying a category slug are routed to that category's
/// provider only; entries without one are visible everywhere.
pub fn providers_from_file(path: &Path) -> Result<ProviderSet> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read measurement file: {}", path.display()))?;

    let file: SampleFile = toml::from_str(&content)
        .with_context(|| format!("Failed to parse measurement file: {}", path.display()))?;

    for record in &file.samples {
        if let Some(ref slug) = record.category {
            if MetricCategory::from_slug(slug).is_none() {
                anyhow::bail!(
                    "Unknown category `{}` for metric `{}` in {}",
                    slug,
                    record.metric,
                    path.display()
                );
            }
        }
    }

    let mut set = ProviderSet::same(Arc::new(MemoryProvider::new()));
    for category in MetricCategory::ALL {
        let records = file.samples.iter().filter(|r| match &r.category {
            Some(slug) => MetricCategory::from_slug(slug) == Some(category),
            None => true,
        });
        let provider = MemoryProvider::from_records(records.cloned());
        set = set.with(category, Arc::new(provider));
    }

    Ok(set)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn collected() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 8, 1, 9, 30, 0).unwrap()
    }

    #[tokio::test]
    async fn test_returns_recorded_sample() {
        let provider = MemoryProvider::new().with_sample("task_completion_rate", 80.0, collected());
        let window = ReportingPeriod::Monthly.window(collected().date_naive());

        let sample = provider
            .sample("task_completion_rate", ReportingPeriod::Monthly, window)
            .await
            .unwrap();

        assert_eq!(sample.metric, "task_completion_rate");
        assert_eq!(sample.value, 80.0);
        assert_eq!(sample.period, ReportingPeriod::Monthly);
        assert_eq!(sample.collected_at, collected());
    }

    #[tokio::test]
    async fn test_missing_metric_is_no_sample() {
        let provider = MemoryProvider::new();
        let window = ReportingPeriod::Weekly.window(collected().date_naive());

        let err = provider
            .sample("search_success_rate", ReportingPeriod::Weekly, window)
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::NoSample(name) if name == "search_success_rate"));
    }

    #[tokio::test]
    async fn test_declared_period_wins_over_requested() {
        let provider = MemoryProvider::new().with_periodic_sample(
            "content_freshness",
            82.0,
            collected(),
            ReportingPeriod::Weekly,
        );
        let window = ReportingPeriod::Monthly.window(collected().date_naive());

        let sample = provider
            .sample("content_freshness", ReportingPeriod::Monthly, window)
            .await
            .unwrap();
        assert_eq!(sample.period, ReportingPeriod::Weekly);
    }

    #[test]
    fn test_parse_sample_file() {
        let toml_content = r#"
[[samples]]
metric = "task_completion_rate"
category = "user-success"
value = 80.0
collected_at = "2026-08-01T09:30:00Z"

[[samples]]
metric = "incident_count"
value = 1.0
collected_at = "2026-08-02T00:00:00Z"
period = "monthly"
"#;

        let file: SampleFile = toml::from_str(toml_content).unwrap();
        assert_eq!(file.samples.len(), 2);
        assert_eq!(file.samples[0].category.as_deref(), Some("user-success"));
        assert_eq!(file.samples[1].period, Some(ReportingPeriod::Monthly));
    }

    #[tokio::test]
    async fn test_providers_from_file_routes_by_category() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("measurements.toml");
        std::fs::write(
            &path,
            r#"
[[samples]]
metric = "task_completion_rate"
category = "user-success"
value = 91.0
collected_at = "2026-08-01T09:30:00Z"

[[samples]]
metric = "platform_uptime"
value = 99.95
collected_at = "2026-08-01T09:30:00Z"
"#,
        )
        .unwrap();

        let set = providers_from_file(&path).unwrap();
        let window = ReportingPeriod::Daily.window(collected().date_naive());

        // Categorized entry only resolves within its category
        assert!(set
            .provider_for(MetricCategory::UserSuccess)
            .sample("task_completion_rate", ReportingPeriod::Daily, window)
            .await
            .is_ok());
        assert!(set
            .provider_for(MetricCategory::BusinessImpact)
            .sample("task_completion_rate", ReportingPeriod::Daily, window)
            .await
            .is_err());

        // Uncategorized entry is visible everywhere
        assert!(set
            .provider_for(MetricCategory::OperationalExcellence)
            .sample("platform_uptime", ReportingPeriod::Daily, window)
            .await
            .is_ok());
    }

    #[test]
    fn test_unknown_category_slug_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("measurements.toml");
        std::fs::write(
            &path,
            r#"
[[samples]]
metric = "task_completion_rate"
category = "user-delight"
value = 91.0
collected_at = "2026-08-01T09:30:00Z"
"#,
        )
        .unwrap();

        assert!(providers_from_file(&path).is_err());
    }
}
