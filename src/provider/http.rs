//! HTTP measurement provider.
//!
//! Queries a remote measurement service (analytics backend, uptime
//! monitor, survey aggregator) over its JSON API. One provider instance
//! serves one category.

use crate::models::{MeasurementSample, MetricCategory, PeriodWindow, ReportingPeriod};
use crate::provider::{MeasurementProvider, ProviderError, ProviderSet};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::StatusCode;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Wire format of a sample response.
#[derive(Debug, Deserialize)]
struct WireSample {
    value: f64,
    collected_at: DateTime<Utc>,
    /// Period declared by the backend; defaults to the requested period.
    #[serde(default)]
    period: Option<ReportingPeriod>,
}

/// Provider backed by a remote measurement service.
pub struct HttpProvider {
    client: reqwest::Client,
    base_url: String,
    category: MetricCategory,
}

impl HttpProvider {
    /// Create a provider for one category of a measurement service.
    pub fn new(base_url: &str, category: MetricCategory, timeout_seconds: u64) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            category,
        }
    }

    /// Build a full provider set against one measurement service.
    pub fn set_for(base_url: &str, timeout_seconds: u64) -> ProviderSet {
        let mut set = ProviderSet::same(Arc::new(HttpProvider::new(
            base_url,
            MetricCategory::UserSuccess,
            timeout_seconds,
        )));
        for category in MetricCategory::ALL {
            set = set.with(
                category,
                Arc::new(HttpProvider::new(base_url, category, timeout_seconds)),
            );
        }
        set
    }

    fn sample_url(&self, metric: &str) -> String {
        format!(
            "{}/categories/{}/metrics/{}",
            self.base_url,
            self.category.slug(),
            metric
        )
    }
}

#[async_trait]
impl MeasurementProvider for HttpProvider {
    async fn sample(
        &self,
        metric: &str,
        period: ReportingPeriod,
        window: PeriodWindow,
    ) -> Result<MeasurementSample, ProviderError> {
        let url = self.sample_url(metric);
        debug!("Requesting {} for period {} ({})", url, period, window);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("period", period.to_string()),
                ("start", window.start.to_string()),
                ("end", window.end.to_string()),
            ])
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ProviderError::Timeout
                } else {
                    ProviderError::Backend(e.to_string())
                }
            })?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(ProviderError::NoSample(metric.to_string()));
        }

        let response = response
            .error_for_status()
            .map_err(|e| ProviderError::Backend(e.to_string()))?;

        let wire: WireSample = response
            .json()
            .await
            .map_err(|e| ProviderError::Backend(format!("invalid sample payload: {}", e)))?;

        Ok(MeasurementSample {
            metric: metric.to_string(),
            period: wire.period.unwrap_or(period),
            value: wire.value,
            collected_at: wire.collected_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_url_shape() {
        let provider = HttpProvider::new(
            "http://metrics.internal:8080/",
            MetricCategory::ContentQuality,
            30,
        );
        assert_eq!(
            provider.sample_url("link_integrity"),
            "http://metrics.internal:8080/categories/content-quality/metrics/link_integrity"
        );
    }

    #[test]
    fn test_parse_wire_sample() {
        let json = r#"{"value": 99.2, "collected_at": "2026-08-01T09:30:00Z", "period": "daily"}"#;
        let wire: WireSample = serde_json::from_str(json).unwrap();
        assert_eq!(wire.value, 99.2);
        assert_eq!(wire.period, Some(ReportingPeriod::Daily));

        let bare = r#"{"value": 4.2, "collected_at": "2026-08-01T09:30:00Z"}"#;
        let wire: WireSample = serde_json::from_str(bare).unwrap();
        assert_eq!(wire.period, None);
    }
}
