//! The metric catalog.
//!
//! Each of the four categories owns a registry of metric definitions,
//! keyed by name. The catalog ships with the built-in documentation
//! governance program and can be replaced by a TOML catalog file.

use crate::error::CatalogError;
use crate::models::{Frequency, MetricCategory, MetricDefinition, MetricUnit, Orientation};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

/// Registry of metric definitions, grouped by category.
///
/// Iteration order is fixed (category order, then metric name), so
/// everything derived from a catalog walk is deterministic.
#[derive(Debug, Clone, Default)]
pub struct MetricCatalog {
    by_category: BTreeMap<MetricCategory, BTreeMap<String, MetricDefinition>>,
}

/// On-disk catalog file: a flat list of metric definitions.
#[derive(Debug, Deserialize)]
struct CatalogFile {
    metrics: Vec<MetricDefinition>,
}

impl MetricCatalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a metric definition.
    ///
    /// Fails on a non-positive target or a name already registered in
    /// the metric's category. Definitions are immutable once registered.
    pub fn register(&mut self, def: MetricDefinition) -> Result<(), CatalogError> {
        if def.target <= 0.0 {
            return Err(CatalogError::InvalidTarget {
                name: def.name.clone(),
                target: def.target,
            });
        }

        let metrics = self.by_category.entry(def.category).or_default();
        if metrics.contains_key(&def.name) {
            return Err(CatalogError::DuplicateMetric {
                category: def.category,
                name: def.name,
            });
        }

        metrics.insert(def.name.clone(), def);
        Ok(())
    }

    /// Check that every category has at least one metric.
    pub fn validate(&self) -> Result<(), CatalogError> {
        for category in MetricCategory::ALL {
            let empty = self
                .by_category
                .get(&category)
                .map(|m| m.is_empty())
                .unwrap_or(true);
            if empty {
                return Err(CatalogError::EmptyCategory { category });
            }
        }
        Ok(())
    }

    /// Metrics registered under a category, in name order.
    pub fn metrics_for(&self, category: MetricCategory) -> Vec<&MetricDefinition> {
        self.by_category
            .get(&category)
            .map(|m| m.values().collect())
            .unwrap_or_default()
    }

    /// All definitions in deterministic order (category, then name).
    pub fn iter(&self) -> impl Iterator<Item = &MetricDefinition> {
        MetricCategory::ALL
            .into_iter()
            .flat_map(|c| self.by_category.get(&c).into_iter().flatten().map(|(_, d)| d))
    }

    /// Total number of registered metrics.
    pub fn len(&self) -> usize {
        self.by_category.values().map(|m| m.len()).sum()
    }

    /// Whether the catalog has no metrics at all.
    #[allow(dead_code)] // Paired with len
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Load a catalog from a TOML file, replacing the built-in program.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read catalog file: {}", path.display()))?;

        let file: CatalogFile = toml::from_str(&content)
            .with_context(|| format!("Failed to parse catalog file: {}", path.display()))?;

        let mut catalog = Self::new();
        for def in file.metrics {
            catalog
                .register(def)
                .with_context(|| format!("Invalid catalog file: {}", path.display()))?;
        }
        catalog
            .validate()
            .with_context(|| format!("Invalid catalog file: {}", path.display()))?;

        Ok(catalog)
    }

    /// The built-in documentation governance program.
    pub fn defaults() -> Self {
        let mut catalog = Self::new();

        let definitions = [
            // User success
            ("task_completion_rate", MetricCategory::UserSuccess, 95.0, MetricUnit::Percent, Frequency::Weekly, Orientation::HigherIsBetter),
            ("time_to_value", MetricCategory::UserSuccess, 300.0, MetricUnit::Seconds, Frequency::Weekly, Orientation::LowerIsBetter),
            ("user_satisfaction", MetricCategory::UserSuccess, 4.5, MetricUnit::Score, Frequency::Monthly, Orientation::HigherIsBetter),
            ("search_success_rate", MetricCategory::UserSuccess, 90.0, MetricUnit::Percent, Frequency::Weekly, Orientation::HigherIsBetter),
            // Content quality
            ("content_freshness", MetricCategory::ContentQuality, 85.0, MetricUnit::Percent, Frequency::Monthly, Orientation::HigherIsBetter),
            ("link_integrity", MetricCategory::ContentQuality, 99.0, MetricUnit::Percent, Frequency::Daily, Orientation::HigherIsBetter),
            ("style_compliance", MetricCategory::ContentQuality, 95.0, MetricUnit::Percent, Frequency::Weekly, Orientation::HigherIsBetter),
            ("technical_accuracy", MetricCategory::ContentQuality, 98.0, MetricUnit::Percent, Frequency::Quarterly, Orientation::HigherIsBetter),
            // Operational excellence
            ("platform_uptime", MetricCategory::OperationalExcellence, 99.9, MetricUnit::Percent, Frequency::Realtime, Orientation::HigherIsBetter),
            ("build_success_rate", MetricCategory::OperationalExcellence, 98.0, MetricUnit::Percent, Frequency::Daily, Orientation::HigherIsBetter),
            ("mean_publish_time", MetricCategory::OperationalExcellence, 600.0, MetricUnit::Seconds, Frequency::Weekly, Orientation::LowerIsBetter),
            ("incident_count", MetricCategory::OperationalExcellence, 2.0, MetricUnit::Count, Frequency::Monthly, Orientation::LowerIsBetter),
            // Business impact
            ("ticket_deflection_rate", MetricCategory::BusinessImpact, 30.0, MetricUnit::Percent, Frequency::Monthly, Orientation::HigherIsBetter),
            ("docs_ticket_volume", MetricCategory::BusinessImpact, 50.0, MetricUnit::Count, Frequency::Monthly, Orientation::LowerIsBetter),
            ("self_service_rate", MetricCategory::BusinessImpact, 80.0, MetricUnit::Percent, Frequency::Monthly, Orientation::HigherIsBetter),
            ("docs_adoption_rate", MetricCategory::BusinessImpact, 70.0, MetricUnit::Percent, Frequency::Quarterly, Orientation::HigherIsBetter),
        ];

        for (name, category, target, unit, frequency, orientation) in definitions {
            catalog
                .register(MetricDefinition {
                    name: name.to_string(),
                    category,
                    target,
                    unit,
                    frequency,
                    orientation,
                })
                .expect("built-in catalog is valid");
        }

        catalog
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_def(name: &str, category: MetricCategory, target: f64) -> MetricDefinition {
        MetricDefinition {
            name: name.to_string(),
            category,
            target,
            unit: MetricUnit::Percent,
            frequency: Frequency::Weekly,
            orientation: Orientation::HigherIsBetter,
        }
    }

    #[test]
    fn test_defaults_cover_all_categories() {
        let catalog = MetricCatalog::defaults();
        assert!(catalog.validate().is_ok());
        assert_eq!(catalog.len(), 16);

        for category in MetricCategory::ALL {
            assert_eq!(catalog.metrics_for(category).len(), 4);
        }
    }

    #[test]
    fn test_iter_is_sorted_within_category() {
        let catalog = MetricCatalog::defaults();
        let user_success: Vec<_> = catalog
            .metrics_for(MetricCategory::UserSuccess)
            .iter()
            .map(|d| d.name.clone())
            .collect();

        let mut sorted = user_success.clone();
        sorted.sort();
        assert_eq!(user_success, sorted);
    }

    #[test]
    fn test_duplicate_registration_fails() {
        let mut catalog = MetricCatalog::new();
        catalog
            .register(sample_def("link_integrity", MetricCategory::ContentQuality, 99.0))
            .unwrap();

        let err = catalog
            .register(sample_def("link_integrity", MetricCategory::ContentQuality, 95.0))
            .unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateMetric { .. }));
    }

    #[test]
    fn test_same_name_allowed_across_categories() {
        let mut catalog = MetricCatalog::new();
        catalog
            .register(sample_def("review_rate", MetricCategory::ContentQuality, 90.0))
            .unwrap();
        catalog
            .register(sample_def("review_rate", MetricCategory::OperationalExcellence, 90.0))
            .unwrap();
        assert_eq!(catalog.len(), 2);
    }

    #[test]
    fn test_non_positive_target_rejected() {
        let mut catalog = MetricCatalog::new();
        let err = catalog
            .register(sample_def("bad_metric", MetricCategory::UserSuccess, 0.0))
            .unwrap_err();
        assert!(matches!(err, CatalogError::InvalidTarget { .. }));
    }

    #[test]
    fn test_validate_rejects_empty_category() {
        let mut catalog = MetricCatalog::new();
        catalog
            .register(sample_def("task_completion_rate", MetricCategory::UserSuccess, 95.0))
            .unwrap();

        let err = catalog.validate().unwrap_err();
        assert!(matches!(err, CatalogError::EmptyCategory { .. }));
    }

    #[test]
    fn test_parse_catalog_file() {
        let toml_content = r#"
[[metrics]]
name = "task_completion_rate"
category = "user-success"
target = 95.0
unit = "percent"
frequency = "weekly"
orientation = "higher-is-better"

[[metrics]]
name = "time_to_value"
category = "user-success"
target = 300.0
unit = "seconds"
frequency = "weekly"
orientation = "lower-is-better"
"#;

        let file: CatalogFile = toml::from_str(toml_content).unwrap();
        assert_eq!(file.metrics.len(), 2);
        assert_eq!(file.metrics[0].name, "task_completion_rate");
        assert_eq!(file.metrics[1].orientation, Orientation::LowerIsBetter);
    }
}
