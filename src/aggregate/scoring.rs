//! Scoring policy and pure aggregation math.
//!
//! Everything in this module is a deterministic function of its inputs;
//! the aggregator composes these pieces and the report renderer shows
//! their results.

use crate::models::{
    ActionItem, ComplianceStatus, MeasurementSample, MetricDefinition, Orientation, Priority,
};
use chrono::Duration;
use serde::{Deserialize, Serialize};

/// Policy constants for scoring and action-item derivation.
///
/// Fixed per aggregator instance; loaded from configuration at startup,
/// never varied per call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportPolicy {
    /// Contribution below which an action item is emitted.
    #[serde(default = "default_action_threshold")]
    pub action_threshold: f64,

    /// Shortfalls below this are low priority.
    #[serde(default = "default_low_shortfall")]
    pub low_shortfall: f64,

    /// Shortfalls below this (and at least `low_shortfall`) are medium.
    #[serde(default = "default_medium_shortfall")]
    pub medium_shortfall: f64,

    /// Shortfalls up to and including this are high; beyond is critical.
    #[serde(default = "default_high_shortfall")]
    pub high_shortfall: f64,

    /// Remediation lead time in days for low-priority items.
    #[serde(default = "default_low_lead_days")]
    pub low_lead_days: i64,

    /// Remediation lead time in days for medium-priority items.
    #[serde(default = "default_medium_lead_days")]
    pub medium_lead_days: i64,

    /// Remediation lead time in days for high-priority items.
    #[serde(default = "default_high_lead_days")]
    pub high_lead_days: i64,

    /// Remediation lead time in days for critical items.
    #[serde(default = "default_critical_lead_days")]
    pub critical_lead_days: i64,

    /// Overall health at or above this is compliant.
    #[serde(default = "default_compliant_floor")]
    pub compliant_floor: f64,

    /// Overall health at or above this (but below the compliant floor)
    /// is at risk; below is non-compliant.
    #[serde(default = "default_at_risk_floor")]
    pub at_risk_floor: f64,
}

impl Default for ReportPolicy {
    fn default() -> Self {
        Self {
            action_threshold: default_action_threshold(),
            low_shortfall: default_low_shortfall(),
            medium_shortfall: default_medium_shortfall(),
            high_shortfall: default_high_shortfall(),
            low_lead_days: default_low_lead_days(),
            medium_lead_days: default_medium_lead_days(),
            high_lead_days: default_high_lead_days(),
            critical_lead_days: default_critical_lead_days(),
            compliant_floor: default_compliant_floor(),
            at_risk_floor: default_at_risk_floor(),
        }
    }
}

fn default_action_threshold() -> f64 {
    0.9
}

fn default_low_shortfall() -> f64 {
    0.10
}

fn default_medium_shortfall() -> f64 {
    0.25
}

fn default_high_shortfall() -> f64 {
    0.50
}

fn default_low_lead_days() -> i64 {
    30
}

fn default_medium_lead_days() -> i64 {
    14
}

fn default_high_lead_days() -> i64 {
    7
}

fn default_critical_lead_days() -> i64 {
    2
}

fn default_compliant_floor() -> f64 {
    90.0
}

fn default_at_risk_floor() -> f64 {
    75.0
}

impl ReportPolicy {
    /// Priority for a shortfall magnitude (`1 - contribution`).
    pub fn priority_for(&self, shortfall: f64) -> Priority {
        if shortfall < self.low_shortfall {
            Priority::Low
        } else if shortfall < self.medium_shortfall {
            Priority::Medium
        } else if shortfall <= self.high_shortfall {
            Priority::High
        } else {
            Priority::Critical
        }
    }

    /// Remediation lead time for a priority, in days.
    pub fn lead_days(&self, priority: Priority) -> i64 {
        match priority {
            Priority::Low => self.low_lead_days,
            Priority::Medium => self.medium_lead_days,
            Priority::High => self.high_lead_days,
            Priority::Critical => self.critical_lead_days,
        }
    }
}

/// Normalized [0, 1] closeness of a measured value to its target.
///
/// Higher-is-better: `min(1, value/target)`, clamped at zero for
/// negative readings. Lower-is-better: `min(1, target/value)`; a value
/// of zero or below is on target (a metric cannot beat a "keep this
/// low" target by more than 100%).
pub fn contribution(def: &MetricDefinition, value: f64) -> f64 {
    match def.orientation {
        Orientation::HigherIsBetter => (value / def.target).clamp(0.0, 1.0),
        Orientation::LowerIsBetter => {
            if value <= 0.0 {
                1.0
            } else {
                (def.target / value).min(1.0)
            }
        }
    }
}

/// Arithmetic mean; sum then divide, so grouping and arrival order
/// cannot change the result.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

/// Derive an action item for a metric that fell below the threshold.
///
/// Returns `None` for metrics at or above the action threshold.
pub fn derive_action_item(
    def: &MetricDefinition,
    sample: &MeasurementSample,
    contribution: f64,
    policy: &ReportPolicy,
) -> Option<ActionItem> {
    if contribution >= policy.action_threshold {
        return None;
    }

    let shortfall = 1.0 - contribution;
    let priority = policy.priority_for(shortfall);
    let due = sample.collected_at.date_naive() + Duration::days(policy.lead_days(priority));

    let description = format!(
        "Bring {} back to target: {} measured against a target of {}",
        def.label(),
        def.unit.format(sample.value),
        def.unit.format(def.target),
    );

    Some(ActionItem {
        metric: def.name.clone(),
        category: def.category,
        description,
        priority,
        due,
    })
}

/// Sort items by descending priority, then ascending metric name.
///
/// The tie-break keeps report diffs between runs stable.
pub fn sort_action_items(items: &mut [ActionItem]) {
    items.sort_by(|a, b| {
        b.priority
            .cmp(&a.priority)
            .then_with(|| a.metric.cmp(&b.metric))
    });
}

/// Compliance standing from the overall health score and derived items.
pub fn compliance_for(
    overall_health: f64,
    items: &[ActionItem],
    policy: &ReportPolicy,
) -> ComplianceStatus {
    let has_critical = items.iter().any(|i| i.priority == Priority::Critical);
    let has_high = items.iter().any(|i| i.priority == Priority::High);

    if has_critical || overall_health < policy.at_risk_floor {
        ComplianceStatus::NonCompliant
    } else if has_high || overall_health < policy.compliant_floor {
        ComplianceStatus::AtRisk
    } else {
        ComplianceStatus::Compliant
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Frequency, MetricCategory, MetricUnit, ReportingPeriod};
    use chrono::{TimeZone, Utc};

    fn higher_is_better(name: &str, target: f64) -> MetricDefinition {
        MetricDefinition {
            name: name.to_string(),
            category: MetricCategory::UserSuccess,
            target,
            unit: MetricUnit::Percent,
            frequency: Frequency::Weekly,
            orientation: Orientation::HigherIsBetter,
        }
    }

    fn lower_is_better(name: &str, target: f64) -> MetricDefinition {
        MetricDefinition {
            name: name.to_string(),
            category: MetricCategory::OperationalExcellence,
            target,
            unit: MetricUnit::Count,
            frequency: Frequency::Monthly,
            orientation: Orientation::LowerIsBetter,
        }
    }

    fn sample_for(def: &MetricDefinition, value: f64) -> MeasurementSample {
        MeasurementSample {
            metric: def.name.clone(),
            period: ReportingPeriod::Monthly,
            value,
            collected_at: Utc.with_ymd_and_hms(2026, 8, 1, 9, 30, 0).unwrap(),
        }
    }

    #[test]
    fn test_contribution_higher_is_better() {
        let def = higher_is_better("task_completion_rate", 95.0);
        assert!((contribution(&def, 95.0) - 1.0).abs() < 1e-9);
        assert!((contribution(&def, 80.0) - 0.8421).abs() < 0.001);
        // Exceeding the target is capped
        assert!((contribution(&def, 120.0) - 1.0).abs() < 1e-9);
        // Negative readings clamp to zero
        assert!((contribution(&def, -5.0) - 0.0).abs() < 1e-9);
    }

    #[test]
    fn test_contribution_lower_is_better() {
        let def = lower_is_better("incident_count", 2.0);
        assert!((contribution(&def, 2.0) - 1.0).abs() < 1e-9);
        assert!((contribution(&def, 4.0) - 0.5).abs() < 1e-9);
        // Zero incidents is on target, not infinitely better
        assert!((contribution(&def, 0.0) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_mean_is_order_independent() {
        let forward = mean(&[10.0, 20.0, 30.0]);
        let backward = mean(&[30.0, 20.0, 10.0]);
        assert_eq!(forward, backward);
        assert!((forward - 20.0).abs() < 1e-9);
        assert_eq!(mean(&[]), 0.0);
    }

    #[test]
    fn test_priority_bands() {
        let policy = ReportPolicy::default();
        assert_eq!(policy.priority_for(0.05), Priority::Low);
        assert_eq!(policy.priority_for(0.158), Priority::Medium);
        assert_eq!(policy.priority_for(0.30), Priority::High);
        // Exactly half off target is still high, anything beyond is critical
        assert_eq!(policy.priority_for(0.50), Priority::High);
        assert_eq!(policy.priority_for(0.51), Priority::Critical);
    }

    #[test]
    fn test_on_target_metric_has_no_action_item() {
        let policy = ReportPolicy::default();
        let def = higher_is_better("task_completion_rate", 95.0);
        let sample = sample_for(&def, 95.0);
        assert!(derive_action_item(&def, &sample, 1.0, &policy).is_none());
    }

    #[test]
    fn test_half_target_yields_high_item_due_in_seven_days() {
        let policy = ReportPolicy::default();
        let def = higher_is_better("search_success_rate", 90.0);
        let sample = sample_for(&def, 45.0);
        let c = contribution(&def, 45.0);
        assert!((c - 0.5).abs() < 1e-9);

        let item = derive_action_item(&def, &sample, c, &policy).unwrap();
        assert_eq!(item.priority, Priority::High);
        assert_eq!(item.due, sample.collected_at.date_naive() + Duration::days(7));
        assert!(item.description.contains("Search Success Rate"));
    }

    #[test]
    fn test_sorting_by_priority_then_name() {
        let policy = ReportPolicy::default();
        let defs_and_values = [
            ("style_compliance", 70.0, 95.0),  // medium shortfall
            ("link_integrity", 40.0, 99.0),    // critical shortfall
            ("content_freshness", 40.0, 85.0), // high shortfall
            ("task_completion_rate", 48.0, 95.0), // critical shortfall
        ];

        let mut items: Vec<ActionItem> = defs_and_values
            .iter()
            .map(|(name, value, target)| {
                let def = higher_is_better(name, *target);
                let sample = sample_for(&def, *value);
                let c = contribution(&def, *value);
                derive_action_item(&def, &sample, c, &policy).unwrap()
            })
            .collect();

        sort_action_items(&mut items);

        let order: Vec<&str> = items.iter().map(|i| i.metric.as_str()).collect();
        assert_eq!(
            order,
            vec![
                "link_integrity",       // critical, alphabetically first
                "task_completion_rate", // critical
                "content_freshness",    // high
                "style_compliance",     // medium
            ]
        );
    }

    #[test]
    fn test_compliance_bands() {
        let policy = ReportPolicy::default();
        assert_eq!(
            compliance_for(95.0, &[], &policy),
            ComplianceStatus::Compliant
        );
        assert_eq!(
            compliance_for(85.0, &[], &policy),
            ComplianceStatus::AtRisk
        );
        assert_eq!(
            compliance_for(60.0, &[], &policy),
            ComplianceStatus::NonCompliant
        );
    }

    #[test]
    fn test_critical_item_forces_non_compliant() {
        let policy = ReportPolicy::default();
        let def = higher_is_better("task_completion_rate", 95.0);
        let sample = sample_for(&def, 20.0);
        let c = contribution(&def, 20.0);
        let item = derive_action_item(&def, &sample, c, &policy).unwrap();
        assert_eq!(item.priority, Priority::Critical);

        assert_eq!(
            compliance_for(92.0, &[item], &policy),
            ComplianceStatus::NonCompliant
        );
    }
}
