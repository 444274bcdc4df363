//! Data models for governance reporting.
//!
//! This module contains all the core data structures used throughout
//! the application for representing metrics, measurement samples, and
//! governance reports.

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The four governance metric categories.
///
/// This is a closed set: the governance program tracks exactly these
/// categories, and reports always enumerate them in this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MetricCategory {
    UserSuccess,
    ContentQuality,
    OperationalExcellence,
    BusinessImpact,
}

impl MetricCategory {
    /// All categories in report order.
    pub const ALL: [MetricCategory; 4] = [
        MetricCategory::UserSuccess,
        MetricCategory::ContentQuality,
        MetricCategory::OperationalExcellence,
        MetricCategory::BusinessImpact,
    ];

    /// Stable identifier used in config files and provider URLs.
    pub fn slug(&self) -> &'static str {
        match self {
            MetricCategory::UserSuccess => "user-success",
            MetricCategory::ContentQuality => "content-quality",
            MetricCategory::OperationalExcellence => "operational-excellence",
            MetricCategory::BusinessImpact => "business-impact",
        }
    }

    /// Parse a category from its slug.
    pub fn from_slug(s: &str) -> Option<Self> {
        match s {
            "user-success" => Some(MetricCategory::UserSuccess),
            "content-quality" => Some(MetricCategory::ContentQuality),
            "operational-excellence" => Some(MetricCategory::OperationalExcellence),
            "business-impact" => Some(MetricCategory::BusinessImpact),
            _ => None,
        }
    }
}

impl fmt::Display for MetricCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricCategory::UserSuccess => write!(f, "User Success"),
            MetricCategory::ContentQuality => write!(f, "Content Quality"),
            MetricCategory::OperationalExcellence => write!(f, "Operational Excellence"),
            MetricCategory::BusinessImpact => write!(f, "Business Impact"),
        }
    }
}

/// Unit of measurement for a metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricUnit {
    Percent,
    Seconds,
    Score,
    Count,
}

impl MetricUnit {
    /// Format a value with its unit for report lines.
    pub fn format(&self, value: f64) -> String {
        match self {
            MetricUnit::Percent => format!("{:.1}%", value),
            MetricUnit::Seconds => format!("{:.0}s", value),
            MetricUnit::Score => format!("{:.1}", value),
            MetricUnit::Count => format!("{:.0}", value),
        }
    }
}

impl fmt::Display for MetricUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricUnit::Percent => write!(f, "percent"),
            MetricUnit::Seconds => write!(f, "seconds"),
            MetricUnit::Score => write!(f, "score"),
            MetricUnit::Count => write!(f, "count"),
        }
    }
}

/// How often a metric is sampled by its measurement provider.
///
/// Cadence metadata only: providers own deduplication, and the
/// aggregator requests exactly one sample per metric per run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Realtime,
    Daily,
    Weekly,
    Monthly,
    Quarterly,
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Frequency::Realtime => write!(f, "realtime"),
            Frequency::Daily => write!(f, "daily"),
            Frequency::Weekly => write!(f, "weekly"),
            Frequency::Monthly => write!(f, "monthly"),
            Frequency::Quarterly => write!(f, "quarterly"),
        }
    }
}

/// Whether a larger or smaller value is closer to target.
///
/// A fixed property of the metric definition, never inferred from data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Orientation {
    HigherIsBetter,
    LowerIsBetter,
}

/// Definition of a single governance metric.
///
/// Immutable once registered in the catalog; defines what "on target"
/// means for the metric.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricDefinition {
    /// Metric name, unique within its category (snake_case).
    pub name: String,
    /// Category that owns this metric.
    pub category: MetricCategory,
    /// Target value; must be strictly positive.
    pub target: f64,
    /// Unit of measurement.
    pub unit: MetricUnit,
    /// Sampling cadence.
    pub frequency: Frequency,
    /// Target orientation.
    pub orientation: Orientation,
}

impl MetricDefinition {
    /// Human-readable label derived from the snake_case name.
    pub fn label(&self) -> String {
        display_label(&self.name)
    }
}

/// Turn a snake_case metric name into a title-cased label.
pub fn display_label(name: &str) -> String {
    name.split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Reporting period granularity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportingPeriod {
    Daily,
    Weekly,
    Monthly,
    Quarterly,
}

impl ReportingPeriod {
    /// Calendar window containing the anchor date.
    ///
    /// Daily: the anchor day. Weekly: the ISO week (Monday through
    /// Sunday). Monthly: the calendar month. Quarterly: the calendar
    /// quarter. Bounds are inclusive.
    pub fn window(&self, anchor: NaiveDate) -> PeriodWindow {
        match self {
            ReportingPeriod::Daily => PeriodWindow {
                start: anchor,
                end: anchor,
            },
            ReportingPeriod::Weekly => {
                let offset = anchor.weekday().num_days_from_monday() as i64;
                let start = anchor - Duration::days(offset);
                PeriodWindow {
                    start,
                    end: start + Duration::days(6),
                }
            }
            ReportingPeriod::Monthly => PeriodWindow {
                start: first_of_month(anchor.year(), anchor.month()),
                end: last_of_month(anchor.year(), anchor.month()),
            },
            ReportingPeriod::Quarterly => {
                let quarter_start_month = ((anchor.month() - 1) / 3) * 3 + 1;
                PeriodWindow {
                    start: first_of_month(anchor.year(), quarter_start_month),
                    end: last_of_month(anchor.year(), quarter_start_month + 2),
                }
            }
        }
    }
}

impl fmt::Display for ReportingPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportingPeriod::Daily => write!(f, "daily"),
            ReportingPeriod::Weekly => write!(f, "weekly"),
            ReportingPeriod::Monthly => write!(f, "monthly"),
            ReportingPeriod::Quarterly => write!(f, "quarterly"),
        }
    }
}

fn first_of_month(year: i32, month: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, 1).expect("valid first-of-month date")
}

fn last_of_month(year: i32, month: u32) -> NaiveDate {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    first_of_month(next_year, next_month) - Duration::days(1)
}

/// Concrete calendar bounds of a reporting period (inclusive).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl fmt::Display for PeriodWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} to {}", self.start, self.end)
    }
}

/// One measurement produced by an external provider.
///
/// Immutable once created; the aggregator reads samples but never
/// mutates them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeasurementSample {
    /// Name of the sampled metric.
    pub metric: String,
    /// Period the measurement covers.
    pub period: ReportingPeriod,
    /// Measured value.
    pub value: f64,
    /// When the provider collected the measurement.
    pub collected_at: DateTime<Utc>,
}

/// Priority of a derived action item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    /// Low priority - minor shortfall, routine follow-up
    Low,
    /// Medium priority - noticeable shortfall
    Medium,
    /// High priority - serious shortfall
    High,
    /// Critical priority - metric far off target
    Critical,
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Priority::Low => write!(f, "Low"),
            Priority::Medium => write!(f, "Medium"),
            Priority::High => write!(f, "High"),
            Priority::Critical => write!(f, "Critical"),
        }
    }
}

impl Priority {
    /// Returns an emoji representation of the priority.
    pub fn emoji(&self) -> &'static str {
        match self {
            Priority::Low => "🟢",
            Priority::Medium => "🟡",
            Priority::High => "🟠",
            Priority::Critical => "🔴",
        }
    }
}

/// A remediation task derived from an underperforming metric.
///
/// Recomputed on every run from current values versus targets; never
/// persisted independently.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionItem {
    /// Metric that triggered the item.
    pub metric: String,
    /// Category that owns the metric.
    pub category: MetricCategory,
    /// What needs to happen.
    pub description: String,
    /// Priority derived from the shortfall magnitude.
    pub priority: Priority,
    /// Remediation due date.
    pub due: NaiveDate,
}

/// One metric's reading inside a category summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricReading {
    pub name: String,
    pub value: f64,
    pub target: f64,
    pub unit: MetricUnit,
    pub frequency: Frequency,
    pub orientation: Orientation,
    /// Normalized closeness to target in [0, 1].
    pub contribution: f64,
}

impl MetricReading {
    /// Human-readable label derived from the snake_case name.
    pub fn label(&self) -> String {
        display_label(&self.name)
    }
}

/// Summary of one category for the reporting period.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategorySummary {
    pub category: MetricCategory,
    /// Mean of per-metric contributions, on a 0-100 scale.
    pub score: f64,
    /// Per-metric readings in catalog order.
    pub readings: Vec<MetricReading>,
}

/// Overall compliance standing derived from the health score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ComplianceStatus {
    Compliant,
    AtRisk,
    NonCompliant,
}

impl fmt::Display for ComplianceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComplianceStatus::Compliant => write!(f, "Compliant"),
            ComplianceStatus::AtRisk => write!(f, "At Risk"),
            ComplianceStatus::NonCompliant => write!(f, "Non-Compliant"),
        }
    }
}

impl ComplianceStatus {
    /// Returns an emoji representation of the status.
    pub fn emoji(&self) -> &'static str {
        match self {
            ComplianceStatus::Compliant => "✅",
            ComplianceStatus::AtRisk => "⚠️",
            ComplianceStatus::NonCompliant => "⛔",
        }
    }
}

/// Metadata about a governance report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    /// Granularity of the reporting period.
    pub period: ReportingPeriod,
    /// Calendar bounds of the period.
    pub window: PeriodWindow,
    /// When the report was generated (caller-supplied).
    pub generated_at: DateTime<Utc>,
    /// Number of metrics collected across all categories.
    pub metrics_collected: usize,
}

/// The complete governance report for one period.
///
/// Created fresh on each aggregation run and never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GovernanceReport {
    /// Metadata about the report.
    pub metadata: ReportMetadata,
    /// One summary per category, in fixed category order.
    pub categories: Vec<CategorySummary>,
    /// Unweighted mean of the four category scores, in [0, 100].
    pub overall_health: f64,
    /// Compliance standing derived from the health score.
    pub compliance: ComplianceStatus,
    /// Derived remediation items, sorted by descending priority then
    /// ascending metric name.
    pub action_items: Vec<ActionItem>,
}

impl GovernanceReport {
    /// Number of action items at the given priority.
    pub fn item_count(&self, priority: Priority) -> usize {
        self.action_items
            .iter()
            .filter(|i| i.priority == priority)
            .count()
    }
}
