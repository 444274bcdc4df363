//! Markdown report generation.
//!
//! This module renders a `GovernanceReport` into its Markdown document.
//! Rendering is a pure function of the report: no clock reads, no
//! randomness, so identical reports always produce identical text.

use crate::models::{ActionItem, CategorySummary, GovernanceReport, Priority};
use anyhow::Result;

/// Generate the complete Markdown report document.
pub fn generate_markdown_report(report: &GovernanceReport) -> String {
    let mut output = String::new();

    // Title
    output.push_str("# Documentation Governance Report\n\n");

    // Metadata section
    output.push_str(&generate_metadata_section(report));

    // Executive summary
    output.push_str(&generate_executive_summary(report));

    // Per-category metric sections
    for summary in &report.categories {
        output.push_str(&generate_category_section(summary));
    }

    // Compliance status
    output.push_str(&generate_compliance_section(report));

    // Risk assessment
    output.push_str(&generate_risk_section(report));

    // Action items
    output.push_str(&generate_action_items_section(&report.action_items));

    // Footer
    output.push_str(&generate_footer());

    output
}

/// Generate the metadata section.
fn generate_metadata_section(report: &GovernanceReport) -> String {
    let metadata = &report.metadata;
    let mut section = String::new();

    section.push_str("## Metadata\n\n");
    section.push_str(&format!("- **Reporting Period:** {}\n", metadata.period));
    section.push_str(&format!("- **Window:** {}\n", metadata.window));
    section.push_str(&format!(
        "- **Generated:** {}\n",
        metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    section.push_str(&format!(
        "- **Metrics Collected:** {}\n",
        metadata.metrics_collected
    ));
    section.push_str(&format!(
        "- **Action Items:** {}\n",
        report.action_items.len()
    ));
    section.push('\n');

    section
}

/// Generate the executive summary.
fn generate_executive_summary(report: &GovernanceReport) -> String {
    let mut section = String::new();

    section.push_str("## Executive Summary\n\n");
    section.push_str(&format!(
        "Overall governance health for this {} period is **{:.1} / 100** ({} {}).\n\n",
        report.metadata.period,
        report.overall_health,
        report.compliance.emoji(),
        report.compliance
    ));

    for summary in &report.categories {
        section.push_str(&format!(
            "- {}: **{:.1} / 100**\n",
            summary.category, summary.score
        ));
    }
    section.push('\n');

    section
}

/// Generate the metric lines for one category.
fn generate_category_section(summary: &CategorySummary) -> String {
    let mut section = String::new();

    section.push_str(&format!(
        "## {} (score: {:.1}/100)\n\n",
        summary.category, summary.score
    ));

    for reading in &summary.readings {
        section.push_str(&format!(
            "- **{}**: {} (target {}, {})\n",
            reading.label(),
            reading.unit.format(reading.value),
            reading.unit.format(reading.target),
            reading.frequency
        ));
    }
    section.push('\n');

    section
}

/// Generate the compliance status section.
fn generate_compliance_section(report: &GovernanceReport) -> String {
    let mut section = String::new();

    section.push_str("## Compliance Status\n\n");

    let explanation = match report.compliance {
        crate::models::ComplianceStatus::Compliant => {
            "All categories are within governance tolerance."
        }
        crate::models::ComplianceStatus::AtRisk => {
            "One or more metrics are drifting from target; remediation is scheduled."
        }
        crate::models::ComplianceStatus::NonCompliant => {
            "Governance targets are not being met; escalation is required."
        }
    };

    section.push_str(&format!(
        "{} **{}** — {}\n\n",
        report.compliance.emoji(),
        report.compliance,
        explanation
    ));

    section
}

/// Generate the risk assessment section.
fn generate_risk_section(report: &GovernanceReport) -> String {
    let mut section = String::new();

    section.push_str("## Risk Assessment\n\n");

    let critical = report.item_count(Priority::Critical);
    let high = report.item_count(Priority::High);
    let medium = report.item_count(Priority::Medium);
    let low = report.item_count(Priority::Low);

    section.push_str(&format!(
        "| {} Critical | {} High | {} Medium | {} Low | **Total** |\n",
        Priority::Critical.emoji(),
        Priority::High.emoji(),
        Priority::Medium.emoji(),
        Priority::Low.emoji(),
    ));
    section.push_str("|:---:|:---:|:---:|:---:|:---:|\n");
    section.push_str(&format!(
        "| {} | {} | {} | {} | **{}** |\n\n",
        critical,
        high,
        medium,
        low,
        report.action_items.len()
    ));

    if critical > 0 {
        section.push_str(
            "Critical shortfalls demand immediate remediation before the next reporting cycle.\n\n",
        );
    } else if report.action_items.is_empty() {
        section.push_str("No metric is below its action threshold for this period.\n\n");
    }

    section
}

/// Generate the numbered action-item list.
fn generate_action_items_section(items: &[ActionItem]) -> String {
    let mut section = String::new();

    section.push_str("## Action Items\n\n");

    if items.is_empty() {
        section.push_str("None. All metrics are at or near target. 🎉\n\n");
        return section;
    }

    for (i, item) in items.iter().enumerate() {
        section.push_str(&format!(
            "{}. {} {} (Priority: {}, Due: {})\n",
            i + 1,
            item.priority.emoji(),
            item.description,
            item.priority,
            item.due
        ));
    }
    section.push('\n');

    section
}

/// Generate the report footer.
fn generate_footer() -> String {
    let mut footer = String::new();

    footer.push_str("---\n\n");
    footer.push_str("*Report generated by docgov*\n");

    footer
}

/// Generate a JSON report.
pub fn generate_json_report(report: &GovernanceReport) -> Result<String> {
    serde_json::to_string_pretty(report).map_err(Into::into)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        ComplianceStatus, Frequency, MetricCategory, MetricReading, MetricUnit, Orientation,
        PeriodWindow, ReportMetadata, ReportingPeriod,
    };
    use chrono::{NaiveDate, TimeZone, Utc};

    fn create_test_report() -> GovernanceReport {
        let metadata = ReportMetadata {
            period: ReportingPeriod::Monthly,
            window: PeriodWindow {
                start: NaiveDate::from_ymd_opt(2026, 8, 1).unwrap(),
                end: NaiveDate::from_ymd_opt(2026, 8, 31).unwrap(),
            },
            generated_at: Utc.with_ymd_and_hms(2026, 8, 7, 6, 0, 0).unwrap(),
            metrics_collected: 2,
        };

        GovernanceReport {
            metadata,
            categories: vec![
                CategorySummary {
                    category: MetricCategory::UserSuccess,
                    score: 84.2,
                    readings: vec![MetricReading {
                        name: "task_completion_rate".to_string(),
                        value: 80.0,
                        target: 95.0,
                        unit: MetricUnit::Percent,
                        frequency: Frequency::Weekly,
                        orientation: Orientation::HigherIsBetter,
                        contribution: 0.842,
                    }],
                },
                CategorySummary {
                    category: MetricCategory::OperationalExcellence,
                    score: 100.0,
                    readings: vec![MetricReading {
                        name: "incident_count".to_string(),
                        value: 1.0,
                        target: 2.0,
                        unit: MetricUnit::Count,
                        frequency: Frequency::Monthly,
                        orientation: Orientation::LowerIsBetter,
                        contribution: 1.0,
                    }],
                },
            ],
            overall_health: 92.1,
            compliance: ComplianceStatus::AtRisk,
            action_items: vec![ActionItem {
                metric: "task_completion_rate".to_string(),
                category: MetricCategory::UserSuccess,
                description:
                    "Bring Task Completion Rate back to target: 80.0% measured against a target of 95.0%"
                        .to_string(),
                priority: crate::models::Priority::Medium,
                due: NaiveDate::from_ymd_opt(2026, 8, 15).unwrap(),
            }],
        }
    }

    #[test]
    fn test_generate_markdown_report() {
        let report = create_test_report();
        let markdown = generate_markdown_report(&report);

        assert!(markdown.contains("# Documentation Governance Report"));
        assert!(markdown.contains("## Metadata"));
        assert!(markdown.contains("## Executive Summary"));
        assert!(markdown.contains("## User Success (score: 84.2/100)"));
        assert!(markdown.contains("## Compliance Status"));
        assert!(markdown.contains("## Risk Assessment"));
        assert!(markdown.contains("## Action Items"));
    }

    #[test]
    fn test_metric_line_format() {
        let report = create_test_report();
        let markdown = generate_markdown_report(&report);

        assert!(markdown.contains("- **Task Completion Rate**: 80.0% (target 95.0%, weekly)"));
        assert!(markdown.contains("- **Incident Count**: 1 (target 2, monthly)"));
    }

    #[test]
    fn test_action_item_line_format() {
        let report = create_test_report();
        let markdown = generate_markdown_report(&report);

        assert!(markdown.contains("(Priority: Medium, Due: 2026-08-15)"));
        assert!(markdown.contains("1. 🟡 Bring Task Completion Rate back to target"));
    }

    #[test]
    fn test_rendering_is_pure() {
        let report = create_test_report();
        assert_eq!(
            generate_markdown_report(&report),
            generate_markdown_report(&report)
        );
    }

    #[test]
    fn test_empty_action_items_section() {
        let mut report = create_test_report();
        report.action_items.clear();
        let markdown = generate_markdown_report(&report);

        assert!(markdown.contains("None. All metrics are at or near target."));
    }

    #[test]
    fn test_generate_json_report() {
        let report = create_test_report();
        let json = generate_json_report(&report).unwrap();

        assert!(json.contains("\"overall_health\""));
        assert!(json.contains("\"action_items\""));
        assert!(json.contains("\"task_completion_rate\""));
    }
}
