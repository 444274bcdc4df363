//! Report sinks.
//!
//! A sink receives a fully-produced report plus its rendered document
//! for archival or dashboard update. The aggregator never talks to a
//! sink; the caller publishes only after generation succeeded.

use crate::models::GovernanceReport;
use anyhow::{Context, Result};
use std::path::PathBuf;
use tracing::info;

/// Destination for finished governance reports.
pub trait ReportSink {
    /// Publish a rendered report document.
    fn publish(&self, report: &GovernanceReport, rendered: &str) -> Result<()>;
}

/// Sink that writes the rendered document to a file.
pub struct FileSink {
    path: PathBuf,
}

impl FileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ReportSink for FileSink {
    fn publish(&self, report: &GovernanceReport, rendered: &str) -> Result<()> {
        std::fs::write(&self.path, rendered)
            .with_context(|| format!("Failed to write report to {}", self.path.display()))?;

        info!(
            "Published {} report ({} action items) to {}",
            report.metadata.period,
            report.action_items.len(),
            self.path.display()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        ComplianceStatus, GovernanceReport, PeriodWindow, ReportMetadata, ReportingPeriod,
    };
    use chrono::{NaiveDate, TimeZone, Utc};

    fn empty_report() -> GovernanceReport {
        GovernanceReport {
            metadata: ReportMetadata {
                period: ReportingPeriod::Weekly,
                window: PeriodWindow {
                    start: NaiveDate::from_ymd_opt(2026, 8, 3).unwrap(),
                    end: NaiveDate::from_ymd_opt(2026, 8, 9).unwrap(),
                },
                generated_at: Utc.with_ymd_and_hms(2026, 8, 7, 6, 0, 0).unwrap(),
                metrics_collected: 0,
            },
            categories: vec![],
            overall_health: 100.0,
            compliance: ComplianceStatus::Compliant,
            action_items: vec![],
        }
    }

    #[test]
    fn test_file_sink_writes_rendered_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.md");
        let sink = FileSink::new(&path);

        sink.publish(&empty_report(), "# Rendered\n").unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "# Rendered\n");
    }
}
