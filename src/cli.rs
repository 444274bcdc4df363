//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use crate::models::ReportingPeriod;
use chrono::NaiveDate;
use clap::Parser;
use std::path::PathBuf;

/// DocGov - Governance metrics & reporting aggregator
///
/// Collect governance measurements across the four metric categories,
/// score them against targets, and publish a Markdown/JSON report.
///
/// Examples:
///   docgov --period monthly --samples measurements.toml
///   docgov --period weekly --provider-url http://metrics.internal:8080
///   docgov --period quarterly --anchor 2026-08-07 --format json -o q3.json
///   docgov --dry-run
///   docgov --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Reporting period to aggregate
    #[arg(short, long, default_value = "monthly", value_name = "PERIOD")]
    pub period: PeriodArg,

    /// Anchor date selecting the concrete calendar window
    ///
    /// Defaults to today. The report covers the daily/weekly/monthly/
    /// quarterly window containing this date.
    #[arg(long, value_name = "DATE")]
    pub anchor: Option<NaiveDate>,

    /// Output file path for the report
    ///
    /// Defaults to the config file setting, or governance_report.md.
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// TOML measurement file (offline provider mode)
    #[arg(long, value_name = "FILE", conflicts_with = "provider_url")]
    pub samples: Option<PathBuf>,

    /// Base URL of the measurement service (HTTP provider mode)
    #[arg(long, value_name = "URL", env = "DOCGOV_PROVIDER_URL")]
    pub provider_url: Option<String>,

    /// TOML metric catalog replacing the built-in governance program
    #[arg(long, value_name = "FILE")]
    pub catalog: Option<PathBuf>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .docgov.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Output format (markdown, json)
    #[arg(long, default_value = "markdown", value_name = "FORMAT")]
    pub format: OutputFormat,

    /// Per-provider-call timeout in seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Fail when overall health is below this score
    ///
    /// Useful for CI pipelines. Exit code 2 when the floor is missed.
    #[arg(long, value_name = "SCORE")]
    pub fail_under: Option<f64>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,

    /// Print the resolved metric catalog without collecting samples
    #[arg(long)]
    pub dry_run: bool,

    /// Generate a default .docgov.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Reporting period for the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum PeriodArg {
    Daily,
    Weekly,
    #[default]
    Monthly,
    Quarterly,
}

impl From<PeriodArg> for ReportingPeriod {
    fn from(arg: PeriodArg) -> Self {
        match arg {
            PeriodArg::Daily => ReportingPeriod::Daily,
            PeriodArg::Weekly => ReportingPeriod::Weekly,
            PeriodArg::Monthly => ReportingPeriod::Monthly,
            PeriodArg::Quarterly => ReportingPeriod::Quarterly,
        }
    }
}

/// Output format for the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Markdown format (default)
    #[default]
    Markdown,
    /// JSON format
    Json,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Skip validation for --init-config and --dry-run
        if self.init_config || self.dry_run {
            return Ok(());
        }

        if let Some(ref url) = self.provider_url {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err("Provider URL must start with 'http://' or 'https://'".to_string());
            }
        }

        if let Some(ref samples) = self.samples {
            if !samples.exists() {
                return Err(format!(
                    "Measurement file does not exist: {}",
                    samples.display()
                ));
            }
        }

        if let Some(fail_under) = self.fail_under {
            if !(0.0..=100.0).contains(&fail_under) {
                return Err("Fail-under score must be between 0 and 100".to_string());
            }
        }

        if let Some(timeout) = self.timeout {
            if timeout == 0 {
                return Err("Timeout must be at least 1 second".to_string());
            }
        }

        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}
