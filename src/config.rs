//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.docgov.toml` files.

use crate::aggregate::scoring::ReportPolicy;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Sample collection settings.
    #[serde(default)]
    pub collect: CollectConfig,

    /// Scoring and action-item policy constants.
    #[serde(default)]
    pub policy: ReportPolicy,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Default output file path.
    #[serde(default = "default_output")]
    pub output: String,

    /// Enable verbose logging by default.
    #[serde(default)]
    pub verbose: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            output: default_output(),
            verbose: false,
        }
    }
}

fn default_output() -> String {
    "governance_report.md".to_string()
}

/// Measurement collection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectConfig {
    /// Base URL of the measurement service (HTTP provider mode).
    #[serde(default)]
    pub provider_url: Option<String>,

    /// Path to a TOML measurement file (offline provider mode).
    #[serde(default)]
    pub samples_file: Option<String>,

    /// Per-provider-call timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

impl Default for CollectConfig {
    fn default() -> Self {
        Self {
            provider_url: None,
            samples_file: None,
            timeout_seconds: default_timeout(),
        }
    }
}

fn default_timeout() -> u64 {
    30
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        let default_path = Path::new(".docgov.toml");

        if default_path.exists() {
            Ok(Some(Self::load(default_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings.
    /// This method only overrides config when CLI provides explicit values.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref output) = args.output {
            self.general.output = output.display().to_string();
        }

        if let Some(timeout) = args.timeout {
            self.collect.timeout_seconds = timeout;
        }

        if let Some(ref url) = args.provider_url {
            self.collect.provider_url = Some(url.clone());
            self.collect.samples_file = None;
        }

        if let Some(ref samples) = args.samples {
            self.collect.samples_file = Some(samples.display().to_string());
            self.collect.provider_url = None;
        }

        if args.verbose {
            self.general.verbose = true;
        }
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}
