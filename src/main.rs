//! DocGov - Governance Metrics & Reporting Aggregator
//!
//! A CLI tool that collects governance measurements for a documentation
//! platform across four metric categories, scores them against targets,
//! and publishes a Markdown or JSON governance report.
//!
//! Exit codes:
//!   0 - Success (health at or above --fail-under, or no floor set)
//!   1 - Runtime error (config, catalog, collection failure, etc.)
//!   2 - Overall health below the --fail-under floor

mod aggregate;
mod catalog;
mod cli;
mod config;
mod error;
mod models;
mod provider;
mod report;

use aggregate::MetricsAggregator;
use anyhow::{Context, Result};
use catalog::MetricCatalog;
use chrono::Utc;
use cli::{Args, OutputFormat};
use config::Config;
use indicatif::{ProgressBar, ProgressStyle};
use models::{Priority, ReportingPeriod};
use provider::http::HttpProvider;
use provider::memory::providers_from_file;
use provider::ProviderSet;
use report::{generate_json_report, generate_markdown_report, FileSink, ReportSink};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, warn};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    // Initialize logging
    init_logging(&args);

    info!("DocGov v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    // Run the report generation
    match run_report(args).await {
        Ok(exit_code) => {
            std::process::exit(exit_code);
        }
        Err(e) => {
            tracing::error!("Report generation failed: {}", e);
            eprintln!("\n❌ Error: {}", e);
            std::process::exit(1);
        }
    }
}

/// Handle --init-config: generate a default .docgov.toml.
fn handle_init_config() -> Result<()> {
    let path = Path::new(".docgov.toml");

    if path.exists() {
        eprintln!("⚠️  .docgov.toml already exists. Remove it first or edit it manually.");
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content).context("Failed to write .docgov.toml")?;

    println!("✅ Created .docgov.toml with default settings.");
    println!("   Edit it to customize policy thresholds, providers, and output.");
    Ok(())
}

/// Initialize logging based on verbosity settings.
fn init_logging(args: &Args) {
    let level = args.log_level();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

/// Run the complete reporting workflow. Returns exit code (0 or 2).
async fn run_report(args: Args) -> Result<i32> {
    // Load configuration
    let mut config = load_config(&args)?;
    config.merge_with_args(&args);

    // Step 1: Resolve the metric catalog
    let catalog = resolve_catalog(&args)?;
    info!("Catalog holds {} metrics", catalog.len());

    // Handle --dry-run: print the catalog and exit
    if args.dry_run {
        return handle_dry_run(&catalog);
    }

    let period: ReportingPeriod = args.period.into();
    let anchor = args.anchor.unwrap_or_else(|| Utc::now().date_naive());
    let window = period.window(anchor);

    // Step 2: Wire up the measurement providers
    let providers = build_providers(&config)?;

    println!("📊 Generating {} governance report", period);
    println!("   Window: {}", window);
    println!("   Timeout: {}s per provider call", config.collect.timeout_seconds);

    // Step 3: Collect and aggregate
    let aggregator = MetricsAggregator::new(
        catalog,
        config.policy.clone(),
        Duration::from_secs(config.collect.timeout_seconds),
    );

    let spinner = collection_spinner(args.quiet);
    let result = aggregator
        .generate_report(period, anchor, Utc::now(), &providers)
        .await;
    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }

    let governance_report = result.context("Report generation aborted")?;

    // Step 4: Render and publish
    println!("\n📝 Publishing report...");

    let rendered = match args.format {
        OutputFormat::Json => generate_json_report(&governance_report)?,
        OutputFormat::Markdown => generate_markdown_report(&governance_report),
    };

    let sink = FileSink::new(&config.general.output);
    sink.publish(&governance_report, &rendered)?;

    // Print summary
    println!("\n📋 Governance Summary:");
    println!(
        "   Overall health: {:.1} / 100 ({} {})",
        governance_report.overall_health,
        governance_report.compliance.emoji(),
        governance_report.compliance
    );
    for summary in &governance_report.categories {
        println!("   - {}: {:.1}", summary.category, summary.score);
    }
    println!(
        "   Action items: 🔴 Critical: {} | 🟠 High: {} | 🟡 Medium: {} | 🟢 Low: {}",
        governance_report.item_count(Priority::Critical),
        governance_report.item_count(Priority::High),
        governance_report.item_count(Priority::Medium),
        governance_report.item_count(Priority::Low),
    );
    println!("\n✅ Report saved to: {}", config.general.output);

    // Check --fail-under floor
    if let Some(floor) = args.fail_under {
        if governance_report.overall_health < floor {
            eprintln!(
                "\n⛔ Overall health {:.1} is below the {:.1} floor. Failing (exit code 2).",
                governance_report.overall_health, floor
            );
            return Ok(2);
        }
    }

    Ok(0)
}

/// Handle --dry-run: print the resolved catalog, exit.
fn handle_dry_run(catalog: &MetricCatalog) -> Result<i32> {
    println!("\n🔍 Dry run: resolved metric catalog (no samples collected)\n");

    for category in models::MetricCategory::ALL {
        println!("   {}:", category);
        for def in catalog.metrics_for(category) {
            println!(
                "     📐 {} (target {} {}, {})",
                def.name, def.target, def.unit, def.frequency
            );
        }
    }
    println!("\n   Total: {} metrics", catalog.len());

    println!("\n✅ Dry run complete. No providers were contacted.");
    Ok(0)
}

/// Resolve the metric catalog from --catalog or the built-in program.
fn resolve_catalog(args: &Args) -> Result<MetricCatalog> {
    let catalog = if let Some(ref path) = args.catalog {
        info!("Loading catalog from: {}", path.display());
        MetricCatalog::load(path)?
    } else {
        debug!("Using built-in governance catalog");
        MetricCatalog::defaults()
    };

    catalog.validate()?;
    Ok(catalog)
}

/// Wire up one provider per category from the collection settings.
fn build_providers(config: &Config) -> Result<ProviderSet> {
    if let Some(ref samples) = config.collect.samples_file {
        info!("Using measurement file: {}", samples);
        return providers_from_file(Path::new(samples));
    }

    if let Some(ref url) = config.collect.provider_url {
        info!("Using measurement service at: {}", url);
        return Ok(HttpProvider::set_for(url, config.collect.timeout_seconds));
    }

    anyhow::bail!(
        "No measurement source configured: pass --samples or --provider-url, \
         or set one in .docgov.toml"
    )
}

/// Spinner shown while providers are being queried.
fn collection_spinner(quiet: bool) -> Option<ProgressBar> {
    if quiet {
        return None;
    }

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner} {msg}").expect("valid spinner template"),
    );
    spinner.set_message("Collecting measurements...");
    spinner.enable_steady_tick(Duration::from_millis(120));
    Some(spinner)
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<Config> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        info!("Loading config from: {}", config_path.display());
        return Config::load(config_path);
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => {
            info!("Loaded default config from .docgov.toml");
            Ok(config)
        }
        Ok(None) => {
            debug!("No config file found, using defaults");
            Ok(Config::default())
        }
        Err(e) => {
            warn!("Failed to load config: {}", e);
            Ok(Config::default())
        }
    }
}
