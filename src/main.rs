//! boinc-ingest main entry point
//!
//! This is the command-line interface for the BOINC results ingester.

use anyhow::Context;
use boinc_ingest::config::{load_config_with_hash, Config};
use boinc_ingest::crawler::{build_http_client, run_ingestion_with_client};
use boinc_ingest::output::print_summary;
use boinc_ingest::{InfluxSink, MemorySink, MetricSink};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// boinc-ingest: BOINC task results into InfluxDB
///
/// Crawls finished task results from World Community Grid and Einstein@Home
/// and writes them as `boinc_results` points to an InfluxDB v2 bucket.
#[derive(Parser, Debug)]
#[command(name = "boinc-ingest")]
#[command(version = "1.0.0")]
#[command(about = "Ingests BOINC task results into InfluxDB", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Crawl everything but keep points in memory instead of writing them
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("Failed to load configuration {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", hash);

    let client = build_http_client(&config.http).context("Failed to build HTTP client")?;

    let sink: Arc<dyn MetricSink> = if cli.dry_run {
        tracing::info!("Dry run: points will not be written");
        Arc::new(MemorySink::new())
    } else {
        let sink = InfluxSink::connect(&config.influxdb, client.clone())
            .await
            .with_context(|| {
                format!(
                    "Failed to connect to InfluxDB at {}:{}",
                    config.influxdb.host, config.influxdb.port
                )
            })?;
        Arc::new(sink)
    };

    log_plan(&config);

    let summary = run_ingestion_with_client(config, client, sink)
        .await
        .context("Ingestion failed")?;

    if !cli.quiet {
        print_summary(&summary);
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("boinc_ingest=info,warn"),
            1 => EnvFilter::new("boinc_ingest=debug,info"),
            2 => EnvFilter::new("boinc_ingest=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

fn log_plan(config: &Config) {
    match &config.wcg {
        Some(wcg) => tracing::info!("World Community Grid member: {}", wcg.username),
        None => tracing::info!("World Community Grid not configured"),
    }
    match &config.einstein {
        Some(einstein) => tracing::info!("Einstein@Home hosts: {}", einstein.hosts.len()),
        None => tracing::info!("Einstein@Home not configured"),
    }
}
