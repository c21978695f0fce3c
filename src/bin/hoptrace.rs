//! hoptrace command-line tool
//!
//! Decodes a captured path lookup into one annotated path.
//!
//! ## Configuration
//!
//! Environment variables:
//! - `RUST_LOG`: Log level filter (default: hoptrace=info, hoptrace=debug with --verbose)
//! - `LOG_FORMAT`: "json" for structured logs, "pretty" for humans (default: pretty)
//!
//! Logs go to stderr; the path goes to stdout.
//!
//! ## Usage
//!
//! ```bash
//! hoptrace --file lookup.json --zones zones.json --l2-exclusion --table
//! ```

use std::io::Write;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use hoptrace::cli::Args;
use hoptrace::export::{write_edges, write_json, write_list, write_summary, write_table};
use hoptrace::{
    enumerate_edges, Config, FileSource, LogFormat, OutputFormat, PathAnalyzer,
    PathLookupSource,
};

/// Initialize the tracing subscriber with JSON or pretty format
fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| config.default_log_filter().into());

    match config.log_format {
        LogFormat::Pretty => {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_target(true)
                        .with_writer(std::io::stderr),
                )
                .init();
        }
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_target(true)
                        .flatten_event(true)
                        .with_writer(std::io::stderr),
                )
                .init();
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(2);
    }

    let config = Config::from(&args);
    init_tracing(&config);

    let request = args.lookup_request().context("Invalid lookup request")?;

    let mut source = FileSource::new(&args.file);
    if let Some(ref pivot_file) = args.pivot_file {
        source = source.with_pivot(pivot_file);
    }
    if let Some(ref zones) = args.zones {
        source = source.with_zones(zones);
    }

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    if config.all_edges {
        let result = source
            .lookup(&request)
            .await
            .with_context(|| format!("Failed to load {}", args.file.display()))?;
        write_edges(&enumerate_edges(&result.edges), &mut out)?;
        return Ok(());
    }

    let analyzer = PathAnalyzer::new(config.analysis());
    let report = analyzer
        .run(&source, &request, args.pivot.as_deref())
        .await
        .with_context(|| format!("Failed to analyze {}", args.file.display()))?;

    if !report.has_path() {
        info!("no path available");
        writeln!(out, "No path available")?;
        return Ok(());
    }

    match config.output {
        OutputFormat::Json => write_json(&report, &mut out)?,
        OutputFormat::Table => {
            write_summary(&report.summary, &mut out)?;
            write_table(&report.rows, &mut out)?;
        }
        OutputFormat::List => {
            write_summary(&report.summary, &mut out)?;
            write_list(&report.rows, &mut out)?;
        }
    }
    Ok(())
}
