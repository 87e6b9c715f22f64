//! CLI entry point for the ride wait board.
//!
//! Provides subcommands for summarizing an upload (or the bundled default
//! dataset) into per-ride hourly waits, validating a file without
//! aggregating it, and gzip-compressing a CSV into a bundled dataset.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use ride_wait_board::aggregator::timestamp::current_hour;
use ride_wait_board::{
    board::{RideBoard, parse_override},
    config::AppConfig,
    output::{gzip_bytes, print_pretty, render_board, write_json},
    source::{load_default_dataset, load_upload},
};
use std::ffi::OsStr;
use std::path::Path;
use tracing::{info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "ride_wait_board")]
#[command(about = "Summarize amusement-park ride waits by hour of day", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Aggregate a CSV (or .csv.gz) upload into per-ride hourly waits
    Summarize {
        /// Path or URL of the upload; defaults to the bundled dataset
        #[arg(value_name = "FILE_OR_URL")]
        source: Option<String>,

        /// Hour of day (0-23) to treat as "now"; defaults to the local clock
        #[arg(long, value_parser = clap::value_parser!(u32).range(0..24))]
        hour: Option<u32>,

        /// How to print the board
        #[arg(short, long, value_enum, default_value_t = Format::Text)]
        format: Format,

        /// Also write the displayed summaries as JSON to this file
        #[arg(short, long)]
        output: Option<String>,

        /// Force a ride's availability, e.g. --override "Dragon Khan=false"
        #[arg(long = "override", value_name = "NAME=BOOL", value_parser = parse_override)]
        overrides: Vec<(String, bool)>,
    },
    /// Decode a file and check its columns without printing a board
    Validate {
        /// Path or URL of the upload
        #[arg(value_name = "FILE_OR_URL")]
        source: String,
    },
    /// Gzip-compress a CSV file for use as the bundled dataset
    Compress {
        /// CSV file to compress
        input: String,

        /// Destination; defaults to INPUT.gz
        #[arg(short, long)]
        output: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    let config = AppConfig::from_env()?;

    // Logging setup: colored stderr + JSON rolling log file
    let log_dir = Path::new(&config.log_file_path)
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&config.log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("ride_wait_board.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(
            EnvFilter::try_from_env("RUST_LOG").unwrap_or_else(|_| EnvFilter::new("info")),
        );

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(
            EnvFilter::try_from_env("RUST_LOG_JSON").unwrap_or_else(|_| EnvFilter::new("debug")),
        );

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Summarize {
            source,
            hour,
            format,
            output,
            overrides,
        } => {
            summarize(&config, source, hour, format, output, overrides).await?;
        }
        Commands::Validate { source } => {
            let rows = load_upload(&source).await?;
            info!(source = %source, rows = rows.len(), "Upload is valid");
        }
        Commands::Compress { input, output } => {
            let output = output.unwrap_or_else(|| format!("{input}.gz"));
            let bytes = std::fs::read(&input).with_context(|| format!("failed to read '{input}'"))?;
            let compressed = gzip_bytes(&bytes)?;
            std::fs::write(&output, &compressed)
                .with_context(|| format!("failed to write '{output}'"))?;
            info!(
                input = %input,
                output = %output,
                original = bytes.len(),
                compressed = compressed.len(),
                "Dataset compressed"
            );
        }
    }

    Ok(())
}

/// Loads the upload (or the bundled dataset), aggregates it, applies
/// overrides and prints the resulting board.
#[tracing::instrument(skip(config, format, overrides))]
async fn summarize(
    config: &AppConfig,
    source: Option<String>,
    hour: Option<u32>,
    format: Format,
    output: Option<String>,
    overrides: Vec<(String, bool)>,
) -> Result<()> {
    let now = hour.unwrap_or_else(current_hour);

    let rows = match &source {
        Some(source) => Some(load_upload(source).await?),
        None => load_default_dataset(&config.default_dataset).await,
    };

    let mut board = RideBoard::new();
    match rows {
        Some(rows) => board.load(&rows, now),
        None => warn!("No dataset loaded; supply a file to summarize"),
    }

    for (name, available) in overrides {
        if !board.rides().iter().any(|r| r.name == name) {
            warn!(ride = %name, "Override targets a ride that is not on the board");
        }
        board.set_override(&name, available);
    }

    let rides = board.display();
    print_pretty(&rides);

    match format {
        Format::Text => print!("{}", render_board(&rides, config)),
        Format::Json => println!("{}", serde_json::to_string_pretty(&rides)?),
    }

    if let Some(path) = output {
        write_json(&path, &rides)?;
        info!(path = %path, rides = rides.len(), "Summary written");
    }

    Ok(())
}
