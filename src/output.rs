//! Output formatting and persistence for ride summaries.
//!
//! Supports pretty-printing, JSON serialization, a plain-text board, and
//! CSV/gzip helpers for producing datasets.

use anyhow::Result;
use flate2::Compression;
use flate2::write::GzEncoder;
use std::fmt::Write as _;
use std::fs::File;
use std::io::Write;
use tracing::{debug, info};

use crate::aggregator::RideSummary;
use crate::config::AppConfig;
use crate::parser::RawRow;
use csv::WriterBuilder;

/// Logs summaries using Rust's debug pretty-print format.
pub fn print_pretty(rides: &[RideSummary]) {
    debug!("{:#?}", rides);
}

/// Logs summaries as pretty-printed JSON.
pub fn print_json(rides: &[RideSummary]) -> Result<()> {
    info!("{}", serde_json::to_string_pretty(rides)?);
    Ok(())
}

/// Writes summaries as pretty-printed JSON to `path`, replacing any
/// existing file.
pub fn write_json(path: &str, rides: &[RideSummary]) -> Result<()> {
    debug!(path, rides = rides.len(), "Writing summary JSON");
    let file = File::create(path)?;
    serde_json::to_writer_pretty(file, rides)?;
    Ok(())
}

/// Renders the board as plain text: one block per ride with its status.
/// Operating rides also get their description, current-hour wait and the
/// hourly strip with the current hour in brackets.
pub fn render_board(rides: &[RideSummary], config: &AppConfig) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", config.header_title);
    let _ = writeln!(out, "{}", config.header_subtitle);

    if rides.is_empty() {
        let _ = writeln!(out, "\nNo ride data loaded");
        return out;
    }

    for ride in rides {
        let status = if ride.available {
            "Operating"
        } else {
            "Unavailable"
        };
        let _ = write!(out, "\n{} [{}]", ride.name, status);
        if !ride.available {
            let _ = writeln!(out, "\n  Unavailable currently");
            continue;
        }
        if let Some(description) = config.description(&ride.name) {
            let _ = write!(out, " - {description}");
        }
        out.push('\n');

        if let Some(current) = ride.current_hour() {
            let _ = writeln!(out, "  now: {} min", current.avg_wait);
        }

        let strip: Vec<String> = ride
            .hourly
            .iter()
            .enumerate()
            .map(|(i, h)| {
                if Some(i) == ride.current_hour_index {
                    format!("[{} {}]", h.label, h.avg_wait)
                } else {
                    format!("{} {}", h.label, h.avg_wait)
                }
            })
            .collect();
        let _ = writeln!(out, "  {}", strip.join(" | "));
    }

    out
}

/// Serializes rows as comma-separated text with a header line.
pub fn write_rows<W: Write>(writer: W, rows: &[RawRow]) -> Result<()> {
    let mut writer = WriterBuilder::new().has_headers(true).from_writer(writer);
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

/// Gzip-compresses a byte buffer.
pub fn gzip_bytes(bytes: &[u8]) -> Result<Vec<u8>> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(bytes)?;
    Ok(encoder.finish()?)
}
