//! Reading datasets from disk or HTTP and choosing how to decode them.
//!
//! The decoder exposes two entry points; this module owns the policy of
//! which one to call. Explicit uploads are routed by file name, the bundled
//! default dataset is tried as plain text first and as gzip second.

use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use crate::error::DecodeError;
use crate::fetch::{BasicClient, fetch_bytes, is_remote};
use crate::parser::{RawRow, parse_compressed, parse_text};

/// Loads raw bytes from a local file path or an `http(s)` URL.
#[tracing::instrument]
pub async fn read_source(source: &str) -> Result<Vec<u8>> {
    let bytes = if is_remote(source) {
        let client = BasicClient::new().context("failed to build HTTP client")?;
        fetch_bytes(&client, source).await?
    } else {
        tokio::fs::read(source)
            .await
            .with_context(|| format!("failed to read '{source}'"))?
    };
    Ok(bytes)
}

fn has_gzip_extension(name: &str) -> bool {
    name.to_ascii_lowercase().ends_with(".gz")
}

fn as_text(bytes: &[u8]) -> Result<&str, DecodeError> {
    std::str::from_utf8(bytes).map_err(|e| DecodeError::Parse(format!("input is not UTF-8: {e}")))
}

/// Decodes an uploaded file: `.gz` names are decompressed, anything else is
/// parsed as text.
pub fn decode_upload(name: &str, bytes: &[u8]) -> Result<Vec<RawRow>, DecodeError> {
    if has_gzip_extension(name) {
        parse_compressed(bytes)
    } else {
        parse_text(as_text(bytes)?)
    }
}

/// Tries the bytes as plain text, then as gzip. The gzip error is reported
/// when both fail.
pub fn decode_with_fallback(bytes: &[u8]) -> Result<Vec<RawRow>, DecodeError> {
    match as_text(bytes).and_then(parse_text) {
        Ok(rows) => Ok(rows),
        Err(e) => {
            debug!(error = %e, "Plain-text decode failed, retrying as gzip");
            parse_compressed(bytes)
        }
    }
}

/// Reads and decodes an explicit upload.
pub async fn load_upload(source: &str) -> Result<Vec<RawRow>> {
    let bytes = read_source(source).await?;
    let rows = decode_upload(source, &bytes).with_context(|| format!("failed to decode '{source}'"))?;
    info!(source, rows = rows.len(), "Upload decoded");
    Ok(rows)
}

/// Best-effort load of the bundled dataset. Any failure is logged and
/// yields `None` so the caller can start with an empty board.
pub async fn load_default_dataset(source: &str) -> Option<Vec<RawRow>> {
    let bytes = match read_source(source).await {
        Ok(bytes) => bytes,
        Err(e) => {
            warn!(source, error = %e, "Default dataset unavailable");
            return None;
        }
    };

    match decode_with_fallback(&bytes) {
        Ok(rows) => {
            info!(source, rows = rows.len(), "Default dataset loaded");
            Some(rows)
        }
        Err(e) => {
            warn!(source, error = %e, "Default dataset could not be decoded");
            None
        }
    }
}
