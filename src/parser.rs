//! Delimited-text decoder for ride observations.
//!
//! Turns plain or gzip-compressed text into [`RawRow`] records after checking
//! that the header carries every required column.

use std::io::Read;

use csv::{ReaderBuilder, StringRecord};
use flate2::read::MultiGzDecoder;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::DecodeError;

/// Columns every upload must carry, matched case-insensitively after trimming.
pub const REQUIRED_COLUMNS: [&str; 4] = ["timestamp", "ride_name", "wait_time", "availability"];

const CANDIDATE_DELIMITERS: [u8; 4] = [b',', b';', b'\t', b'|'];

/// One observation as it appeared in the upload. Cells are kept verbatim;
/// coercion happens in the aggregator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRow {
    pub timestamp: String,
    pub ride_name: String,
    pub wait_time: String,
    pub availability: String,
}

impl RawRow {
    pub fn new(
        timestamp: &str,
        ride_name: &str,
        wait_time: impl ToString,
        availability: impl ToString,
    ) -> Self {
        Self {
            timestamp: timestamp.to_string(),
            ride_name: ride_name.to_string(),
            wait_time: wait_time.to_string(),
            availability: availability.to_string(),
        }
    }
}

/// Positions of the required columns within the header row.
struct ColumnMap {
    timestamp: usize,
    ride_name: usize,
    wait_time: usize,
    availability: usize,
}

impl ColumnMap {
    fn from_headers(headers: &StringRecord) -> Result<Self, DecodeError> {
        let normalized: Vec<String> = headers.iter().map(|h| h.trim().to_lowercase()).collect();

        let mut positions = [0usize; 4];
        for (slot, required) in positions.iter_mut().zip(REQUIRED_COLUMNS) {
            let wanted = required.trim().to_lowercase();
            *slot = normalized
                .iter()
                .position(|h| *h == wanted)
                .ok_or_else(|| DecodeError::Validation {
                    column: required.to_string(),
                })?;
        }

        let [timestamp, ride_name, wait_time, availability] = positions;
        Ok(Self {
            timestamp,
            ride_name,
            wait_time,
            availability,
        })
    }

    fn row(&self, record: &StringRecord) -> RawRow {
        let cell = |i: usize| record.get(i).unwrap_or_default().to_string();
        RawRow {
            timestamp: cell(self.timestamp),
            ride_name: cell(self.ride_name),
            wait_time: cell(self.wait_time),
            availability: cell(self.availability),
        }
    }
}

/// Picks the delimiter that occurs most often in the header line, falling
/// back to a comma.
fn detect_delimiter(text: &str) -> u8 {
    let header = text.lines().next().unwrap_or_default();
    CANDIDATE_DELIMITERS
        .iter()
        .map(|&d| (d, header.bytes().filter(|&b| b == d).count()))
        .filter(|&(_, count)| count > 0)
        .max_by_key(|&(_, count)| count)
        .map(|(d, _)| d)
        .unwrap_or(b',')
}

/// Parses delimited text with a header row into [`RawRow`] records.
///
/// # Errors
///
/// Returns [`DecodeError::Validation`] naming the first required column the
/// header lacks, or [`DecodeError::Parse`] if the reader fails outright.
/// Ragged rows are never an error: cells missing from short rows read as
/// empty and cells beyond the header are ignored.
pub fn parse_text(text: &str) -> Result<Vec<RawRow>, DecodeError> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let delimiter = detect_delimiter(text);

    let mut rdr = ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers = rdr
        .headers()
        .map_err(|e| DecodeError::Parse(e.to_string()))?
        .clone();
    let columns = ColumnMap::from_headers(&headers)?;

    let mut rows = Vec::new();
    for result in rdr.records() {
        let record = result.map_err(|e| DecodeError::Parse(e.to_string()))?;
        rows.push(columns.row(&record));
    }

    let delimiter = (delimiter as char).escape_default().to_string();
    debug!(rows = rows.len(), %delimiter, "Parsed delimited text");
    Ok(rows)
}

/// Decompresses a gzip stream and parses the contained text.
///
/// # Errors
///
/// Returns [`DecodeError::Decompression`] if the bytes are not gzip,
/// [`DecodeError::Parse`] if the payload is not UTF-8, and otherwise whatever
/// [`parse_text`] reports.
pub fn parse_compressed(bytes: &[u8]) -> Result<Vec<RawRow>, DecodeError> {
    let mut decoder = MultiGzDecoder::new(bytes);
    let mut buf = Vec::new();
    decoder
        .read_to_end(&mut buf)
        .map_err(DecodeError::Decompression)?;

    debug!(
        compressed = bytes.len(),
        decompressed = buf.len(),
        "Decompressed gzip payload"
    );

    let text = String::from_utf8(buf)
        .map_err(|e| DecodeError::Parse(format!("decompressed payload is not UTF-8: {e}")))?;
    parse_text(&text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::Compression;
    use flate2::write::GzEncoder;
    use std::io::Write;

    const SAMPLE: &str = "timestamp,ride_name,wait_time,availability\n\
        2024-01-01T10:15:00,Shambhala,10,true\n\
        2024-01-01T10:45:00,Dragon Khan,25,false\n";

    fn gzip(text: &[u8]) -> Vec<u8> {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(text).unwrap();
        encoder.finish().unwrap()
    }

    #[test]
    fn test_parse_text_reads_rows() {
        let rows = parse_text(SAMPLE).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(
            rows[0],
            RawRow::new("2024-01-01T10:15:00", "Shambhala", 10, true)
        );
        assert_eq!(rows[1].ride_name, "Dragon Khan");
        assert_eq!(rows[1].availability, "false");
    }

    #[test]
    fn test_missing_availability_column() {
        let err = parse_text("timestamp,ride_name,wait_time\n2024-01-01T10:00:00,A,5\n").unwrap_err();
        assert_eq!(err.missing_column(), Some("availability"));
    }

    #[test]
    fn test_first_missing_column_is_reported() {
        let err = parse_text("foo,bar\n1,2\n").unwrap_err();
        assert_eq!(err.missing_column(), Some("timestamp"));
    }

    #[test]
    fn test_empty_text_fails_validation() {
        let err = parse_text("").unwrap_err();
        assert!(matches!(err, DecodeError::Validation { .. }));
    }

    #[test]
    fn test_header_match_ignores_case_and_whitespace() {
        let text = " Timestamp , RIDE_NAME,Wait_Time ,Availability\n2024-01-01T09:00:00,A,7,1\n";
        let rows = parse_text(text).unwrap();
        assert_eq!(rows, vec![RawRow::new("2024-01-01T09:00:00", "A", 7, 1)]);
    }

    #[test]
    fn test_columns_in_any_order_with_extras() {
        let text = "availability,extra,wait_time,ride_name,timestamp\ntrue,x,12,B,2024-01-01T11:00:00\n";
        let rows = parse_text(text).unwrap();
        assert_eq!(rows, vec![RawRow::new("2024-01-01T11:00:00", "B", 12, true)]);
    }

    #[test]
    fn test_short_rows_keep_empty_cells() {
        let text = "timestamp,ride_name,wait_time,availability\n2024-01-01T11:00:00,B\n";
        let rows = parse_text(text).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].wait_time, "");
        assert_eq!(rows[0].availability, "");
    }

    #[test]
    fn test_ragged_rows_are_all_kept() {
        let text = "timestamp,ride_name,wait_time,availability\n\
            2024-01-01T11:00:00,B\n\
            2024-01-01T12:00:00,C,4,true,extra,cells\n\
            2024-01-01T13:00:00,D,6,false\n";
        let rows = parse_text(text).unwrap();
        assert_eq!(
            rows,
            vec![
                RawRow::new("2024-01-01T11:00:00", "B", "", ""),
                RawRow::new("2024-01-01T12:00:00", "C", 4, true),
                RawRow::new("2024-01-01T13:00:00", "D", 6, false),
            ]
        );
    }

    #[test]
    fn test_empty_lines_are_skipped() {
        let text = "timestamp,ride_name,wait_time,availability\n\n2024-01-01T11:00:00,B,3,true\n\n";
        assert_eq!(parse_text(text).unwrap().len(), 1);
    }

    #[test]
    fn test_semicolon_delimiter_detected() {
        let text = "timestamp;ride_name;wait_time;availability\n2024-01-01T11:00:00;B;3;true\n";
        let rows = parse_text(text).unwrap();
        assert_eq!(rows, vec![RawRow::new("2024-01-01T11:00:00", "B", 3, true)]);
    }

    #[test]
    fn test_quoted_fields_with_commas() {
        let text = "timestamp,ride_name,wait_time,availability\n2024-01-01T11:00:00,\"El Diablo, Tren\",3,true\n";
        let rows = parse_text(text).unwrap();
        assert_eq!(rows[0].ride_name, "El Diablo, Tren");
    }

    #[test]
    fn test_byte_order_mark_is_ignored() {
        let text = format!("\u{feff}{SAMPLE}");
        assert_eq!(parse_text(&text).unwrap().len(), 2);
    }

    #[test]
    fn test_parse_compressed_matches_plain() {
        let compressed = gzip(SAMPLE.as_bytes());
        assert_eq!(
            parse_compressed(&compressed).unwrap(),
            parse_text(SAMPLE).unwrap()
        );
    }

    #[test]
    fn test_parse_compressed_rejects_plain_bytes() {
        let err = parse_compressed(SAMPLE.as_bytes()).unwrap_err();
        assert!(matches!(err, DecodeError::Decompression(_)));
    }

    #[test]
    fn test_parse_compressed_rejects_non_utf8_payload() {
        let compressed = gzip(&[0xff, 0xfe, 0xfd]);
        let err = parse_compressed(&compressed).unwrap_err();
        assert!(matches!(err, DecodeError::Parse(_)));
    }

    #[test]
    fn test_parse_compressed_validates_columns() {
        let compressed = gzip(b"timestamp,ride_name\n2024-01-01T10:00:00,A\n");
        let err = parse_compressed(&compressed).unwrap_err();
        assert_eq!(err.missing_column(), Some("wait_time"));
    }
}
