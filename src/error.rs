//! Error taxonomy for decoding uploaded ride observations.

/// Terminal failure of a single decode attempt.
///
/// Per-row anomalies (blank ride names, bad timestamps, non-numeric waits)
/// are never reported here; they are normalized or dropped during
/// aggregation.
#[derive(thiserror::Error, Debug)]
pub enum DecodeError {
    /// The header row lacks one of the required columns.
    #[error("missing required column: \"{column}\"")]
    Validation { column: String },
    /// The delimited text could not be read at all.
    #[error("malformed delimited text: {0}")]
    Parse(String),
    /// The bytes are not a valid gzip stream.
    #[error("input is not valid gzip: {0}")]
    Decompression(#[source] std::io::Error),
}

impl DecodeError {
    /// Name of the missing column for validation failures.
    pub fn missing_column(&self) -> Option<&str> {
        match self {
            DecodeError::Validation { column } => Some(column.as_str()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_message_names_column() {
        let err = DecodeError::Validation {
            column: "availability".to_string(),
        };
        assert_eq!(err.to_string(), "missing required column: \"availability\"");
        assert_eq!(err.missing_column(), Some("availability"));
    }

    #[test]
    fn test_missing_column_none_for_other_kinds() {
        let err = DecodeError::Parse("bad quote".to_string());
        assert_eq!(err.missing_column(), None);
    }
}
