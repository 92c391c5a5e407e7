//! Error and diagnostic types.
//!
//! Reading a song file has two tiers of diagnostics:
//!
//! - [`ReadError`]: fatal, stops reading that file
//! - [`Warning`]: collected while reading continues
//!
//! A handful of oddities (unknown tags, unknown encoding names, medley beats
//! ignored in relative mode, empty `#YEAR`) are neither. They are only
//! logged through `tracing`.
//!
//! Library modules return these `thiserror` types; the CLI wraps them with
//! `anyhow` context.

use std::num::{ParseFloatError, ParseIntError};

use crate::encoding::DecodeError;

/// Result type for fatal read failures.
pub type Result<T> = std::result::Result<T, ReadError>;

/// A failure that aborts reading a song file.
#[derive(Debug, thiserror::Error)]
pub enum ReadError {
    /// Could not read the first bytes to look for a byte order mark
    #[error("error detecting byte order mark: {0}")]
    Bom(#[source] std::io::Error),

    /// Could not seek back to the start after the byte order mark check
    #[error("error rewinding input: {0}")]
    Rewind(#[source] std::io::Error),

    /// A tag value is not valid in the active encoding
    #[error("error decoding value of tag '{tag}': {source}")]
    Decode {
        tag: String,
        #[source]
        source: DecodeError,
    },

    /// Reading a line failed
    #[error("error reading line {line}: {source}")]
    Io {
        line: usize,
        #[source]
        source: std::io::Error,
    },

    /// A line exceeds the maximum supported length
    #[error("line {line} is longer than {limit} bytes")]
    LineTooLong { line: usize, limit: usize },
}

/// A recoverable problem found while reading the header.
#[derive(Debug, thiserror::Error)]
pub enum Warning {
    /// A known tag appeared more than once; the last value was kept
    #[error("duplicate tag '{tag}'")]
    DuplicateTag { tag: String },

    /// A known tag's value could not be converted; the field was left unchanged
    #[error("error adding tag '{tag}': {source}")]
    InvalidValue {
        tag: String,
        value: String,
        #[source]
        source: ValueError,
    },
}

impl Warning {
    /// Name of the tag this warning is about.
    pub fn tag(&self) -> &str {
        match self {
            Warning::DuplicateTag { tag } | Warning::InvalidValue { tag, .. } => tag,
        }
    }
}

/// Why a tag value could not be converted to a number.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValueError {
    #[error("invalid decimal '{input}': {source}")]
    Float {
        input: String,
        #[source]
        source: ParseFloatError,
    },

    #[error("decimal '{input}' out of range")]
    OutOfRange { input: String },

    #[error("invalid integer '{input}': {source}")]
    Int {
        input: String,
        #[source]
        source: ParseIntError,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_warning_display() {
        let warning = Warning::DuplicateTag {
            tag: "TITLE".to_string(),
        };
        assert_eq!(warning.to_string(), "duplicate tag 'TITLE'");
        assert_eq!(warning.tag(), "TITLE");
    }

    #[test]
    fn test_invalid_value_display() {
        let source = "1.5,6".parse::<f32>().unwrap_err();
        let warning = Warning::InvalidValue {
            tag: "GAP".to_string(),
            value: " 1,5,6".to_string(),
            source: ValueError::Float {
                input: "1.5,6".to_string(),
                source,
            },
        };
        let msg = warning.to_string();
        assert!(msg.starts_with("error adding tag 'GAP'"));
        assert!(msg.contains("1.5,6"));
        assert_eq!(warning.tag(), "GAP");
    }

    #[test]
    fn test_read_error_display() {
        let err = ReadError::LineTooLong {
            line: 3,
            limit: 65536,
        };
        assert_eq!(err.to_string(), "line 3 is longer than 65536 bytes");

        let io = std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "eof");
        assert!(ReadError::Bom(io).to_string().contains("byte order mark"));

        let utf8 = std::str::from_utf8(b"\xFF").unwrap_err();
        let err = ReadError::Decode {
            tag: "ARTIST".to_string(),
            source: DecodeError::from(utf8),
        };
        assert!(err.to_string().starts_with("error decoding value of tag 'ARTIST'"));
    }
}
