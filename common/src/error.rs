//! Error types
//!
//! Only pattern-table construction can fail. Classification itself is total.

use thiserror::Error;

/// Shared error type
#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid pattern `{label}`: {source}")]
    Pattern {
        label: String,
        #[source]
        source: regex::Error,
    },

    #[error("invalid pattern table: {0}")]
    InvalidTable(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result alias
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_pattern() {
        let source = regex::Regex::new("(unclosed").unwrap_err();
        let error = Error::Pattern {
            label: "owner financing".to_string(),
            source,
        };
        let display = format!("{}", error);
        assert!(display.starts_with("invalid pattern `owner financing`"));
    }

    #[test]
    fn test_error_display_invalid_table() {
        let error = Error::InvalidTable("unknown primary set `missing`".to_string());
        assert_eq!(
            format!("{}", error),
            "invalid pattern table: unknown primary set `missing`"
        );
    }

    #[test]
    fn test_error_display_io() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let error = Error::Io(io_error);
        let display = format!("{}", error);
        assert!(display.contains("IO error"));
        assert!(display.contains("file not found"));
    }

    #[test]
    fn test_error_from_json() {
        let json_error = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let error: Error = json_error.into();
        assert!(matches!(error, Error::Json(_)));
    }

    #[test]
    fn test_pattern_error_exposes_source() {
        use std::error::Error as _;

        let source = regex::Regex::new("[z-a]").unwrap_err();
        let error = Error::Pattern {
            label: "broken".to_string(),
            source,
        };
        assert!(error.source().is_some());
    }
}
