//! Error types for the roster manager.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RosterError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A field on a stored line failed typed conversion.
    #[error("line {line}: invalid {field} value: '{value}'")]
    Format {
        line: u64,
        field: &'static str,
        value: String,
    },

    #[error("line {line}: CSV line does not contain enough values (found {found}, expected at least 7)")]
    MissingFields { line: u64, found: usize },

    /// The file failed to load, so overwriting it would drop the records
    /// that could not be read.
    #[error("refusing to overwrite {}: it could not be loaded at startup", path.display())]
    UnloadedOverwrite { path: PathBuf },

    /// The input source ran out while a prompt was waiting for a value.
    #[error("input closed")]
    InputClosed,

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl RosterError {
    pub fn format(line: u64, field: &'static str, value: impl Into<String>) -> Self {
        Self::Format {
            line,
            field,
            value: value.into(),
        }
    }

    /// True for failures caused by the file's contents rather than by I/O.
    pub fn is_parse_error(&self) -> bool {
        match self {
            Self::Csv(err) => !err.is_io_error(),
            Self::Format { .. } | Self::MissingFields { .. } => true,
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, RosterError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_error_names_field_and_value() {
        let err = RosterError::format(3, "ID", "abc");
        assert_eq!(err.to_string(), "line 3: invalid ID value: 'abc'");
        assert!(err.is_parse_error());
    }

    #[test]
    fn csv_io_error_is_not_a_parse_error() {
        let err: RosterError = csv::Error::from(std::io::Error::other("unreadable")).into();
        assert!(matches!(err, RosterError::Csv(_)));
        assert!(!err.is_parse_error());
    }

    #[test]
    fn io_error_is_not_a_parse_error() {
        let err: RosterError = std::io::Error::other("disk full").into();
        assert!(!err.is_parse_error());
    }
}
