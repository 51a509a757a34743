//! Error types for SEG-Y operations

use thiserror::Error;

/// Main error type for SEG-Y operations
#[derive(Error, Debug)]
pub enum SegyError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Invalid trace header location: byte {0}")]
    InvalidHeaderLocation(usize),

    #[error("Invalid dimensions: {0}")]
    InvalidDimensions(String),

    #[error("Out of range: {0}")]
    OutOfRange(String),

    #[error("Invalid SEG-Y format: {0}")]
    InvalidFormat(String),

    #[error("Truncated file: expected at least {expected} bytes, found {actual}")]
    Truncated { expected: u64, actual: u64 },

    #[error("Unsupported data sample format code: {0}")]
    UnsupportedFormatCode(i64),

    #[error("Duplicate trace at inline {inline}, crossline {crossline}")]
    DuplicateTrace { inline: i32, crossline: i32 },

    #[error("Geometry has not been scanned")]
    NotScanned,

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Coarse error category, for callers that translate errors into another
/// error model (bindings, CLIs).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Configuration,
    Range,
    Format,
    Io,
}

impl SegyError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SegyError::Io(_) => ErrorKind::Io,
            SegyError::Configuration(_)
            | SegyError::InvalidHeaderLocation(_)
            | SegyError::InvalidDimensions(_)
            | SegyError::NotScanned
            | SegyError::Serialization(_) => ErrorKind::Configuration,
            SegyError::OutOfRange(_) => ErrorKind::Range,
            SegyError::InvalidFormat(_)
            | SegyError::Truncated { .. }
            | SegyError::UnsupportedFormatCode(_)
            | SegyError::DuplicateTrace { .. } => ErrorKind::Format,
        }
    }
}

/// Specialized Result type for SEG-Y operations
pub type Result<T> = std::result::Result<T, SegyError>;

impl From<bincode::Error> for SegyError {
    fn from(err: bincode::Error) -> Self {
        SegyError::Serialization(err.to_string())
    }
}

impl From<serde_json::Error> for SegyError {
    fn from(err: serde_json::Error) -> Self {
        SegyError::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        assert_eq!(SegyError::OutOfRange("x".into()).kind(), ErrorKind::Range);
        assert_eq!(
            SegyError::DuplicateTrace {
                inline: 1,
                crossline: 2
            }
            .kind(),
            ErrorKind::Format
        );
        assert_eq!(
            SegyError::InvalidHeaderLocation(239).kind(),
            ErrorKind::Configuration
        );
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        assert_eq!(SegyError::from(io).kind(), ErrorKind::Io);
    }

    #[test]
    fn test_error_messages() {
        let err = SegyError::Truncated {
            expected: 3600,
            actual: 12,
        };
        assert_eq!(
            err.to_string(),
            "Truncated file: expected at least 3600 bytes, found 12"
        );
    }
}
