//! Error types for label and catalog file operations.

use thiserror::Error;

/// Errors that can occur while reading or writing label and catalog files.
#[derive(Error, Debug)]
pub enum FormatError {
    /// I/O error during file operations
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid file structure or content
    #[error("Invalid format: {message}")]
    InvalidFormat {
        /// Description of the format error
        message: String,
    },

    /// Wrong number of whitespace-separated fields on a label line
    #[error("Expected {expected} fields, found {found}")]
    FieldCount {
        /// Human-readable description of the accepted counts
        expected: &'static str,
        /// Number of fields on the line
        found: usize,
    },

    /// Invalid coordinate values
    #[error("Invalid coordinates: {message}")]
    InvalidCoordinates {
        /// Description of the coordinate error
        message: String,
    },
}

impl FormatError {
    /// Create an invalid format error with a message.
    pub fn invalid_format(message: impl Into<String>) -> Self {
        Self::InvalidFormat {
            message: message.into(),
        }
    }

    /// Create an invalid coordinates error.
    pub fn invalid_coordinates(message: impl Into<String>) -> Self {
        Self::InvalidCoordinates {
            message: message.into(),
        }
    }
}
