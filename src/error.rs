//! Error types for the BR Code codec.

use thiserror::Error;

/// Result type alias for codec operations
pub type Result<T> = std::result::Result<T, PixError>;

/// Errors that can occur while building, verifying or batch-encoding BR Codes.
#[derive(Error, Debug)]
pub enum PixError {
    /// Amount is zero, negative, non-finite or finer than cents
    #[error("Invalid amount '{0}': must be a positive value with at most two decimal places")]
    InvalidAmount(String),

    /// A field exceeds the length the BR Code format allows for it
    #[error("{field} is {len} characters long, maximum is {max}")]
    FieldTooLong {
        field: &'static str,
        len: usize,
        max: usize,
    },

    /// PIX key matches none of the email/CPF/CNPJ/phone/random patterns
    #[error("Unsupported PIX key type: '{0}'")]
    UnsupportedKeyType(String),

    /// Field is empty or carries characters outside printable ASCII
    #[error("{field} must be non-empty printable ASCII, got '{value}'")]
    InvalidCharacters { field: &'static str, value: String },

    /// BR Code text could not be parsed back into fields
    #[error("Malformed BR Code at position {position}: {message}")]
    Malformed { position: usize, message: String },

    /// Trailing CRC16 does not match the payload
    #[error("Checksum mismatch: expected {expected}, found {found}")]
    ChecksumMismatch { expected: String, found: String },

    /// Failed to open or read the input file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV parsing error
    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    /// Merchant configuration could not be loaded
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Invalid order record in a batch
    #[error("Invalid order at row {row}: {message}")]
    InvalidRecord { row: usize, message: String },

    /// Missing command or argument
    #[error("Missing argument. Usage: pix-brcode encode <orders.csv> | pix-brcode verify <brcode>")]
    MissingArgument,
}

impl PixError {
    pub(crate) fn malformed(position: usize, message: impl Into<String>) -> Self {
        PixError::Malformed {
            position,
            message: message.into(),
        }
    }
}
