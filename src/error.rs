//! Error handling for NEM12 processing operations.
//!
//! Line-level variants describe why a single record was rejected and are
//! collected as diagnostics. File-level variants abort the whole call.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Nem12Error {
    #[error("Invalid NEM12 format - expected NEM12 in header")]
    InvalidFormat,

    #[error("Interval data found without NMI context")]
    MissingMeterContext,

    #[error("Invalid NEM12 {field} format '{value}' - expected YYYYMMDD")]
    InvalidDateFormat { field: &'static str, value: String },

    #[error("Invalid NEM12 date: {value}")]
    InvalidDate { value: String },

    #[error("Unknown NEM12 record type: {record_type}")]
    UnknownRecordType { record_type: String },

    #[error("No file provided")]
    NoFileProvided,

    #[error("File must be a CSV file")]
    NotCsvFile { path: PathBuf },

    #[error("File size must be less than {}MB", .limit / (1024 * 1024))]
    FileTooLarge { size: u64, limit: u64 },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Failed to process NEM file: {source}")]
    ProcessingFailed {
        #[source]
        source: Box<Nem12Error>,
    },

    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

impl Nem12Error {
    /// Re-label a date format error with the record field it came from
    pub fn for_field(self, field: &'static str) -> Self {
        match self {
            Nem12Error::InvalidDateFormat { value, .. } => {
                Nem12Error::InvalidDateFormat { field, value }
            }
            other => other,
        }
    }

    /// Root cause behind any file-level wrapping
    pub fn root_cause(&self) -> &Nem12Error {
        match self {
            Nem12Error::ProcessingFailed { source } => source.root_cause(),
            other => other,
        }
    }

    /// True for errors that only invalidate a single input line
    pub fn is_line_error(&self) -> bool {
        matches!(
            self,
            Nem12Error::InvalidFormat
                | Nem12Error::MissingMeterContext
                | Nem12Error::InvalidDateFormat { .. }
                | Nem12Error::InvalidDate { .. }
                | Nem12Error::UnknownRecordType { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, Nem12Error>;
