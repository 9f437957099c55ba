//! Input file validation applied before any parsing begins.
//!
//! Validators reject the whole call; nothing here inspects file content.

use crate::constants::{CSV_EXTENSION, DEFAULT_MAX_FILE_SIZE};
use crate::error::{Nem12Error, Result};
use std::path::Path;
use tracing::debug;

/// Capability interface for upstream file checks
pub trait FileValidator {
    /// Checks that need only the path
    fn validate(&self, path: Option<&Path>) -> Result<()>;

    /// Checks on the opened file's size in bytes
    fn validate_size(&self, _size: u64) -> Result<()> {
        Ok(())
    }
}

/// Accepts any present file with a `.csv` extension
#[derive(Debug, Clone, Default)]
pub struct CsvFileValidator;

impl FileValidator for CsvFileValidator {
    fn validate(&self, path: Option<&Path>) -> Result<()> {
        let path = path.ok_or(Nem12Error::NoFileProvided)?;

        let is_csv = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case(CSV_EXTENSION));

        if !is_csv {
            return Err(Nem12Error::NotCsvFile {
                path: path.to_path_buf(),
            });
        }

        Ok(())
    }
}

/// CSV checks plus an upper bound on file size
#[derive(Debug, Clone)]
pub struct Nem12FileValidator {
    max_file_size: u64,
}

impl Nem12FileValidator {
    pub fn new(max_file_size: u64) -> Self {
        Self { max_file_size }
    }

    pub fn max_file_size(&self) -> u64 {
        self.max_file_size
    }
}

impl Default for Nem12FileValidator {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_FILE_SIZE)
    }
}

impl FileValidator for Nem12FileValidator {
    fn validate(&self, path: Option<&Path>) -> Result<()> {
        CsvFileValidator.validate(path)
    }

    fn validate_size(&self, size: u64) -> Result<()> {
        debug!("Validating file size {} bytes (limit {})", size, self.max_file_size);

        if size > self.max_file_size {
            return Err(Nem12Error::FileTooLarge {
                size,
                limit: self.max_file_size,
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file() {
        let err = CsvFileValidator.validate(None).unwrap_err();
        assert_eq!(err.to_string(), "No file provided");

        let err = Nem12FileValidator::default().validate(None).unwrap_err();
        assert!(matches!(err, Nem12Error::NoFileProvided));
    }

    #[test]
    fn test_extension_check() {
        let validator = CsvFileValidator;
        assert!(validator.validate(Some(Path::new("meter.csv"))).is_ok());
        assert!(validator.validate(Some(Path::new("METER.CSV"))).is_ok());

        for name in ["meter.txt", "meter", "meter.csv.bak", ".csv"] {
            let err = validator.validate(Some(Path::new(name))).unwrap_err();
            assert_eq!(err.to_string(), "File must be a CSV file", "name {}", name);
        }
    }

    #[test]
    fn test_size_limit() {
        let validator = Nem12FileValidator::new(1024);

        assert!(validator.validate_size(10).is_ok());
        assert!(validator.validate_size(1024).is_ok());
        match validator.validate_size(2048) {
            Err(Nem12Error::FileTooLarge { size, limit }) => {
                assert_eq!(size, 2048);
                assert_eq!(limit, 1024);
            }
            other => panic!("Expected FileTooLarge, got {:?}", other),
        }
    }

    #[test]
    fn test_path_checks_do_not_touch_the_filesystem() {
        let validator = Nem12FileValidator::default();
        assert!(validator.validate(Some(Path::new("/nonexistent/dir/meter.csv"))).is_ok());
        assert!(validator.validate(Some(Path::new("/nonexistent/dir/meter.txt"))).is_err());
    }

    #[test]
    fn test_csv_validator_accepts_any_size() {
        assert!(CsvFileValidator.validate_size(u64::MAX).is_ok());
    }

    #[test]
    fn test_default_limit_is_ten_megabytes() {
        assert_eq!(Nem12FileValidator::default().max_file_size(), 10 * 1024 * 1024);
    }
}
