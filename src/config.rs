//! Configuration management and validation.
//!
//! Provides configuration structures for SQL rendering and input limits.
//! Values can be loaded from a JSON file and then overridden from the
//! command line.

use crate::constants::{DEFAULT_MAX_FILE_SIZE, DEFAULT_TABLE_NAME};
use crate::error::{Nem12Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// SQL rendering options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SqlConfig {
    /// Target table for INSERT statements
    pub table_name: String,

    /// Prepend a generated UUID `id` column to every statement
    pub with_surrogate_id: bool,

    /// Double embedded single quotes in meter ids.
    ///
    /// Off by default so output matches the raw ids byte for byte. Meter ids
    /// are interpolated into SQL text, so untrusted files should enable this
    /// or use parameterized rendering.
    pub escape_quotes: bool,

    /// Also render `$n` placeholder statements with their bound values
    pub parameterized: bool,
}

impl Default for SqlConfig {
    fn default() -> Self {
        Self {
            table_name: DEFAULT_TABLE_NAME.to_string(),
            with_surrogate_id: false,
            escape_quotes: false,
            parameterized: false,
        }
    }
}

/// Top-level processor configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessorConfig {
    /// SQL output settings
    pub sql: SqlConfig,

    /// Largest accepted input file in bytes
    pub max_file_size: u64,

    /// Show a progress spinner while streaming lines
    pub show_progress: bool,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            sql: SqlConfig::default(),
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            show_progress: false,
        }
    }
}

impl ProcessorConfig {
    /// Load configuration from a JSON file; missing keys take defaults
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: ProcessorConfig = serde_json::from_str(&content)?;
        debug!("Loaded configuration from {}", path.display());
        config.validate()?;
        Ok(config)
    }

    /// Set the target table name
    pub fn with_table_name(mut self, table_name: impl Into<String>) -> Self {
        self.sql.table_name = table_name.into();
        self
    }

    /// Enable surrogate UUID ids
    pub fn with_surrogate_id(mut self) -> Self {
        self.sql.with_surrogate_id = true;
        self
    }

    /// Enable single-quote escaping of meter ids
    pub fn with_escaped_quotes(mut self) -> Self {
        self.sql.escape_quotes = true;
        self
    }

    /// Enable placeholder statements alongside the literal ones
    pub fn with_parameterized(mut self) -> Self {
        self.sql.parameterized = true;
        self
    }

    /// Set the maximum input file size in bytes
    pub fn with_max_file_size(mut self, max_file_size: u64) -> Self {
        self.max_file_size = max_file_size;
        self
    }

    /// Enable the streaming progress spinner
    pub fn with_progress(mut self) -> Self {
        self.show_progress = true;
        self
    }

    /// Check values that would produce unusable output
    pub fn validate(&self) -> Result<()> {
        let table = &self.sql.table_name;
        if table.is_empty() {
            return Err(Nem12Error::Configuration {
                message: "Table name cannot be empty".to_string(),
            });
        }

        let valid_identifier = table
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.');
        if !valid_identifier {
            return Err(Nem12Error::Configuration {
                message: format!(
                    "Table name '{}' may only contain letters, digits, '_' and '.'",
                    table
                ),
            });
        }

        if self.max_file_size == 0 {
            return Err(Nem12Error::Configuration {
                message: "Maximum file size must be greater than 0".to_string(),
            });
        }

        Ok(())
    }
}
