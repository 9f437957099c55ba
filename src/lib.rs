//! NEM12 Processor Library
//!
//! A Rust library for converting Australian NEM12 interval meter data files
//! into SQL INSERT statements.
//!
//! This library provides tools for:
//! - Parsing NEM12 record streams with per-line error isolation
//! - Disambiguating readings that collide on meter and timestamp with
//!   `_R1`, `_R2`, ... register suffixes
//! - Ordering readings by NMI, register and time
//! - Rendering INSERT statements, optionally with surrogate UUID ids
//! - Summarising each file's records, registers, NMIs and date range

pub mod cli;
pub mod config;
pub mod constants;
pub mod dates;
pub mod error;
pub mod models;
pub mod parser;
pub mod processor;
pub mod validator;

// Re-export commonly used types
pub use config::{ProcessorConfig, SqlConfig};
pub use error::{Nem12Error, Result};
pub use models::{MeterReading, ParameterizedInsert, ProcessingResult, ProcessingSummary};
pub use parser::{Nem12Parser, NemParser};
pub use processor::Nem12Processor;
pub use validator::{CsvFileValidator, FileValidator, Nem12FileValidator};
