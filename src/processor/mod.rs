//! Main processing engine with modular architecture.
//!
//! Orchestrates the complete NEM12 workflow using specialized modules for
//! line streaming, register disambiguation, SQL rendering and summary
//! generation.

pub mod registers;
pub mod sql;
pub mod streaming;
pub mod summary;

#[cfg(test)]
pub mod tests;

use self::registers::{add_register_suffixes, analyze_duplicate_groups, sort_by_nmi};
use self::sql::SqlGenerator;
use self::streaming::stream_lines;
use self::summary::generate_summary;

use crate::config::ProcessorConfig;
use crate::error::{Nem12Error, Result};
use crate::models::{ParseResult, ProcessingResult};
use crate::parser::{Nem12Parser, NemParser};
use crate::validator::{FileValidator, Nem12FileValidator};

use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::time::Instant;
use tokio::fs::File;
use tokio::io::{AsyncBufRead, BufReader};
use tracing::{debug, info, warn};

/// Pipeline from raw NEM12 content to SQL statements and a summary
pub struct Nem12Processor {
    parser: Box<dyn NemParser + Send>,
    validator: Box<dyn FileValidator + Send + Sync>,
    sql_generator: SqlGenerator,
    config: ProcessorConfig,
}

impl Nem12Processor {
    /// Create a processor with the NEM12 parser and validator
    pub fn new(config: ProcessorConfig) -> Self {
        let validator = Nem12FileValidator::new(config.max_file_size);
        Self::with_components(config, Box::new(Nem12Parser::new()), Box::new(validator))
    }

    /// Create a processor with substitute parser and validator implementations
    pub fn with_components(
        config: ProcessorConfig,
        parser: Box<dyn NemParser + Send>,
        validator: Box<dyn FileValidator + Send + Sync>,
    ) -> Self {
        Self {
            parser,
            validator,
            sql_generator: SqlGenerator::new(config.sql.clone()),
            config,
        }
    }

    pub fn config(&self) -> &ProcessorConfig {
        &self.config
    }

    /// Run the validator on its own
    pub fn validate_file(&self, path: Option<&Path>) -> Result<()> {
        self.validator.validate(path)
    }

    /// Validate, stream and process one file
    ///
    /// Path checks run before the file is opened and the size check runs on
    /// the open handle. Validation and open failures abort the call. Malformed lines only add
    /// to the result's error list.
    pub async fn process_file(&mut self, path: Option<&Path>) -> Result<ProcessingResult> {
        let start_time = Instant::now();

        self.validate_file(path).map_err(wrap_file_error)?;
        let Some(path) = path else {
            return Err(wrap_file_error(Nem12Error::NoFileProvided));
        };

        info!("Processing NEM12 file {}", path.display());
        let file = File::open(path).await.map_err(|e| wrap_file_error(e.into()))?;
        let size = file
            .metadata()
            .await
            .map_err(|e| wrap_file_error(e.into()))?
            .len();
        self.validator.validate_size(size).map_err(wrap_file_error)?;

        self.process_reader_from(BufReader::new(file), start_time).await
    }

    /// Process NEM12 content from any buffered async reader
    pub async fn process_reader<R>(&mut self, reader: R) -> Result<ProcessingResult>
    where
        R: AsyncBufRead + Unpin,
    {
        self.process_reader_from(reader, Instant::now()).await
    }

    /// Process NEM12 content already held in memory
    pub fn process_content(&mut self, content: &str) -> ProcessingResult {
        let start_time = Instant::now();
        let parsed = self.parser.parse_content(content);
        self.build_result(parsed, start_time)
    }

    async fn process_reader_from<R>(&mut self, reader: R, start_time: Instant) -> Result<ProcessingResult>
    where
        R: AsyncBufRead + Unpin,
    {
        // Parser state from a previous file must never leak into this one
        self.parser.reset();

        let progress_bar = self.config.show_progress.then(create_spinner);
        let parsed = stream_lines(reader, self.parser.as_mut(), progress_bar.as_ref())
            .await
            .map_err(wrap_file_error)?;

        if let Some(pb) = progress_bar {
            pb.finish_and_clear();
        }

        Ok(self.build_result(parsed, start_time))
    }

    /// Dedup, order, render and summarise parsed readings
    fn build_result(&self, parsed: ParseResult, start_time: Instant) -> ProcessingResult {
        let ParseResult { readings, errors } = parsed;

        let (total_groups, duplicate_groups, total_duplicates) = analyze_duplicate_groups(&readings);
        debug!(
            "Duplicate analysis: {} keys, {} colliding groups, {} extra readings",
            total_groups, duplicate_groups, total_duplicates
        );

        let registers = add_register_suffixes(&readings);
        let mut processed = registers.processed_readings;
        sort_by_nmi(&mut processed);

        let sql_statements = self.sql_generator.generate_inserts(&processed);
        let parameterized_statements = self
            .config
            .sql
            .parameterized
            .then(|| self.sql_generator.generate_parameterized(&processed));
        let summary = generate_summary(
            &readings,
            &processed,
            registers.duplicates_found,
            registers.register_stats,
            start_time,
        );

        if !errors.is_empty() {
            warn!("{} lines could not be parsed", errors.len());
        }
        info!(
            "Processed {} readings for {} NMIs ({} duplicates) in {}ms",
            summary.unique_records,
            summary.nmis.len(),
            summary.duplicates_found,
            summary.processing_time
        );

        ProcessingResult {
            sql_statements,
            parameterized_statements,
            summary,
            errors,
        }
    }
}

impl Default for Nem12Processor {
    fn default() -> Self {
        Self::new(ProcessorConfig::default())
    }
}

impl std::fmt::Debug for Nem12Processor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Nem12Processor")
            .field("sql_generator", &self.sql_generator)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// File-level failures surface with a common prefix
fn wrap_file_error(error: Nem12Error) -> Nem12Error {
    match error {
        Nem12Error::ProcessingFailed { .. } => error,
        other => Nem12Error::ProcessingFailed {
            source: Box::new(other),
        },
    }
}

fn create_spinner() -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} [{elapsed_precise}] {msg}") {
        pb.set_style(style);
    }
    pb.set_message("Parsing NEM12 records");
    pb
}
