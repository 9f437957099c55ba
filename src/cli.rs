//! Command-line interface components.

use crate::config::ProcessorConfig;
use crate::constants::{CSV_EXTENSION, JSON_EXTENSION, SQL_EXTENSION};
use crate::models::ProcessingResult;
use crate::processor::Nem12Processor;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use colored::*;
use indicatif::HumanDuration;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};
use walkdir::WalkDir;

/// Line errors listed per file before the report is truncated
const MAX_REPORTED_ERRORS: usize = 10;

const BYTES_PER_MB: u64 = 1024 * 1024;

#[derive(Parser, Debug)]
#[command(name = "nem12")]
#[command(about = "Convert NEM12 interval meter data files to SQL INSERT statements")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Args {
    /// NEM12 CSV files, or directories searched recursively for *.csv
    #[arg(value_name = "INPUT", required = true)]
    pub inputs: Vec<PathBuf>,

    /// Directory for generated files (defaults to alongside each input)
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Add a generated UUID id column to every INSERT
    #[arg(long)]
    pub with_ids: bool,

    /// Double single quotes inside meter ids
    #[arg(long)]
    pub escape_quotes: bool,

    /// Target table name
    #[arg(long, value_name = "NAME")]
    pub table: Option<String>,

    /// Also write the full processing result as JSON
    #[arg(long)]
    pub json: bool,

    /// Add `$n` placeholder statements and their values to the JSON result
    #[arg(long)]
    pub parameterized: bool,

    /// Largest accepted input file in megabytes
    #[arg(long, value_name = "MB")]
    pub max_file_size_mb: Option<u64>,

    /// JSON configuration file; flags override its values
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase logging verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Only log errors and skip the console report
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

impl Args {
    pub fn get_log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else {
            match self.verbose {
                0 => "warn",
                1 => "info",
                2 => "debug",
                _ => "trace",
            }
        }
    }

    /// Spinners are only shown when the report is
    pub fn show_progress(&self) -> bool {
        !self.quiet
    }

    /// Load the configuration file, if any, then apply flag overrides
    pub fn build_config(&self) -> Result<ProcessorConfig> {
        let mut config = match &self.config {
            Some(path) => ProcessorConfig::from_file(path)
                .with_context(|| format!("Failed to load config file {}", path.display()))?,
            None => ProcessorConfig::default(),
        };

        if let Some(table) = &self.table {
            config = config.with_table_name(table.as_str());
        }
        if self.with_ids {
            config = config.with_surrogate_id();
        }
        if self.escape_quotes {
            config = config.with_escaped_quotes();
        }
        if self.parameterized {
            config = config.with_parameterized();
        }
        if let Some(mb) = self.max_file_size_mb {
            config = config.with_max_file_size(mb.saturating_mul(BYTES_PER_MB));
        }
        if self.show_progress() {
            config = config.with_progress();
        }

        config.validate()?;
        Ok(config)
    }

    /// Where the SQL for `input` is written
    pub fn sql_output_path(&self, input: &InputFile) -> PathBuf {
        self.output_path(input, SQL_EXTENSION)
    }

    /// Where the JSON result for `input` is written
    pub fn json_output_path(&self, input: &InputFile) -> PathBuf {
        self.output_path(input, JSON_EXTENSION)
    }

    /// Under `--output-dir` the input's layout below its walk root is kept
    fn output_path(&self, input: &InputFile, extension: &str) -> PathBuf {
        match &self.output_dir {
            Some(dir) => dir.join(&input.relative).with_extension(extension),
            None => input.path.with_extension(extension),
        }
    }
}

/// A file to process and its path relative to the argument it came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputFile {
    pub path: PathBuf,
    /// File name for explicit files, path below the directory for walked ones
    pub relative: PathBuf,
}

impl InputFile {
    /// A file named directly on the command line
    pub fn explicit(path: &Path) -> Self {
        let relative = path
            .file_name()
            .map(PathBuf::from)
            .unwrap_or_else(|| path.to_path_buf());
        Self {
            path: path.to_path_buf(),
            relative,
        }
    }

    /// A file found while walking `root`
    pub fn walked(root: &Path, path: PathBuf) -> Self {
        match path.strip_prefix(root) {
            Ok(relative) => Self {
                relative: relative.to_path_buf(),
                path,
            },
            Err(_) => Self::explicit(&path),
        }
    }
}

/// Outcome of a batch run
#[derive(Debug, Clone, Default)]
pub struct RunStats {
    pub files_processed: usize,
    pub files_failed: usize,
    pub statements_written: usize,
    pub line_errors: usize,
    pub processing_time: Duration,
}

impl RunStats {
    pub fn is_success(&self) -> bool {
        self.files_failed == 0
    }
}

/// Set up structured logging based on CLI arguments
pub fn setup_logging(args: &Args) {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let log_level = args.get_log_level();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("nem12_processor={}", log_level)));

    if args.quiet {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_timer(fmt::time::uptime())
                    .with_writer(std::io::stderr),
            )
            .init();
    }

    debug!("Logging initialized at level: {}", log_level);
}

/// Expand directories into the CSV files beneath them
///
/// Plain file arguments are passed through untouched so the validator can
/// report on them.
pub fn collect_input_files(inputs: &[PathBuf]) -> Result<Vec<InputFile>> {
    let mut files = Vec::new();

    for input in inputs {
        if !input.is_dir() {
            files.push(InputFile::explicit(input));
            continue;
        }

        let before = files.len();
        for entry in WalkDir::new(input).sort_by_file_name() {
            let entry = entry.with_context(|| format!("Failed to walk {}", input.display()))?;
            if entry.file_type().is_file() && has_csv_extension(entry.path()) {
                files.push(InputFile::walked(input, entry.into_path()));
            }
        }

        if files.len() == before {
            warn!("No CSV files found under {}", input.display());
        }
    }

    Ok(files)
}

fn has_csv_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(CSV_EXTENSION))
}

/// Process every input file in turn
///
/// A failing file is reported and counted; the remaining files still run.
pub async fn run(args: &Args) -> Result<RunStats> {
    let start_time = Instant::now();

    info!("Starting NEM12 processor");
    debug!("Command line arguments: {:?}", args);

    let config = args.build_config()?;
    debug!("Effective configuration: {:?}", config);

    let files = collect_input_files(&args.inputs)?;
    if files.is_empty() {
        anyhow::bail!("No NEM12 CSV files found in the given inputs");
    }

    if let Some(dir) = &args.output_dir {
        tokio::fs::create_dir_all(dir)
            .await
            .with_context(|| format!("Failed to create output directory {}", dir.display()))?;
    }

    let mut processor = Nem12Processor::new(config);
    let mut stats = RunStats::default();
    let mut claimed_outputs = HashSet::new();

    for file in &files {
        match process_one(args, &mut processor, file, &mut claimed_outputs).await {
            Ok(result) => {
                stats.files_processed += 1;
                stats.statements_written += result.sql_statements.len();
                stats.line_errors += result.errors.len();
            }
            Err(e) => {
                error!("{}: {:#}", file.path.display(), e);
                if !args.quiet {
                    eprintln!("{} {}: {:#}", "✗".red().bold(), file.path.display(), e);
                }
                stats.files_failed += 1;
            }
        }
    }

    stats.processing_time = start_time.elapsed();
    if !args.quiet {
        print_run_report(&stats);
    }

    Ok(stats)
}

async fn process_one(
    args: &Args,
    processor: &mut Nem12Processor,
    file: &InputFile,
    claimed_outputs: &mut HashSet<PathBuf>,
) -> Result<ProcessingResult> {
    let sql_path = args.sql_output_path(file);
    if !claimed_outputs.insert(sql_path.clone()) {
        anyhow::bail!(
            "Output {} was already written for another input",
            sql_path.display()
        );
    }

    let result = processor.process_file(Some(&file.path)).await?;

    if let Some(parent) = sql_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }
    tokio::fs::write(&sql_path, result.sql_script())
        .await
        .with_context(|| format!("Failed to write {}", sql_path.display()))?;
    info!(
        "Wrote {} statements to {}",
        result.sql_statements.len(),
        sql_path.display()
    );

    // Placeholder statements only reach disk through the JSON result
    if args.json || processor.config().sql.parameterized {
        let json_path = args.json_output_path(file);
        let json = serde_json::to_string_pretty(&result)?;
        tokio::fs::write(&json_path, json)
            .await
            .with_context(|| format!("Failed to write {}", json_path.display()))?;
    }

    if !args.quiet {
        print_file_report(&file.path, &sql_path, &result);
    }

    Ok(result)
}

fn print_file_report(input: &Path, sql_path: &Path, result: &ProcessingResult) {
    let summary = &result.summary;

    println!(
        "{} {} -> {}",
        "✓".green().bold(),
        input.display().to_string().bright_cyan(),
        sql_path.display()
    );
    println!(
        "   Records: {} read, {} written, {} duplicates",
        summary.total_records,
        summary.unique_records,
        summary.duplicates_found.to_string().bright_yellow()
    );

    if !summary.register_stats.is_empty() {
        let registers: Vec<String> = summary
            .register_stats
            .iter()
            .map(|(register, count)| format!("{}={}", register, count))
            .collect();
        println!("   Registers: {}", registers.join(", "));
    }

    if !summary.nmis.is_empty() {
        println!("   NMIs: {}", summary.nmis.join(", "));
        println!(
            "   Date range: {} to {}",
            summary.date_range.start, summary.date_range.end
        );
    }
    println!("   Time: {} ms", summary.processing_time);

    if result.has_errors() {
        println!(
            "   {}",
            format!("{} lines rejected:", result.errors.len()).yellow()
        );
        for message in result.errors.iter().take(MAX_REPORTED_ERRORS) {
            println!("     {}", message.bright_black());
        }
        if result.errors.len() > MAX_REPORTED_ERRORS {
            println!(
                "     ... and {} more",
                result.errors.len() - MAX_REPORTED_ERRORS
            );
        }
    }
}

fn print_run_report(stats: &RunStats) {
    println!();
    let headline = format!(
        "Processed {} file(s), {} statements in {}",
        stats.files_processed,
        stats.statements_written,
        HumanDuration(stats.processing_time)
    );

    if stats.is_success() {
        println!("{}", headline.green().bold());
    } else {
        println!("{}", headline.yellow().bold());
        println!(
            "{}",
            format!("{} file(s) failed", stats.files_failed).red().bold()
        );
    }

    if stats.line_errors > 0 {
        println!("{} line(s) rejected in total", stats.line_errors);
    }
}
