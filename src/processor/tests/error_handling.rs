//! Error handling and recovery tests

use super::*;
use crate::config::ProcessorConfig;
use crate::error::{Nem12Error, Result};
use crate::parser::Nem12Parser;
use crate::processor::Nem12Processor;
use crate::validator::FileValidator;
use std::io::Cursor;
use std::path::Path;
use tokio::io::BufReader;

/// Accepts every path, present or not
struct PermissiveValidator;

impl FileValidator for PermissiveValidator {
    fn validate(&self, _path: Option<&Path>) -> Result<()> {
        Ok(())
    }
}

#[test]
fn test_interval_data_without_meter_context() {
    let content = format!("{}\n300,20050301,0.461,0.810\n{}", HEADER, FOOTER);

    let mut processor = Nem12Processor::default();
    let result = processor.process_content(&content);

    assert!(result.sql_statements.is_empty());
    assert_eq!(result.summary.total_records, 0);
    assert_eq!(result.errors.len(), 1);
    assert!(result.errors[0].contains("without"));
}

#[test]
fn test_invalid_consumption_keeps_interval_slots() {
    let content = format!(
        "{}\n{}\n300,20050301,0.461,INVALID,0.568\n{}",
        HEADER,
        meter_line("M1"),
        FOOTER
    );

    let mut processor = Nem12Processor::default();
    let result = processor.process_content(&content);

    assert!(result.errors.is_empty());
    assert_eq!(result.sql_statements.len(), 2);
    assert!(result.sql_statements[0].contains("'2005-03-01 00:00:00', 0.461"));
    assert!(result.sql_statements[1].contains("'2005-03-01 01:00:00', 0.568"));
}

#[test]
fn test_bad_lines_do_not_stop_processing() {
    let content = [
        "100,NEM11,200508081149,UNITEDDP,NEMMCO".to_string(),
        meter_line("M1"),
        "300,2005-03-01,1.0".to_string(),
        "300,20050230,1.0".to_string(),
        "750,unexpected".to_string(),
        day_line("20050301", 3, 1),
        FOOTER.to_string(),
    ]
    .join("\n");

    let mut processor = Nem12Processor::default();
    let result = processor.process_content(&content);

    assert_eq!(result.sql_statements.len(), 3);
    assert_eq!(result.errors.len(), 4);
    assert_eq!(
        result.errors[0],
        "Line 1: Invalid NEM12 format - expected NEM12 in header"
    );
    assert!(result.errors[1].starts_with("Line 3: "));
    assert!(result.errors[2].starts_with("Line 4: "));
    assert_eq!(result.errors[3], "Line 5: Unknown NEM12 record type: 750");
}

#[test]
fn test_empty_content() {
    let mut processor = Nem12Processor::default();
    let result = processor.process_content("\n\n  \n");

    assert!(result.sql_statements.is_empty());
    assert!(result.errors.is_empty());
    assert_eq!(result.summary.total_records, 0);
    assert!(result.summary.nmis.is_empty());
    assert!(result.summary.register_stats.is_empty());
    assert_eq!(result.summary.date_range.start, "");
    assert_eq!(result.summary.date_range.end, "");
}

#[test]
fn test_meter_context_does_not_leak_between_calls() {
    // First file never closes its meter block
    let first = format!("{}\n{}\n{}", HEADER, meter_line("M1"), day_line("20050301", 2, 1));
    let second = format!("{}\n{}\n{}", HEADER, day_line("20050302", 2, 1), FOOTER);

    let mut processor = Nem12Processor::default();
    assert_eq!(processor.process_content(&first).sql_statements.len(), 2);

    let result = processor.process_content(&second);
    assert!(result.sql_statements.is_empty());
    assert_eq!(result.errors.len(), 1);
    assert!(result.errors[0].contains("without NMI context"));
}

#[tokio::test]
async fn test_reader_resets_context_too() {
    let first = format!("{}\n{}", HEADER, meter_line("M1"));
    let second = day_line("20050302", 2, 1);

    let mut processor = Nem12Processor::default();
    processor.process_content(&first);

    let result = processor
        .process_reader(BufReader::new(Cursor::new(second)))
        .await
        .unwrap();
    assert!(result.sql_statements.is_empty());
    assert_eq!(result.errors.len(), 1);
}

#[tokio::test]
async fn test_missing_path_is_rejected() {
    let mut processor = Nem12Processor::default();
    let err = processor.process_file(None).await.unwrap_err();

    assert_eq!(err.to_string(), "Failed to process NEM file: No file provided");
    assert!(matches!(err.root_cause(), Nem12Error::NoFileProvided));
}

#[tokio::test]
async fn test_non_csv_is_rejected() {
    let (_temp_dir, path) = write_temp_file("meter.txt", HEADER);

    let mut processor = Nem12Processor::default();
    let err = processor.process_file(Some(&path)).await.unwrap_err();

    assert_eq!(
        err.to_string(),
        "Failed to process NEM file: File must be a CSV file"
    );
    assert!(matches!(err.root_cause(), Nem12Error::NotCsvFile { .. }));
}

#[tokio::test]
async fn test_oversized_file_is_rejected() {
    let content = nem12_file(&[("M1", vec![day_line("20050301", 48, 1)])]);
    let (_temp_dir, path) = write_temp_file("meter.csv", &content);

    let mut processor = Nem12Processor::new(ProcessorConfig::default().with_max_file_size(64));
    let err = processor.process_file(Some(&path)).await.unwrap_err();

    match err.root_cause() {
        Nem12Error::FileTooLarge { size, limit } => {
            assert_eq!(*limit, 64);
            assert_eq!(*size, content.len() as u64);
        }
        other => panic!("expected FileTooLarge, got {:?}", other),
    }
}

#[tokio::test]
async fn test_nonexistent_file_is_rejected() {
    let temp_dir = tempfile::TempDir::new().unwrap();
    let path = temp_dir.path().join("missing.csv");

    let mut processor = Nem12Processor::default();
    let err = processor.process_file(Some(&path)).await.unwrap_err();

    assert!(err.to_string().starts_with("Failed to process NEM file: "));
    assert!(matches!(err.root_cause(), Nem12Error::Io(_)));
}

#[tokio::test]
async fn test_substitute_validator() {
    let content = nem12_file(&[("M1", vec![day_line("20050301", 2, 1)])]);
    let (_temp_dir, path) = write_temp_file("meter.dat", &content);

    let mut processor = Nem12Processor::with_components(
        ProcessorConfig::default(),
        Box::new(Nem12Parser::new()),
        Box::new(PermissiveValidator),
    );
    let result = processor.process_file(Some(&path)).await.unwrap();
    assert_eq!(result.sql_statements.len(), 2);

    // Validation passes but there is still nothing to open
    let err = processor.process_file(None).await.unwrap_err();
    assert!(matches!(err.root_cause(), Nem12Error::NoFileProvided));
}

#[tokio::test]
async fn test_undecodable_bytes_do_not_abort_the_file() {
    let temp_dir = tempfile::TempDir::new().unwrap();
    let path = temp_dir.path().join("latin1.csv");

    let mut content = format!("{}\n{}\n{}\n", HEADER, meter_line("M1"), day_line("20050301", 2, 1))
        .into_bytes();
    content.extend_from_slice(b"999,caf\xe9\n");
    content.extend_from_slice(format!("{}\n{}", day_line("20050302", 2, 2), FOOTER).as_bytes());
    std::fs::write(&path, content).unwrap();

    let mut processor = Nem12Processor::default();
    let result = processor.process_file(Some(&path)).await.unwrap();

    assert_eq!(result.sql_statements.len(), 4);
    assert_eq!(result.errors.len(), 1);
    assert!(result.errors[0].starts_with("Line 4: "));
    assert_eq!(result.summary.date_range.end, "2005-03-02");
}

/// Accepts any path but nothing larger than `limit` bytes
struct SizeOnlyValidator {
    limit: u64,
}

impl FileValidator for SizeOnlyValidator {
    fn validate(&self, _path: Option<&Path>) -> Result<()> {
        Ok(())
    }

    fn validate_size(&self, size: u64) -> Result<()> {
        if size > self.limit {
            return Err(Nem12Error::FileTooLarge {
                size,
                limit: self.limit,
            });
        }
        Ok(())
    }
}

#[tokio::test]
async fn test_size_is_checked_on_the_opened_file() {
    let content = nem12_file(&[("M1", vec![day_line("20050301", 2, 1)])]);
    let (_temp_dir, path) = write_temp_file("meter.dat", &content);

    let mut processor = Nem12Processor::with_components(
        ProcessorConfig::default(),
        Box::new(Nem12Parser::new()),
        Box::new(SizeOnlyValidator { limit: 8 }),
    );
    let err = processor.process_file(Some(&path)).await.unwrap_err();
    assert!(matches!(err.root_cause(), Nem12Error::FileTooLarge { limit: 8, .. }));

    let mut processor = Nem12Processor::with_components(
        ProcessorConfig::default(),
        Box::new(Nem12Parser::new()),
        Box::new(SizeOnlyValidator {
            limit: content.len() as u64,
        }),
    );
    assert!(processor.process_file(Some(&path)).await.is_ok());
}
