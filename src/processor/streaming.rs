//! Line streaming for NEM12 content
//!
//! Feeds file content to a parser one line at a time. Blank lines are
//! skipped before numbering; every other line gets a 1-based number, and a
//! line the parser rejects becomes a `Line <n>: <message>` diagnostic while
//! parsing continues with the next line.

use crate::error::Result;
use crate::models::{MeterReading, ParseResult};
use crate::parser::{NemParser, format_line_error};

use indicatif::ProgressBar;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::debug;

/// How often the progress spinner is refreshed, in lines
const PROGRESS_UPDATE_INTERVAL: usize = 500;

/// Collects readings and line errors across one file
#[derive(Debug, Default)]
pub struct LineAccumulator {
    readings: Vec<MeterReading>,
    errors: Vec<String>,
    line_number: usize,
}

impl LineAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse one raw line, isolating any failure to that line
    pub fn feed(&mut self, raw_line: &str, parser: &mut dyn NemParser) {
        let line = raw_line.trim();
        if line.is_empty() {
            return;
        }

        self.line_number += 1;
        match parser.parse_line(line) {
            Ok(readings) => self.readings.extend(readings),
            Err(e) => {
                debug!("Line {} rejected: {}", self.line_number, e);
                self.errors.push(format_line_error(self.line_number, &e));
            }
        }
    }

    /// Number of non-blank lines seen so far
    pub fn lines_processed(&self) -> usize {
        self.line_number
    }

    pub fn reading_count(&self) -> usize {
        self.readings.len()
    }

    pub fn finish(self) -> ParseResult {
        ParseResult {
            readings: self.readings,
            errors: self.errors,
        }
    }
}

/// Stream lines from an async reader through the parser
///
/// Only read failures are returned as errors; rejected lines end up in the
/// result's error list. Bytes that are not valid UTF-8 are replaced with
/// U+FFFD, so they can only spoil the line they appear on.
pub async fn stream_lines<R>(
    mut reader: R,
    parser: &mut dyn NemParser,
    progress_bar: Option<&ProgressBar>,
) -> Result<ParseResult>
where
    R: AsyncBufRead + Unpin,
{
    let mut accumulator = LineAccumulator::new();
    let mut buffer = Vec::new();

    loop {
        buffer.clear();
        if reader.read_until(b'\n', &mut buffer).await? == 0 {
            break;
        }

        let line = String::from_utf8_lossy(&buffer);
        accumulator.feed(&line, parser);

        if let Some(pb) = progress_bar {
            let processed = accumulator.lines_processed();
            if processed > 0 && processed % PROGRESS_UPDATE_INTERVAL == 0 {
                pb.set_message(format!(
                    "{} lines, {} readings",
                    processed,
                    accumulator.reading_count()
                ));
                pb.tick();
            }
        }
    }

    debug!(
        "Streamed {} lines into {} readings",
        accumulator.lines_processed(),
        accumulator.reading_count()
    );

    Ok(accumulator.finish())
}
