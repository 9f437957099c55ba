//! NEM12 line parser
//!
//! A record-driven state machine: the tag in column 0 of every line decides
//! whether the line opens or closes a meter block, carries interval readings,
//! or is rejected. Parsing state lives in [`ParserContext`].
//!
//! ## Architecture
//!
//! - [`context`] - state carried between lines
//! - [`records`] - handlers for each record type
//!
//! Parsers are consumed through the [`NemParser`] capability so the pipeline
//! does not depend on a particular format implementation.
//!
//! ## Usage
//!
//! ```rust
//! use nem12_processor::parser::{Nem12Parser, NemParser};
//!
//! let mut parser = Nem12Parser::new();
//! let result = parser.parse_content("100,NEM12\n200,NMI1,E1,1,E1,N1,01,kWh,30\n300,20050301,0.5,0.7\n900");
//!
//! assert_eq!(result.readings.len(), 2);
//! assert!(result.errors.is_empty());
//! ```

pub mod context;
pub mod records;

#[cfg(test)]
pub mod tests;

pub use context::ParserContext;

use crate::constants::{FIELD_DELIMITER, columns, record_types};
use crate::error::{Nem12Error, Result};
use crate::models::{MeterReading, ParseResult};
use tracing::debug;

/// Capability interface for line-oriented meter data parsers
pub trait NemParser {
    /// Parse one trimmed, non-empty line
    fn parse_line(&mut self, line: &str) -> Result<Vec<MeterReading>>;

    /// Discard any state left over from a previous file
    fn reset(&mut self);

    /// Parse a whole file held in memory.
    ///
    /// Blank lines are dropped before numbering, and a failing line is
    /// reported as `Line <n>: <message>` without stopping the parse.
    fn parse_content(&mut self, content: &str) -> ParseResult {
        self.reset();

        let mut result = ParseResult::default();
        let lines = content.lines().map(str::trim).filter(|line| !line.is_empty());

        for (index, line) in lines.enumerate() {
            match self.parse_line(line) {
                Ok(readings) => result.readings.extend(readings),
                Err(e) => result.errors.push(format_line_error(index + 1, &e)),
            }
        }

        result
    }
}

/// Render a per-line failure for the result's error list
pub fn format_line_error(line_number: usize, error: &Nem12Error) -> String {
    format!("Line {}: {}", line_number, error)
}

/// Parser for the NEM12 interval meter data format
#[derive(Debug, Clone, Default)]
pub struct Nem12Parser {
    context: ParserContext,
}

impl Nem12Parser {
    pub fn new() -> Self {
        Self {
            context: ParserContext::new(),
        }
    }

    /// Current parsing state
    pub fn context(&self) -> &ParserContext {
        &self.context
    }
}

impl NemParser for Nem12Parser {
    fn parse_line(&mut self, line: &str) -> Result<Vec<MeterReading>> {
        let fields: Vec<&str> = line.split(FIELD_DELIMITER).map(str::trim).collect();
        let record_type = fields[columns::RECORD_TYPE];

        match record_type {
            record_types::HEADER => {
                records::validate_header(&fields)?;
                Ok(Vec::new())
            }
            record_types::NMI_DATA => {
                records::apply_meter_data(&fields, &mut self.context);
                debug!(
                    "Meter block {} opened ({} minute intervals)",
                    self.context.current_meter_id, self.context.interval_length
                );
                Ok(Vec::new())
            }
            record_types::INTERVAL_DATA => records::parse_interval_data(&fields, &self.context),
            record_types::END_NMI => {
                self.context.end_meter();
                Ok(Vec::new())
            }
            record_types::END_FILE => Ok(Vec::new()),
            _ => {
                debug!("Rejecting unknown record type '{}'", record_type);
                Err(Nem12Error::UnknownRecordType {
                    record_type: record_type.to_string(),
                })
            }
        }
    }

    fn reset(&mut self) {
        self.context.reset();
    }
}
