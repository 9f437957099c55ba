//! Mutable state threaded through NEM12 line parsing.

use crate::constants::DEFAULT_INTERVAL_LENGTH;

/// Parsing state carried from one record to the next
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParserContext {
    /// NMI from the most recent 200 record; empty when no meter block is open
    pub current_meter_id: String,
    /// Minutes per interval for the current meter block
    pub interval_length: u32,
}

impl ParserContext {
    pub fn new() -> Self {
        Self {
            current_meter_id: String::new(),
            interval_length: DEFAULT_INTERVAL_LENGTH,
        }
    }

    /// Restore defaults before parsing an unrelated file
    pub fn reset(&mut self) {
        self.current_meter_id.clear();
        self.interval_length = DEFAULT_INTERVAL_LENGTH;
    }

    pub fn has_meter(&self) -> bool {
        !self.current_meter_id.is_empty()
    }

    /// Open a meter block, falling back to the default interval length
    pub fn begin_meter(&mut self, meter_id: &str, interval_length: Option<u32>) {
        self.current_meter_id = meter_id.to_string();
        self.interval_length = interval_length.unwrap_or(DEFAULT_INTERVAL_LENGTH);
    }

    pub fn end_meter(&mut self) {
        self.current_meter_id.clear();
    }
}

impl Default for ParserContext {
    fn default() -> Self {
        Self::new()
    }
}
