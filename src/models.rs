//! Core data structures and types for NEM12 processing.
//!
//! Defines meter readings, intermediate parse and register results, and the
//! serialisable processing result handed back to callers.

use crate::constants::{NMI_SEPARATOR, REGISTER_PREFIX};
use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One interval consumption value for a meter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeterReading {
    /// Raw NMI from the file, or `<nmi>_R<n>` once disambiguated
    pub meter_id: String,
    pub timestamp: NaiveDateTime,
    /// Exact value as written in the file, scale included
    pub consumption: Decimal,
    /// Register tag assigned during deduplication
    pub register: Option<String>,
}

impl MeterReading {
    pub fn new(meter_id: impl Into<String>, timestamp: NaiveDateTime, consumption: Decimal) -> Self {
        Self {
            meter_id: meter_id.into(),
            timestamp,
            consumption,
            register: None,
        }
    }

    /// Meter id with any register suffix stripped
    pub fn base_meter_id(&self) -> &str {
        split_meter_id(&self.meter_id).0
    }

    /// Register suffix carried in the meter id, if any
    pub fn register_suffix(&self) -> Option<&str> {
        split_meter_id(&self.meter_id).1
    }
}

/// Split `<base>_R<digits>` into base id and suffix.
///
/// Ids without a trailing register suffix are returned whole, so NMIs that
/// legitimately contain underscores are left alone.
pub fn split_meter_id(meter_id: &str) -> (&str, Option<&str>) {
    if let Some((base, suffix)) = meter_id.rsplit_once(NMI_SEPARATOR) {
        let is_register = suffix
            .strip_prefix(REGISTER_PREFIX)
            .is_some_and(|digits| !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()));
        if is_register && !base.is_empty() {
            return (base, Some(suffix));
        }
    }
    (meter_id, None)
}

/// Readings and line diagnostics produced by a parser
#[derive(Debug, Clone, Default)]
pub struct ParseResult {
    pub readings: Vec<MeterReading>,
    pub errors: Vec<String>,
}

/// Output of register disambiguation
#[derive(Debug, Clone, Default)]
pub struct RegisterProcessingResult {
    pub processed_readings: Vec<MeterReading>,
    /// Sum over colliding groups of `group_size - 1`
    pub duplicates_found: usize,
    /// `"original"` or `"R<n>"` mapped to reading counts
    pub register_stats: BTreeMap<String, usize>,
}

/// Earliest and latest calendar dates covered by the output
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: String,
    pub end: String,
}

/// Aggregate statistics for one processed file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessingSummary {
    pub total_records: usize,
    pub unique_records: usize,
    pub duplicates_found: usize,
    pub register_stats: BTreeMap<String, usize>,
    pub nmis: Vec<String>,
    pub date_range: DateRange,
    /// Wall-clock milliseconds, informational only
    pub processing_time: u64,
}

/// A statement with positional placeholders and its bound values
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterizedInsert {
    pub sql: String,
    pub params: Vec<String>,
}

/// Complete result for one file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessingResult {
    pub sql_statements: Vec<String>,
    /// Placeholder form of the same statements, when configured
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameterized_statements: Option<Vec<ParameterizedInsert>>,
    pub summary: ProcessingSummary,
    pub errors: Vec<String>,
}

impl ProcessingResult {
    /// SQL file body: one statement per line
    pub fn sql_script(&self) -> String {
        self.sql_statements.join("\n")
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}
