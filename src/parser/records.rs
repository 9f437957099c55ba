//! Per-record handlers for the NEM12 state machine
//!
//! Each handler receives the trimmed fields of one line together with the
//! parser context and either updates the context, yields readings, or
//! rejects the line.

use super::context::ParserContext;
use crate::constants::{NEM_FORMAT, columns, intervals_per_day};
use crate::dates::parse_compact_date;
use crate::error::{Nem12Error, Result};
use crate::models::MeterReading;
use chrono::{Duration, NaiveDateTime};
use rust_decimal::Decimal;
use std::str::FromStr;
use tracing::trace;

/// Validate a 100 header record
pub fn validate_header(fields: &[&str]) -> Result<()> {
    match fields.get(columns::FORMAT) {
        Some(&format) if format == NEM_FORMAT => Ok(()),
        _ => Err(Nem12Error::InvalidFormat),
    }
}

/// Apply a 200 NMI data details record to the context
pub fn apply_meter_data(fields: &[&str], context: &mut ParserContext) {
    let meter_id = fields.get(columns::NMI).copied().unwrap_or_default();
    let interval_length = fields
        .get(columns::INTERVAL_LENGTH)
        .and_then(|value| parse_interval_length(value));

    context.begin_meter(meter_id, interval_length);
}

/// Parse a 300 interval data record into readings
pub fn parse_interval_data(fields: &[&str], context: &ParserContext) -> Result<Vec<MeterReading>> {
    if !context.has_meter() {
        return Err(Nem12Error::MissingMeterContext);
    }

    let date_token = fields.get(columns::INTERVAL_DATE).copied().unwrap_or_default();
    let day_anchor = parse_compact_date(date_token).map_err(|e| e.for_field("interval date"))?;

    let max_intervals = intervals_per_day(context.interval_length);
    let readings: Vec<MeterReading> = fields
        .iter()
        .skip(columns::CONSUMPTION_START)
        .take(max_intervals)
        .enumerate()
        .filter_map(|(index, value)| create_reading(value, index, day_anchor, context))
        .collect();

    trace!(
        "Interval row {} for {}: {} readings at {} minute intervals",
        date_token,
        context.current_meter_id,
        readings.len(),
        context.interval_length
    );

    Ok(readings)
}

/// Build one reading, or `None` for blank and non-numeric values
fn create_reading(
    value: &str,
    interval_index: usize,
    day_anchor: NaiveDateTime,
    context: &ParserContext,
) -> Option<MeterReading> {
    let consumption = parse_consumption(value)?;
    let minutes_offset = interval_index as i64 * context.interval_length as i64;

    Some(MeterReading::new(
        context.current_meter_id.clone(),
        day_anchor + Duration::minutes(minutes_offset),
        consumption,
    ))
}

/// Parse a consumption field exactly, keeping sign and scale.
///
/// Returns `None` for blank or non-numeric values.
pub fn parse_consumption(value: &str) -> Option<Decimal> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    Decimal::from_str(value)
        .or_else(|_| Decimal::from_scientific(value))
        .ok()
}

/// Interval lengths must be positive whole minutes
fn parse_interval_length(value: &str) -> Option<u32> {
    value.trim().parse::<u32>().ok().filter(|&minutes| minutes > 0)
}
