//! Processing summary generation
//!
//! Builds the aggregate statistics reported alongside the SQL output. All
//! figures are derived from the readings handed in, never from parser state.

use crate::dates::format_date_only;
use crate::models::{DateRange, MeterReading, ProcessingSummary};
use std::collections::{BTreeMap, HashSet};
use std::time::Instant;

/// Build the summary for one processed file
pub fn generate_summary(
    original_readings: &[MeterReading],
    processed_readings: &[MeterReading],
    duplicates_found: usize,
    register_stats: BTreeMap<String, usize>,
    start_time: Instant,
) -> ProcessingSummary {
    ProcessingSummary {
        total_records: original_readings.len(),
        unique_records: processed_readings.len(),
        duplicates_found,
        register_stats,
        nmis: extract_unique_nmis(processed_readings),
        date_range: calculate_date_range(processed_readings),
        processing_time: start_time.elapsed().as_millis() as u64,
    }
}

/// Base NMIs in order of first appearance
pub fn extract_unique_nmis(readings: &[MeterReading]) -> Vec<String> {
    let mut seen = HashSet::new();
    readings
        .iter()
        .map(MeterReading::base_meter_id)
        .filter(|nmi| seen.insert(*nmi))
        .map(str::to_string)
        .collect()
}

/// Calendar dates of the earliest and latest timestamps
pub fn calculate_date_range(readings: &[MeterReading]) -> DateRange {
    let earliest = readings.iter().map(|r| r.timestamp).min();
    let latest = readings.iter().map(|r| r.timestamp).max();

    match (earliest, latest) {
        (Some(start), Some(end)) => DateRange {
            start: format_date_only(&start),
            end: format_date_only(&end),
        },
        _ => DateRange::default(),
    }
}
