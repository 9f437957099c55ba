//! Register disambiguation and ordering for meter readings
//!
//! Readings that collide on (meter id, timestamp) are not dropped. Every
//! member of a colliding group is kept and tagged `R1`, `R2`, ... in the
//! order it was parsed, with the tag appended to its meter id.

use crate::constants::{NMI_SEPARATOR, ORIGINAL_REGISTER, register_tag};
use crate::models::{MeterReading, RegisterProcessingResult};
use chrono::NaiveDateTime;
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

/// Assign register suffixes to every reading that shares its key
///
/// Groups keep first-seen order, and members keep parse order within a group,
/// so the output order is deterministic for a given input.
pub fn add_register_suffixes(readings: &[MeterReading]) -> RegisterProcessingResult {
    let groups = group_by_key(readings);

    let mut processed_readings = Vec::with_capacity(readings.len());
    let mut register_stats: BTreeMap<String, usize> = BTreeMap::new();
    let mut duplicates_found = 0;

    for group in groups {
        if group.len() == 1 {
            *register_stats.entry(ORIGINAL_REGISTER.to_string()).or_insert(0) += 1;
            processed_readings.push(group[0].clone());
            continue;
        }

        duplicates_found += group.len() - 1;
        for (index, reading) in group.into_iter().enumerate() {
            let tag = register_tag(index + 1);
            *register_stats.entry(tag.clone()).or_insert(0) += 1;

            processed_readings.push(MeterReading {
                meter_id: format!("{}{}{}", reading.meter_id, NMI_SEPARATOR, tag),
                register: Some(tag),
                ..reading.clone()
            });
        }
    }

    debug!(
        "Register processing complete: {} readings, {} duplicates",
        processed_readings.len(),
        duplicates_found
    );

    RegisterProcessingResult {
        processed_readings,
        duplicates_found,
        register_stats,
    }
}

/// Analyze duplicate patterns in a collection of readings
///
/// Returns (total_groups, duplicate_groups, total_duplicates)
pub fn analyze_duplicate_groups(readings: &[MeterReading]) -> (usize, usize, usize) {
    let groups = group_by_key(readings);

    let total_groups = groups.len();
    let duplicate_groups = groups.iter().filter(|group| group.len() > 1).count();
    let total_duplicates = groups.iter().map(|group| group.len() - 1).sum();

    (total_groups, duplicate_groups, total_duplicates)
}

/// Group readings by (meter id, timestamp) in first-seen order
fn group_by_key(readings: &[MeterReading]) -> Vec<Vec<&MeterReading>> {
    let mut index: HashMap<(&str, NaiveDateTime), usize> = HashMap::new();
    let mut groups: Vec<Vec<&MeterReading>> = Vec::new();

    for reading in readings {
        let key = (reading.meter_id.as_str(), reading.timestamp);
        match index.get(&key) {
            Some(&position) => groups[position].push(reading),
            None => {
                index.insert(key, groups.len());
                groups.push(vec![reading]);
            }
        }
    }

    groups
}

/// Sort readings by base NMI, register suffix, then timestamp
///
/// Stable, so readings equal on all three keys keep their relative order.
pub fn sort_by_nmi(readings: &mut [MeterReading]) {
    readings.sort_by(compare_readings);
}

/// Ordering used for output.
///
/// Unsuffixed readings sort before suffixed ones. Suffixes compare as plain
/// strings, so `R10` sorts before `R2`.
pub fn compare_readings(a: &MeterReading, b: &MeterReading) -> Ordering {
    a.base_meter_id()
        .cmp(b.base_meter_id())
        .then_with(|| compare_registers(a.register_suffix(), b.register_suffix()))
        .then_with(|| a.timestamp.cmp(&b.timestamp))
}

fn compare_registers(a: Option<&str>, b: Option<&str>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(a), Some(b)) => a.cmp(b),
    }
}
