//! Test utilities for NEM12 parser testing
//!
//! Builders for NEM12 records and sample files shared by the parser tests.

use chrono::{NaiveDate, NaiveDateTime};


/// Sample header line
pub const HEADER: &str = "100,NEM12,200508081149,UNITEDDP,NEMMCO";

/// Build a 200 record for `nmi` with the given interval length column
pub fn meter_line(nmi: &str, interval_length: &str) -> String {
    format!("200,{},E1E2,1,E1,N1,01009,kWh,{},20050301", nmi, interval_length)
}

/// Build a 300 record for `date` with the given consumption values and trailing quality fields
pub fn interval_line(date: &str, values: &[&str]) -> String {
    format!(
        "300,{},{},A,,,20050310121004,20050310182204",
        date,
        values.join(",")
    )
}

/// `count` consumption values of the form `0.001`, `0.002`, ...
pub fn sequential_values(count: usize) -> Vec<String> {
    (1..=count).map(|i| format!("{}.{:03}", i / 1000, i % 1000)).collect()
}

/// Local midnight of the given date
pub fn midnight(year: i32, month: u32, day: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, month, day)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
}
