//! Compact NEM12 date parsing and canonical timestamp formatting.
//!
//! NEM12 encodes interval dates as `YYYYMMDD`. Timestamps are naive local
//! values; no timezone conversion happens anywhere in the pipeline.

use crate::constants::{COMPACT_DATE_LEN, DATE_FORMAT, TIMESTAMP_FORMAT};
use crate::error::{Nem12Error, Result};
use chrono::{NaiveDate, NaiveDateTime};

/// Parse a `YYYYMMDD` token into local midnight of that calendar date
pub fn parse_compact_date(token: &str) -> Result<NaiveDateTime> {
    if token.len() != COMPACT_DATE_LEN || !token.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Nem12Error::InvalidDateFormat {
            field: "date",
            value: token.to_string(),
        });
    }

    // All-digit ASCII, so slicing and parsing cannot fail
    let year: i32 = token[0..4].parse().unwrap_or_default();
    let month: u32 = token[4..6].parse().unwrap_or_default();
    let day: u32 = token[6..8].parse().unwrap_or_default();

    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .ok_or_else(|| Nem12Error::InvalidDate {
            value: token.to_string(),
        })
}

/// Format as `YYYY-MM-DD HH:MM:SS` for SQL output
pub fn format_timestamp(dt: &NaiveDateTime) -> String {
    dt.format(TIMESTAMP_FORMAT).to_string()
}

/// Format as `YYYY-MM-DD` for date range reporting
pub fn format_date_only(dt: &NaiveDateTime) -> String {
    dt.format(DATE_FORMAT).to_string()
}
