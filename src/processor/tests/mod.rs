//! Integration tests for the processor module
//!
//! Drives the complete pipeline from NEM12 text through register
//! disambiguation, ordering, SQL rendering and summary generation.

use std::io::Write;
use std::path::PathBuf;
use tempfile::TempDir;

pub mod error_handling;

pub const HEADER: &str = "100,NEM12,200508081149,UNITEDDP,NEMMCO";
pub const FOOTER: &str = "900";

/// 200 record for `nmi` with 30 minute intervals
pub fn meter_line(nmi: &str) -> String {
    format!("200,{},E1E2,1,E1,N1,01009,kWh,30,20050301", nmi)
}

/// 300 record with exactly `count` readings valued `base + i/1000`
pub fn day_line(date: &str, count: usize, base: u32) -> String {
    let values: Vec<String> = (0..count).map(|i| format!("{}.{:03}", base, i)).collect();
    format!("300,{},{}", date, values.join(","))
}

/// Assemble a file from meter blocks of (nmi, interval rows)
pub fn nem12_file(blocks: &[(&str, Vec<String>)]) -> String {
    let mut lines = vec![HEADER.to_string()];
    for (nmi, rows) in blocks {
        lines.push(meter_line(nmi));
        lines.extend(rows.iter().cloned());
    }
    lines.push(FOOTER.to_string());
    lines.join("\n")
}

/// Write `content` to `<name>` inside a fresh temp dir
pub fn write_temp_file(name: &str, content: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join(name);
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(content.as_bytes()).unwrap();
    (temp_dir, path)
}
