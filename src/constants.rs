//! Application constants for the NEM12 processor
//!
//! Record type tags, column positions, time arithmetic and SQL defaults
//! used throughout the parser and the processing pipeline.

// =============================================================================
// NEM12 Record Layout
// =============================================================================

/// Literal format name declared in the header record
pub const NEM_FORMAT: &str = "NEM12";

/// Field delimiter for NEM12 records
pub const FIELD_DELIMITER: char = ',';

/// Record type tags found in column 0 of every NEM12 line
pub mod record_types {
    /// Header record - contains file format information
    pub const HEADER: &str = "100";

    /// NMI data details - meter identification and interval configuration
    pub const NMI_DATA: &str = "200";

    /// Interval data - one day of consumption readings
    pub const INTERVAL_DATA: &str = "300";

    /// End of NMI data block
    pub const END_NMI: &str = "500";

    /// End of file
    pub const END_FILE: &str = "900";
}

/// Column positions within NEM12 records
pub mod columns {
    pub const RECORD_TYPE: usize = 0;

    /// Format name in a 100 record
    pub const FORMAT: usize = 1;

    /// NMI in a 200 record
    pub const NMI: usize = 1;

    /// Interval length (minutes) in a 200 record
    pub const INTERVAL_LENGTH: usize = 8;

    /// Interval date in a 300 record
    pub const INTERVAL_DATE: usize = 1;

    /// First consumption value in a 300 record
    pub const CONSUMPTION_START: usize = 2;
}

/// Interval length used when a 200 record omits it or carries garbage
pub const DEFAULT_INTERVAL_LENGTH: u32 = 30;

// =============================================================================
// Time Arithmetic
// =============================================================================

pub const MINUTES_PER_HOUR: u32 = 60;
pub const HOURS_PER_DAY: u32 = 24;
pub const MINUTES_IN_A_DAY: u32 = MINUTES_PER_HOUR * HOURS_PER_DAY;

/// Length of a compact YYYYMMDD date token
pub const COMPACT_DATE_LEN: usize = 8;

/// SQL timestamp rendering
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Date range rendering
pub const DATE_FORMAT: &str = "%Y-%m-%d";

// =============================================================================
// Register Disambiguation
// =============================================================================

/// Separator between base NMI and register suffix
pub const NMI_SEPARATOR: char = '_';

/// Prefix of every register tag (R1, R2, ...)
pub const REGISTER_PREFIX: &str = "R";

/// Register stats key for readings that needed no disambiguation
pub const ORIGINAL_REGISTER: &str = "original";

// =============================================================================
// Output and Validation Defaults
// =============================================================================

/// Target table for generated INSERT statements
pub const DEFAULT_TABLE_NAME: &str = "meter_readings";

/// Accepted input file extension (compared case-insensitively)
pub const CSV_EXTENSION: &str = "csv";

/// Default upload limit for NEM12 files (10MB)
pub const DEFAULT_MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// Output file extensions written by the CLI
pub const SQL_EXTENSION: &str = "sql";
pub const JSON_EXTENSION: &str = "json";

/// Build the register tag for a 1-based position within a duplicate group
pub fn register_tag(position: usize) -> String {
    format!("{}{}", REGISTER_PREFIX, position)
}

/// Number of intervals that fit in one day for the given interval length
pub fn intervals_per_day(interval_length: u32) -> usize {
    if interval_length == 0 {
        return 0;
    }
    (MINUTES_IN_A_DAY / interval_length) as usize
}
