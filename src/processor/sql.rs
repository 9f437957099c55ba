//! SQL INSERT generation for processed meter readings
//!
//! Rendering is uniform across a file: either every statement carries a
//! surrogate `id` column or none does.

use crate::config::SqlConfig;
use crate::dates::format_timestamp;
use crate::models::{MeterReading, ParameterizedInsert};
use uuid::Uuid;

/// Renders meter readings as INSERT statements
#[derive(Debug, Clone, Default)]
pub struct SqlGenerator {
    config: SqlConfig,
}

impl SqlGenerator {
    pub fn new(config: SqlConfig) -> Self {
        Self { config }
    }

    /// One literal INSERT statement per reading, in input order
    pub fn generate_inserts(&self, readings: &[MeterReading]) -> Vec<String> {
        readings.iter().map(|reading| self.render(reading)).collect()
    }

    /// Render a single reading
    pub fn render(&self, reading: &MeterReading) -> String {
        let nmi = self.quote_value(&reading.meter_id);
        let timestamp = format_timestamp(&reading.timestamp);

        if self.config.with_surrogate_id {
            format!(
                "INSERT INTO {} (id, nmi, timestamp, consumption) VALUES ('{}', '{}', '{}', {});",
                self.config.table_name,
                Uuid::new_v4(),
                nmi,
                timestamp,
                reading.consumption
            )
        } else {
            format!(
                "INSERT INTO {} (nmi, timestamp, consumption) VALUES ('{}', '{}', {});",
                self.config.table_name, nmi, timestamp, reading.consumption
            )
        }
    }

    /// Placeholder statements for drivers that bind values separately
    pub fn generate_parameterized(&self, readings: &[MeterReading]) -> Vec<ParameterizedInsert> {
        let sql = if self.config.with_surrogate_id {
            format!(
                "INSERT INTO {} (id, nmi, timestamp, consumption) VALUES ($1, $2, $3, $4);",
                self.config.table_name
            )
        } else {
            format!(
                "INSERT INTO {} (nmi, timestamp, consumption) VALUES ($1, $2, $3);",
                self.config.table_name
            )
        };

        readings
            .iter()
            .map(|reading| {
                let mut params = Vec::with_capacity(4);
                if self.config.with_surrogate_id {
                    params.push(Uuid::new_v4().to_string());
                }
                params.push(reading.meter_id.clone());
                params.push(format_timestamp(&reading.timestamp));
                params.push(reading.consumption.to_string());

                ParameterizedInsert {
                    sql: sql.clone(),
                    params,
                }
            })
            .collect()
    }

    fn quote_value<'a>(&self, value: &'a str) -> std::borrow::Cow<'a, str> {
        if self.config.escape_quotes && value.contains('\'') {
            value.replace('\'', "''").into()
        } else {
            value.into()
        }
    }
}
