//! CSV output for downtime metrics and the pivoted table
//!
//! Undefined percentages are written as `n/a` in the metrics CSV; missing
//! readings are empty cells in the pivot export.

use crate::aggregate::{interval_durations, Aggregation};
use crate::pivot::WideTable;
use crate::signal::Signal;
use crate::timestamp::format_timestamp;

/// Escape CSV field (handle commas, quotes, newlines)
fn escape_field(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

fn format_number(value: Option<f64>, precision: usize) -> String {
    match value {
        Some(v) => format!("{:.*}", precision, v),
        None => "n/a".to_string(),
    }
}

/// CSV metrics formatter, one row per signal
#[derive(Debug, Clone)]
pub struct CsvOutput {
    precision: usize,
}

impl CsvOutput {
    pub fn new(precision: usize) -> Self {
        Self { precision }
    }

    fn header() -> &'static str {
        "signal,label,down_time_s,time_percent,down_count,total_count,count_percent"
    }

    /// Generate the metrics CSV
    pub fn to_csv(&self, agg: &Aggregation) -> String {
        let mut output = String::new();
        output.push_str(Self::header());
        output.push('\n');

        for s in &agg.report.signals {
            let fields = [
                escape_field(s.signal.column_name()),
                escape_field(s.signal.label()),
                s.time.down_time_s.to_string(),
                format_number(s.time.percent, self.precision),
                s.count.down_count.to_string(),
                s.count.total_count.to_string(),
                format_number(s.count.percent(), self.precision),
            ];
            output.push_str(&fields.join(","));
            output.push('\n');
        }

        output
    }
}

/// Export the full pivoted table with interval durations
pub fn pivot_to_csv(table: &WideTable) -> String {
    let mut output = String::from("formatted_datetime,time_diff");
    for signal in Signal::ALL {
        output.push(',');
        output.push_str(signal.column_name());
    }
    output.push('\n');

    let diffs = interval_durations(table.rows());
    for (row, diff) in table.rows().iter().zip(diffs) {
        output.push_str(&format_timestamp(row.timestamp));
        output.push(',');
        output.push_str(&diff.to_string());
        for status in row.statuses {
            output.push(',');
            if let Some(value) = status {
                output.push_str(&value.to_string());
            }
        }
        output.push('\n');
    }

    output
}
