//! JSON output format for downtime reports

use crate::aggregate::{Aggregation, ChartBar};
use crate::ingest::EventTable;
use crate::signal::Signal;
use serde::{Deserialize, Serialize};

/// Where the events came from and how many survived the pivot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonInputSummary {
    /// Input path (or "<memory>")
    pub source: String,
    /// SHA-256 of the input bytes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sha256: Option<String>,
    /// Events read from the source
    pub events: usize,
    /// Events dropped for an unparseable timestamp
    pub dropped_events: usize,
    /// Rows in the pivoted table
    pub rows: usize,
    /// Elapsed time between first and last row, in seconds
    pub total_time_s: f64,
    /// Source name for each signal column
    pub columns: Vec<JsonColumn>,
}

/// A source name and the signal it was mapped to
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonColumn {
    pub source_name: String,
    pub signal: Signal,
}

/// Time-weighted downtime for one signal
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonTimeMetric {
    pub signal: Signal,
    pub label: String,
    pub down_time_s: f64,
    /// `null` when no time elapsed
    pub percent: Option<f64>,
}

/// Occurrence-weighted downtime for one signal
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonCountMetric {
    pub signal: Signal,
    pub down_count: u64,
    pub total_count: u64,
    /// `null` when the signal has no readings
    pub percent: Option<f64>,
}

/// Bar chart series, ready for plotting
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonCharts {
    pub time_weighted: Vec<ChartBar>,
    pub count_weighted: Vec<ChartBar>,
}

/// Root JSON output structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonOutput {
    /// Crate version that produced the report
    pub version: String,
    /// Format name
    pub format: String,
    pub input: JsonInputSummary,
    pub time_weighted: Vec<JsonTimeMetric>,
    pub count_weighted: Vec<JsonCountMetric>,
    pub charts: JsonCharts,
}

impl JsonOutput {
    /// Build the JSON document for an aggregation of `source`
    pub fn new(agg: &Aggregation, source: &EventTable) -> Self {
        let report = &agg.report;

        let sha256 = if source.fingerprint.is_empty() {
            None
        } else {
            Some(source.fingerprint.clone())
        };

        let columns = agg
            .table
            .assignment()
            .iter()
            .map(|(name, &signal)| JsonColumn {
                source_name: name.clone(),
                signal,
            })
            .collect();

        let time_weighted = report
            .signals
            .iter()
            .map(|s| JsonTimeMetric {
                signal: s.signal,
                label: s.signal.label().to_string(),
                down_time_s: s.time.down_time_s,
                percent: s.time.percent,
            })
            .collect();

        let count_weighted = report
            .signals
            .iter()
            .map(|s| JsonCountMetric {
                signal: s.signal,
                down_count: s.count.down_count,
                total_count: s.count.total_count,
                percent: s.count.percent(),
            })
            .collect();

        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            format: "downtime-json-v1".to_string(),
            input: JsonInputSummary {
                source: source.source.clone(),
                sha256,
                events: agg.events_read,
                dropped_events: agg.table.dropped_events(),
                rows: report.row_count,
                total_time_s: report.total_time_s,
                columns,
            },
            time_weighted,
            count_weighted,
            charts: JsonCharts {
                time_weighted: report.time_series(),
                count_weighted: report.count_series(),
            },
        }
    }

    /// Serialize as pretty-printed JSON
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::DowntimeAggregator;
    use crate::config::DowntimeConfig;
    use crate::ingest::InputFormat;

    const CSV: &str = "Time,Name,Status
2024-01-01 00:00:00,A,0
2024-01-01 00:00:00,B,0
2024-01-01 00:00:00,C,0
2024-01-01 00:00:00,D,1
";

    fn output() -> JsonOutput {
        let table = EventTable::from_bytes(CSV.as_bytes(), InputFormat::Csv).unwrap();
        let agg = DowntimeAggregator::new(&DowntimeConfig::default())
            .unwrap()
            .aggregate(&table.events)
            .unwrap();
        JsonOutput::new(&agg, &table)
    }

    #[test]
    fn test_json_structure() {
        let out = output();
        assert_eq!(out.format, "downtime-json-v1");
        assert_eq!(out.input.events, 4);
        assert_eq!(out.input.rows, 1);
        assert_eq!(out.input.columns.len(), 4);
        assert_eq!(out.input.columns[3].source_name, "D");
        assert_eq!(out.input.columns[3].signal, Signal::PlcEsdTrip);
        assert_eq!(out.time_weighted.len(), 4);
        assert_eq!(out.charts.count_weighted.len(), 4);
    }

    #[test]
    fn test_undefined_percent_serializes_as_null() {
        let json = output().to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert!(value["time_weighted"][0]["percent"].is_null());
        assert_eq!(value["count_weighted"][0]["percent"], 0.0);
        assert_eq!(value["count_weighted"][0]["signal"], "Flare_Pilot_Status");
        assert_eq!(value["input"]["sha256"].as_str().unwrap().len(), 64);
    }

    #[test]
    fn test_memory_source_omits_fingerprint() {
        let table = EventTable::from_events(Vec::new());
        let agg = crate::aggregate::Aggregation {
            events_read: 0,
            table: crate::pivot::WideTable::from_rows(Vec::new()),
            report: crate::aggregate::DowntimeReport::compute(
                &crate::pivot::WideTable::from_rows(Vec::new()),
            ),
        };
        let json = JsonOutput::new(&agg, &table).to_json().unwrap();
        assert!(!json.contains("sha256"));
    }
}
