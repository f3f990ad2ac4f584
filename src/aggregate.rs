//! Downtime aggregation over a pivoted status table
//!
//! Two views of the same predicates:
//! - time-weighted: sum of interval durations ending at rows where a signal is down
//! - occurrence-weighted: count of rows where a signal is down, over its readings
//!
//! Flare and combustor downtime is not counted while the process shutdown
//! signal reads 1, so a plant shutdown is attributed once.

use crate::config::DowntimeConfig;
use crate::error::Result;
use crate::ingest::StatusEvent;
use crate::pivot::{SignalResolver, WideRow, WideTable};
use crate::signal::Signal;
use crate::timestamp::seconds_between;
use serde::{Deserialize, Serialize};

/// Interval durations in seconds: `diffs[0] = 0`, `diffs[i] = ts[i] - ts[i-1]`
pub fn interval_durations(rows: &[WideRow]) -> Vec<f64> {
    let mut diffs = Vec::with_capacity(rows.len());
    if rows.is_empty() {
        return diffs;
    }
    diffs.push(0.0);
    for pair in rows.windows(2) {
        diffs.push(seconds_between(pair[0].timestamp, pair[1].timestamp));
    }
    diffs
}

/// Whether `signal` counts as down at `row`
///
/// A missing reading is unequal to everything: it never marks a signal down,
/// and a missing process-shutdown reading does not mask pilot downtime.
pub fn is_down(signal: Signal, row: &WideRow) -> bool {
    let down = row.status(signal) == Some(signal.down_value());
    if !down {
        return false;
    }
    if signal.excluded_during_shutdown() {
        let shutdown = Signal::ProcessShutdown;
        return row.status(shutdown) != Some(shutdown.down_value());
    }
    true
}

/// `part / whole * 100`, or `None` when `whole` is zero
pub fn percentage(part: f64, whole: f64) -> Option<f64> {
    if whole == 0.0 {
        None
    } else {
        Some(part / whole * 100.0)
    }
}

/// Time-weighted downtime for one signal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeDowntime {
    pub down_time_s: f64,
    pub total_time_s: f64,
    /// `None` when no time elapsed
    pub percent: Option<f64>,
}

/// Occurrence-weighted downtime for one signal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountDowntime {
    pub down_count: u64,
    /// Rows where the signal has a reading
    pub total_count: u64,
}

impl CountDowntime {
    /// `None` when the signal has no readings
    pub fn percent(&self) -> Option<f64> {
        percentage(self.down_count as f64, self.total_count as f64)
    }
}

/// Both downtime views for one signal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalDowntime {
    pub signal: Signal,
    pub time: TimeDowntime,
    pub count: CountDowntime,
}

/// One bar in a chart series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartBar {
    pub label: String,
    pub value: Option<f64>,
}

/// Downtime metrics for all four signals
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DowntimeReport {
    pub row_count: usize,
    pub total_time_s: f64,
    /// In `Signal::ALL` order
    pub signals: Vec<SignalDowntime>,
}

impl DowntimeReport {
    /// Compute downtime metrics for a pivoted table
    pub fn compute(table: &WideTable) -> Self {
        let rows = table.rows();
        let diffs = interval_durations(rows);
        let total_time_s: f64 = diffs.iter().sum();

        let signals = Signal::ALL
            .iter()
            .map(|&signal| {
                let mut down_time_s = 0.0;
                let mut down_count = 0u64;
                let mut total_count = 0u64;

                for (row, diff) in rows.iter().zip(&diffs) {
                    if row.status(signal).is_some() {
                        total_count += 1;
                    }
                    if is_down(signal, row) {
                        down_time_s += diff;
                        down_count += 1;
                    }
                }

                SignalDowntime {
                    signal,
                    time: TimeDowntime {
                        down_time_s,
                        total_time_s,
                        percent: percentage(down_time_s, total_time_s),
                    },
                    count: CountDowntime {
                        down_count,
                        total_count,
                    },
                }
            })
            .collect();

        Self {
            row_count: rows.len(),
            total_time_s,
            signals,
        }
    }

    /// Metrics for one signal
    pub fn signal(&self, signal: Signal) -> &SignalDowntime {
        &self.signals[signal.index()]
    }

    /// Time-weighted percentages keyed by component label
    pub fn time_series(&self) -> Vec<ChartBar> {
        self.signals
            .iter()
            .map(|s| ChartBar {
                label: s.signal.label().to_string(),
                value: s.time.percent,
            })
            .collect()
    }

    /// Occurrence-weighted percentages keyed by column name
    pub fn count_series(&self) -> Vec<ChartBar> {
        self.signals
            .iter()
            .map(|s| ChartBar {
                label: s.signal.column_name().to_string(),
                value: s.count.percent(),
            })
            .collect()
    }
}

/// Pivot plus metrics for one event table
#[derive(Debug, Clone)]
pub struct Aggregation {
    pub events_read: usize,
    pub table: WideTable,
    pub report: DowntimeReport,
}

/// Runs the reshape and metric computation with a fixed signal mapping
#[derive(Debug, Clone)]
pub struct DowntimeAggregator {
    resolver: SignalResolver,
}

impl DowntimeAggregator {
    /// Create an aggregator for the mapping configured in `config`
    pub fn new(config: &DowntimeConfig) -> Result<Self> {
        Ok(Self {
            resolver: SignalResolver::from_config(config)?,
        })
    }

    /// Pivot `events` and compute their downtime report
    pub fn aggregate(&self, events: &[StatusEvent]) -> Result<Aggregation> {
        let table = WideTable::reshape(events, &self.resolver)?;
        let report = DowntimeReport::compute(&table);

        if report.total_time_s == 0.0 {
            tracing::warn!(
                "No elapsed time across {} rows; time-weighted percentages are undefined",
                report.row_count
            );
        }

        Ok(Aggregation {
            events_read: events.len(),
            table,
            report,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timestamp::parse_timestamp;

    fn ts(secs: u32) -> chrono::NaiveDateTime {
        parse_timestamp("2024-01-01 00:00:00").unwrap() + chrono::Duration::seconds(secs as i64)
    }

    fn row(secs: u32, statuses: [Option<f64>; 4]) -> WideRow {
        WideRow {
            timestamp: ts(secs),
            statuses,
        }
    }

    fn table(flare: [f64; 4], process: [f64; 4], plc: [f64; 4]) -> WideTable {
        let rows = (0..4)
            .map(|i| {
                row(
                    i as u32 * 10,
                    [Some(flare[i]), Some(0.0), Some(process[i]), Some(plc[i])],
                )
            })
            .collect();
        WideTable::from_rows(rows)
    }

    fn assert_close(actual: Option<f64>, expected: f64) {
        let actual = actual.expect("percentage should be defined");
        assert!(
            (actual - expected).abs() < 0.01,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn test_interval_durations() {
        let t = table([0.0; 4], [0.0; 4], [1.0; 4]);
        assert_eq!(interval_durations(t.rows()), vec![0.0, 10.0, 10.0, 10.0]);
        assert!(interval_durations(&[]).is_empty());
    }

    #[test]
    fn test_flare_time_weighted() {
        let t = table([0.0, 1.0, 1.0, 0.0], [0.0; 4], [1.0; 4]);
        let report = DowntimeReport::compute(&t);
        assert_eq!(report.total_time_s, 30.0);
        let flare = report.signal(Signal::FlarePilot);
        assert_eq!(flare.time.down_time_s, 20.0);
        assert_close(flare.time.percent, 66.67);
    }

    #[test]
    fn test_plc_esd_inverted_polarity() {
        let t = table([0.0; 4], [0.0; 4], [1.0, 1.0, 0.0, 1.0]);
        let report = DowntimeReport::compute(&t);
        let plc = report.signal(Signal::PlcEsdTrip);
        assert_eq!(plc.time.down_time_s, 10.0);
        assert_close(plc.time.percent, 33.33);
        assert_eq!(plc.count.down_count, 1);
        assert_eq!(plc.count.total_count, 4);
    }

    #[test]
    fn test_process_shutdown_masks_pilots() {
        let t = table([0.0, 1.0, 1.0, 0.0], [0.0, 1.0, 0.0, 0.0], [1.0; 4]);
        let report = DowntimeReport::compute(&t);
        let flare = report.signal(Signal::FlarePilot);
        assert_eq!(flare.time.down_time_s, 10.0);
        assert_eq!(flare.count.down_count, 1);
        let process = report.signal(Signal::ProcessShutdown);
        assert_eq!(process.time.down_time_s, 10.0);
        assert_eq!(process.count.down_count, 1);
    }

    #[test]
    fn test_missing_values() {
        let rows = vec![
            row(0, [Some(1.0), None, None, None]),
            row(5, [Some(1.0), Some(1.0), None, Some(0.0)]),
            row(15, [None, Some(1.0), Some(1.0), None]),
        ];
        let report = DowntimeReport::compute(&WideTable::from_rows(rows));

        // Missing process reading does not mask the flare
        let flare = report.signal(Signal::FlarePilot);
        assert_eq!(flare.time.down_time_s, 5.0);
        assert_eq!(flare.count.down_count, 2);
        assert_eq!(flare.count.total_count, 2);

        // Missing PLC reading is not a trip
        let plc = report.signal(Signal::PlcEsdTrip);
        assert_eq!(plc.count.down_count, 1);
        assert_eq!(plc.count.total_count, 1);
        assert_eq!(plc.count.percent(), Some(100.0));

        let combustor = report.signal(Signal::CombustorPilot);
        assert_eq!(combustor.count.down_count, 1);
        assert_eq!(combustor.time.down_time_s, 5.0);
    }

    #[test]
    fn test_single_row_has_undefined_time_percentages() {
        let rows = vec![row(0, [Some(1.0), Some(1.0), Some(1.0), Some(0.0)])];
        let report = DowntimeReport::compute(&WideTable::from_rows(rows));
        assert_eq!(report.total_time_s, 0.0);
        for s in &report.signals {
            assert_eq!(s.time.percent, None);
        }
        assert_eq!(report.signal(Signal::PlcEsdTrip).count.percent(), Some(100.0));
    }

    #[test]
    fn test_no_readings_gives_undefined_count_percentage() {
        let rows = vec![
            row(0, [Some(0.0), None, Some(0.0), Some(1.0)]),
            row(1, [Some(0.0), None, Some(0.0), Some(1.0)]),
        ];
        let report = DowntimeReport::compute(&WideTable::from_rows(rows));
        let combustor = report.signal(Signal::CombustorPilot);
        assert_eq!(combustor.count.total_count, 0);
        assert_eq!(combustor.count.percent(), None);
    }

    #[test]
    fn test_chart_series_labels() {
        let t = table([0.0, 1.0, 1.0, 0.0], [0.0; 4], [1.0; 4]);
        let report = DowntimeReport::compute(&t);
        let time = report.time_series();
        assert_eq!(time[0].label, "Flare Pilot");
        assert_eq!(time[3].label, "PLC ESD Tripped Shutdown");
        let count = report.count_series();
        assert_eq!(count[0].label, "Flare_Pilot_Status");
        assert_eq!(count[0].value, Some(50.0));
    }

    #[test]
    fn test_aggregator_end_to_end() {
        let mut events = Vec::new();
        let flare = ["0", "1", "1", "0"];
        let plc = ["1", "1", "0", "1"];
        for i in 0..4 {
            let time = format!("2024-01-01 00:00:{:02}", i * 10);
            events.push(StatusEvent::from_cells(&time, "a_flare", flare[i]));
            events.push(StatusEvent::from_cells(&time, "b_combustor", "0"));
            events.push(StatusEvent::from_cells(&time, "c_process", "0"));
            events.push(StatusEvent::from_cells(&time, "d_plc", plc[i]));
        }
        events.push(StatusEvent::from_cells("n/a", "a_flare", "1"));

        let aggregator = DowntimeAggregator::new(&DowntimeConfig::default()).unwrap();
        let agg = aggregator.aggregate(&events).unwrap();
        assert_eq!(agg.events_read, 17);
        assert_eq!(agg.table.dropped_events(), 1);
        assert_eq!(agg.report.row_count, 4);
        assert_close(agg.report.signal(Signal::FlarePilot).time.percent, 66.67);
        assert_close(agg.report.signal(Signal::PlcEsdTrip).time.percent, 33.33);
        assert_eq!(agg.report.signal(Signal::CombustorPilot).time.percent, Some(0.0));
    }
}
