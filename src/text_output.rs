//! Plain-text downtime summary (default output)

use crate::aggregate::Aggregation;
use std::fmt;

/// Format a percentage with `precision` decimals, or `n/a` when undefined
pub fn format_percent(value: Option<f64>, precision: usize) -> String {
    match value {
        Some(v) => format!("{:.*}%", precision, v),
        None => "n/a".to_string(),
    }
}

/// Text report formatter
#[derive(Debug, Clone)]
pub struct TextOutput {
    precision: usize,
}

impl TextOutput {
    pub fn new(precision: usize) -> Self {
        Self { precision }
    }

    /// Render the summary
    pub fn render(&self, agg: &Aggregation) -> String {
        TextReport {
            agg,
            precision: self.precision,
        }
        .to_string()
    }
}

struct TextReport<'a> {
    agg: &'a Aggregation,
    precision: usize,
}

impl fmt::Display for TextReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let report = &self.agg.report;

        writeln!(f, "Downtime Analysis")?;
        writeln!(
            f,
            "Events: {} read, {} dropped (unparseable time), {} rows, {:.3} s observed",
            self.agg.events_read,
            self.agg.table.dropped_events(),
            report.row_count,
            report.total_time_s
        )?;
        writeln!(f)?;

        writeln!(f, "Downtime Percentages by Time")?;
        for s in &report.signals {
            writeln!(
                f,
                "{} downtime: {}",
                s.signal.short_name(),
                format_percent(s.time.percent, self.precision)
            )?;
        }
        writeln!(f)?;

        writeln!(f, "Downtime Counts as Percentage of Total Occurrences")?;
        for s in &report.signals {
            writeln!(
                f,
                "{} down: {} times, total: {} times, percentage: {}",
                s.signal.column_name(),
                s.count.down_count,
                s.count.total_count,
                format_percent(s.count.percent(), self.precision)
            )?;
        }

        Ok(())
    }
}
