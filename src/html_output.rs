//! HTML dashboard for downtime reports
//!
//! Standalone page with embedded CSS and inline SVG bar charts: input
//! summary, a preview of the pivoted table, both percentage tables, and one
//! chart per downtime view.

use crate::aggregate::{interval_durations, Aggregation, ChartBar};
use crate::ingest::EventTable;
use crate::signal::Signal;
use crate::text_output::format_percent;
use crate::timestamp::format_timestamp;

const CHART_WIDTH: f64 = 640.0;
const CHART_HEIGHT: f64 = 360.0;
const MARGIN_LEFT: f64 = 56.0;
const MARGIN_RIGHT: f64 = 16.0;
const MARGIN_TOP: f64 = 36.0;
const MARGIN_BOTTOM: f64 = 64.0;

/// HTML dashboard formatter
#[derive(Debug, Clone)]
pub struct HtmlOutput {
    precision: usize,
    preview_rows: usize,
}

impl HtmlOutput {
    pub fn new(precision: usize, preview_rows: usize) -> Self {
        Self {
            precision,
            preview_rows,
        }
    }

    /// Escape HTML special characters to prevent XSS
    fn escape_html(text: &str) -> String {
        text.replace('&', "&amp;")
            .replace('<', "&lt;")
            .replace('>', "&gt;")
            .replace('"', "&quot;")
            .replace('\'', "&#39;")
    }

    /// Generate embedded CSS styles
    fn generate_styles() -> &'static str {
        r#"
        body {
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
            margin: 20px;
            background-color: #f5f5f5;
        }
        h1, h2 {
            color: #333;
        }
        table {
            border-collapse: collapse;
            width: 100%;
            background-color: white;
            box-shadow: 0 1px 3px rgba(0,0,0,0.1);
            margin-bottom: 20px;
        }
        th, td {
            border: 1px solid #ddd;
            padding: 8px;
            text-align: left;
        }
        th {
            background-color: #4a90d9;
            color: white;
            font-weight: bold;
        }
        tr:nth-child(even) {
            background-color: #f9f9f9;
        }
        .summary td {
            font-family: monospace;
        }
        .missing {
            color: #aaa;
        }
        .undefined {
            color: #cc0000;
        }
        .chart {
            background-color: white;
            box-shadow: 0 1px 3px rgba(0,0,0,0.1);
            margin-bottom: 20px;
        }
        .chart .bar {
            fill: #4a90d9;
        }
        .chart .axis {
            stroke: #333;
        }
        .chart .grid {
            stroke: #eee;
        }
        .chart text {
            font-size: 11px;
            fill: #333;
        }
        .footer {
            margin-top: 20px;
            font-size: 0.8em;
            color: #888;
            text-align: center;
        }
        "#
    }

    fn percent_cell(&self, value: Option<f64>) -> String {
        match value {
            Some(_) => format!("<td>{}</td>", format_percent(value, self.precision)),
            None => "<td class=\"undefined\">n/a</td>".to_string(),
        }
    }

    /// Render the input summary table
    fn render_summary(&self, agg: &Aggregation, source: &EventTable) -> String {
        let mut html = String::new();
        html.push_str("    <h2>Raw Data</h2>\n");
        html.push_str("    <table class=\"summary\">\n");

        let mut rows = vec![
            ("Source", Self::escape_html(&source.source)),
            ("Events read", agg.events_read.to_string()),
            (
                "Dropped (unparseable time)",
                agg.table.dropped_events().to_string(),
            ),
            ("Pivoted rows", agg.report.row_count.to_string()),
            (
                "Observed time",
                format!("{:.3} s", agg.report.total_time_s),
            ),
        ];
        if !source.fingerprint.is_empty() {
            rows.push(("SHA-256", source.fingerprint.clone()));
        }
        for (name, signal) in agg.table.assignment() {
            rows.push((signal.column_name(), Self::escape_html(name)));
        }

        for (key, value) in rows {
            html.push_str(&format!(
                "        <tr><th>{}</th><td>{}</td></tr>\n",
                key, value
            ));
        }

        html.push_str("    </table>\n");
        html
    }

    /// Render the first rows of the pivoted table
    fn render_pivot_preview(&self, agg: &Aggregation) -> String {
        let mut html = String::new();
        html.push_str("    <h2>Pivoted Data</h2>\n");
        html.push_str("    <table>\n");
        html.push_str("        <tr><th>formatted_datetime</th><th>time_diff</th>");
        for signal in Signal::ALL {
            html.push_str(&format!("<th>{}</th>", signal.column_name()));
        }
        html.push_str("</tr>\n");

        let rows = agg.table.rows();
        let diffs = interval_durations(rows);
        for (row, diff) in rows.iter().zip(diffs).take(self.preview_rows) {
            html.push_str(&format!(
                "        <tr><td>{}</td><td>{}</td>",
                format_timestamp(row.timestamp),
                diff
            ));
            for status in row.statuses {
                match status {
                    Some(v) => html.push_str(&format!("<td>{}</td>", v)),
                    None => html.push_str("<td class=\"missing\">NaN</td>"),
                }
            }
            html.push_str("</tr>\n");
        }

        html.push_str("    </table>\n");
        html
    }

    fn render_time_table(&self, agg: &Aggregation) -> String {
        let mut html = String::new();
        html.push_str("    <h2>Downtime Percentages by Time</h2>\n");
        html.push_str("    <table>\n");
        html.push_str("        <tr><th>Component</th><th>Down time (s)</th><th>Downtime %</th></tr>\n");
        for s in &agg.report.signals {
            html.push_str(&format!(
                "        <tr><td>{}</td><td>{}</td>{}</tr>\n",
                s.signal.label(),
                s.time.down_time_s,
                self.percent_cell(s.time.percent)
            ));
        }
        html.push_str("    </table>\n");
        html
    }

    fn render_count_table(&self, agg: &Aggregation) -> String {
        let mut html = String::new();
        html.push_str("    <h2>Downtime Counts as Percentage of Total Occurrences</h2>\n");
        html.push_str("    <table>\n");
        html.push_str(
            "        <tr><th>Signal</th><th>Down</th><th>Total</th><th>Downtime %</th></tr>\n",
        );
        for s in &agg.report.signals {
            html.push_str(&format!(
                "        <tr><td>{}</td><td>{}</td><td>{}</td>{}</tr>\n",
                s.signal.column_name(),
                s.count.down_count,
                s.count.total_count,
                self.percent_cell(s.count.percent())
            ));
        }
        html.push_str("    </table>\n");
        html
    }

    /// Render a percentage bar chart as inline SVG
    ///
    /// The y axis spans 0-100%; undefined values get no bar and an `n/a` label.
    fn render_bar_chart(&self, title: &str, bars: &[ChartBar]) -> String {
        let plot_width = CHART_WIDTH - MARGIN_LEFT - MARGIN_RIGHT;
        let plot_height = CHART_HEIGHT - MARGIN_TOP - MARGIN_BOTTOM;
        let baseline = MARGIN_TOP + plot_height;
        let slot = plot_width / bars.len().max(1) as f64;
        let bar_width = slot * 0.6;

        let mut svg = String::new();
        svg.push_str(&format!(
            "    <svg class=\"chart\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\" role=\"img\" aria-label=\"{t}\">\n",
            w = CHART_WIDTH,
            h = CHART_HEIGHT,
            t = Self::escape_html(title)
        ));
        svg.push_str(&format!(
            "        <text x=\"{}\" y=\"20\" text-anchor=\"middle\">{}</text>\n",
            CHART_WIDTH / 2.0,
            Self::escape_html(title)
        ));

        for tick in [0.0, 25.0, 50.0, 75.0, 100.0] {
            let y = baseline - plot_height * tick / 100.0;
            svg.push_str(&format!(
                "        <line class=\"grid\" x1=\"{}\" y1=\"{y:.1}\" x2=\"{}\" y2=\"{y:.1}\"/>\n",
                MARGIN_LEFT,
                CHART_WIDTH - MARGIN_RIGHT,
            ));
            svg.push_str(&format!(
                "        <text x=\"{}\" y=\"{:.1}\" text-anchor=\"end\">{}</text>\n",
                MARGIN_LEFT - 6.0,
                y + 4.0,
                tick
            ));
        }

        for (i, bar) in bars.iter().enumerate() {
            let center = MARGIN_LEFT + slot * (i as f64 + 0.5);
            let label = Self::escape_html(&bar.label);
            match bar.value {
                Some(value) => {
                    let height = plot_height * value.clamp(0.0, 100.0) / 100.0;
                    svg.push_str(&format!(
                        "        <rect class=\"bar\" x=\"{:.1}\" y=\"{:.1}\" width=\"{:.1}\" height=\"{:.1}\"><title>{}: {}</title></rect>\n",
                        center - bar_width / 2.0,
                        baseline - height,
                        bar_width,
                        height,
                        label,
                        format_percent(Some(value), self.precision)
                    ));
                    svg.push_str(&format!(
                        "        <text x=\"{:.1}\" y=\"{:.1}\" text-anchor=\"middle\">{}</text>\n",
                        center,
                        baseline - height - 4.0,
                        format_percent(Some(value), self.precision)
                    ));
                }
                None => {
                    svg.push_str(&format!(
                        "        <text class=\"undefined\" x=\"{:.1}\" y=\"{:.1}\" text-anchor=\"middle\">n/a</text>\n",
                        center,
                        baseline - 4.0
                    ));
                }
            }
            svg.push_str(&format!(
                "        <text x=\"{:.1}\" y=\"{:.1}\" text-anchor=\"middle\">{}</text>\n",
                center,
                baseline + 16.0,
                label
            ));
        }

        svg.push_str(&format!(
            "        <line class=\"axis\" x1=\"{l}\" y1=\"{b:.1}\" x2=\"{r}\" y2=\"{b:.1}\"/>\n",
            l = MARGIN_LEFT,
            r = CHART_WIDTH - MARGIN_RIGHT,
            b = baseline
        ));
        svg.push_str(&format!(
            "        <line class=\"axis\" x1=\"{l}\" y1=\"{t}\" x2=\"{l}\" y2=\"{b:.1}\"/>\n",
            l = MARGIN_LEFT,
            t = MARGIN_TOP,
            b = baseline
        ));
        svg.push_str(&format!(
            "        <text x=\"{:.1}\" y=\"{:.1}\" text-anchor=\"middle\">Component</text>\n",
            MARGIN_LEFT + plot_width / 2.0,
            CHART_HEIGHT - 12.0
        ));
        svg.push_str(&format!(
            "        <text x=\"14\" y=\"{:.1}\" text-anchor=\"middle\" transform=\"rotate(-90 14 {:.1})\">Downtime Percentage (%)</text>\n",
            MARGIN_TOP + plot_height / 2.0,
            MARGIN_TOP + plot_height / 2.0
        ));
        svg.push_str("    </svg>\n");
        svg
    }

    /// Generate complete HTML document
    pub fn to_html(&self, agg: &Aggregation, source: &EventTable) -> String {
        let mut html = String::new();

        html.push_str("<!DOCTYPE html>\n");
        html.push_str("<html lang=\"en\">\n");

        html.push_str("<head>\n");
        html.push_str("    <meta charset=\"UTF-8\">\n");
        html.push_str(
            "    <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n",
        );
        html.push_str("    <title>Downtime Analysis</title>\n");
        html.push_str("    <style>");
        html.push_str(Self::generate_styles());
        html.push_str("</style>\n");
        html.push_str("</head>\n");

        html.push_str("<body>\n");
        html.push_str("    <h1>Downtime Analysis</h1>\n");

        html.push_str(&self.render_summary(agg, source));
        html.push_str(&self.render_pivot_preview(agg));

        html.push_str(&self.render_time_table(agg));
        html.push_str(
            &self.render_bar_chart("Downtime Percentages by Component", &agg.report.time_series()),
        );

        html.push_str(&self.render_count_table(agg));
        html.push_str(&self.render_bar_chart(
            "Downtime Counts as Percentage of Total Occurrences",
            &agg.report.count_series(),
        ));

        html.push_str("    <div class=\"footer\">\n");
        html.push_str(&format!(
            "        Generated by downtime {}\n",
            env!("CARGO_PKG_VERSION")
        ));
        html.push_str("    </div>\n");

        html.push_str("</body>\n");
        html.push_str("</html>\n");

        html
    }
}
