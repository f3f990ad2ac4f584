//! CLI argument parsing for downtime

use crate::config::SignalMapping;
use crate::ingest::InputFormat;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Output format for downtime reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text summary (default)
    Text,
    /// JSON format for machine parsing
    Json,
    /// CSV format for spreadsheet analysis
    Csv,
    /// Standalone HTML dashboard with bar charts
    Html,
}

#[derive(Parser, Debug)]
#[command(name = "downtime")]
#[command(version)]
#[command(about = "Equipment downtime analysis from status event logs", long_about = None)]
pub struct Cli {
    /// Event table with Time, Name and Status columns (.csv or .json)
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Output format
    #[arg(long = "format", value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Input format (default: from file extension)
    #[arg(long = "input-format", value_enum, value_name = "FORMAT")]
    pub input_format: Option<InputFormat>,

    /// TOML configuration file
    #[arg(short = 'c', long = "config", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// How source signal names are bound to plant signals (overrides config)
    #[arg(short = 'm', long = "mapping", value_enum)]
    pub mapping: Option<SignalMapping>,

    /// Decimal places for percentages (overrides config)
    #[arg(long = "precision", value_name = "N")]
    pub precision: Option<usize>,

    /// Rows shown in the dashboard's pivot preview (overrides config)
    #[arg(long = "preview-rows", value_name = "N")]
    pub preview_rows: Option<usize>,

    /// Write the report to a file instead of stdout
    #[arg(short = 'o', long = "output", value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Also write the full pivoted table as CSV
    #[arg(long = "export-pivot", value_name = "PATH")]
    pub export_pivot: Option<PathBuf>,

    /// Enable debug tracing to stderr
    #[arg(long = "debug")]
    pub debug: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_requires_input() {
        assert!(Cli::try_parse_from(["downtime"]).is_err());
    }

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["downtime", "ALL.csv"]);
        assert_eq!(cli.input, PathBuf::from("ALL.csv"));
        assert_eq!(cli.format, OutputFormat::Text);
        assert!(cli.input_format.is_none());
        assert!(cli.mapping.is_none());
        assert!(cli.precision.is_none());
        assert!(cli.output.is_none());
        assert!(!cli.debug);
    }

    #[test]
    fn test_cli_format_html() {
        let cli = Cli::parse_from(["downtime", "--format", "html", "ALL.csv"]);
        assert_eq!(cli.format, OutputFormat::Html);
    }

    #[test]
    fn test_cli_mapping_by_name() {
        let cli = Cli::parse_from(["downtime", "-m", "by-name", "ALL.csv"]);
        assert_eq!(cli.mapping, Some(SignalMapping::ByName));
    }

    #[test]
    fn test_cli_overrides() {
        let cli = Cli::parse_from([
            "downtime",
            "--input-format",
            "json",
            "--precision",
            "4",
            "--export-pivot",
            "pivot.csv",
            "-o",
            "report.html",
            "--debug",
            "events.dat",
        ]);
        assert_eq!(cli.input_format, Some(InputFormat::Json));
        assert_eq!(cli.precision, Some(4));
        assert_eq!(cli.export_pivot, Some(PathBuf::from("pivot.csv")));
        assert_eq!(cli.output, Some(PathBuf::from("report.html")));
        assert!(cli.debug);
    }

    #[test]
    fn test_cli_rejects_unknown_format() {
        assert!(Cli::try_parse_from(["downtime", "--format", "xml", "ALL.csv"]).is_err());
    }
}
