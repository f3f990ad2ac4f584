//! Error types for event ingestion and downtime aggregation

use thiserror::Error;

/// Errors that abort a downtime computation
#[derive(Error, Debug)]
pub enum DowntimeError {
    #[error("Missing required column: {0}")]
    MissingColumn(String),

    #[error("Malformed row at line {line}: expected {expected} fields, found {found}")]
    MalformedRow {
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error("Invalid CSV input: {0}")]
    Csv(#[source] csv::Error),

    #[error("Input is empty: no header row found")]
    EmptyInput,

    #[error("Invalid JSON input: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("JSON input must be an array of objects, found {0}")]
    UnexpectedJsonShape(String),

    #[error("Cannot determine input format for '{0}' (use --input-format)")]
    UnknownInputFormat(String),

    #[error("Expected exactly 4 distinct signal names, found {found}: {names:?}")]
    SignalCountMismatch { found: usize, names: Vec<String> },

    #[error("Signal name '{name}' matches bindings for both {first} and {second}")]
    AmbiguousSignal {
        name: String,
        first: &'static str,
        second: &'static str,
    },

    #[error("Invalid binding pattern for {signal}: {source}")]
    InvalidPattern {
        signal: &'static str,
        #[source]
        source: regex::Error,
    },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, DowntimeError>;
