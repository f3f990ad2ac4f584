//! Status event ingestion from spreadsheet exports
//!
//! Reads `Time`, `Name`, `Status` columns from CSV or JSON. Timestamps that
//! cannot be parsed are kept as `None` so the pivot can drop them; a missing
//! column or a malformed row aborts the load.

use crate::error::{DowntimeError, Result};
use crate::timestamp::parse_timestamp;
use chrono::NaiveDateTime;
use clap::ValueEnum;
use csv::{ReaderBuilder, StringRecord};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::Path;

pub const TIME_COLUMN: &str = "Time";
pub const NAME_COLUMN: &str = "Name";
pub const STATUS_COLUMN: &str = "Status";

/// On-disk layout of an event table
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputFormat {
    /// Comma-separated values with a header row
    Csv,
    /// JSON array of objects
    Json,
}

impl InputFormat {
    /// Guess the format from a file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "csv" | "txt" => Some(InputFormat::Csv),
            "json" => Some(InputFormat::Json),
            _ => None,
        }
    }
}

/// One source row
#[derive(Debug, Clone, PartialEq)]
pub struct StatusEvent {
    /// Time cell as written in the source
    pub raw_time: String,
    /// Parsed timestamp (`None` when unparseable)
    pub time: Option<NaiveDateTime>,
    /// Signal name exactly as written (empty when the cell was blank)
    pub name: String,
    /// Numeric status (`None` when blank or non-numeric)
    pub status: Option<f64>,
}

impl StatusEvent {
    /// Build an event from raw cell text
    pub fn from_cells(time: &str, name: &str, status: &str) -> Self {
        Self {
            raw_time: time.to_string(),
            time: parse_timestamp(time),
            name: name.to_string(),
            status: parse_status(status),
        }
    }
}

/// Events loaded from one source, with provenance
#[derive(Debug, Clone)]
pub struct EventTable {
    /// Where the events came from (path or "<memory>")
    pub source: String,
    /// SHA-256 of the raw input bytes, hex encoded
    pub fingerprint: String,
    pub events: Vec<StatusEvent>,
}

impl EventTable {
    /// Wrap in-memory events (no file provenance)
    pub fn from_events(events: Vec<StatusEvent>) -> Self {
        Self {
            source: "<memory>".to_string(),
            fingerprint: String::new(),
            events,
        }
    }

    /// Load an event table from disk
    ///
    /// The format is taken from `format` when given, otherwise from the file
    /// extension.
    pub fn from_path<P: AsRef<Path>>(path: P, format: Option<InputFormat>) -> Result<Self> {
        let path = path.as_ref();
        let format = match format.or_else(|| InputFormat::from_path(path)) {
            Some(format) => format,
            None => return Err(DowntimeError::UnknownInputFormat(path.display().to_string())),
        };

        let bytes = fs::read(path)?;
        let mut table = Self::from_bytes(&bytes, format)?;
        table.source = path.display().to_string();

        tracing::info!(
            "Loaded {} events from {} ({:?})",
            table.events.len(),
            table.source,
            format
        );

        Ok(table)
    }

    /// Parse an event table from raw bytes
    pub fn from_bytes(bytes: &[u8], format: InputFormat) -> Result<Self> {
        let decoded = String::from_utf8_lossy(bytes);
        let text: &str = decoded.strip_prefix('\u{feff}').unwrap_or(&decoded);

        let events = match format {
            InputFormat::Csv => parse_csv(text)?,
            InputFormat::Json => parse_json(text)?,
        };

        Ok(Self {
            source: "<memory>".to_string(),
            fingerprint: fingerprint(bytes),
            events,
        })
    }

    /// Number of events whose timestamp could not be parsed
    pub fn unparseable_count(&self) -> usize {
        self.events.iter().filter(|e| e.time.is_none()).count()
    }
}

/// Hex SHA-256 of `bytes`
pub fn fingerprint(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

fn parse_status(cell: &str) -> Option<f64> {
    let cell = cell.trim();
    if cell.is_empty() {
        return None;
    }
    cell.parse::<f64>().ok().filter(|v| !v.is_nan())
}

fn column_index(header: &StringRecord, column: &str) -> Result<usize> {
    header
        .iter()
        .position(|h| h.trim() == column)
        .ok_or_else(|| DowntimeError::MissingColumn(column.to_string()))
}

fn csv_error(err: csv::Error) -> DowntimeError {
    if let csv::ErrorKind::UnequalLengths {
        pos,
        expected_len,
        len,
    } = err.kind()
    {
        return DowntimeError::MalformedRow {
            line: pos.as_ref().map_or(0, |p| p.line() as usize),
            expected: *expected_len as usize,
            found: *len as usize,
        };
    }
    DowntimeError::Csv(err)
}

/// Parse CSV text with a header row into events
///
/// Every row must have as many fields as the header. Blank lines are skipped.
pub fn parse_csv(text: &str) -> Result<Vec<StatusEvent>> {
    let mut rdr = ReaderBuilder::new().from_reader(text.as_bytes());

    let header = rdr.headers().map_err(csv_error)?.clone();
    if header.is_empty() {
        return Err(DowntimeError::EmptyInput);
    }

    let time_idx = column_index(&header, TIME_COLUMN)?;
    let name_idx = column_index(&header, NAME_COLUMN)?;
    let status_idx = column_index(&header, STATUS_COLUMN)?;

    let mut events = Vec::new();
    for result in rdr.records() {
        let record = result.map_err(csv_error)?;
        events.push(StatusEvent::from_cells(
            &record[time_idx],
            &record[name_idx],
            &record[status_idx],
        ));
    }

    Ok(events)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn json_cell(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(true) => "1".to_string(),
        Value::Bool(false) => "0".to_string(),
        other => other.to_string(),
    }
}

/// Parse a JSON array of `{"Time", "Name", "Status"}` objects into events
///
/// Every object must carry all three keys; `null` values are allowed and
/// behave like blank spreadsheet cells.
pub fn parse_json(text: &str) -> Result<Vec<StatusEvent>> {
    let root: Value = serde_json::from_str(text)?;
    let rows = match root {
        Value::Array(rows) => rows,
        other => return Err(DowntimeError::UnexpectedJsonShape(json_kind(&other).to_string())),
    };

    let mut events = Vec::with_capacity(rows.len());
    for row in &rows {
        let object = row.as_object().ok_or_else(|| {
            DowntimeError::UnexpectedJsonShape(format!("an array containing {}", json_kind(row)))
        })?;

        let cell = |column: &str| -> Result<String> {
            object
                .get(column)
                .map(json_cell)
                .ok_or_else(|| DowntimeError::MissingColumn(column.to_string()))
        };

        let raw_time = cell(TIME_COLUMN)?;
        let mut event = StatusEvent::from_cells(&raw_time, &cell(NAME_COLUMN)?, &cell(STATUS_COLUMN)?);
        // Numeric time values (spreadsheet serials, epochs) are not interpreted as dates
        if matches!(object.get(TIME_COLUMN), Some(Value::Number(_))) {
            event.time = None;
        }
        events.push(event);
    }

    Ok(events)
}
