//! Downtime - equipment downtime analysis from status event logs
//!
//! This library pivots timestamped status events for four plant signals into
//! a time-indexed table and computes time-weighted and occurrence-weighted
//! downtime percentages, with text, JSON, CSV and HTML dashboard reports.

pub mod aggregate;
pub mod cli;
pub mod config;
pub mod csv_output;
pub mod error;
pub mod html_output;
pub mod ingest;
pub mod json_output;
pub mod pivot;
pub mod signal;
pub mod text_output;
pub mod timestamp;

pub use aggregate::{Aggregation, DowntimeAggregator, DowntimeReport};
pub use config::{DowntimeConfig, SignalMapping};
pub use error::{DowntimeError, Result};
pub use ingest::{EventTable, StatusEvent};
pub use pivot::{WideRow, WideTable};
pub use signal::Signal;
