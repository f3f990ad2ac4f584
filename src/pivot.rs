//! Reshape status events into a time-indexed wide table
//!
//! One row per distinct valid timestamp, one column per plant signal. For a
//! (timestamp, signal) pair seen more than once the first non-missing status
//! wins. Rows are kept in ascending timestamp order, which later drives the
//! interval durations.

use crate::config::{DowntimeConfig, SignalMapping};
use crate::error::{DowntimeError, Result};
use crate::ingest::StatusEvent;
use crate::signal::Signal;
use chrono::NaiveDateTime;
use regex::Regex;
use std::collections::{BTreeMap, BTreeSet};

/// One pivoted row
#[derive(Debug, Clone, PartialEq)]
pub struct WideRow {
    pub timestamp: NaiveDateTime,
    /// Status per signal, indexed by `Signal::index`
    pub statuses: [Option<f64>; 4],
}

impl WideRow {
    /// Status of `signal` at this row (`None` when not reported)
    pub fn status(&self, signal: Signal) -> Option<f64> {
        self.statuses[signal.index()]
    }
}

/// Binds distinct source names to plant signals
#[derive(Debug, Clone)]
pub enum SignalResolver {
    /// Distinct names ranked lexically, assigned in `Signal::ALL` order
    Positional,
    /// Names matched against one pattern per signal
    ByName(Vec<(Signal, Regex)>),
}

impl SignalResolver {
    /// Build the resolver selected by `config`
    pub fn from_config(config: &DowntimeConfig) -> Result<Self> {
        match config.mapping {
            SignalMapping::Positional => Ok(SignalResolver::Positional),
            SignalMapping::ByName => {
                let mut patterns = Vec::with_capacity(Signal::ALL.len());
                for signal in Signal::ALL {
                    let regex = Regex::new(config.bindings.pattern(signal)).map_err(|source| {
                        DowntimeError::InvalidPattern {
                            signal: signal.column_name(),
                            source,
                        }
                    })?;
                    patterns.push((signal, regex));
                }
                Ok(SignalResolver::ByName(patterns))
            }
        }
    }

    /// Assign each distinct source name to a signal
    ///
    /// Positional assignment requires exactly four names. By-name assignment
    /// skips names that match no pattern and rejects names matching several.
    pub fn resolve(&self, names: &BTreeSet<String>) -> Result<BTreeMap<String, Signal>> {
        match self {
            SignalResolver::Positional => {
                if names.len() != Signal::ALL.len() {
                    return Err(DowntimeError::SignalCountMismatch {
                        found: names.len(),
                        names: names.iter().cloned().collect(),
                    });
                }
                Ok(names.iter().cloned().zip(Signal::ALL).collect())
            }
            SignalResolver::ByName(patterns) => {
                let mut assignment = BTreeMap::new();
                for name in names {
                    let mut matched: Option<Signal> = None;
                    for (signal, regex) in patterns {
                        if !regex.is_match(name) {
                            continue;
                        }
                        if let Some(first) = matched {
                            return Err(DowntimeError::AmbiguousSignal {
                                name: name.clone(),
                                first: first.column_name(),
                                second: signal.column_name(),
                            });
                        }
                        matched = Some(*signal);
                    }
                    match matched {
                        Some(signal) => {
                            assignment.insert(name.clone(), signal);
                        }
                        None => tracing::warn!("Signal name '{}' matches no binding, ignoring", name),
                    }
                }
                Ok(assignment)
            }
        }
    }
}

/// The pivoted table
#[derive(Debug, Clone, PartialEq)]
pub struct WideTable {
    rows: Vec<WideRow>,
    /// Source name → signal, as resolved for this table
    assignment: BTreeMap<String, Signal>,
    /// Events dropped because their timestamp did not parse
    dropped_events: usize,
}

impl WideTable {
    /// Pivot `events` into a wide table
    pub fn reshape(events: &[StatusEvent], resolver: &SignalResolver) -> Result<Self> {
        let dropped_events = events.iter().filter(|e| e.time.is_none()).count();

        // Names with no readable status never become columns
        let valid: Vec<(NaiveDateTime, &str, f64)> = events
            .iter()
            .filter_map(|e| match (e.time, e.status) {
                (Some(ts), Some(status)) if !e.name.is_empty() => {
                    Some((ts, e.name.as_str(), status))
                }
                _ => None,
            })
            .collect();

        let names: BTreeSet<String> = valid.iter().map(|(_, name, _)| name.to_string()).collect();
        let assignment = resolver.resolve(&names)?;

        for (name, signal) in &assignment {
            tracing::debug!("Mapped source name '{}' to {}", name, signal);
        }

        let mut cells: BTreeMap<NaiveDateTime, [Option<f64>; 4]> = BTreeMap::new();
        for (ts, name, status) in valid {
            let Some(signal) = assignment.get(name) else {
                continue;
            };
            let slot = &mut cells.entry(ts).or_insert([None; 4])[signal.index()];
            if slot.is_none() {
                *slot = Some(status);
            }
        }

        let rows: Vec<WideRow> = cells
            .into_iter()
            .map(|(timestamp, statuses)| WideRow { timestamp, statuses })
            .collect();

        tracing::debug!(
            "Pivoted {} events into {} rows ({} dropped for unparseable time)",
            events.len(),
            rows.len(),
            dropped_events
        );

        Ok(Self {
            rows,
            assignment,
            dropped_events,
        })
    }

    /// Build a table directly from rows, sorting them by timestamp
    pub fn from_rows(mut rows: Vec<WideRow>) -> Self {
        rows.sort_by_key(|r| r.timestamp);
        Self {
            rows,
            assignment: BTreeMap::new(),
            dropped_events: 0,
        }
    }

    pub fn rows(&self) -> &[WideRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Source name → signal mapping used for this table
    pub fn assignment(&self) -> &BTreeMap<String, Signal> {
        &self.assignment
    }

    pub fn dropped_events(&self) -> usize {
        self.dropped_events
    }
}
