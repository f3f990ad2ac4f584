//! Configuration for signal mapping and report display
//!
//! Loaded from an optional TOML file; CLI flags override individual values.
//!
//! # Example TOML
//! ```toml
//! mapping = "by-name"
//! precision = 2
//! preview_rows = 5
//!
//! [bindings]
//! flare_pilot = "(?i)flare"
//! combustor_pilot = "(?i)combustor"
//! process_shutdown = "(?i)process.*sd"
//! plc_esd_trip = "(?i)plc.*esd"
//! ```

use crate::error::{DowntimeError, Result};
use crate::signal::Signal;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Upper bound for displayed decimal places
const MAX_PRECISION: usize = 10;

/// How distinct source signal names are bound to the four plant signals
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SignalMapping {
    /// Rank the distinct names lexically and assign signals by position
    #[default]
    Positional,
    /// Match each name against the configured binding patterns
    ByName,
}

/// Regular expressions binding source names to signals (by-name mapping only)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SignalBindings {
    pub flare_pilot: String,
    pub combustor_pilot: String,
    pub process_shutdown: String,
    pub plc_esd_trip: String,
}

impl Default for SignalBindings {
    fn default() -> Self {
        Self {
            flare_pilot: "^Flare_Pilot_Status$".to_string(),
            combustor_pilot: "^Combustor_Pilot_Status$".to_string(),
            process_shutdown: "^Process_SD_PR1_Status$".to_string(),
            plc_esd_trip: "^PLC_ESD_Tripped_Shutdown$".to_string(),
        }
    }
}

impl SignalBindings {
    /// Pattern bound to `signal`
    pub fn pattern(&self, signal: Signal) -> &str {
        match signal {
            Signal::FlarePilot => &self.flare_pilot,
            Signal::CombustorPilot => &self.combustor_pilot,
            Signal::ProcessShutdown => &self.process_shutdown,
            Signal::PlcEsdTrip => &self.plc_esd_trip,
        }
    }
}

/// Downtime report configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DowntimeConfig {
    /// Signal mapping strategy
    pub mapping: SignalMapping,

    /// Name patterns used when `mapping = "by-name"`
    pub bindings: SignalBindings,

    /// Decimal places for displayed percentages
    pub precision: usize,

    /// Number of pivoted rows shown in the dashboard preview
    pub preview_rows: usize,
}

impl Default for DowntimeConfig {
    fn default() -> Self {
        Self {
            mapping: SignalMapping::Positional,
            bindings: SignalBindings::default(),
            precision: 2,
            preview_rows: 5,
        }
    }
}

impl DowntimeConfig {
    /// Load configuration from a TOML file
    pub fn from_toml<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from TOML text and validate it
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(content).map_err(|e| DowntimeError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.precision > MAX_PRECISION {
            return Err(DowntimeError::InvalidConfig(format!(
                "precision must be <= {}, got {}",
                MAX_PRECISION, self.precision
            )));
        }

        for signal in Signal::ALL {
            if self.bindings.pattern(signal).trim().is_empty() {
                return Err(DowntimeError::InvalidConfig(format!(
                    "binding pattern for {} is empty",
                    signal
                )));
            }
        }

        Ok(())
    }
}
