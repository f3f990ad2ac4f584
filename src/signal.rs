//! The four plant signals tracked by the downtime report

use serde::{Deserialize, Serialize};

/// A recognized plant signal
///
/// Declaration order is the positional order used when pivoted columns are
/// named by rank: the lexically smallest source name becomes `FlarePilot`,
/// the largest becomes `PlcEsdTrip`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Signal {
    #[serde(rename = "Flare_Pilot_Status")]
    FlarePilot,
    #[serde(rename = "Combustor_Pilot_Status")]
    CombustorPilot,
    #[serde(rename = "Process_SD_PR1_Status")]
    ProcessShutdown,
    #[serde(rename = "PLC_ESD_Tripped_Shutdown")]
    PlcEsdTrip,
}

impl Signal {
    /// All signals in positional order
    pub const ALL: [Signal; 4] = [
        Signal::FlarePilot,
        Signal::CombustorPilot,
        Signal::ProcessShutdown,
        Signal::PlcEsdTrip,
    ];

    /// Column slot in a wide row
    pub fn index(self) -> usize {
        match self {
            Signal::FlarePilot => 0,
            Signal::CombustorPilot => 1,
            Signal::ProcessShutdown => 2,
            Signal::PlcEsdTrip => 3,
        }
    }

    /// Column name in the pivoted table
    pub fn column_name(self) -> &'static str {
        match self {
            Signal::FlarePilot => "Flare_Pilot_Status",
            Signal::CombustorPilot => "Combustor_Pilot_Status",
            Signal::ProcessShutdown => "Process_SD_PR1_Status",
            Signal::PlcEsdTrip => "PLC_ESD_Tripped_Shutdown",
        }
    }

    /// Component label used on charts
    pub fn label(self) -> &'static str {
        match self {
            Signal::FlarePilot => "Flare Pilot",
            Signal::CombustorPilot => "Combustor Pilot",
            Signal::ProcessShutdown => "Process SD PR1",
            Signal::PlcEsdTrip => "PLC ESD Tripped Shutdown",
        }
    }

    /// Short name used in the text summary ("Flare downtime: ...")
    pub fn short_name(self) -> &'static str {
        match self {
            Signal::FlarePilot => "Flare",
            Signal::CombustorPilot => "Combustor",
            Signal::ProcessShutdown => "Process SD",
            Signal::PlcEsdTrip => "PLC ESD",
        }
    }

    /// Status value that means "down" for this signal
    ///
    /// The ESD trip signal is inverted: 0 means tripped.
    pub fn down_value(self) -> f64 {
        match self {
            Signal::PlcEsdTrip => 0.0,
            _ => 1.0,
        }
    }

    /// Whether process-shutdown readings mask this signal's downtime
    pub fn excluded_during_shutdown(self) -> bool {
        matches!(self, Signal::FlarePilot | Signal::CombustorPilot)
    }
}

impl std::fmt::Display for Signal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.column_name())
    }
}
