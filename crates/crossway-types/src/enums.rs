//! Enumeration types for the Crossway signal controller.
//!
//! The phase enumeration is closed: every phase the intersection can be
//! in is a variant here, and both the light assignment and the transition
//! logic match on it exhaustively.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::structs::LightAssignment;

/// One discrete light configuration the intersection can be in.
///
/// Exactly one phase is active at any instant. The light shown on each
/// approach is a pure function of the phase (see [`Phase::lights`]).
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[ts(export, export_to = "bindings/")]
pub enum Phase {
    /// North-South approach has green, East-West holds red.
    #[default]
    NsGreen,
    /// North-South approach is clearing on yellow.
    NsYellow,
    /// East-West approach has green, North-South holds red.
    EwGreen,
    /// East-West approach is clearing on yellow.
    EwYellow,
    /// Both approaches hold red (clearance interval).
    AllRed,
}

impl Phase {
    /// The light shown on each approach during this phase.
    ///
    /// Both approaches are never green simultaneously; each shows
    /// exactly one color.
    pub const fn lights(self) -> LightAssignment {
        match self {
            Self::NsGreen => LightAssignment {
                ns: LightColor::Green,
                ew: LightColor::Red,
            },
            Self::NsYellow => LightAssignment {
                ns: LightColor::Yellow,
                ew: LightColor::Red,
            },
            Self::EwGreen => LightAssignment {
                ns: LightColor::Red,
                ew: LightColor::Green,
            },
            Self::EwYellow => LightAssignment {
                ns: LightColor::Red,
                ew: LightColor::Yellow,
            },
            Self::AllRed => LightAssignment {
                ns: LightColor::Red,
                ew: LightColor::Red,
            },
        }
    }
}

/// The color shown on a single approach's signal head.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum LightColor {
    /// Stop.
    Red,
    /// Clear the intersection.
    Yellow,
    /// Proceed.
    Green,
}

/// A priority request from an approaching emergency vehicle.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[ts(export, export_to = "bindings/")]
pub enum EmergencyCommand {
    /// No emergency vehicle is approaching.
    #[default]
    None,
    /// Grant green to the North-South approach.
    NsPriority,
    /// Grant green to the East-West approach.
    EwPriority,
}

impl EmergencyCommand {
    /// Whether this command requests priority.
    pub const fn is_request(self) -> bool {
        !matches!(self, Self::None)
    }
}

/// The classifier's binary reading of traffic density.
///
/// Between the thin and dense thresholds the classifier holds its prior
/// state, so this value carries one bit of memory across ticks.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[ts(export, export_to = "bindings/")]
pub enum DensityState {
    /// Light traffic at the monitored approach.
    #[default]
    Thin,
    /// Heavy traffic at the monitored approach.
    Dense,
}
