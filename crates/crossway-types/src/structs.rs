//! Boundary structs for the Crossway signal controller.
//!
//! These are the values that cross the controller boundary each tick:
//! the demand sample coming in from the count source, and the light
//! assignment and tick record going out to the display and persistence
//! collaborators.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::{DensityState, EmergencyCommand, LightColor, Phase};

/// The light shown on each approach at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct LightAssignment {
    /// North-South approach.
    pub ns: LightColor,
    /// East-West approach.
    pub ew: LightColor,
}

/// One tick's worth of input from the vehicle-count collaborator.
///
/// The count is whatever the source reports for the monitored approach;
/// the controller treats it as given and performs no validation beyond
/// what the type already guarantees.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct DemandSample {
    /// Vehicles observed at the monitored approach.
    pub vehicle_count: u32,
    /// Emergency priority request accompanying this sample, if any.
    pub emergency: EmergencyCommand,
}

/// One immutable observation of controller state, emitted every tick.
///
/// Records are handed to the persistence collaborator through a sink;
/// the controller itself retains no log buffer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct TickRecord {
    /// The injected timestamp at which this tick ran.
    pub timestamp: DateTime<Utc>,
    /// Phase at the end of the tick.
    pub phase: Phase,
    /// North-South light at the end of the tick.
    pub ns_light: LightColor,
    /// East-West light at the end of the tick.
    pub ew_light: LightColor,
    /// Vehicle count supplied this tick.
    pub vehicle_count: u32,
    /// Classifier state after this tick's update.
    pub density: DensityState,
    /// Emergency command supplied this tick (as given, even if ignored).
    pub emergency: EmergencyCommand,
    /// Milliseconds since the current phase was entered, clamped at zero.
    pub phase_elapsed_ms: u64,
}
