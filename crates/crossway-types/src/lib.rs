//! Shared type definitions for the Crossway signal controller.
//!
//! This crate is the single source of truth for the types exchanged
//! across the controller boundary: the phase and light enumerations, the
//! per-tick demand sample supplied by the driver, and the tick record
//! handed to the persistence collaborator. Types defined here flow
//! downstream to `TypeScript` via `ts-rs` for the signal timeline viewer.
//!
//! # Modules
//!
//! - [`enums`] -- Phase, light color, emergency command, and density state
//! - [`structs`] -- Light assignment, tick record, and demand sample

pub mod enums;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use enums::{DensityState, EmergencyCommand, LightColor, Phase};
pub use structs::{DemandSample, LightAssignment, TickRecord};
