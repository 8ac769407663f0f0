//! Phase state machine, adaptive timing, and emergency preemption for the
//! Crossway signal controller.
//!
//! The controller governs one intersection. Every control tick the driver
//! supplies a vehicle count, an optional emergency command, and the current
//! time; the controller classifies traffic density, recomputes the active
//! green threshold, advances the phase state machine, and emits one tick
//! record for the persistence collaborator.
//!
//! # Modules
//!
//! - [`classifier`] -- Dense/thin hysteresis over raw vehicle counts.
//! - [`clock`] -- Injected time source trait and test clocks.
//! - [`config`] -- Typed configuration with YAML loading and validation.
//! - [`controller`] -- The [`SignalController`] aggregate and its tick loop.
//! - [`demand`] -- Vehicle-count source trait and stub implementations.
//! - [`preemption`] -- Emergency preemption context.
//! - [`runner`] -- Bounded synchronous run harness.
//! - [`sink`] -- Tick record sink trait and stub implementations.
//! - [`timing`] -- Green duration computation and rush-hour schedule.
//!
//! [`SignalController`]: controller::SignalController

pub mod classifier;
pub mod clock;
pub mod config;
pub mod controller;
pub mod demand;
pub mod preemption;
pub mod runner;
pub mod sink;
pub mod timing;

pub use config::SignalConfig;
pub use controller::{ControllerError, SignalController, TickOutput};
