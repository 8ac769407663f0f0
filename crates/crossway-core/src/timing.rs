//! Green duration computation and rush-hour scheduling.
//!
//! The green interval is recomputed on every tick while a green phase is
//! active, not fixed at phase entry: a density flip or a rush-window edge
//! mid-phase moves the transition threshold for the phase already in
//! progress. Order of operations matters -- the rush multiplier is applied
//! before the density adjustment, so the two compound multiplicatively.

use chrono::{DateTime, Timelike, Utc};
use crossway_types::DensityState;

use crate::config::{ScheduleConfig, SignalConfig};

/// Whether the given instant falls inside any configured rush window.
///
/// Windows are half-open hour-of-day intervals; the hour is read from
/// the injected timestamp, so drivers in other timezones shift the
/// timestamps they supply.
pub fn is_rush_hour(schedule: &ScheduleConfig, now: DateTime<Utc>) -> bool {
    let hour = now.hour();
    schedule.rush_windows.iter().any(|w| w.contains(hour))
}

/// Compute the green interval in whole seconds for the current tick.
///
/// Starting from the base green: the rush multiplier is applied first,
/// then the density adjustment (`t += t * adjustment`) when the density
/// signal is enabled and reads dense. The result is truncated to whole
/// seconds and clamped to the configured bounds.
#[allow(
    clippy::arithmetic_side_effects,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::suboptimal_flops
)]
pub fn green_duration_secs(config: &SignalConfig, density: DensityState, rush: bool) -> u32 {
    let mut t = f64::from(config.timing.base_green_secs);

    if rush {
        t *= config.schedule.rush_multiplier;
    }

    if config.density.enabled && density == DensityState::Dense {
        t += t * config.density.adjustment;
    }

    let min = f64::from(config.timing.min_green_secs);
    let max = f64::from(config.timing.max_green_secs);
    t.trunc().max(min).min(max) as u32
}
