//! Vehicle-count sources.
//!
//! Where the per-tick demand comes from is the driver's business -- a
//! sensor pipeline, a recorded dataset, or a generator. The
//! [`DemandSource`] trait abstracts the mechanism, and the stub
//! implementations here cover replay and synthetic generation so the
//! controller can be exercised end-to-end without hardware.

use crossway_types::{DemandSample, EmergencyCommand};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// A source of per-tick demand samples.
pub trait DemandSource {
    /// The demand observed for the given tick.
    fn sample(&mut self, tick: u64) -> DemandSample;
}

/// A fixed count with no emergencies. Useful for cycle-timing tests.
#[derive(Debug, Clone, Copy)]
pub struct ConstantDemand {
    count: u32,
}

impl ConstantDemand {
    /// Create a source that always reports `count` vehicles.
    pub const fn new(count: u32) -> Self {
        Self { count }
    }
}

impl DemandSource for ConstantDemand {
    fn sample(&mut self, _tick: u64) -> DemandSample {
        DemandSample {
            vehicle_count: self.count,
            emergency: EmergencyCommand::None,
        }
    }
}

/// Replays a recorded sample sequence, wrapping around at the end.
///
/// An empty sequence yields the default sample (zero vehicles, no
/// emergency) forever.
#[derive(Debug, Clone)]
pub struct ReplayDemand {
    samples: Vec<DemandSample>,
    cursor: usize,
}

impl ReplayDemand {
    /// Create a replay source over the given samples.
    pub const fn new(samples: Vec<DemandSample>) -> Self {
        Self { samples, cursor: 0 }
    }

    /// Create a replay source from bare counts, with no emergencies.
    pub fn from_counts(counts: &[u32]) -> Self {
        let samples = counts
            .iter()
            .map(|&vehicle_count| DemandSample {
                vehicle_count,
                emergency: EmergencyCommand::None,
            })
            .collect();
        Self::new(samples)
    }
}

impl DemandSource for ReplayDemand {
    fn sample(&mut self, _tick: u64) -> DemandSample {
        let Some(sample) = self.samples.get(self.cursor).copied() else {
            return DemandSample::default();
        };
        self.cursor = self.cursor.saturating_add(1);
        if self.cursor >= self.samples.len() {
            self.cursor = 0;
        }
        sample
    }
}

/// Generates plausible demand: two overlaid slow waves plus jitter for
/// the count, and rare random priority requests.
///
/// Seeded, so a run is reproducible end-to-end given the same seed.
#[derive(Debug, Clone)]
pub struct SyntheticDemand {
    rng: StdRng,
    base: u32,
}

/// Per-tick probability of a synthetic emergency request.
const EMERGENCY_CHANCE: f64 = 0.002;

impl SyntheticDemand {
    /// Create a generator with the given seed and a base count of 10.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            base: 10,
        }
    }
}

impl DemandSource for SyntheticDemand {
    #[allow(
        clippy::arithmetic_side_effects,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss,
        clippy::suboptimal_flops
    )]
    fn sample(&mut self, tick: u64) -> DemandSample {
        let t = tick as f64;
        let wave = 8.0 * (t * 0.1).sin() + 5.0 * (t * 0.05).sin();
        let jitter = 3.0 * self.rng.random::<f64>();
        let count = (f64::from(self.base) + wave + jitter).max(0.0).trunc() as u32;

        let emergency = if self.rng.random::<f64>() < EMERGENCY_CHANCE {
            if self.rng.random_bool(0.5) {
                EmergencyCommand::NsPriority
            } else {
                EmergencyCommand::EwPriority
            }
        } else {
            EmergencyCommand::None
        };

        DemandSample {
            vehicle_count: count,
            emergency,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn constant_demand_is_constant() {
        let mut source = ConstantDemand::new(7);
        for tick in 0..10 {
            let sample = source.sample(tick);
            assert_eq!(sample.vehicle_count, 7);
            assert_eq!(sample.emergency, EmergencyCommand::None);
        }
    }

    #[test]
    fn replay_wraps_around() {
        let mut source = ReplayDemand::from_counts(&[1, 2, 3]);
        let counts: Vec<u32> = (0..7).map(|t| source.sample(t).vehicle_count).collect();
        assert_eq!(counts, vec![1, 2, 3, 1, 2, 3, 1]);
    }

    #[test]
    fn empty_replay_yields_defaults() {
        let mut source = ReplayDemand::new(Vec::new());
        assert_eq!(source.sample(0), DemandSample::default());
        assert_eq!(source.sample(1), DemandSample::default());
    }

    #[test]
    fn replay_preserves_emergency_commands() {
        let mut source = ReplayDemand::new(vec![
            DemandSample {
                vehicle_count: 4,
                emergency: EmergencyCommand::None,
            },
            DemandSample {
                vehicle_count: 9,
                emergency: EmergencyCommand::NsPriority,
            },
        ]);
        assert_eq!(source.sample(0).emergency, EmergencyCommand::None);
        assert_eq!(source.sample(1).emergency, EmergencyCommand::NsPriority);
    }

    #[test]
    fn synthetic_demand_is_reproducible_per_seed() {
        let mut a = SyntheticDemand::new(42);
        let mut b = SyntheticDemand::new(42);
        for tick in 0..100 {
            assert_eq!(a.sample(tick), b.sample(tick));
        }
    }

    #[test]
    fn synthetic_demand_varies_with_seed() {
        let mut a = SyntheticDemand::new(1);
        let mut b = SyntheticDemand::new(2);
        let differs = (0..50).any(|tick| a.sample(tick) != b.sample(tick));
        assert!(differs);
    }
}
