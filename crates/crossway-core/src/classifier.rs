//! Dense/thin traffic density classification with hysteresis.
//!
//! The classifier turns a raw vehicle count into a binary density signal
//! with one bit of memory: counts at or above the dense threshold latch
//! DENSE, counts at or below the thin threshold latch THIN, and counts in
//! the dead band between the two leave the prior state untouched. The
//! dead band is what keeps the green-duration calculation from flapping
//! when the count hovers near a single cutoff.

use crossway_types::DensityState;

use crate::config::DensityConfig;

/// Errors that can occur when constructing a classifier.
#[derive(Debug, thiserror::Error)]
pub enum ClassifierError {
    /// The thresholds do not leave a valid dead band.
    #[error("dense threshold ({dense}) must exceed thin threshold ({thin})")]
    InvalidThresholds {
        /// The configured dense threshold.
        dense: u32,
        /// The configured thin threshold.
        thin: u32,
    },
}

/// Binary density classifier with hysteresis memory.
///
/// Created once per controller; the latched state persists across calls
/// for the lifetime of the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DensityClassifier {
    dense_threshold: u32,
    thin_threshold: u32,
    state: DensityState,
}

impl DensityClassifier {
    /// Create a classifier with the given thresholds, starting THIN.
    ///
    /// # Errors
    ///
    /// Returns [`ClassifierError::InvalidThresholds`] unless
    /// `dense_threshold > thin_threshold`.
    pub const fn new(dense_threshold: u32, thin_threshold: u32) -> Result<Self, ClassifierError> {
        if dense_threshold <= thin_threshold {
            return Err(ClassifierError::InvalidThresholds {
                dense: dense_threshold,
                thin: thin_threshold,
            });
        }
        Ok(Self {
            dense_threshold,
            thin_threshold,
            state: DensityState::Thin,
        })
    }

    /// Create a classifier from the density section of the config.
    ///
    /// # Errors
    ///
    /// Returns [`ClassifierError::InvalidThresholds`] if the configured
    /// thresholds are not strictly ordered.
    pub const fn from_config(config: &DensityConfig) -> Result<Self, ClassifierError> {
        Self::new(config.dense_threshold, config.thin_threshold)
    }

    /// Classify a vehicle count, updating the latched state.
    ///
    /// Counts strictly between the two thresholds return the prior state
    /// unchanged.
    pub const fn classify(&mut self, count: u32) -> DensityState {
        if count >= self.dense_threshold {
            self.state = DensityState::Dense;
        } else if count <= self.thin_threshold {
            self.state = DensityState::Thin;
        }
        self.state
    }

    /// The currently latched state, without updating it.
    pub const fn state(&self) -> DensityState {
        self.state
    }
}
