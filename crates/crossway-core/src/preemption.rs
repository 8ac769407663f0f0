//! Emergency preemption context.
//!
//! When an emergency vehicle approaches, the normal cycle is interrupted:
//! the intersection is forced all-red, the requested approach is granted
//! an extended green, and the normal cycle resumes from the matching
//! yellow. This module owns the bookkeeping for one preemption episode;
//! the phase transitions themselves live in the controller.
//!
//! A request arriving while an episode is active is ignored outright --
//! no queueing, no replacement. Escalation or cancellation mid-episode is
//! not supported.

use chrono::{DateTime, Utc};
use crossway_types::{EmergencyCommand, Phase};

/// Bookkeeping for the current (or most recent) preemption episode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmergencyContext {
    active: bool,
    command: EmergencyCommand,
    started_at: DateTime<Utc>,
    pre_emergency_phase: Phase,
}

impl EmergencyContext {
    /// Create an inactive context.
    pub(crate) const fn new(now: DateTime<Utc>) -> Self {
        Self {
            active: false,
            command: EmergencyCommand::None,
            started_at: now,
            pre_emergency_phase: Phase::NsGreen,
        }
    }

    /// Latch a preemption request.
    ///
    /// Returns `true` if the request was accepted. A non-request command
    /// or a request arriving while an episode is already active is
    /// ignored and returns `false`.
    pub(crate) const fn engage(
        &mut self,
        command: EmergencyCommand,
        current_phase: Phase,
        now: DateTime<Utc>,
    ) -> bool {
        if self.active || !command.is_request() {
            return false;
        }
        self.active = true;
        self.command = command;
        self.started_at = now;
        self.pre_emergency_phase = current_phase;
        true
    }

    /// End the episode. The command and entry instant stay latched for
    /// inspection until the next engagement.
    pub(crate) const fn release(&mut self) {
        self.active = false;
    }

    /// Whether a preemption episode is in progress.
    pub const fn active(&self) -> bool {
        self.active
    }

    /// The latched command of the current or most recent episode.
    pub const fn command(&self) -> EmergencyCommand {
        self.command
    }

    /// The instant the current or most recent episode began.
    pub const fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// The phase that was interrupted by the current or most recent
    /// episode.
    pub const fn pre_emergency_phase(&self) -> Phase {
        self.pre_emergency_phase
    }
}
