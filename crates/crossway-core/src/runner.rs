//! Bounded synchronous run harness.
//!
//! Wires a demand source, a clock, the controller, and a record sink
//! into a tick loop that stops after a fixed number of ticks. This is a
//! replay and test harness, not an entry point: cadence belongs to the
//! clock (a stepping clock advances simulated time per tick; a live
//! driver would sleep between calls itself), and cancellation is
//! external -- stop calling, and the controller stops.

use crossway_types::Phase;
use tracing::{debug, info};

use crate::clock::Clock;
use crate::controller::SignalController;
use crate::demand::DemandSource;
use crate::sink::RecordSink;

/// Summary of a bounded run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    /// Number of ticks executed.
    pub total_ticks: u64,
    /// Phase the controller ended in.
    pub final_phase: Phase,
    /// Number of preemption episodes that began during the run.
    pub preemptions: u64,
}

/// Drive the controller for `max_ticks` ticks.
///
/// Each iteration samples demand, reads the clock, runs one tick, and
/// forwards the record to the sink. Preemption episodes are counted on
/// the rising edge of the controller's emergency flag.
pub fn run_bounded(
    controller: &mut SignalController,
    demand: &mut dyn DemandSource,
    clock: &mut dyn Clock,
    sink: &mut dyn RecordSink,
    max_ticks: u64,
) -> RunSummary {
    info!(max_ticks, "Signal run starting");

    let mut total_ticks: u64 = 0;
    let mut preemptions: u64 = 0;
    let mut was_active = controller.emergency_active();

    for tick in 0..max_ticks {
        let sample = demand.sample(tick);
        let now = clock.now();
        let output = controller.tick(sample.vehicle_count, sample.emergency, now);
        sink.accept(&output.record);

        if controller.emergency_active() && !was_active {
            preemptions = preemptions.saturating_add(1);
        }
        was_active = controller.emergency_active();
        total_ticks = total_ticks.saturating_add(1);

        debug!(tick, phase = ?output.record.phase, "Run tick complete");
    }

    let summary = RunSummary {
        total_ticks,
        final_phase: controller.phase(),
        preemptions,
    };
    info!(
        total_ticks = summary.total_ticks,
        final_phase = ?summary.final_phase,
        preemptions = summary.preemptions,
        "Signal run ended"
    );
    summary
}
