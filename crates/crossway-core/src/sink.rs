//! Tick record sinks.
//!
//! The controller emits one record per tick and keeps no log of its own;
//! whatever wants the records -- a database writer, a display feed, a
//! test -- implements [`RecordSink`] and receives them as they are made.
//! Durability is the sink's problem.

use crossway_types::TickRecord;

/// A consumer of tick records.
pub trait RecordSink {
    /// Accept one record. Called once per tick, in tick order.
    fn accept(&mut self, record: &TickRecord);
}

/// Discards every record. Useful when only the light outputs matter.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpSink;

impl RecordSink for NoOpSink {
    fn accept(&mut self, _record: &TickRecord) {}
}

/// Default retention for [`MemorySink`].
pub const DEFAULT_SINK_CAPACITY: usize = 10_000;

/// Buffers records in memory, evicting the oldest past a fixed cap.
///
/// The cap keeps a long-running test or display feed from growing
/// without bound.
#[derive(Debug, Clone)]
pub struct MemorySink {
    records: Vec<TickRecord>,
    capacity: usize,
}

impl MemorySink {
    /// Create a sink retaining up to [`DEFAULT_SINK_CAPACITY`] records.
    pub const fn new() -> Self {
        Self::with_capacity(DEFAULT_SINK_CAPACITY)
    }

    /// Create a sink retaining up to `capacity` records.
    pub const fn with_capacity(capacity: usize) -> Self {
        Self {
            records: Vec::new(),
            capacity,
        }
    }

    /// The retained records, oldest first.
    pub fn records(&self) -> &[TickRecord] {
        &self.records
    }

    /// Number of retained records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether no records are retained.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl Default for MemorySink {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordSink for MemorySink {
    fn accept(&mut self, record: &TickRecord) {
        self.records.push(record.clone());
        if self.records.len() > self.capacity {
            let drain_count = self.records.len().saturating_sub(self.capacity);
            self.records.drain(..drain_count);
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::{TimeZone, Utc};
    use crossway_types::{DensityState, EmergencyCommand, LightColor, Phase};

    use super::*;

    fn make_record(vehicle_count: u32) -> TickRecord {
        TickRecord {
            timestamp: Utc.with_ymd_and_hms(2025, 3, 3, 12, 0, 0).unwrap(),
            phase: Phase::NsGreen,
            ns_light: LightColor::Green,
            ew_light: LightColor::Red,
            vehicle_count,
            density: DensityState::Thin,
            emergency: EmergencyCommand::None,
            phase_elapsed_ms: 0,
        }
    }

    #[test]
    fn memory_sink_accumulates_in_order() {
        let mut sink = MemorySink::new();
        for count in 0..5 {
            sink.accept(&make_record(count));
        }
        assert_eq!(sink.len(), 5);
        let counts: Vec<u32> = sink.records().iter().map(|r| r.vehicle_count).collect();
        assert_eq!(counts, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn memory_sink_evicts_oldest_past_capacity() {
        let mut sink = MemorySink::with_capacity(3);
        for count in 0..5 {
            sink.accept(&make_record(count));
        }
        assert_eq!(sink.len(), 3);
        let counts: Vec<u32> = sink.records().iter().map(|r| r.vehicle_count).collect();
        assert_eq!(counts, vec![2, 3, 4]);
    }

    #[test]
    fn noop_sink_accepts_silently() {
        let mut sink = NoOpSink;
        sink.accept(&make_record(1));
    }
}
