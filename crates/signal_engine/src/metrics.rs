//! Per-signal counters

use std::sync::atomic::{AtomicU64, Ordering};

/// Counters for a single signal
#[derive(Debug, Default)]
pub struct SignalMetrics {
    /// Emissions started
    emissions: AtomicU64,
    /// Emissions whose outcome was delivered
    completed: AtomicU64,
    /// Slot failures, reported or not
    slot_failures: AtomicU64,
    /// Processor failures
    processor_failures: AtomicU64,
    /// Slot errors that arrived after the outcome was delivered
    late_errors: AtomicU64,
}

impl SignalMetrics {
    /// Create new metrics instance
    pub fn new() -> Self {
        Self::default()
    }

    /// Count a new emission and return its sequence number (starting at 1)
    pub fn next_emission(&self) -> u64 {
        self.emissions.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Get emission count
    pub fn emissions(&self) -> u64 {
        self.emissions.load(Ordering::Relaxed)
    }

    /// Get completed count
    pub fn completed(&self) -> u64 {
        self.completed.load(Ordering::Relaxed)
    }

    /// Increment completed count
    pub fn inc_completed(&self) {
        self.completed.fetch_add(1, Ordering::Relaxed);
    }

    /// Get slot failure count
    pub fn slot_failures(&self) -> u64 {
        self.slot_failures.load(Ordering::Relaxed)
    }

    /// Increment slot failure count
    pub fn inc_slot_failures(&self) {
        self.slot_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Get processor failure count
    pub fn processor_failures(&self) -> u64 {
        self.processor_failures.load(Ordering::Relaxed)
    }

    /// Increment processor failure count
    pub fn inc_processor_failures(&self) {
        self.processor_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Get late error count
    pub fn late_errors(&self) -> u64 {
        self.late_errors.load(Ordering::Relaxed)
    }

    /// Increment late error count
    pub fn inc_late_errors(&self) {
        self.late_errors.fetch_add(1, Ordering::Relaxed);
    }

    /// Get snapshot of all metrics
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            emissions: self.emissions(),
            completed: self.completed(),
            slot_failures: self.slot_failures(),
            processor_failures: self.processor_failures(),
            late_errors: self.late_errors(),
        }
    }
}

/// Snapshot of signal metrics (for reporting)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MetricsSnapshot {
    pub emissions: u64,
    pub completed: u64,
    pub slot_failures: u64,
    pub processor_failures: u64,
    pub late_errors: u64,
}

impl MetricsSnapshot {
    /// Emissions still waiting on at least one slot
    pub fn in_flight(&self) -> u64 {
        self.emissions.saturating_sub(self.completed)
    }
}
