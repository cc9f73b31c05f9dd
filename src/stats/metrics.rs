//! Statistics for the broadcast service

use std::sync::atomic::{AtomicU64, Ordering};

/// Live counters updated by the tick and control loops
#[derive(Debug, Default)]
pub struct ServiceStats {
    ticks: AtomicU64,
    updates_delivered: AtomicU64,
    delivery_failures: AtomicU64,
    messages_handled: AtomicU64,
    messages_ignored: AtomicU64,
}

impl ServiceStats {
    /// Create zeroed stats
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_tick(&self) {
        self.ticks.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_delivery(&self) {
        self.updates_delivered.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_delivery_failure(&self) {
        self.delivery_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_message(&self) {
        self.messages_handled.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_ignored(&self) {
        self.messages_ignored.fetch_add(1, Ordering::Relaxed);
    }

    /// Point-in-time copy of the counters
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            ticks: self.ticks.load(Ordering::Relaxed),
            updates_delivered: self.updates_delivered.load(Ordering::Relaxed),
            delivery_failures: self.delivery_failures.load(Ordering::Relaxed),
            messages_handled: self.messages_handled.load(Ordering::Relaxed),
            messages_ignored: self.messages_ignored.load(Ordering::Relaxed),
        }
    }
}

/// Copy of the service counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatsSnapshot {
    /// Ticks executed
    pub ticks: u64,
    /// Updates accepted by client channels
    pub updates_delivered: u64,
    /// Updates a client could not take
    pub delivery_failures: u64,
    /// Control messages applied
    pub messages_handled: u64,
    /// Control messages dropped (unknown, or service not running)
    pub messages_ignored: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_reflects_records() {
        let stats = ServiceStats::new();

        stats.record_tick();
        stats.record_tick();
        stats.record_delivery();
        stats.record_delivery_failure();
        stats.record_message();
        stats.record_ignored();

        assert_eq!(
            stats.snapshot(),
            StatsSnapshot {
                ticks: 2,
                updates_delivered: 1,
                delivery_failures: 1,
                messages_handled: 1,
                messages_ignored: 1,
            }
        );
    }
}
