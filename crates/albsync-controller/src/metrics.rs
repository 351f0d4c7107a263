use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

/// Counters owned by a single controller instance.
#[derive(Debug, Default)]
pub struct ControllerMetrics {
    sync_cycles: AtomicU64,
    failed_cycles: AtomicU64,
    managed_resources: AtomicU64,
    reconcile_failures: AtomicU64,
    tainted_resources: AtomicU64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub sync_cycles: u64,
    pub failed_cycles: u64,
    pub managed_resources: u64,
    pub reconcile_failures: u64,
    pub tainted_resources: u64,
}

impl ControllerMetrics {
    pub fn record_cycle(&self, managed: usize, tainted: usize, failures: usize) {
        self.sync_cycles.fetch_add(1, Ordering::Relaxed);
        self.managed_resources.store(managed as u64, Ordering::Relaxed);
        self.tainted_resources.store(tainted as u64, Ordering::Relaxed);
        self.reconcile_failures
            .fetch_add(failures as u64, Ordering::Relaxed);
    }

    pub fn record_failed_cycle(&self) {
        self.failed_cycles.fetch_add(1, Ordering::Relaxed);
    }

    pub fn set_managed_resources(&self, managed: usize) {
        self.managed_resources.store(managed as u64, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            sync_cycles: self.sync_cycles.load(Ordering::Relaxed),
            failed_cycles: self.failed_cycles.load(Ordering::Relaxed),
            managed_resources: self.managed_resources.load(Ordering::Relaxed),
            reconcile_failures: self.reconcile_failures.load(Ordering::Relaxed),
            tainted_resources: self.tainted_resources.load(Ordering::Relaxed),
        }
    }
}
