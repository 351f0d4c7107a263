use albsync_core::ClusterName;
use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use crate::metrics::MetricsSnapshot;
use crate::reconcile::Outcome;
use crate::resource::{ManagedResource, ManagedResourceSet};

/// The set readers see. Replaced wholesale at the end of each cycle.
#[derive(Debug, Clone, Default)]
pub struct CommittedState {
    /// Sync cycles committed so far. Bootstrap commits as cycle 0.
    pub cycle: u64,
    /// `None` until the first commit.
    pub committed_at: Option<Timestamp>,
    pub resources: ManagedResourceSet,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusSnapshot {
    pub cluster_name: ClusterName,
    pub cycle: u64,
    pub committed_at: Option<Timestamp>,
    pub metrics: MetricsSnapshot,
    pub resources: Vec<ManagedResource>,
}

/// Per-outcome tally of one sync cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncReport {
    pub cycle: u64,
    pub created: usize,
    pub updated: usize,
    pub replaced: usize,
    pub deleted: usize,
    pub unchanged: usize,
    /// Tainted resources left untouched.
    pub skipped: usize,
    pub failed: usize,
}

impl SyncReport {
    pub fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Created => self.created += 1,
            Outcome::Updated => self.updated += 1,
            Outcome::Replaced => self.replaced += 1,
            Outcome::Deleted => self.deleted += 1,
            Outcome::Unchanged => self.unchanged += 1,
            Outcome::Skipped => self.skipped += 1,
            Outcome::Failed => self.failed += 1,
        }
    }

    /// Whether any call was made against the load balancer API.
    pub fn changed(&self) -> bool {
        self.created + self.updated + self.replaced + self.deleted > 0
    }
}
