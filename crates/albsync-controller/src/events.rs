use albsync_core::ResourceId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Normal,
    Warning,
}

/// Best-effort event sink keyed by the owning declaration.
///
/// Recording cannot fail from the caller's point of view: implementations
/// swallow their own delivery errors.
pub trait EventRecorder: Send + Sync {
    fn record(&self, id: &ResourceId, kind: EventKind, reason: &str, message: &str);
}

/// Emits events as log lines.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingRecorder;

impl EventRecorder for TracingRecorder {
    fn record(&self, id: &ResourceId, kind: EventKind, reason: &str, message: &str) {
        match kind {
            EventKind::Normal => tracing::info!(id = %id, reason, "{message}"),
            EventKind::Warning => tracing::warn!(id = %id, reason, "{message}"),
        }
    }
}
