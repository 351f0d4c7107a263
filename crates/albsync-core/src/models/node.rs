use serde::{Deserialize, Serialize};

/// A cluster member that load balancer targets are registered against.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    pub name: String,
    /// Cloud instance id, e.g. `i-0abc123`.
    pub external_id: String,
}
