use albsync_core::{CoreError, ResourceId};
use thiserror::Error;

use crate::lister::ListerError;
use crate::nodeport::NodePortError;

#[derive(Debug, Error)]
pub enum ControllerError {
    #[error("resource not found: {0}")]
    NotFound(ResourceId),

    #[error("listing declarations failed: {0}")]
    Lister(#[from] ListerError),

    #[error("load balancer creation failed: {0}")]
    CreateFailed(String),

    #[error("load balancer update failed: {0}")]
    UpdateFailed(String),

    #[error("load balancer deletion failed: {0}")]
    DeleteFailed(String),

    #[error("AWS error: {0}")]
    Aws(String),

    #[error("failed to reconstruct state from existing external resources: {0}")]
    Bootstrap(String),

    #[error("state has already been committed, refusing to bootstrap")]
    AlreadyBootstrapped,

    #[error("invalid declaration: {0}")]
    Declaration(#[from] CoreError),

    #[error("backend resolution failed: {0}")]
    NodePort(#[from] NodePortError),
}

impl ControllerError {
    /// Prepend the owning resource's identity to the error message.
    pub fn with_resource(self, id: &ResourceId) -> Self {
        match self {
            Self::CreateFailed(msg) => Self::CreateFailed(format!("{id}: {msg}")),
            Self::UpdateFailed(msg) => Self::UpdateFailed(format!("{id}: {msg}")),
            Self::DeleteFailed(msg) => Self::DeleteFailed(format!("{id}: {msg}")),
            Self::Aws(msg) => Self::Aws(format!("{id}: {msg}")),
            other => other,
        }
    }
}
