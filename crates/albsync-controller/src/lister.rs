use std::sync::RwLock;

use albsync_core::models::ingress::IngressDeclaration;
use albsync_core::models::node::Node;
use albsync_core::models::service::Service;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
#[error("{0}")]
pub struct ListerError(pub String);

/// Read access to the cluster objects a sync cycle is built from.
///
/// Implementations are typically backed by a watch cache; the engine only
/// ever reads through this trait.
pub trait DeclarationLister: Send + Sync {
    fn list_ingresses(&self) -> Result<Vec<IngressDeclaration>, ListerError>;

    /// Point lookup by `namespace/name`. `Ok(None)` if the service doesn't exist.
    fn get_service(&self, key: &str) -> Result<Option<Service>, ListerError>;

    fn list_nodes(&self) -> Result<Vec<Node>, ListerError>;
}

/// A full snapshot of the watched objects.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Declarations {
    #[serde(default)]
    pub ingresses: Vec<IngressDeclaration>,
    #[serde(default)]
    pub services: Vec<Service>,
    #[serde(default)]
    pub nodes: Vec<Node>,
}

/// In-process lister over a replaceable snapshot.
#[derive(Debug, Default)]
pub struct MemoryLister {
    snapshot: RwLock<Declarations>,
}

impl MemoryLister {
    pub fn new(declarations: Declarations) -> Self {
        Self {
            snapshot: RwLock::new(declarations),
        }
    }

    /// Swap in a new snapshot. Takes effect on the next sync cycle.
    pub fn replace(&self, declarations: Declarations) -> Result<(), ListerError> {
        let mut snapshot = self
            .snapshot
            .write()
            .map_err(|_| ListerError("declaration snapshot lock poisoned".into()))?;
        *snapshot = declarations;
        Ok(())
    }

    fn read<T>(&self, f: impl FnOnce(&Declarations) -> T) -> Result<T, ListerError> {
        let snapshot = self
            .snapshot
            .read()
            .map_err(|_| ListerError("declaration snapshot lock poisoned".into()))?;
        Ok(f(&snapshot))
    }
}

impl DeclarationLister for MemoryLister {
    fn list_ingresses(&self) -> Result<Vec<IngressDeclaration>, ListerError> {
        self.read(|d| d.ingresses.clone())
    }

    fn get_service(&self, key: &str) -> Result<Option<Service>, ListerError> {
        self.read(|d| d.services.iter().find(|s| s.key() == key).cloned())
    }

    fn list_nodes(&self) -> Result<Vec<Node>, ListerError> {
        self.read(|d| d.nodes.clone())
    }
}
