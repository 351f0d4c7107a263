use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use albsync_controller::Declarations;
use albsync_controller::lister::{DeclarationLister, ListerError};
use albsync_core::models::ingress::IngressDeclaration;
use albsync_core::models::node::Node;
use albsync_core::models::service::Service;

/// Lister over a JSON [`Declarations`] document on disk.
///
/// `list_ingresses` re-reads the file and pins that snapshot; service and
/// node lookups are answered from it until the next `list_ingresses`. A sync
/// cycle therefore reads the file once and never mixes two versions of it.
#[derive(Debug)]
pub struct FileLister {
    path: PathBuf,
    snapshot: RwLock<Option<Arc<Declarations>>>,
}

impl FileLister {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            snapshot: RwLock::new(None),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<Arc<Declarations>, ListerError> {
        let raw = std::fs::read_to_string(&self.path)
            .map_err(|e| ListerError(format!("failed to read {}: {e}", self.path.display())))?;
        let declarations: Declarations = serde_json::from_str(&raw)
            .map_err(|e| ListerError(format!("failed to parse {}: {e}", self.path.display())))?;

        let declarations = Arc::new(declarations);
        *self
            .snapshot
            .write()
            .map_err(|_| ListerError("declaration snapshot lock poisoned".into()))? =
            Some(Arc::clone(&declarations));
        Ok(declarations)
    }

    /// The pinned snapshot, loading one if nothing has been read yet.
    fn current(&self) -> Result<Arc<Declarations>, ListerError> {
        let pinned = self
            .snapshot
            .read()
            .map_err(|_| ListerError("declaration snapshot lock poisoned".into()))?
            .clone();
        match pinned {
            Some(declarations) => Ok(declarations),
            None => self.load(),
        }
    }
}

impl DeclarationLister for FileLister {
    fn list_ingresses(&self) -> Result<Vec<IngressDeclaration>, ListerError> {
        Ok(self.load()?.ingresses.clone())
    }

    fn get_service(&self, key: &str) -> Result<Option<Service>, ListerError> {
        Ok(self.current()?.services.iter().find(|s| s.key() == key).cloned())
    }

    fn list_nodes(&self) -> Result<Vec<Node>, ListerError> {
        Ok(self.current()?.nodes.clone())
    }
}
