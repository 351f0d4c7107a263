use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::annotations;
use crate::models::identity::ResourceId;

/// An ingress-like declaration observed in the cluster.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngressDeclaration {
    pub namespace: String,
    pub name: String,
    #[serde(default)]
    pub annotations: BTreeMap<String, String>,
    #[serde(default)]
    pub backends: Vec<IngressBackend>,
}

impl IngressDeclaration {
    pub fn id(&self) -> ResourceId {
        ResourceId::new(&self.namespace, &self.name)
    }

    /// Value of the ingress class annotation, empty when unset.
    pub fn ingress_class(&self) -> &str {
        self.annotations
            .get(annotations::INGRESS_CLASS)
            .map(String::as_str)
            .unwrap_or_default()
    }

    /// Whether a controller running with `controller_class` should handle
    /// this declaration.
    ///
    /// Unannotated declarations belong to the controller only when it runs
    /// with the default class; annotated ones must match exactly.
    pub fn is_handled_by(&self, controller_class: &str, default_class: &str) -> bool {
        let class = self.ingress_class();
        if class.is_empty() && controller_class == default_class {
            return true;
        }
        class == controller_class
    }
}

/// A service port the declaration routes traffic to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngressBackend {
    pub service_name: String,
    pub service_port: i32,
}

impl IngressBackend {
    /// Store key of the backing service, relative to the declaration's namespace.
    pub fn service_key(&self, namespace: &str) -> String {
        format!("{namespace}/{}", self.service_name)
    }
}
