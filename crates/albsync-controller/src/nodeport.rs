use albsync_core::models::service::ServiceType;
use thiserror::Error;

use crate::lister::{DeclarationLister, ListerError};

#[derive(Debug, Error)]
pub enum NodePortError {
    #[error("unable to find the {0} service")]
    NotFound(String),

    #[error("{0} service is not of type NodePort")]
    WrongServiceType(String),

    #[error("unable to find port {port} in the {service} service")]
    PortNotFound { service: String, port: i32 },

    #[error("service lookup failed: {0}")]
    Lister(#[from] ListerError),
}

/// Resolve the node port a service exposes for `target_port`.
///
/// Pure lookup against the lister; no side effects.
pub fn resolve_node_port(
    lister: &dyn DeclarationLister,
    service_key: &str,
    target_port: i32,
) -> Result<i32, NodePortError> {
    let service = lister
        .get_service(service_key)?
        .ok_or_else(|| NodePortError::NotFound(service_key.to_string()))?;

    if service.service_type != ServiceType::NodePort {
        return Err(NodePortError::WrongServiceType(service_key.to_string()));
    }

    service
        .ports
        .iter()
        .find(|p| p.port == target_port)
        .map(|p| p.node_port)
        .ok_or_else(|| NodePortError::PortNotFound {
            service: service_key.to_string(),
            port: target_port,
        })
}
