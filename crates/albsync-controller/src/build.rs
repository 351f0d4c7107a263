//! Desired-state assembly: declarations in, managed resources out.

use albsync_core::ClusterName;
use albsync_core::annotations::LoadBalancerAnnotations;
use albsync_core::models::ingress::IngressDeclaration;
use albsync_core::models::load_balancer::{LoadBalancerSpec, ResolvedBackend};

use crate::error::ControllerError;
use crate::lister::DeclarationLister;
use crate::nodeport;
use crate::resource::{ManagedResource, ManagedResourceSet};

/// Everything a cycle needs to turn one declaration into a resource.
pub struct BuildContext<'a> {
    pub cluster: &'a ClusterName,
    pub lister: &'a dyn DeclarationLister,
    /// Last committed set; supplies the existing load balancer handles.
    pub previous: &'a ManagedResourceSet,
    /// Sorted node instance ids, listed once per cycle.
    pub targets: &'a [String],
}

/// Build the resource for `declaration`, tainting it on any failure.
///
/// A healthy build keeps the previous handle so reconciliation updates the
/// existing load balancer. A failed build carries the previous resource
/// forward unchanged apart from the taint, so a live load balancer is never
/// forgotten or overwritten.
pub fn build_resource(declaration: &IngressDeclaration, ctx: &BuildContext<'_>) -> ManagedResource {
    let id = declaration.id();
    let previous = ctx.previous.get_by_id(&id);

    match build_desired(declaration, ctx) {
        Ok(spec) => ManagedResource {
            desired: Some(spec),
            load_balancer: previous.and_then(|p| p.load_balancer.clone()),
            ..ManagedResource::new(id)
        },
        Err(e) => {
            tracing::warn!(id = %id, error = %e, "failed to build desired state, tainting");
            let mut resource = previous
                .cloned()
                .unwrap_or_else(|| ManagedResource::new(id));
            resource.tainted = true;
            resource.last_error = Some(e.to_string());
            resource
        }
    }
}

fn build_desired(
    declaration: &IngressDeclaration,
    ctx: &BuildContext<'_>,
) -> Result<LoadBalancerSpec, ControllerError> {
    let parsed = LoadBalancerAnnotations::parse(&declaration.annotations)?;
    let mut spec = LoadBalancerSpec::new(ctx.cluster, &declaration.id(), parsed);

    for backend in &declaration.backends {
        let service_key = backend.service_key(&declaration.namespace);
        let node_port =
            nodeport::resolve_node_port(ctx.lister, &service_key, backend.service_port)?;
        spec.backends.push(ResolvedBackend {
            service_key,
            service_port: backend.service_port,
            node_port,
        });
    }
    spec.targets = ctx.targets.to_vec();

    Ok(spec)
}
