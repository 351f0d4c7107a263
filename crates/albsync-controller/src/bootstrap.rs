use std::collections::BTreeSet;

use albsync_core::ClusterName;
use tokio::task::JoinSet;

use crate::api::LoadBalancerApi;
use crate::error::ControllerError;
use crate::resource::{ManagedResource, ManagedResourceSet};

/// Rebuild the managed set from load balancers already tagged with `cluster`.
///
/// Every load balancer is turned into a resource concurrently. Any failure,
/// including two load balancers claiming the same declaration, aborts the
/// whole assembly; a partial set would let the first sync delete or duplicate
/// live resources.
pub async fn assemble(
    api: &dyn LoadBalancerApi,
    cluster: &ClusterName,
) -> Result<ManagedResourceSet, ControllerError> {
    let handles = api
        .list_cluster(cluster)
        .await
        .map_err(|e| ControllerError::Bootstrap(e.to_string()))?;

    tracing::info!(cluster = %cluster, count = handles.len(), "assembling state from existing load balancers");

    let mut tasks = JoinSet::new();
    for handle in handles {
        tasks.spawn(async move {
            let arn = handle.arn.clone();
            ManagedResource::from_load_balancer(handle).map_err(|e| format!("{arn}: {e}"))
        });
    }

    let mut resources = Vec::new();
    while let Some(joined) = tasks.join_next().await {
        let resource = joined
            .map_err(|e| ControllerError::Bootstrap(format!("assembly task failed: {e}")))?
            .map_err(ControllerError::Bootstrap)?;
        resources.push(resource);
    }

    resources.sort_by(|a, b| a.id.cmp(&b.id));

    let mut seen = BTreeSet::new();
    for resource in &resources {
        if !seen.insert(&resource.id) {
            return Err(ControllerError::Bootstrap(format!(
                "more than one load balancer claims {}",
                resource.id
            )));
        }
    }

    Ok(resources.into())
}
