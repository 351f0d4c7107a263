use std::future::Future;
use std::pin::Pin;

use albsync_core::ClusterName;
use albsync_core::models::load_balancer::{LoadBalancerHandle, LoadBalancerSpec};

use crate::drift::FieldDrift;
use crate::error::ControllerError;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Operations on the external load balancer fleet.
///
/// Methods return boxed futures for dyn compatibility. Each call is expected
/// to be bounded by the implementation's own timeout.
pub trait LoadBalancerApi: Send + Sync {
    /// Every load balancer tagged as owned by `cluster`.
    fn list_cluster<'a>(
        &'a self,
        cluster: &'a ClusterName,
    ) -> BoxFuture<'a, Result<Vec<LoadBalancerHandle>, ControllerError>>;

    /// Create a load balancer matching `spec`.
    fn create<'a>(
        &'a self,
        spec: &'a LoadBalancerSpec,
    ) -> BoxFuture<'a, Result<LoadBalancerHandle, ControllerError>>;

    /// Bring `current` in line with `spec`. `drift` lists the mutable fields
    /// that differ; scheme drift is never passed here.
    fn update<'a>(
        &'a self,
        current: &'a LoadBalancerHandle,
        spec: &'a LoadBalancerSpec,
        drift: &'a [FieldDrift],
    ) -> BoxFuture<'a, Result<LoadBalancerHandle, ControllerError>>;

    /// Tear down the load balancer.
    fn delete<'a>(
        &'a self,
        current: &'a LoadBalancerHandle,
    ) -> BoxFuture<'a, Result<(), ControllerError>>;
}
