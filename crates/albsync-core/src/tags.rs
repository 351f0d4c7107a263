//! Tag and naming conventions for externally owned load balancers.
//!
//! Pure string functions. These define how a load balancer in AWS is tied
//! back to its cluster and to the declaration that owns it.

use crate::cluster::ClusterName;
use crate::hash;
use crate::models::identity::ResourceId;

/// Tag marking a load balancer as owned by a cluster. Value is the cluster name.
pub const CLUSTER: &str = "albsync.io/cluster";

pub const NAMESPACE: &str = "kubernetes.io/namespace";

pub const INGRESS_NAME: &str = "kubernetes.io/ingress-name";

/// AWS limit on load balancer names.
pub const MAX_NAME_LEN: usize = 32;

/// Generated load balancer name for a declaration: `{cluster}-{hash}`.
pub fn load_balancer_name(cluster: &ClusterName, id: &ResourceId) -> String {
    let digest = hash::digest(&id.to_string());
    let room = MAX_NAME_LEN - cluster.as_str().len() - 1;
    format!("{cluster}-{}", &digest[..room.min(20)])
}

/// Cheap name-based ownership check, done before fetching tags.
pub fn has_cluster_prefix(cluster: &ClusterName, load_balancer_name: &str) -> bool {
    load_balancer_name
        .split_once('-')
        .is_some_and(|(prefix, _)| prefix == cluster.as_str())
}
