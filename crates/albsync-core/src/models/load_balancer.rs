use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::annotations::{self, LoadBalancerAnnotations};
use crate::cluster::ClusterName;
use crate::error::CoreError;
use crate::models::identity::ResourceId;
use crate::tags;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Scheme {
    #[default]
    Internal,
    InternetFacing,
}

impl Scheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Scheme::Internal => "internal",
            Scheme::InternetFacing => "internet-facing",
        }
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Scheme {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "internal" => Ok(Scheme::Internal),
            "internet-facing" => Ok(Scheme::InternetFacing),
            other => Err(CoreError::InvalidAnnotation {
                key: annotations::SCHEME.to_string(),
                reason: format!("unknown scheme {other:?}"),
            }),
        }
    }
}

/// A declaration backend resolved to the node port traffic is sent to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedBackend {
    pub service_key: String,
    pub service_port: i32,
    pub node_port: i32,
}

/// Desired shape of one load balancer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadBalancerSpec {
    pub name: String,
    pub scheme: Scheme,
    pub subnets: Vec<String>,
    pub security_groups: Vec<String>,
    /// User tags merged with the ownership tags; ownership tags win.
    pub tags: BTreeMap<String, String>,
    pub backends: Vec<ResolvedBackend>,
    /// Sorted instance ids of the cluster nodes.
    pub targets: Vec<String>,
}

impl LoadBalancerSpec {
    pub fn new(cluster: &ClusterName, id: &ResourceId, parsed: LoadBalancerAnnotations) -> Self {
        let mut tags = parsed.tags;
        tags.insert(tags::CLUSTER.to_string(), cluster.to_string());
        tags.insert(tags::NAMESPACE.to_string(), id.namespace.clone());
        tags.insert(tags::INGRESS_NAME.to_string(), id.name.clone());

        Self {
            name: tags::load_balancer_name(cluster, id),
            scheme: parsed.scheme,
            subnets: parsed.subnets,
            security_groups: parsed.security_groups,
            tags,
            backends: Vec::new(),
            targets: Vec::new(),
        }
    }
}

/// Observed state of a load balancer that exists in AWS.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadBalancerHandle {
    pub arn: String,
    pub name: String,
    pub dns_name: Option<String>,
    pub scheme: Scheme,
    pub subnets: Vec<String>,
    pub security_groups: Vec<String>,
    pub tags: BTreeMap<String, String>,
    /// Provisioning state code, e.g. `active` or `provisioning`.
    pub state: Option<String>,
}

impl LoadBalancerHandle {
    pub fn is_owned_by(&self, cluster: &ClusterName) -> bool {
        self.tags.get(tags::CLUSTER).map(String::as_str) == Some(cluster.as_str())
    }

    /// Recover the owning declaration's identity from the ownership tags.
    pub fn owner(&self) -> Result<ResourceId, CoreError> {
        let namespace = self.tags.get(tags::NAMESPACE);
        let name = self.tags.get(tags::INGRESS_NAME);
        match (namespace, name) {
            (Some(namespace), Some(name)) if !namespace.is_empty() && !name.is_empty() => {
                Ok(ResourceId::new(namespace, name))
            }
            _ => Err(CoreError::InvalidResourceId(format!(
                "load balancer {} is missing the {} or {} tag",
                self.arn,
                tags::NAMESPACE,
                tags::INGRESS_NAME
            ))),
        }
    }
}
