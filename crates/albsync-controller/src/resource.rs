use albsync_core::models::load_balancer::{LoadBalancerHandle, LoadBalancerSpec};
use albsync_core::{CoreError, ResourceId};
use serde::{Deserialize, Serialize};

/// One load balancer this controller owns, keyed by its declaration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManagedResource {
    pub id: ResourceId,
    /// Latest desired shape. `None` once the declaration is gone.
    pub desired: Option<LoadBalancerSpec>,
    /// The load balancer in AWS. `None` if not created yet or already deleted.
    pub load_balancer: Option<LoadBalancerHandle>,
    /// Desired state could not be built this cycle. Never deleted or applied.
    pub tainted: bool,
    pub last_error: Option<String>,
}

impl ManagedResource {
    pub fn new(id: ResourceId) -> Self {
        Self {
            id,
            desired: None,
            load_balancer: None,
            tainted: false,
            last_error: None,
        }
    }

    /// Rebuild a resource from a load balancer discovered in AWS.
    /// Desired state stays empty until the next sync.
    pub fn from_load_balancer(handle: LoadBalancerHandle) -> Result<Self, CoreError> {
        let id = handle.owner()?;
        Ok(Self {
            load_balancer: Some(handle),
            ..Self::new(id)
        })
    }

    /// Mark the resource for teardown.
    pub fn strip_desired_state(&mut self) {
        self.desired = None;
    }

    /// Nothing wanted and nothing left in AWS; safe to drop.
    ///
    /// A tainted resource is never forgotten: its desired state is unknown,
    /// and it stays tracked so the failure shows up in status.
    pub fn is_forgotten(&self) -> bool {
        !self.tainted && self.desired.is_none() && self.load_balancer.is_none()
    }

    pub fn hostnames(&self) -> Vec<String> {
        self.load_balancer
            .as_ref()
            .and_then(|lb| lb.dns_name.clone())
            .into_iter()
            .collect()
    }
}

/// Ordered collection of managed resources with lookup by identity.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ManagedResourceSet {
    resources: Vec<ManagedResource>,
}

impl ManagedResourceSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Position of the resource with `id`, if any.
    pub fn find(&self, id: &ResourceId) -> Option<usize> {
        self.resources.iter().position(|r| &r.id == id)
    }

    pub fn get(&self, index: usize) -> Option<&ManagedResource> {
        self.resources.get(index)
    }

    pub fn get_by_id(&self, id: &ResourceId) -> Option<&ManagedResource> {
        self.find(id).and_then(|i| self.resources.get(i))
    }

    pub fn push(&mut self, resource: ManagedResource) {
        self.resources.push(resource);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ManagedResource> {
        self.resources.iter()
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    pub fn into_vec(self) -> Vec<ManagedResource> {
        self.resources
    }
}

impl From<Vec<ManagedResource>> for ManagedResourceSet {
    fn from(resources: Vec<ManagedResource>) -> Self {
        Self { resources }
    }
}

impl FromIterator<ManagedResource> for ManagedResourceSet {
    fn from_iter<I: IntoIterator<Item = ManagedResource>>(iter: I) -> Self {
        Self {
            resources: iter.into_iter().collect(),
        }
    }
}

impl Extend<ManagedResource> for ManagedResourceSet {
    fn extend<I: IntoIterator<Item = ManagedResource>>(&mut self, iter: I) {
        self.resources.extend(iter);
    }
}

impl IntoIterator for ManagedResourceSet {
    type Item = ManagedResource;
    type IntoIter = std::vec::IntoIter<ManagedResource>;

    fn into_iter(self) -> Self::IntoIter {
        self.resources.into_iter()
    }
}

impl<'a> IntoIterator for &'a ManagedResourceSet {
    type Item = &'a ManagedResource;
    type IntoIter = std::slice::Iter<'a, ManagedResource>;

    fn into_iter(self) -> Self::IntoIter {
        self.resources.iter()
    }
}
