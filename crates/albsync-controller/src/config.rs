use albsync_core::ClusterName;

/// Construction-time settings for a [`Controller`](crate::Controller).
#[derive(Debug, Clone)]
pub struct ControllerConfig {
    /// Tags and prefixes every load balancer this controller owns. Immutable.
    pub cluster_name: ClusterName,
    /// Ingress class this controller answers to. `None` means unset.
    pub ingress_class: Option<String>,
    /// Upper bound on reconcile tasks running at once within a cycle.
    pub max_concurrent_reconciles: usize,
}

impl ControllerConfig {
    pub const DEFAULT_INGRESS_CLASS: &str = "alb";
    pub const DEFAULT_MAX_CONCURRENT_RECONCILES: usize = 16;

    pub fn new(cluster_name: ClusterName) -> Self {
        Self {
            cluster_name,
            ingress_class: None,
            max_concurrent_reconciles: Self::DEFAULT_MAX_CONCURRENT_RECONCILES,
        }
    }

    pub fn with_ingress_class(mut self, class: impl Into<String>) -> Self {
        self.ingress_class = Some(class.into());
        self
    }

    pub fn with_max_concurrent_reconciles(mut self, limit: usize) -> Self {
        self.max_concurrent_reconciles = limit.max(1);
        self
    }

    /// The class compared against declaration annotations; empty when unset.
    pub fn controller_class(&self) -> &str {
        self.ingress_class.as_deref().unwrap_or_default()
    }
}
