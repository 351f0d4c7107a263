use std::sync::Arc;

use albsync_core::ResourceId;
use albsync_core::models::ingress::IngressDeclaration;
use arc_swap::ArcSwap;
use jiff::Timestamp;
use tokio::sync::{Mutex, Semaphore};

use crate::api::LoadBalancerApi;
use crate::bootstrap;
use crate::build::{self, BuildContext};
use crate::config::ControllerConfig;
use crate::error::ControllerError;
use crate::events::{EventKind, EventRecorder};
use crate::lister::DeclarationLister;
use crate::metrics::ControllerMetrics;
use crate::nodeport::{self, NodePortError};
use crate::reconcile::{self, Outcome};
use crate::resource::{ManagedResource, ManagedResourceSet};
use crate::status::{CommittedState, StatusSnapshot, SyncReport};

/// Owns the committed resource set and drives sync cycles against it.
///
/// Cycles are serialized; readers only ever observe a fully committed set.
pub struct Controller {
    config: ControllerConfig,
    lister: Arc<dyn DeclarationLister>,
    api: Arc<dyn LoadBalancerApi>,
    recorder: Arc<dyn EventRecorder>,
    state: ArcSwap<CommittedState>,
    cycle_lock: Mutex<()>,
    metrics: ControllerMetrics,
}

impl Controller {
    pub fn new(
        config: ControllerConfig,
        lister: Arc<dyn DeclarationLister>,
        api: Arc<dyn LoadBalancerApi>,
        recorder: Arc<dyn EventRecorder>,
    ) -> Self {
        Self {
            config,
            lister,
            api,
            recorder,
            state: ArcSwap::from_pointee(CommittedState::default()),
            cycle_lock: Mutex::new(()),
            metrics: ControllerMetrics::default(),
        }
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    /// Populate committed state from the cluster's existing load balancers.
    ///
    /// Only allowed before anything has been committed. Returns the number of
    /// resources recovered.
    pub async fn bootstrap(&self) -> Result<usize, ControllerError> {
        let _cycle = self.cycle_lock.lock().await;

        if self.state.load().committed_at.is_some() {
            return Err(ControllerError::AlreadyBootstrapped);
        }

        let resources = bootstrap::assemble(self.api.as_ref(), &self.config.cluster_name)
            .await
            .inspect_err(|e| tracing::error!(error = %e, "bootstrap failed"))?;
        let count = resources.len();

        self.metrics.set_managed_resources(count);
        self.state.store(Arc::new(CommittedState {
            cycle: 0,
            committed_at: Some(Timestamp::now()),
            resources,
        }));

        tracing::info!(count, "bootstrap committed");
        Ok(count)
    }

    /// Run one full cycle: build, diff, reconcile, commit.
    ///
    /// A listing failure aborts the cycle before any external call and leaves
    /// committed state untouched. Per-resource failures never fail the cycle.
    pub async fn sync(&self) -> Result<SyncReport, ControllerError> {
        let _cycle = self.cycle_lock.lock().await;
        let previous = self.state.load_full();

        let mut working = match self.build_desired(&previous.resources) {
            Ok(desired) => desired,
            Err(e) => {
                self.metrics.record_failed_cycle();
                tracing::error!(error = %e, "sync aborted, committed state unchanged");
                return Err(e);
            }
        };

        let removed = deletable(&previous.resources, &working);
        if !removed.is_empty() {
            tracing::info!(count = removed.len(), "declarations removed, scheduling deletion");
        }
        working.extend(removed);

        let mut report = SyncReport {
            cycle: previous.cycle + 1,
            ..SyncReport::default()
        };
        let mut reconciled = Vec::with_capacity(working.len());
        for (resource, outcome) in self.reconcile_all(working).await {
            report.record(outcome);
            reconciled.push(resource);
        }

        let committed: ManagedResourceSet = reconciled
            .into_iter()
            .filter(|r| !r.is_forgotten())
            .collect();
        let tainted = committed.iter().filter(|r| r.tainted).count();

        self.metrics
            .record_cycle(committed.len(), tainted, report.failed);
        self.state.store(Arc::new(CommittedState {
            cycle: report.cycle,
            committed_at: Some(Timestamp::now()),
            resources: committed,
        }));

        tracing::info!(
            cycle = report.cycle,
            created = report.created,
            updated = report.updated,
            replaced = report.replaced,
            deleted = report.deleted,
            failed = report.failed,
            skipped = report.skipped,
            "sync committed"
        );
        Ok(report)
    }

    /// Read-only view of the last committed set.
    pub fn status(&self) -> StatusSnapshot {
        let state = self.state.load();
        StatusSnapshot {
            cluster_name: self.config.cluster_name.clone(),
            cycle: state.cycle,
            committed_at: state.committed_at,
            metrics: self.metrics.snapshot(),
            resources: state.resources.iter().cloned().collect(),
        }
    }

    pub fn committed(&self) -> Arc<CommittedState> {
        self.state.load_full()
    }

    pub fn metrics(&self) -> &ControllerMetrics {
        &self.metrics
    }

    /// DNS names of the load balancer backing `id`. Empty until it exists.
    pub fn resolve_hostnames(&self, id: &ResourceId) -> Result<Vec<String>, ControllerError> {
        self.state
            .load()
            .resources
            .get_by_id(id)
            .map(ManagedResource::hostnames)
            .ok_or_else(|| ControllerError::NotFound(id.clone()))
    }

    pub fn resolve_node_port(&self, service_key: &str, port: i32) -> Result<i32, NodePortError> {
        nodeport::resolve_node_port(self.lister.as_ref(), service_key, port)
    }

    fn build_desired(
        &self,
        previous: &ManagedResourceSet,
    ) -> Result<ManagedResourceSet, ControllerError> {
        let ingresses = self.lister.list_ingresses()?;
        let mut targets: Vec<String> = self
            .lister
            .list_nodes()?
            .into_iter()
            .map(|n| n.external_id)
            .collect();
        targets.sort_unstable();
        targets.dedup();

        let ctx = BuildContext {
            cluster: &self.config.cluster_name,
            lister: self.lister.as_ref(),
            previous,
            targets: &targets,
        };

        let mut desired = ManagedResourceSet::new();
        for declaration in ingresses.iter().filter(|d| self.handles(d)) {
            let resource = build::build_resource(declaration, &ctx);
            if desired.find(&resource.id).is_some() {
                tracing::warn!(id = %resource.id, "duplicate declaration ignored");
                continue;
            }
            if resource.tainted {
                let message = resource.last_error.as_deref().unwrap_or_default();
                self.recorder
                    .record(&resource.id, EventKind::Warning, "ERROR", message);
            }
            desired.push(resource);
        }
        Ok(desired)
    }

    fn handles(&self, declaration: &IngressDeclaration) -> bool {
        let handled = declaration.is_handled_by(
            self.config.controller_class(),
            ControllerConfig::DEFAULT_INGRESS_CLASS,
        );
        if !handled {
            tracing::debug!(
                id = %declaration.id(),
                class = declaration.ingress_class(),
                "ingress class not handled, skipping"
            );
        }
        handled
    }

    /// Reconcile every resource in its own task and wait for all of them.
    /// Output order matches input order.
    async fn reconcile_all(
        &self,
        resources: ManagedResourceSet,
    ) -> Vec<(ManagedResource, Outcome)> {
        let semaphore = Arc::new(Semaphore::new(self.config.max_concurrent_reconciles.max(1)));

        let mut tasks = Vec::with_capacity(resources.len());
        for mut resource in resources {
            let before = resource.clone();
            let api = Arc::clone(&self.api);
            let recorder = Arc::clone(&self.recorder);
            let semaphore = Arc::clone(&semaphore);
            let task = tokio::spawn(async move {
                let _permit = semaphore.acquire_owned().await;
                let outcome = reconcile::reconcile(&mut resource, api.as_ref(), recorder.as_ref()).await;
                (resource, outcome)
            });
            tasks.push((before, task));
        }

        let mut results = Vec::with_capacity(tasks.len());
        for (before, task) in tasks {
            match task.await {
                Ok(result) => results.push(result),
                Err(e) => {
                    tracing::error!(id = %before.id, error = %e, "reconcile task aborted");
                    let mut resource = before;
                    resource.last_error = Some(format!("reconcile task aborted: {e}"));
                    results.push((resource, Outcome::Failed));
                }
            }
        }
        results
    }
}

/// Previously committed resources whose declaration is gone and which still
/// hold a load balancer, with desired state stripped.
///
/// Tainted resources are never returned: their desired state is unknown, not
/// absent.
pub fn deletable(
    previous: &ManagedResourceSet,
    desired: &ManagedResourceSet,
) -> Vec<ManagedResource> {
    previous
        .iter()
        .filter(|r| !r.tainted && r.load_balancer.is_some() && desired.find(&r.id).is_none())
        .cloned()
        .map(|mut r| {
            r.strip_desired_state();
            r
        })
        .collect()
}
