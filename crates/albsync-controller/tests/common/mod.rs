#![allow(dead_code)]

use std::collections::{BTreeMap, HashSet};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use albsync_controller::api::{BoxFuture, LoadBalancerApi};
use albsync_controller::drift::FieldDrift;
use albsync_controller::{
    ControllerConfig, ControllerError, Declarations, EventKind, EventRecorder, ManagedResource,
};
use albsync_core::annotations;
use albsync_core::models::identity::ResourceId;
use albsync_core::models::ingress::{IngressBackend, IngressDeclaration};
use albsync_core::models::load_balancer::{LoadBalancerHandle, LoadBalancerSpec, Scheme};
use albsync_core::models::node::Node;
use albsync_core::models::service::{Service, ServicePort, ServiceType};
use albsync_core::{ClusterName, tags};

pub const CLUSTER: &str = "prod";

pub fn cluster() -> ClusterName {
    ClusterName::new(CLUSTER).unwrap()
}

pub fn config() -> ControllerConfig {
    ControllerConfig::new(cluster()).with_ingress_class(ControllerConfig::DEFAULT_INGRESS_CLASS)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    List,
    Create(String),
    Update(String),
    Delete(String),
}

/// In-memory load balancer fleet. Records every call in order.
#[derive(Default)]
pub struct FakeApi {
    pub calls: Mutex<Vec<Call>>,
    /// Existing load balancers, keyed by name.
    pub fleet: Mutex<BTreeMap<String, LoadBalancerHandle>>,
    /// Names whose calls fail.
    pub fail: Mutex<HashSet<String>>,
    /// Names whose calls panic.
    pub panic: Mutex<HashSet<String>>,
    pub fail_listing: Mutex<bool>,
    /// How long each create takes.
    pub create_latency: Mutex<Option<Duration>>,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
    next_arn: AtomicUsize,
}

impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed(&self, handle: LoadBalancerHandle) {
        self.fleet.lock().unwrap().insert(handle.name.clone(), handle);
    }

    pub fn fail_on(&self, name: &str) {
        self.fail.lock().unwrap().insert(name.to_string());
    }

    pub fn panic_on(&self, name: &str) {
        self.panic.lock().unwrap().insert(name.to_string());
    }

    pub fn slow_creates(&self, latency: Duration) {
        *self.create_latency.lock().unwrap() = Some(latency);
    }

    /// Most creates that were ever running at the same time.
    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    /// Calls that change the fleet.
    pub fn mutations(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|c| *c != Call::List)
            .collect()
    }

    fn check(&self, name: &str) -> Result<(), String> {
        if self.panic.lock().unwrap().contains(name) {
            panic!("injected panic for {name}");
        }
        if self.fail.lock().unwrap().contains(name) {
            return Err(format!("injected failure for {name}"));
        }
        Ok(())
    }
}

impl LoadBalancerApi for FakeApi {
    fn list_cluster<'a>(
        &'a self,
        cluster: &'a ClusterName,
    ) -> BoxFuture<'a, Result<Vec<LoadBalancerHandle>, ControllerError>> {
        Box::pin(async move {
            self.calls.lock().unwrap().push(Call::List);
            if *self.fail_listing.lock().unwrap() {
                return Err(ControllerError::Aws("listing throttled".into()));
            }
            Ok(self
                .fleet
                .lock()
                .unwrap()
                .values()
                .filter(|h| h.is_owned_by(cluster))
                .cloned()
                .collect())
        })
    }

    fn create<'a>(
        &'a self,
        spec: &'a LoadBalancerSpec,
    ) -> BoxFuture<'a, Result<LoadBalancerHandle, ControllerError>> {
        Box::pin(async move {
            self.calls.lock().unwrap().push(Call::Create(spec.name.clone()));
            self.check(&spec.name).map_err(ControllerError::CreateFailed)?;

            let running = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak_in_flight.fetch_max(running, Ordering::SeqCst);
            let latency = *self.create_latency.lock().unwrap();
            if let Some(latency) = latency {
                tokio::time::sleep(latency).await;
            }
            self.in_flight.fetch_sub(1, Ordering::SeqCst);

            let n = self.next_arn.fetch_add(1, Ordering::Relaxed);
            let handle = LoadBalancerHandle {
                arn: format!("arn:aws:elasticloadbalancing:us-east-1:1:loadbalancer/app/{}/{n}", spec.name),
                name: spec.name.clone(),
                dns_name: Some(format!("{}.elb.amazonaws.com", spec.name)),
                scheme: spec.scheme,
                subnets: spec.subnets.clone(),
                security_groups: spec.security_groups.clone(),
                tags: spec.tags.clone(),
                state: Some("provisioning".into()),
            };
            self.seed(handle.clone());
            Ok(handle)
        })
    }

    fn update<'a>(
        &'a self,
        current: &'a LoadBalancerHandle,
        spec: &'a LoadBalancerSpec,
        _drift: &'a [FieldDrift],
    ) -> BoxFuture<'a, Result<LoadBalancerHandle, ControllerError>> {
        Box::pin(async move {
            self.calls.lock().unwrap().push(Call::Update(current.name.clone()));
            self.check(&current.name).map_err(ControllerError::UpdateFailed)?;
            let handle = LoadBalancerHandle {
                subnets: spec.subnets.clone(),
                security_groups: if spec.security_groups.is_empty() {
                    current.security_groups.clone()
                } else {
                    spec.security_groups.clone()
                },
                tags: spec.tags.clone(),
                ..current.clone()
            };
            self.seed(handle.clone());
            Ok(handle)
        })
    }

    fn delete<'a>(
        &'a self,
        current: &'a LoadBalancerHandle,
    ) -> BoxFuture<'a, Result<(), ControllerError>> {
        Box::pin(async move {
            self.calls.lock().unwrap().push(Call::Delete(current.name.clone()));
            self.check(&current.name).map_err(ControllerError::DeleteFailed)?;
            self.fleet.lock().unwrap().remove(&current.name);
            Ok(())
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedEvent {
    pub id: ResourceId,
    pub kind: EventKind,
    pub reason: String,
}

#[derive(Default)]
pub struct RecordingEventRecorder {
    pub events: Mutex<Vec<RecordedEvent>>,
}

impl RecordingEventRecorder {
    pub fn reasons(&self, kind: EventKind) -> Vec<String> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.kind == kind)
            .map(|e| e.reason.clone())
            .collect()
    }
}

impl EventRecorder for RecordingEventRecorder {
    fn record(&self, id: &ResourceId, kind: EventKind, reason: &str, _message: &str) {
        self.events.lock().unwrap().push(RecordedEvent {
            id: id.clone(),
            kind,
            reason: reason.to_string(),
        });
    }
}

pub fn ingress(namespace: &str, name: &str, service: &str) -> IngressDeclaration {
    IngressDeclaration {
        namespace: namespace.to_string(),
        name: name.to_string(),
        annotations: [(annotations::SUBNETS.to_string(), "subnet-a,subnet-b".to_string())]
            .into_iter()
            .collect(),
        backends: vec![IngressBackend {
            service_name: service.to_string(),
            service_port: 80,
        }],
    }
}

pub fn node_port_service(namespace: &str, name: &str, node_port: i32) -> Service {
    Service {
        namespace: namespace.to_string(),
        name: name.to_string(),
        service_type: ServiceType::NodePort,
        ports: vec![ServicePort {
            name: Some("http".into()),
            port: 80,
            node_port,
        }],
    }
}

pub fn nodes() -> Vec<Node> {
    vec![
        Node {
            name: "node-b".into(),
            external_id: "i-0b".into(),
        },
        Node {
            name: "node-a".into(),
            external_id: "i-0a".into(),
        },
    ]
}

/// Declarations for `ns/<name>` ingresses each backed by `ns/<name>-svc`.
pub fn declarations(names: &[&str]) -> Declarations {
    Declarations {
        ingresses: names
            .iter()
            .map(|n| ingress("ns", n, &format!("{n}-svc")))
            .collect(),
        services: names
            .iter()
            .enumerate()
            .map(|(i, n)| node_port_service("ns", &format!("{n}-svc"), 30080 + i as i32))
            .collect(),
        nodes: nodes(),
    }
}

/// A load balancer already in AWS, owned by `ns/<name>`.
pub fn existing(name: &str) -> LoadBalancerHandle {
    let id = ResourceId::new("ns", name);
    let lb_name = tags::load_balancer_name(&cluster(), &id);
    LoadBalancerHandle {
        arn: format!("arn:aws:elasticloadbalancing:us-east-1:1:loadbalancer/app/{lb_name}/seed"),
        dns_name: Some(format!("{lb_name}.elb.amazonaws.com")),
        name: lb_name,
        scheme: Scheme::Internal,
        subnets: vec!["subnet-a".into(), "subnet-b".into()],
        security_groups: vec!["sg-default".into()],
        tags: [
            (tags::CLUSTER.to_string(), CLUSTER.to_string()),
            (tags::NAMESPACE.to_string(), "ns".to_string()),
            (tags::INGRESS_NAME.to_string(), name.to_string()),
        ]
        .into_iter()
        .collect(),
        state: Some("active".into()),
    }
}

pub fn lb_name(name: &str) -> String {
    tags::load_balancer_name(&cluster(), &ResourceId::new("ns", name))
}

pub fn managed(name: &str) -> ManagedResource {
    ManagedResource::from_load_balancer(existing(name)).unwrap()
}
