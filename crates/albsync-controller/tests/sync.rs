mod common;

use std::sync::Arc;

use albsync_controller::engine::deletable;
use albsync_controller::lister::{DeclarationLister, ListerError};
use albsync_controller::{
    Controller, ControllerConfig, ControllerError, EventKind, ManagedResourceSet, MemoryLister,
};
use albsync_core::annotations;
use albsync_core::models::identity::ResourceId;
use albsync_core::models::ingress::IngressDeclaration;
use albsync_core::models::load_balancer::Scheme;
use albsync_core::models::node::Node;
use albsync_core::models::service::Service;
use common::*;

struct Harness {
    controller: Controller,
    lister: Arc<MemoryLister>,
    api: Arc<FakeApi>,
    events: Arc<RecordingEventRecorder>,
}

fn harness(config: ControllerConfig, names: &[&str]) -> Harness {
    let lister = Arc::new(MemoryLister::new(declarations(names)));
    let api = Arc::new(FakeApi::new());
    let events = Arc::new(RecordingEventRecorder::default());
    let controller = Controller::new(config, lister.clone(), api.clone(), events.clone());
    Harness {
        controller,
        lister,
        api,
        events,
    }
}

fn committed_ids(controller: &Controller) -> Vec<String> {
    controller
        .committed()
        .resources
        .iter()
        .map(|r| r.id.to_string())
        .collect()
}

#[tokio::test]
async fn removed_declaration_is_deleted_and_new_one_created() {
    let h = harness(config(), &["b", "c"]);
    h.api.seed(existing("a"));
    h.api.seed(existing("b"));
    h.controller.bootstrap().await.unwrap();
    h.api.clear_calls();

    let report = h.controller.sync().await.unwrap();

    let mutations = h.api.mutations();
    assert!(mutations.contains(&Call::Delete(lb_name("a"))));
    assert!(mutations.contains(&Call::Create(lb_name("c"))));
    assert!(!mutations.contains(&Call::Delete(lb_name("b"))));
    assert_eq!(mutations.len(), 2);

    assert_eq!(report.created, 1);
    assert_eq!(report.deleted, 1);
    assert_eq!(report.unchanged, 1);
    assert_eq!(report.cycle, 1);

    let mut ids = committed_ids(&h.controller);
    ids.sort();
    assert_eq!(ids, vec!["ns/b", "ns/c"]);

    let c = h
        .controller
        .committed()
        .resources
        .get_by_id(&ResourceId::new("ns", "c"))
        .cloned()
        .unwrap();
    assert!(c.load_balancer.is_some());
    assert_eq!(h.events.reasons(EventKind::Normal).len(), 2);
}

#[tokio::test]
async fn second_sync_without_changes_makes_no_calls() {
    let h = harness(config(), &["a", "b"]);

    let first = h.controller.sync().await.unwrap();
    assert_eq!(first.created, 2);
    h.api.clear_calls();

    let second = h.controller.sync().await.unwrap();
    assert!(h.api.mutations().is_empty());
    assert_eq!(second.unchanged, 2);
    assert!(!second.changed());
    assert_eq!(second.cycle, 2);
}

#[tokio::test]
async fn desired_state_carries_backends_and_sorted_targets() {
    let h = harness(config(), &["a"]);
    h.controller.sync().await.unwrap();

    let state = h.controller.committed();
    let resource = state.resources.get_by_id(&ResourceId::new("ns", "a")).unwrap();
    let spec = resource.desired.as_ref().unwrap();
    assert_eq!(spec.targets, vec!["i-0a", "i-0b"]);
    assert_eq!(spec.backends.len(), 1);
    assert_eq!(spec.backends[0].service_key, "ns/a-svc");
    assert_eq!(spec.backends[0].node_port, 30080);
    assert_eq!(spec.name, lb_name("a"));
}

#[tokio::test]
async fn one_failure_does_not_affect_siblings() {
    let h = harness(config(), &["a", "b", "c"]);
    h.api.fail_on(&lb_name("b"));

    let report = h.controller.sync().await.unwrap();
    assert_eq!(report.created, 2);
    assert_eq!(report.failed, 1);

    let state = h.controller.committed();
    let a = state.resources.get_by_id(&ResourceId::new("ns", "a")).unwrap();
    let b = state.resources.get_by_id(&ResourceId::new("ns", "b")).unwrap();
    let c = state.resources.get_by_id(&ResourceId::new("ns", "c")).unwrap();
    assert!(a.load_balancer.is_some());
    assert!(c.load_balancer.is_some());
    assert!(b.load_balancer.is_none());
    assert!(b.desired.is_some());
    assert!(b.last_error.as_deref().unwrap().contains("injected failure"));

    assert_eq!(h.events.reasons(EventKind::Warning), vec!["ERROR"]);
    assert_eq!(h.controller.metrics().snapshot().reconcile_failures, 1);
}

#[tokio::test]
async fn panicking_task_keeps_pre_reconcile_state() {
    let h = harness(config(), &["a", "b"]);
    h.api.panic_on(&lb_name("a"));

    let report = h.controller.sync().await.unwrap();
    assert_eq!(report.created, 1);
    assert_eq!(report.failed, 1);

    let state = h.controller.committed();
    let a = state.resources.get_by_id(&ResourceId::new("ns", "a")).unwrap();
    assert!(a.load_balancer.is_none());
    assert!(a.desired.is_some());
    assert!(a.last_error.is_some());
    let b = state.resources.get_by_id(&ResourceId::new("ns", "b")).unwrap();
    assert!(b.load_balancer.is_some());
}

#[tokio::test]
async fn failed_create_is_retried_next_cycle() {
    let h = harness(config(), &["a"]);
    h.api.fail_on(&lb_name("a"));
    h.controller.sync().await.unwrap();

    h.api.fail.lock().unwrap().clear();
    let report = h.controller.sync().await.unwrap();
    assert_eq!(report.created, 1);

    let state = h.controller.committed();
    let a = state.resources.get_by_id(&ResourceId::new("ns", "a")).unwrap();
    assert!(a.load_balancer.is_some());
    assert!(a.last_error.is_none());
}

struct BrokenLister;

impl DeclarationLister for BrokenLister {
    fn list_ingresses(&self) -> Result<Vec<IngressDeclaration>, ListerError> {
        Err(ListerError("cache not synced".into()))
    }

    fn get_service(&self, _key: &str) -> Result<Option<Service>, ListerError> {
        Ok(None)
    }

    fn list_nodes(&self) -> Result<Vec<Node>, ListerError> {
        Ok(vec![])
    }
}

#[tokio::test]
async fn listing_failure_leaves_committed_state_untouched() {
    let api = Arc::new(FakeApi::new());
    api.seed(existing("a"));
    let events = Arc::new(RecordingEventRecorder::default());
    let controller = Controller::new(config(), Arc::new(BrokenLister), api.clone(), events);
    controller.bootstrap().await.unwrap();
    api.clear_calls();

    let before = controller.committed();
    let err = controller.sync().await.unwrap_err();
    assert!(matches!(err, ControllerError::Lister(_)));

    assert!(api.calls().is_empty());
    let after = controller.committed();
    assert!(Arc::ptr_eq(&before, &after));
    assert_eq!(controller.metrics().snapshot().failed_cycles, 1);
}

#[tokio::test]
async fn broken_declaration_taints_without_deleting() {
    let h = harness(config(), &["a"]);
    h.controller.sync().await.unwrap();
    let original = h
        .controller
        .committed()
        .resources
        .get_by_id(&ResourceId::new("ns", "a"))
        .and_then(|r| r.load_balancer.clone())
        .unwrap();

    // Service disappears: the backend can no longer be resolved.
    let mut decls = declarations(&["a"]);
    decls.services.clear();
    h.lister.replace(decls).unwrap();
    h.api.clear_calls();

    let report = h.controller.sync().await.unwrap();
    assert_eq!(report.skipped, 1);
    assert!(h.api.mutations().is_empty());

    let state = h.controller.committed();
    let a = state.resources.get_by_id(&ResourceId::new("ns", "a")).unwrap();
    assert!(a.tainted);
    assert_eq!(a.load_balancer.as_ref(), Some(&original));
    assert!(a.last_error.as_deref().unwrap().contains("ns/a-svc"));
    assert_eq!(h.controller.metrics().snapshot().tainted_resources, 1);
    assert!(h.events.reasons(EventKind::Warning).contains(&"ERROR".to_string()));

    // Fixed again: taint clears and nothing is recreated.
    h.lister.replace(declarations(&["a"])).unwrap();
    h.api.clear_calls();
    h.controller.sync().await.unwrap();
    let state = h.controller.committed();
    let a = state.resources.get_by_id(&ResourceId::new("ns", "a")).unwrap();
    assert!(!a.tainted);
    assert!(h.api.mutations().is_empty());
}

#[tokio::test]
async fn missing_subnets_taint_a_new_declaration() {
    let h = harness(config(), &[]);
    let mut decls = declarations(&["a"]);
    decls.ingresses[0].annotations.remove(annotations::SUBNETS);
    h.lister.replace(decls).unwrap();

    let report = h.controller.sync().await.unwrap();
    assert_eq!(report.skipped, 1);
    assert!(h.api.mutations().is_empty());

    let state = h.controller.committed();
    let a = state.resources.get_by_id(&ResourceId::new("ns", "a")).unwrap();
    assert!(a.tainted);
    assert!(a.load_balancer.is_none());
    assert!(a.last_error.as_deref().unwrap().contains(annotations::SUBNETS));

    let status = h.controller.status();
    assert_eq!(status.resources.len(), 1);
    assert_eq!(status.metrics.tainted_resources, 1);

    // Still tracked on the next cycle, then created once fixed.
    h.controller.sync().await.unwrap();
    assert_eq!(committed_ids(&h.controller), vec!["ns/a"]);

    h.lister.replace(declarations(&["a"])).unwrap();
    let report = h.controller.sync().await.unwrap();
    assert_eq!(report.created, 1);
    assert_eq!(h.api.mutations(), vec![Call::Create(lb_name("a"))]);
}

#[tokio::test]
async fn scheme_change_replaces_the_load_balancer() {
    let h = harness(config(), &["a"]);
    h.controller.sync().await.unwrap();

    let mut decls = declarations(&["a"]);
    decls.ingresses[0]
        .annotations
        .insert(annotations::SCHEME.into(), "internet-facing".into());
    h.lister.replace(decls).unwrap();
    h.api.clear_calls();

    let report = h.controller.sync().await.unwrap();
    assert_eq!(report.replaced, 1);
    assert_eq!(
        h.api.mutations(),
        vec![Call::Delete(lb_name("a")), Call::Create(lb_name("a"))]
    );

    let state = h.controller.committed();
    let a = state.resources.get_by_id(&ResourceId::new("ns", "a")).unwrap();
    assert_eq!(a.load_balancer.as_ref().unwrap().scheme, Scheme::InternetFacing);
}

#[tokio::test]
async fn subnet_change_updates_in_place() {
    let h = harness(config(), &["a"]);
    h.controller.sync().await.unwrap();

    let mut decls = declarations(&["a"]);
    decls.ingresses[0]
        .annotations
        .insert(annotations::SUBNETS.into(), "subnet-c,subnet-a".into());
    h.lister.replace(decls).unwrap();
    h.api.clear_calls();

    let report = h.controller.sync().await.unwrap();
    assert_eq!(report.updated, 1);
    assert_eq!(h.api.mutations(), vec![Call::Update(lb_name("a"))]);
    assert!(h.events.reasons(EventKind::Normal).contains(&"MODIFY".to_string()));
}

#[tokio::test]
async fn other_ingress_classes_are_ignored() {
    let h = harness(config(), &["a", "b"]);
    let mut decls = declarations(&["a", "b"]);
    decls.ingresses[1]
        .annotations
        .insert(annotations::INGRESS_CLASS.into(), "nginx".into());
    h.lister.replace(decls).unwrap();

    h.controller.sync().await.unwrap();
    assert_eq!(committed_ids(&h.controller), vec!["ns/a"]);
    assert_eq!(h.api.mutations(), vec![Call::Create(lb_name("a"))]);
}

#[tokio::test]
async fn custom_class_only_takes_annotated_declarations() {
    let h = harness(ControllerConfig::new(cluster()).with_ingress_class("internal-alb"), &[]);
    let mut decls = declarations(&["a", "b"]);
    decls.ingresses[1]
        .annotations
        .insert(annotations::INGRESS_CLASS.into(), "internal-alb".into());
    h.lister.replace(decls).unwrap();

    h.controller.sync().await.unwrap();
    assert_eq!(committed_ids(&h.controller), vec!["ns/b"]);
}

#[tokio::test]
async fn hostnames_resolve_from_committed_state() {
    let h = harness(config(), &["a"]);

    let missing = h.controller.resolve_hostnames(&ResourceId::new("ns", "a"));
    assert!(matches!(missing, Err(ControllerError::NotFound(_))));

    h.api.fail_on(&lb_name("a"));
    h.controller.sync().await.unwrap();
    let pending = h
        .controller
        .resolve_hostnames(&ResourceId::new("ns", "a"))
        .unwrap();
    assert!(pending.is_empty());

    h.api.fail.lock().unwrap().clear();
    h.controller.sync().await.unwrap();
    let names = h
        .controller
        .resolve_hostnames(&ResourceId::new("ns", "a"))
        .unwrap();
    assert_eq!(names, vec![format!("{}.elb.amazonaws.com", lb_name("a"))]);
}

#[tokio::test]
async fn status_reports_cycle_and_resources() {
    let h = harness(config(), &["a"]);
    let empty = h.controller.status();
    assert_eq!(empty.cycle, 0);
    assert!(empty.committed_at.is_none());

    h.controller.sync().await.unwrap();
    let status = h.controller.status();
    assert_eq!(status.cycle, 1);
    assert!(status.committed_at.is_some());
    assert_eq!(status.resources.len(), 1);
    assert_eq!(status.metrics.sync_cycles, 1);
    assert_eq!(status.metrics.managed_resources, 1);
    assert_eq!(status.cluster_name.as_str(), CLUSTER);

    let json = serde_json::to_value(&status).unwrap();
    assert_eq!(json["resources"][0]["id"]["name"], "a");
}

#[test]
fn deletable_selects_only_untainted_absentees_with_a_handle() {
    let mut tainted = managed("t");
    tainted.tainted = true;
    let mut handleless = managed("h");
    handleless.load_balancer = None;
    let previous: ManagedResourceSet = vec![managed("a"), managed("b"), tainted, handleless].into();
    let desired: ManagedResourceSet = vec![managed("b")].into();

    let removed = deletable(&previous, &desired);
    let ids: Vec<String> = removed.iter().map(|r| r.id.to_string()).collect();
    assert_eq!(ids, vec!["ns/a"]);
    assert!(removed.iter().all(|r| r.desired.is_none() && r.load_balancer.is_some()));
}

#[test]
fn deletable_is_empty_when_everything_is_still_declared() {
    let previous: ManagedResourceSet = vec![managed("a"), managed("b")].into();
    let desired = previous.clone();
    assert!(deletable(&previous, &desired).is_empty());
    assert!(deletable(&ManagedResourceSet::new(), &desired).is_empty());
}
