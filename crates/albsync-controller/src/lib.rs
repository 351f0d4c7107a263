//! albsync-controller
//!
//! Reconciliation engine that keeps a cluster's application load balancers
//! in sync with its ingress declarations.
//!
//! Public API:
//! - `Controller::sync()`: build desired state, diff against committed state,
//!   reconcile every resource concurrently, commit the result
//! - `Controller::bootstrap()`: rebuild committed state from load balancers
//!   already tagged with the cluster name
//! - `Controller::status()`: read-only snapshot of committed state
//! - `Controller::resolve_hostnames()` / `Controller::resolve_node_port()`

pub mod api;
pub mod aws;
pub mod bootstrap;
pub mod build;
pub mod config;
pub mod drift;
pub mod engine;
pub mod error;
pub mod events;
pub mod lister;
pub mod metrics;
pub mod nodeport;
pub mod reconcile;
pub mod resource;
pub mod status;

pub use crate::api::LoadBalancerApi;
pub use crate::config::ControllerConfig;
pub use crate::engine::Controller;
pub use crate::error::ControllerError;
pub use crate::events::{EventKind, EventRecorder, TracingRecorder};
pub use crate::lister::{DeclarationLister, Declarations, MemoryLister};
pub use crate::resource::{ManagedResource, ManagedResourceSet};
pub use crate::status::{StatusSnapshot, SyncReport};
