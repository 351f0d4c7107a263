//! albsync-core
//!
//! Pure domain types and deterministic helpers for the ALB sync controller.
//! No AWS SDK dependency; this is the shared vocabulary of the albsync system.

pub mod annotations;
pub mod batch;
pub mod cluster;
pub mod error;
pub mod hash;
pub mod models;
pub mod tags;

pub use crate::cluster::ClusterName;
pub use crate::error::CoreError;
pub use crate::models::identity::ResourceId;
