use albsync_core::hash::fingerprint;
use albsync_core::models::load_balancer::{LoadBalancerHandle, LoadBalancerSpec};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::resource::ManagedResource;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DriftField {
    Scheme,
    Subnets,
    SecurityGroups,
    Tags,
}

/// Structured before/after for a single field that doesn't match desired state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDrift {
    pub field: DriftField,
    /// What we want
    pub expected: Value,
    /// What AWS has
    pub actual: Value,
}

/// What a reconcile pass will do to one resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// Tainted; left alone this cycle.
    Skip,
    /// In sync, or already gone.
    Keep,
    Create,
    Update,
    /// Immutable field changed; delete then create.
    Replace,
    Delete,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Plan {
    pub action: Action,
    pub drift: Vec<FieldDrift>,
}

/// Compare desired state against the load balancer AWS reports.
///
/// Subnets and security groups compare as unordered sets. An empty desired
/// security group list means "whatever AWS assigns" and never drifts.
pub fn diff(desired: &LoadBalancerSpec, actual: &LoadBalancerHandle) -> Vec<FieldDrift> {
    let mut drift = Vec::new();

    if desired.scheme != actual.scheme {
        drift.push(FieldDrift {
            field: DriftField::Scheme,
            expected: json!(desired.scheme),
            actual: json!(actual.scheme),
        });
    }

    if fingerprint(&desired.subnets) != fingerprint(&actual.subnets) {
        drift.push(FieldDrift {
            field: DriftField::Subnets,
            expected: json!(desired.subnets),
            actual: json!(actual.subnets),
        });
    }

    if !desired.security_groups.is_empty()
        && fingerprint(&desired.security_groups) != fingerprint(&actual.security_groups)
    {
        drift.push(FieldDrift {
            field: DriftField::SecurityGroups,
            expected: json!(desired.security_groups),
            actual: json!(actual.security_groups),
        });
    }

    if desired.tags != actual.tags {
        drift.push(FieldDrift {
            field: DriftField::Tags,
            expected: json!(desired.tags),
            actual: json!(actual.tags),
        });
    }

    drift
}

/// Decide the action for one resource from its desired and actual state.
pub fn plan(resource: &ManagedResource) -> Plan {
    if resource.tainted {
        return Plan {
            action: Action::Skip,
            drift: vec![],
        };
    }

    match (&resource.desired, &resource.load_balancer) {
        (None, None) => Plan {
            action: Action::Keep,
            drift: vec![],
        },
        (None, Some(_)) => Plan {
            action: Action::Delete,
            drift: vec![],
        },
        (Some(_), None) => Plan {
            action: Action::Create,
            drift: vec![],
        },
        (Some(desired), Some(actual)) => {
            let drift = diff(desired, actual);
            let action = if drift.is_empty() {
                Action::Keep
            } else if drift.iter().any(|d| d.field == DriftField::Scheme) {
                Action::Replace
            } else {
                Action::Update
            };
            Plan { action, drift }
        }
    }
}
