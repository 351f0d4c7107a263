use serde::{Deserialize, Serialize};

use crate::api::LoadBalancerApi;
use crate::drift::{self, Action, FieldDrift};
use crate::error::ControllerError;
use crate::events::{EventKind, EventRecorder};
use crate::resource::ManagedResource;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Skipped,
    Unchanged,
    Created,
    Updated,
    Replaced,
    Deleted,
    Failed,
}

/// Converge one resource, mutating its handle in place.
///
/// Errors never escape: they are logged, recorded as a warning event and
/// kept in `last_error`.
pub async fn reconcile(
    resource: &mut ManagedResource,
    api: &dyn LoadBalancerApi,
    recorder: &dyn EventRecorder,
) -> Outcome {
    let plan = drift::plan(resource);
    let result = match plan.action {
        Action::Skip => {
            tracing::debug!(id = %resource.id, "tainted, skipping reconcile");
            return Outcome::Skipped;
        }
        Action::Keep => Ok(Outcome::Unchanged),
        Action::Create => create(resource, api, recorder)
            .await
            .map(|()| Outcome::Created),
        Action::Update => update(resource, &plan.drift, api, recorder)
            .await
            .map(|()| Outcome::Updated),
        Action::Replace => replace(resource, api, recorder)
            .await
            .map(|()| Outcome::Replaced),
        Action::Delete => delete(resource, api, recorder)
            .await
            .map(|()| Outcome::Deleted),
    };

    match result {
        Ok(outcome) => {
            resource.last_error = None;
            outcome
        }
        Err(e) => {
            let e = e.with_resource(&resource.id);
            tracing::error!(id = %resource.id, error = %e, "reconcile failed");
            recorder.record(&resource.id, EventKind::Warning, "ERROR", &e.to_string());
            resource.last_error = Some(e.to_string());
            Outcome::Failed
        }
    }
}

async fn create(
    resource: &mut ManagedResource,
    api: &dyn LoadBalancerApi,
    recorder: &dyn EventRecorder,
) -> Result<(), ControllerError> {
    let Some(spec) = resource.desired.as_ref() else {
        return Ok(());
    };

    tracing::info!(id = %resource.id, name = %spec.name, "creating load balancer");
    let handle = api.create(spec).await?;
    recorder.record(
        &resource.id,
        EventKind::Normal,
        "CREATE",
        &format!("{} created", handle.name),
    );
    resource.load_balancer = Some(handle);
    Ok(())
}

async fn update(
    resource: &mut ManagedResource,
    drift: &[FieldDrift],
    api: &dyn LoadBalancerApi,
    recorder: &dyn EventRecorder,
) -> Result<(), ControllerError> {
    let (Some(spec), Some(current)) = (resource.desired.as_ref(), resource.load_balancer.as_ref())
    else {
        return Ok(());
    };

    tracing::info!(id = %resource.id, arn = %current.arn, drift = drift.len(), "updating load balancer");
    let handle = api.update(current, spec, drift).await?;
    recorder.record(
        &resource.id,
        EventKind::Normal,
        "MODIFY",
        &format!("{} modified", handle.name),
    );
    resource.load_balancer = Some(handle);
    Ok(())
}

async fn replace(
    resource: &mut ManagedResource,
    api: &dyn LoadBalancerApi,
    recorder: &dyn EventRecorder,
) -> Result<(), ControllerError> {
    tracing::info!(id = %resource.id, "scheme changed, replacing load balancer");
    delete(resource, api, recorder).await?;
    create(resource, api, recorder).await
}

async fn delete(
    resource: &mut ManagedResource,
    api: &dyn LoadBalancerApi,
    recorder: &dyn EventRecorder,
) -> Result<(), ControllerError> {
    let Some(current) = resource.load_balancer.as_ref() else {
        return Ok(());
    };

    tracing::info!(id = %resource.id, arn = %current.arn, "deleting load balancer");
    api.delete(current).await?;
    recorder.record(
        &resource.id,
        EventKind::Normal,
        "DELETE",
        &format!("{} deleted", current.name),
    );
    resource.load_balancer = None;
    Ok(())
}
