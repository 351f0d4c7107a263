use albsync_core::ClusterName;
use albsync_core::models::load_balancer::{LoadBalancerHandle, LoadBalancerSpec};
use albsync_elbv2::error::Elbv2Error;
use albsync_elbv2::{Client, load_balancers, tags};

use crate::api::{BoxFuture, LoadBalancerApi};
use crate::drift::{DriftField, FieldDrift};
use crate::error::ControllerError;

/// [`LoadBalancerApi`] backed by the ELBv2 SDK.
pub struct Elbv2Api {
    client: Client,
}

impl Elbv2Api {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    async fn apply_drift(
        &self,
        current: &LoadBalancerHandle,
        spec: &LoadBalancerSpec,
        drift: &[FieldDrift],
    ) -> Result<(), Elbv2Error> {
        for d in drift {
            match d.field {
                DriftField::Subnets => {
                    load_balancers::set_subnets(&self.client, &current.arn, &spec.subnets).await?
                }
                DriftField::SecurityGroups => {
                    load_balancers::set_security_groups(
                        &self.client,
                        &current.arn,
                        &spec.security_groups,
                    )
                    .await?
                }
                DriftField::Tags => {
                    let stale: Vec<String> = current
                        .tags
                        .keys()
                        .filter(|k| !spec.tags.contains_key(*k))
                        .cloned()
                        .collect();
                    tags::remove_tags(&self.client, &current.arn, &stale).await?;
                    tags::add_tags(&self.client, &current.arn, &spec.tags).await?;
                }
                DriftField::Scheme => {
                    return Err(Elbv2Error::Malformed(
                        "scheme cannot be changed in place".into(),
                    ));
                }
            }
        }
        Ok(())
    }
}

impl LoadBalancerApi for Elbv2Api {
    fn list_cluster<'a>(
        &'a self,
        cluster: &'a ClusterName,
    ) -> BoxFuture<'a, Result<Vec<LoadBalancerHandle>, ControllerError>> {
        Box::pin(async move {
            load_balancers::list_cluster(&self.client, cluster)
                .await
                .map_err(|e| ControllerError::Aws(e.to_string()))
        })
    }

    fn create<'a>(
        &'a self,
        spec: &'a LoadBalancerSpec,
    ) -> BoxFuture<'a, Result<LoadBalancerHandle, ControllerError>> {
        Box::pin(async move {
            load_balancers::create(&self.client, spec)
                .await
                .map_err(|e| ControllerError::CreateFailed(e.to_string()))
        })
    }

    fn update<'a>(
        &'a self,
        current: &'a LoadBalancerHandle,
        spec: &'a LoadBalancerSpec,
        drift: &'a [FieldDrift],
    ) -> BoxFuture<'a, Result<LoadBalancerHandle, ControllerError>> {
        Box::pin(async move {
            self.apply_drift(current, spec, drift)
                .await
                .map_err(|e| ControllerError::UpdateFailed(e.to_string()))?;

            load_balancers::describe(&self.client, &current.arn)
                .await
                .map_err(|e| ControllerError::Aws(e.to_string()))?
                .ok_or_else(|| {
                    ControllerError::UpdateFailed(
                        Elbv2Error::NotFound {
                            arn: current.arn.clone(),
                        }
                        .to_string(),
                    )
                })
        })
    }

    fn delete<'a>(
        &'a self,
        current: &'a LoadBalancerHandle,
    ) -> BoxFuture<'a, Result<(), ControllerError>> {
        Box::pin(async move {
            load_balancers::delete(&self.client, &current.arn)
                .await
                .map_err(|e| ControllerError::DeleteFailed(e.to_string()))
        })
    }
}
