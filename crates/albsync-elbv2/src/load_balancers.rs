use std::collections::{BTreeMap, HashMap};

use aws_sdk_elasticloadbalancingv2::Client;
use aws_sdk_elasticloadbalancingv2::types::{
    LoadBalancer, LoadBalancerSchemeEnum, LoadBalancerTypeEnum,
};

use albsync_core::models::load_balancer::{LoadBalancerHandle, LoadBalancerSpec, Scheme};
use albsync_core::{ClusterName, tags as naming};

use crate::error::{Elbv2Error, format_err_chain};
use crate::tags;

/// List every load balancer owned by `cluster`.
///
/// Names are pre-filtered on the `{cluster}-` prefix; ownership is then
/// confirmed against the cluster tag.
pub async fn list_cluster(
    client: &Client,
    cluster: &ClusterName,
) -> Result<Vec<LoadBalancerHandle>, Elbv2Error> {
    let mut candidates = Vec::new();
    let mut marker: Option<String> = None;
    loop {
        let mut req = client.describe_load_balancers();
        if let Some(m) = &marker {
            req = req.marker(m);
        }
        let resp = req
            .send()
            .await
            .map_err(|e| Elbv2Error::Describe(format_err_chain(&e)))?;

        candidates.extend(
            resp.load_balancers()
                .iter()
                .filter(|lb| {
                    lb.load_balancer_name()
                        .is_some_and(|name| naming::has_cluster_prefix(cluster, name))
                })
                .cloned(),
        );

        match resp.next_marker() {
            Some(next) if !next.is_empty() => marker = Some(next.to_string()),
            _ => break,
        }
    }

    let arns: Vec<String> = candidates
        .iter()
        .filter_map(|lb| lb.load_balancer_arn().map(String::from))
        .collect();
    let tags_by_arn = tags::describe_tags(client, &arns).await?;
    let handles = owned_handles(&candidates, tags_by_arn, cluster)?;

    tracing::info!(
        cluster = %cluster,
        candidates = candidates.len(),
        owned = handles.len(),
        "listed cluster load balancers"
    );
    Ok(handles)
}

/// Look up one load balancer by ARN. `Ok(None)` if it no longer exists.
pub async fn describe(client: &Client, arn: &str) -> Result<Option<LoadBalancerHandle>, Elbv2Error> {
    let resp = match client.describe_load_balancers().load_balancer_arns(arn).send().await {
        Ok(resp) => resp,
        Err(e) => {
            let err = e.into_service_error();
            if err.is_load_balancer_not_found_exception() {
                return Ok(None);
            }
            return Err(Elbv2Error::Describe(format_err_chain(&err)));
        }
    };

    let Some(lb) = resp.load_balancers().first() else {
        return Ok(None);
    };
    let mut tags_by_arn = tags::describe_tags(client, &[arn.to_string()]).await?;
    let lb_tags = tags_by_arn.remove(arn).unwrap_or_default();
    to_handle(lb, lb_tags).map(Some)
}

/// Create an application load balancer matching `spec`.
pub async fn create(client: &Client, spec: &LoadBalancerSpec) -> Result<LoadBalancerHandle, Elbv2Error> {
    let security_groups = if spec.security_groups.is_empty() {
        None
    } else {
        Some(spec.security_groups.clone())
    };

    let resp = client
        .create_load_balancer()
        .name(&spec.name)
        .r#type(LoadBalancerTypeEnum::Application)
        .scheme(LoadBalancerSchemeEnum::from(spec.scheme.as_str()))
        .set_subnets(Some(spec.subnets.clone()))
        .set_security_groups(security_groups)
        .set_tags(Some(tags::to_sdk_tags(&spec.tags)))
        .send()
        .await
        .map_err(|e| Elbv2Error::Create(format_err_chain(&e)))?;

    let lb = resp
        .load_balancers()
        .first()
        .ok_or_else(|| Elbv2Error::Malformed("CreateLoadBalancer returned no load balancer".into()))?;

    let handle = to_handle(lb, spec.tags.clone())?;
    tracing::info!(name = %handle.name, arn = %handle.arn, "load balancer created");
    Ok(handle)
}

pub async fn set_subnets(client: &Client, arn: &str, subnets: &[String]) -> Result<(), Elbv2Error> {
    client
        .set_subnets()
        .load_balancer_arn(arn)
        .set_subnets(Some(subnets.to_vec()))
        .send()
        .await
        .map_err(|e| Elbv2Error::Modify(format_err_chain(&e)))?;
    tracing::info!(arn = %arn, "load balancer subnets updated");
    Ok(())
}

pub async fn set_security_groups(
    client: &Client,
    arn: &str,
    security_groups: &[String],
) -> Result<(), Elbv2Error> {
    client
        .set_security_groups()
        .load_balancer_arn(arn)
        .set_security_groups(Some(security_groups.to_vec()))
        .send()
        .await
        .map_err(|e| Elbv2Error::Modify(format_err_chain(&e)))?;
    tracing::info!(arn = %arn, "load balancer security groups updated");
    Ok(())
}

pub async fn delete(client: &Client, arn: &str) -> Result<(), Elbv2Error> {
    client
        .delete_load_balancer()
        .load_balancer_arn(arn)
        .send()
        .await
        .map_err(|e| Elbv2Error::Delete(format_err_chain(&e)))?;
    tracing::info!(arn = %arn, "load balancer deleted");
    Ok(())
}

/// Keep the load balancers whose cluster tag names `cluster` and convert them.
///
/// Ownership is decided on the tags alone, so a foreign load balancer that
/// merely shares the name prefix is skipped even if its description is
/// incomplete.
pub fn owned_handles(
    candidates: &[LoadBalancer],
    mut tags_by_arn: HashMap<String, BTreeMap<String, String>>,
    cluster: &ClusterName,
) -> Result<Vec<LoadBalancerHandle>, Elbv2Error> {
    let mut handles = Vec::new();
    for lb in candidates {
        let lb_tags = lb
            .load_balancer_arn()
            .and_then(|arn| tags_by_arn.remove(arn))
            .unwrap_or_default();
        let owned = lb_tags.get(naming::CLUSTER).map(String::as_str) == Some(cluster.as_str());
        if owned {
            handles.push(to_handle(lb, lb_tags)?);
        }
    }
    Ok(handles)
}

/// Convert an SDK load balancer plus its tags into a handle.
pub fn to_handle(
    lb: &LoadBalancer,
    tags: BTreeMap<String, String>,
) -> Result<LoadBalancerHandle, Elbv2Error> {
    let arn = lb
        .load_balancer_arn()
        .ok_or_else(|| Elbv2Error::Malformed("load balancer without an ARN".into()))?;

    let scheme = match lb.scheme() {
        Some(scheme) => scheme.as_str().parse::<Scheme>()?,
        None => Scheme::default(),
    };

    Ok(LoadBalancerHandle {
        arn: arn.to_string(),
        name: lb.load_balancer_name().unwrap_or_default().to_string(),
        dns_name: lb.dns_name().map(String::from),
        scheme,
        subnets: lb
            .availability_zones()
            .iter()
            .filter_map(|az| az.subnet_id().map(String::from))
            .collect(),
        security_groups: lb.security_groups().to_vec(),
        tags,
        state: lb
            .state()
            .and_then(|state| state.code())
            .map(|code| code.as_str().to_string()),
    })
}
