use std::collections::{BTreeMap, HashMap};

use aws_sdk_elasticloadbalancingv2::Client;
use aws_sdk_elasticloadbalancingv2::types::Tag;

use albsync_core::batch;

use crate::error::{Elbv2Error, format_err_chain};

/// DescribeTags accepts at most this many resource ARNs per call.
pub const MAX_ARNS_PER_DESCRIBE: usize = 20;

/// Fetch the tags of every ARN, keyed by ARN.
///
/// ARNs are sent in evenly sized batches that respect the per-call limit.
pub async fn describe_tags(
    client: &Client,
    arns: &[String],
) -> Result<HashMap<String, BTreeMap<String, String>>, Elbv2Error> {
    let mut tags_by_arn = HashMap::with_capacity(arns.len());
    if arns.is_empty() {
        return Ok(tags_by_arn);
    }

    let group_count = batch::groups_for_limit(arns.len(), MAX_ARNS_PER_DESCRIBE)?;
    for group in batch::split_into_groups(arns, group_count)? {
        let resp = client
            .describe_tags()
            .set_resource_arns(Some(group.to_vec()))
            .send()
            .await
            .map_err(|e| Elbv2Error::DescribeTags(format_err_chain(&e)))?;

        for description in resp.tag_descriptions() {
            let Some(arn) = description.resource_arn() else {
                continue;
            };
            let tags = description
                .tags()
                .iter()
                .filter_map(|t| {
                    let key = t.key()?;
                    Some((key.to_string(), t.value().unwrap_or_default().to_string()))
                })
                .collect();
            tags_by_arn.insert(arn.to_string(), tags);
        }
    }

    tracing::debug!(arns = arns.len(), groups = group_count, "described load balancer tags");
    Ok(tags_by_arn)
}

pub fn to_sdk_tags(tags: &BTreeMap<String, String>) -> Vec<Tag> {
    tags.iter()
        .map(|(key, value)| Tag::builder().key(key).value(value).build())
        .collect()
}

/// Add or overwrite tags on a load balancer.
pub async fn add_tags(
    client: &Client,
    arn: &str,
    tags: &BTreeMap<String, String>,
) -> Result<(), Elbv2Error> {
    if tags.is_empty() {
        return Ok(());
    }
    client
        .add_tags()
        .resource_arns(arn)
        .set_tags(Some(to_sdk_tags(tags)))
        .send()
        .await
        .map_err(|e| Elbv2Error::Modify(format_err_chain(&e)))?;
    Ok(())
}

pub async fn remove_tags(client: &Client, arn: &str, keys: &[String]) -> Result<(), Elbv2Error> {
    if keys.is_empty() {
        return Ok(());
    }
    client
        .remove_tags()
        .resource_arns(arn)
        .set_tag_keys(Some(keys.to_vec()))
        .send()
        .await
        .map_err(|e| Elbv2Error::Modify(format_err_chain(&e)))?;
    Ok(())
}
