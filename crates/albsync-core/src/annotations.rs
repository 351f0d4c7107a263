//! Annotation keys and value parsing for ingress declarations.

use std::collections::BTreeMap;

use crate::error::CoreError;
use crate::models::load_balancer::Scheme;

pub const INGRESS_CLASS: &str = "kubernetes.io/ingress.class";
pub const SCHEME: &str = "alb.ingress.kubernetes.io/scheme";
pub const SUBNETS: &str = "alb.ingress.kubernetes.io/subnets";
pub const SECURITY_GROUPS: &str = "alb.ingress.kubernetes.io/security-groups";
pub const TAGS: &str = "alb.ingress.kubernetes.io/tags";

/// Load balancer settings carried on a declaration's annotations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadBalancerAnnotations {
    pub scheme: Scheme,
    pub subnets: Vec<String>,
    pub security_groups: Vec<String>,
    pub tags: BTreeMap<String, String>,
}

impl LoadBalancerAnnotations {
    pub fn parse(annotations: &BTreeMap<String, String>) -> Result<Self, CoreError> {
        let scheme = match annotations.get(SCHEME) {
            Some(value) => value.trim().parse()?,
            None => Scheme::Internal,
        };

        let subnets = annotations
            .get(SUBNETS)
            .map(|v| parse_string_list(v))
            .unwrap_or_default();
        if subnets.is_empty() {
            return Err(CoreError::MissingAnnotation(SUBNETS.to_string()));
        }

        let security_groups = annotations
            .get(SECURITY_GROUPS)
            .map(|v| parse_string_list(v))
            .unwrap_or_default();

        let tags = match annotations.get(TAGS) {
            Some(value) => parse_tags(value)?,
            None => BTreeMap::new(),
        };

        Ok(Self {
            scheme,
            subnets,
            security_groups,
            tags,
        })
    }
}

/// Split a comma separated value, trimming whitespace and dropping empty parts.
pub fn parse_string_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(String::from)
        .collect()
}

/// Parse `key=value` pairs separated by commas.
pub fn parse_tags(value: &str) -> Result<BTreeMap<String, String>, CoreError> {
    parse_string_list(value)
        .into_iter()
        .map(|pair| match pair.split_once('=') {
            Some((key, value)) if !key.trim().is_empty() => {
                Ok((key.trim().to_string(), value.trim().to_string()))
            }
            _ => Err(CoreError::InvalidAnnotation {
                key: TAGS.to_string(),
                reason: format!("expected key=value, got {pair:?}"),
            }),
        })
        .collect()
}
