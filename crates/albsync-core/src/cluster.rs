use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Identity of the Kubernetes cluster that owns a set of load balancers.
///
/// Embedded in every generated load balancer name (`{cluster}-{hash}`), which
/// AWS caps at 32 characters. The hyphen ban keeps the prefix unambiguous.
#[derive(Debug, Clone, Hash, Eq, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ClusterName(String);

impl ClusterName {
    pub const MAX_LEN: usize = 11;

    pub fn new(name: impl Into<String>) -> Result<Self, CoreError> {
        let name = name.into();
        if name.is_empty() {
            return Err(CoreError::InvalidClusterName(
                "a cluster name must be defined".into(),
            ));
        }
        if name.len() > Self::MAX_LEN {
            return Err(CoreError::InvalidClusterName(format!(
                "cluster name must be {} characters or less, got {name:?}",
                Self::MAX_LEN
            )));
        }
        if name.contains('-') {
            return Err(CoreError::InvalidClusterName(format!(
                "cluster name cannot contain '-', got {name:?}"
            )));
        }
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ClusterName {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ClusterName {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for ClusterName {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ClusterName> for String {
    fn from(value: ClusterName) -> Self {
        value.0
    }
}
