use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use albsync_controller::ControllerConfig;
use albsync_core::ClusterName;
use eyre::{WrapErr, eyre};

const DEFAULT_REGION: &str = "us-east-1";
const DEFAULT_LISTEN: &str = "0.0.0.0:8080";
const DEFAULT_DECLARATIONS: &str = "declarations.json";
const DEFAULT_SYNC_INTERVAL_SECS: u64 = 30;

/// Process configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub cluster_name: ClusterName,
    pub region: String,
    pub ingress_class: Option<String>,
    pub listen: SocketAddr,
    pub declarations: PathBuf,
    pub sync_interval: Duration,
    pub max_concurrent_reconciles: usize,
}

impl ServerConfig {
    pub fn from_env() -> eyre::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> eyre::Result<Self> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let cluster_name = get("CLUSTER_NAME")
            .ok_or_else(|| eyre!("CLUSTER_NAME must be set"))
            .and_then(|v| ClusterName::new(v).wrap_err("invalid CLUSTER_NAME"))?;

        let listen: SocketAddr = get("ALBSYNC_LISTEN")
            .unwrap_or_else(|| DEFAULT_LISTEN.to_string())
            .parse()
            .wrap_err("invalid ALBSYNC_LISTEN")?;

        let sync_interval_secs: u64 = match get("ALBSYNC_SYNC_INTERVAL_SECS") {
            Some(v) => v.parse().wrap_err("invalid ALBSYNC_SYNC_INTERVAL_SECS")?,
            None => DEFAULT_SYNC_INTERVAL_SECS,
        };
        if sync_interval_secs == 0 {
            return Err(eyre!("ALBSYNC_SYNC_INTERVAL_SECS must be at least 1"));
        }

        let max_concurrent_reconciles: usize = match get("ALBSYNC_MAX_CONCURRENT") {
            Some(v) => v.parse().wrap_err("invalid ALBSYNC_MAX_CONCURRENT")?,
            None => ControllerConfig::DEFAULT_MAX_CONCURRENT_RECONCILES,
        };
        if max_concurrent_reconciles == 0 {
            return Err(eyre!("ALBSYNC_MAX_CONCURRENT must be at least 1"));
        }

        Ok(Self {
            cluster_name,
            region: get("AWS_REGION").unwrap_or_else(|| DEFAULT_REGION.to_string()),
            ingress_class: get("ALBSYNC_INGRESS_CLASS"),
            listen,
            declarations: PathBuf::from(
                get("ALBSYNC_DECLARATIONS").unwrap_or_else(|| DEFAULT_DECLARATIONS.to_string()),
            ),
            sync_interval: Duration::from_secs(sync_interval_secs),
            max_concurrent_reconciles,
        })
    }

    pub fn controller_config(&self) -> ControllerConfig {
        let config = ControllerConfig::new(self.cluster_name.clone())
            .with_max_concurrent_reconciles(self.max_concurrent_reconciles);
        match &self.ingress_class {
            Some(class) => config.with_ingress_class(class),
            None => config,
        }
    }
}
