use std::sync::Arc;

use albsync_controller::aws::Elbv2Api;
use albsync_controller::{Controller, TracingRecorder};
use albsync_server::config::ServerConfig;
use albsync_server::declarations::FileLister;
use albsync_server::state::AppState;
use tokio::time::{self, MissedTickBehavior};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Structured JSON logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %format!("{e:#}"), "invalid configuration");
            std::process::exit(1);
        }
    };

    let client = albsync_elbv2::client::build_client(&config.region).await;
    let controller = Arc::new(Controller::new(
        config.controller_config(),
        Arc::new(FileLister::new(config.declarations.clone())),
        Arc::new(Elbv2Api::new(client)),
        Arc::new(TracingRecorder),
    ));

    if let Err(e) = controller.bootstrap().await {
        tracing::error!(error = %e, "failed to reconstruct state from existing external resources");
        std::process::exit(1);
    }

    let sync_controller = Arc::clone(&controller);
    let sync_interval = config.sync_interval;
    tokio::spawn(async move {
        let mut ticker = time::interval(sync_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            // Errors are logged by the controller; the next tick retries.
            let _ = sync_controller.sync().await;
        }
    });

    let app = albsync_server::router(AppState { controller });
    let listener = tokio::net::TcpListener::bind(config.listen).await?;
    tracing::info!(
        listen = %config.listen,
        cluster = %config.cluster_name,
        declarations = %config.declarations.display(),
        "albsync started"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await?;
    Ok(())
}
