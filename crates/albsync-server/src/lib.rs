//! albsync-server
//!
//! Host process for the controller: environment configuration, a periodic
//! sync loop and a small diagnostics API.

pub mod config;
pub mod declarations;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod state;

use axum::Router;
use axum::middleware as axum_mw;
use axum::routing::get;
use tower_http::cors::{Any, CorsLayer};

use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(routes::health::health_check))
        .route("/state", get(routes::status::get_state))
        .route(
            "/hostnames/{namespace}/{name}",
            get(routes::hostnames::get_hostnames),
        )
        .route("/nodeport", get(routes::nodeport::get_node_port))
        .layer(axum_mw::from_fn(middleware::request_log))
        .layer(cors)
        .with_state(state)
}
