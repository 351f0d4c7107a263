use axum::Json;
use axum::extract::{Query, State};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct NodePortQuery {
    /// `namespace/name`
    service: String,
    port: i32,
}

#[derive(Serialize)]
pub struct NodePortResponse {
    node_port: i32,
}

pub async fn get_node_port(
    State(state): State<AppState>,
    Query(query): Query<NodePortQuery>,
) -> Result<Json<NodePortResponse>, ApiError> {
    if !query.service.contains('/') {
        return Err(ApiError::BadRequest(format!(
            "service must be namespace/name, got {:?}",
            query.service
        )));
    }

    let node_port = state
        .controller
        .resolve_node_port(&query.service, query.port)?;
    Ok(Json(NodePortResponse { node_port }))
}
