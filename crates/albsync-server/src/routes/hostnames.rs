use albsync_core::ResourceId;
use axum::Json;
use axum::extract::{Path, State};

use crate::error::ApiError;
use crate::state::AppState;

pub async fn get_hostnames(
    State(state): State<AppState>,
    Path((namespace, name)): Path<(String, String)>,
) -> Result<Json<Vec<String>>, ApiError> {
    let id = ResourceId::new(namespace, name);
    Ok(Json(state.controller.resolve_hostnames(&id)?))
}
