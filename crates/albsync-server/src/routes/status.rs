use albsync_controller::StatusSnapshot;
use axum::Json;
use axum::extract::State;

use crate::state::AppState;

/// Last committed resource set, with metrics.
pub async fn get_state(State(state): State<AppState>) -> Json<StatusSnapshot> {
    Json(state.controller.status())
}
