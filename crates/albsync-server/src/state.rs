use std::sync::Arc;

use albsync_controller::Controller;

/// Shared application state, injected into all route handlers via Axum state.
#[derive(Clone)]
pub struct AppState {
    pub controller: Arc<Controller>,
}
