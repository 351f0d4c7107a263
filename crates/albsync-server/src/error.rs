use albsync_controller::ControllerError;
use albsync_controller::nodeport::NodePortError;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

/// Unified API error type for all route handlers.
#[derive(Debug)]
pub enum ApiError {
    NotFound(String),
    BadRequest(String),
    Internal(String),
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Internal(msg) => {
                tracing::error!("internal error: {msg}");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal server error".to_string())
            }
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}

impl From<ControllerError> for ApiError {
    fn from(e: ControllerError) -> Self {
        match e {
            ControllerError::NotFound(id) => ApiError::NotFound(format!("resource not found: {id}")),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<NodePortError> for ApiError {
    fn from(e: NodePortError) -> Self {
        match e {
            NodePortError::NotFound(_) | NodePortError::PortNotFound { .. } => {
                ApiError::NotFound(e.to_string())
            }
            NodePortError::WrongServiceType(_) => ApiError::BadRequest(e.to_string()),
            NodePortError::Lister(_) => ApiError::Internal(e.to_string()),
        }
    }
}
