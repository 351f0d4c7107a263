use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("group count must be positive")]
    InvalidGroupCount,

    #[error("invalid cluster name: {0}")]
    InvalidClusterName(String),

    #[error("missing required annotation: {0}")]
    MissingAnnotation(String),

    #[error("invalid annotation {key}: {reason}")]
    InvalidAnnotation { key: String, reason: String },

    #[error("invalid resource id: {0}")]
    InvalidResourceId(String),
}
