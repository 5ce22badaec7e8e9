//! Engine error type.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),

    #[error("Platform not found: {0}")]
    UnknownPlatform(String),

    #[error("Invalid platform spec {id}: {reason}")]
    InvalidSpec { id: String, reason: String },

    #[error("Platform catalog {0} requires engine >= {1}, current is {2}")]
    EngineVersionMismatch(String, String, String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl EngineError {
    pub(crate) fn invalid_spec(id: &str, reason: impl Into<String>) -> Self {
        Self::InvalidSpec {
            id: id.to_string(),
            reason: reason.into(),
        }
    }
}
