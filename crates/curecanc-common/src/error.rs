use std::path::PathBuf;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CureError {
    /// One of the three model artifacts could not be read or is inconsistent.
    #[error("Model unavailable: {artifact} artifact at {} could not be loaded ({reason})", .path.display())]
    ModelUnavailable {
        artifact: &'static str,
        path: PathBuf,
        reason: String,
    },

    #[error("Feature mismatch: model expects [{}] but the vector carries [{}]", .expected.join(", "), .found.join(", "))]
    FeatureMismatch {
        expected: Vec<String>,
        found: Vec<String>,
    },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Report rendering error: {0}")]
    Report(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Login required")]
    SessionRequired,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CureError {
    /// Stable machine-readable identifier used in API error bodies.
    pub fn kind(&self) -> &'static str {
        match self {
            CureError::ModelUnavailable { .. } => "model_unavailable",
            CureError::FeatureMismatch { .. } => "feature_mismatch",
            CureError::InvalidInput(_) => "invalid_input",
            CureError::Report(_) => "report_failed",
            CureError::Config(_) => "config",
            CureError::SessionRequired => "session_required",
            CureError::Io(_) => "io",
            CureError::Serialization(_) => "serialization",
            CureError::Other(_) => "internal",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            CureError::ModelUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            CureError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            CureError::SessionRequired => StatusCode::UNAUTHORIZED,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

pub type Result<T> = std::result::Result<T, CureError>;

/// Error returned by JSON handlers. Renders as `{ "error": kind, "message": text }`.
#[derive(Debug)]
pub struct ApiError(pub CureError);

#[derive(Serialize)]
struct ErrorBody {
    error: &'static str,
    message: String,
}

impl From<CureError> for ApiError {
    fn from(err: CureError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.0.status_code();
        if status.is_server_error() {
            tracing::error!(kind = self.0.kind(), "request failed: {}", self.0);
        } else {
            tracing::debug!(kind = self.0.kind(), "request rejected: {}", self.0);
        }
        let body = ErrorBody {
            error: self.0.kind(),
            message: self.0.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
