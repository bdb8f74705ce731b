/// Server error types
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use podshelf_core::PodError;
use serde_json::json;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ServerError>;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error(transparent)]
    Domain(#[from] PodError),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<podshelf_storage::StorageError> for ServerError {
    fn from(err: podshelf_storage::StorageError) -> Self {
        ServerError::Domain(err.into())
    }
}

impl ServerError {
    /// HTTP status and machine-readable code for this error
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            ServerError::Auth(_) => (StatusCode::UNAUTHORIZED, "unauthorized"),
            ServerError::BadRequest(_) => (StatusCode::BAD_REQUEST, "validation_error"),
            ServerError::Domain(err) => {
                let status = match err {
                    PodError::NotFound { .. } => StatusCode::NOT_FOUND,
                    PodError::PermissionDenied | PodError::PermissionDeniedWithContext(_) => {
                        StatusCode::FORBIDDEN
                    }
                    PodError::Duplicate(_) => StatusCode::CONFLICT,
                    PodError::InvalidInput(_) => StatusCode::BAD_REQUEST,
                    PodError::Storage(_) | PodError::Database(_) | PodError::Serialization(_) => {
                        StatusCode::INTERNAL_SERVER_ERROR
                    }
                };
                (status, err.kind())
            }
            ServerError::Config(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal"),
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        let message = if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
            "Internal server error".to_string()
        } else {
            self.to_string()
        };

        let body = Json(json!({
            "error": message,
            "code": code,
        }));

        (status, body).into_response()
    }
}
