use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::llm_client::{GenerationErrorKind, LlmError};
use crate::profile::store::StoreError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    /// A text-generation call failed. `detail` is for logs only.
    /// `partial_body` carries an already generated body when only the subject failed.
    #[error("Generation error ({kind:?}): {detail}")]
    Generation {
        kind: GenerationErrorKind,
        detail: String,
        partial_body: Option<String>,
    },

    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<LlmError> for AppError {
    fn from(e: LlmError) -> Self {
        AppError::Generation {
            kind: e.kind(),
            detail: e.to_string(),
            partial_body: None,
        }
    }
}

impl AppError {
    /// Attaches a body that was generated before this failure.
    pub fn with_partial_body(self, body: String) -> Self {
        match self {
            AppError::Generation { kind, detail, .. } => AppError::Generation {
                kind,
                detail,
                partial_body: Some(body),
            },
            other => other,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let mut partial = None;

        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Generation {
                kind,
                detail,
                partial_body,
            } => {
                tracing::error!("Generation error ({kind:?}): {detail}");
                partial = partial_body.clone();
                let (status, code) = match kind {
                    GenerationErrorKind::Auth => (StatusCode::UNAUTHORIZED, "LLM_AUTH_ERROR"),
                    GenerationErrorKind::RateLimit => {
                        (StatusCode::TOO_MANY_REQUESTS, "LLM_RATE_LIMITED")
                    }
                    GenerationErrorKind::Upstream => (StatusCode::BAD_GATEWAY, "LLM_UPSTREAM_ERROR"),
                    GenerationErrorKind::Network => {
                        (StatusCode::SERVICE_UNAVAILABLE, "LLM_NETWORK_ERROR")
                    }
                };
                (status, code, kind.user_message().to_string())
            }
            AppError::Storage(StoreError::QuotaExceeded { limit_bytes }) => {
                tracing::error!("Storage quota exceeded ({limit_bytes} bytes)");
                (
                    StatusCode::INSUFFICIENT_STORAGE,
                    "STORAGE_QUOTA_EXCEEDED",
                    "Not enough storage space to save this. Please try a smaller file.".to_string(),
                )
            }
            AppError::Storage(StoreError::StorageFull(sqlstate)) => {
                tracing::error!("Database out of space (SQLSTATE {sqlstate})");
                (
                    StatusCode::INSUFFICIENT_STORAGE,
                    "STORAGE_QUOTA_EXCEEDED",
                    "Not enough storage space to save this. Please try a smaller file.".to_string(),
                )
            }
            AppError::Storage(e) => {
                tracing::error!("Storage error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "STORAGE_ERROR",
                    "Error saving or loading your data. Please try again.".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let mut error = json!({
            "code": code,
            "message": message
        });
        if let Some(body) = partial {
            error["partial_body"] = json!(body);
        }

        (status, Json(json!({ "error": error }))).into_response()
    }
}
