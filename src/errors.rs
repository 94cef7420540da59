use crate::services::client::StorageError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::fmt;

/// A lightweight wrapper for general errors that keeps the message local.
#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    /// Create a new AppError with a specific status and message.
    pub fn new(status: StatusCode, msg: impl Into<String>) -> Self {
        Self {
            status,
            message: msg.into(),
        }
    }

    /// Shortcut for a 500 Internal Server Error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, msg)
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for AppError {}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "error": self.message,
            "status": self.status.as_u16()
        }));

        (self.status, body).into_response()
    }
}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        let status = match &err {
            StorageError::NotFound { .. } => StatusCode::NOT_FOUND,
            StorageError::MissingFilePath => StatusCode::BAD_REQUEST,
            StorageError::Transport { .. } => StatusCode::BAD_GATEWAY,
            StorageError::Forbidden(_) => StatusCode::FORBIDDEN,
            StorageError::Signing(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            tracing::warn!("storage request failed: {}", err);
        }
        AppError::new(status, err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_errors_map_to_statuses() {
        let not_found = AppError::from(StorageError::NotFound {
            bucket: "b".into(),
            key: "k".into(),
        });
        assert_eq!(not_found.status, StatusCode::NOT_FOUND);
        assert_eq!(not_found.message, "object `k` not found in bucket `b`");

        let missing = AppError::from(StorageError::MissingFilePath);
        assert_eq!(missing.status, StatusCode::BAD_REQUEST);

        let transport = AppError::from(StorageError::Transport {
            code: "SlowDown".into(),
            message: "throttled".into(),
        });
        assert_eq!(transport.status, StatusCode::BAD_GATEWAY);
        assert_eq!(transport.message, "object store error SlowDown: throttled");
    }

    #[test]
    fn rejected_presigned_links_are_forbidden() {
        let err = AppError::from(StorageError::Forbidden("link has expired".into()));
        assert_eq!(err.status, StatusCode::FORBIDDEN);
        assert_eq!(err.to_string(), "presigned request rejected: link has expired");

        let signing = AppError::from(StorageError::Signing("bad key".into()));
        assert_eq!(signing.status, StatusCode::INTERNAL_SERVER_ERROR);
    }
}
