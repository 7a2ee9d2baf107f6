// src/errors.rs

use crate::models::PayslipStatus;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

#[allow(dead_code)]
#[derive(Debug, Error)]
pub enum AppError {
    // Database errors
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Record not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    // Lifecycle errors
    #[error("Cannot {action} payslip in status {from}")]
    IllegalTransition {
        from: PayslipStatus,
        action: &'static str,
    },

    // Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    // External service errors
    #[error("Notification error: {0}")]
    Notification(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) | AppError::IllegalTransition { .. } => StatusCode::CONFLICT,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Database(_) | AppError::Notification(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// NotFound, Conflict and Validation are the caller's to fix; everything else is ours.
    pub fn is_recoverable(&self) -> bool {
        !self.status_code().is_server_error()
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = if status.is_server_error() {
            error!("Unexpected failure: {:?}", self);
            "Internal server error".to_string()
        } else {
            self.to_string()
        };
        let body = json!({
            "error": {
                "code": status.as_u16(),
                "message": message,
            }
        });
        (status, Json(body)).into_response()
    }
}

// Convenience alias
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lifecycle_errors_map_to_conflict() {
        let err = AppError::IllegalTransition {
            from: PayslipStatus::Paid,
            action: "approve",
        };
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
        assert_eq!(err.to_string(), "Cannot approve payslip in status PAID");
        assert!(err.is_recoverable());
    }

    #[test]
    fn unexpected_errors_are_not_recoverable() {
        let err = AppError::Internal("disk on fire".to_string());
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!err.is_recoverable());
        assert!(AppError::Validation("bad month".to_string()).is_recoverable());
    }
}
