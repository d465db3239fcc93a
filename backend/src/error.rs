//! Error handling for the plot lifecycle service
//!
//! Provides consistent JSON error responses

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use shared::LifecycleError;
use thiserror::Error;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Validation errors
    #[error("Validation error: {message}")]
    Validation { field: String, message: String },

    #[error("Resource not found: {0}")]
    NotFound(String),

    // Business logic errors
    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),

    #[error("Configuration error: {0}")]
    Configuration(String),

    // Database errors
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    // Internal errors
    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Internal server error")]
    InternalError(#[from] anyhow::Error),
}

impl AppError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        AppError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Error response structure
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl AppError {
    fn status_and_detail(&self) -> (StatusCode, ErrorDetail) {
        match self {
            AppError::Validation { field, message } => (
                StatusCode::BAD_REQUEST,
                ErrorDetail {
                    code: "VALIDATION_ERROR".to_string(),
                    message: message.clone(),
                    field: Some(field.clone()),
                },
            ),
            AppError::NotFound(resource) => (
                StatusCode::NOT_FOUND,
                ErrorDetail {
                    code: "NOT_FOUND".to_string(),
                    message: format!("{} not found", resource),
                    field: None,
                },
            ),
            AppError::Lifecycle(err) => {
                let (code, field) = match err {
                    LifecycleError::InvalidStateTransition { .. } => ("INVALID_STATE_TRANSITION", "status"),
                    LifecycleError::NegativeHarvestAmount(_) => ("INVALID_HARVEST_AMOUNT", "amount_kg"),
                    LifecycleError::HarvestBeforePlanting { .. } => ("INVALID_HARVEST_DATE", "harvest_date"),
                    LifecycleError::CycleNotHarvested(_) => ("CYCLE_NOT_HARVESTED", "planting_date"),
                    LifecycleError::HarvestTotalOverflow { .. } => ("INVALID_HARVEST_AMOUNT", "amount_kg"),
                };
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    ErrorDetail {
                        code: code.to_string(),
                        message: err.to_string(),
                        field: Some(field.to_string()),
                    },
                )
            }
            AppError::Configuration(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail {
                    code: "CONFIGURATION_ERROR".to_string(),
                    message: format!("Configuration error: {}", msg),
                    field: None,
                },
            ),
            AppError::DatabaseError(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail {
                    code: "DATABASE_ERROR".to_string(),
                    message: "A database error occurred".to_string(),
                    field: None,
                },
            ),
            AppError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail {
                    code: "INTERNAL_ERROR".to_string(),
                    message: msg.clone(),
                    field: None,
                },
            ),
            AppError::InternalError(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail {
                    code: "INTERNAL_ERROR".to_string(),
                    message: "An internal server error occurred".to_string(),
                    field: None,
                },
            ),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_detail) = self.status_and_detail();

        if status.is_server_error() {
            tracing::error!("Error: {:?}", self);
        } else {
            tracing::debug!("Request rejected: {}", self);
        }

        (status, Json(ErrorResponse { error: error_detail })).into_response()
    }
}

/// Result type alias for handlers
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_lifecycle_errors_are_unprocessable() {
        let err = AppError::from(LifecycleError::CycleNotHarvested(2));
        let (status, detail) = err.status_and_detail();
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(detail.code, "CYCLE_NOT_HARVESTED");
        assert_eq!(detail.message, "Cycle 2 has no recorded harvest yet");
    }

    #[test]
    fn test_harvest_date_error_names_field() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let err = AppError::from(LifecycleError::HarvestBeforePlanting {
            harvest_date: date,
            planting_date: date,
        });
        let (_, detail) = err.status_and_detail();
        assert_eq!(detail.field.as_deref(), Some("harvest_date"));
    }

    #[test]
    fn test_harvest_overflow_is_unprocessable() {
        let err = AppError::from(LifecycleError::HarvestTotalOverflow {
            amount_kg: rust_decimal::Decimal::ONE,
            total_kg: rust_decimal::Decimal::MAX,
        });
        let (status, detail) = err.status_and_detail();
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(detail.code, "INVALID_HARVEST_AMOUNT");
        assert_eq!(detail.field.as_deref(), Some("amount_kg"));
    }

    #[test]
    fn test_validation_error_response() {
        let (status, detail) = AppError::validation("as_of", "bad date").status_and_detail();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(detail.code, "VALIDATION_ERROR");
        assert_eq!(detail.field.as_deref(), Some("as_of"));
    }

    #[test]
    fn test_database_error_hides_details() {
        let (status, detail) = AppError::DatabaseError(sqlx::Error::RowNotFound).status_and_detail();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(detail.message, "A database error occurred");
    }
}
