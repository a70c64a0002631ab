//! Error handling for the weather assistant backend
//!
//! Every failure leaves the API as `{ "error": { "code", "message", "field"? } }`

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Validation errors
    #[error("Validation error: {message}")]
    Validation { field: String, message: String },

    #[error("Validation error: {0}")]
    ValidationError(String),

    // External service errors
    #[error("Weather API error: {0}")]
    WeatherApi(String),

    #[error("Weather service unavailable")]
    WeatherServiceUnavailable,

    #[error("AI service error: {0}")]
    AiService(String),

    #[error("Timed out: {0}")]
    Timeout(String),

    #[error("Notification platform error: {0}")]
    NotificationPlatform(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
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

impl ErrorDetail {
    fn new(code: &str, message: impl Into<String>) -> Self {
        Self {
            code: code.to_string(),
            message: message.into(),
            field: None,
        }
    }
}

impl AppError {
    /// Shorthand for a field-level validation failure
    pub fn validation(field: &str, message: impl Into<String>) -> Self {
        AppError::Validation {
            field: field.to_string(),
            message: message.into(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation { .. } | AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::WeatherApi(_) | AppError::AiService(_) => StatusCode::BAD_GATEWAY,
            AppError::WeatherServiceUnavailable | AppError::NotificationPlatform(_) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            AppError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            AppError::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let field_errors = errors.field_errors();
        let mut fields: Vec<_> = field_errors.iter().collect();
        fields.sort_by_key(|(field, _)| **field);

        match fields.first() {
            Some((field, errs)) => {
                let message = errs
                    .first()
                    .and_then(|e| e.message.as_ref().map(|m| m.to_string()))
                    .unwrap_or_else(|| format!("Invalid value for {}", field));
                AppError::validation(field, message)
            }
            None => AppError::ValidationError(errors.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_detail = match &self {
            AppError::Validation { field, message } => ErrorDetail {
                field: Some(field.clone()),
                ..ErrorDetail::new("VALIDATION_ERROR", message.clone())
            },
            AppError::ValidationError(msg) => ErrorDetail::new("VALIDATION_ERROR", msg.clone()),
            AppError::WeatherApi(msg) => {
                ErrorDetail::new("WEATHER_API_ERROR", format!("Weather API error: {}", msg))
            }
            AppError::WeatherServiceUnavailable => ErrorDetail::new(
                "WEATHER_SERVICE_UNAVAILABLE",
                "Weather service is temporarily unavailable",
            ),
            AppError::AiService(msg) => {
                ErrorDetail::new("AI_SERVICE_ERROR", format!("AI service error: {}", msg))
            }
            AppError::Timeout(what) => {
                ErrorDetail::new("TIMEOUT", format!("{} did not respond in time", what))
            }
            AppError::NotificationPlatform(msg) => ErrorDetail::new(
                "NOTIFICATION_PLATFORM_ERROR",
                format!("Notification platform error: {}", msg),
            ),
            AppError::Configuration(msg) => {
                ErrorDetail::new("CONFIGURATION_ERROR", format!("Configuration error: {}", msg))
            }
        };

        // Log the error for debugging
        if status.is_server_error() {
            tracing::error!("Error: {:?}", self);
        } else {
            tracing::debug!("Request rejected: {:?}", self);
        }

        (status, Json(ErrorResponse { error: error_detail })).into_response()
    }
}

/// Result type alias for handlers
pub type AppResult<T> = Result<T, AppError>;
