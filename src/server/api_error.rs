//! Standardized API error responses for the customer endpoints.
//!
//! # Response Format
//!
//! All error responses follow this JSON structure:
//!
//! ```json
//! {
//!   "error": {
//!     "code": "CUSTOMER_NOT_FOUND",
//!     "message": "customer not found: 42"
//!   }
//! }
//! ```
//!
//! Storage failures carry the raw driver text in `message`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::errors::CustomerError;

/// Machine-readable error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // === Validation Errors (400) ===
    /// Request body is not valid JSON for the expected shape
    InvalidRequest,
    /// A path or body field has an unusable value
    InvalidField,

    // === Authentication Errors (401) ===
    /// No `Authorization` header was sent
    MissingToken,
    /// The `Authorization` header did not match the shared secret
    InvalidToken,

    // === Resource Errors (404) ===
    /// No customer with the requested id
    CustomerNotFound,

    // === Server Errors (5xx) ===
    /// Database operation failed
    DatabaseError,
    /// Server configuration error
    ConfigError,
    /// Unexpected internal server error
    InternalError,
}

impl ErrorCode {
    /// Returns the HTTP status code for this error code.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ErrorCode::InvalidRequest | ErrorCode::InvalidField => StatusCode::BAD_REQUEST,

            ErrorCode::MissingToken | ErrorCode::InvalidToken => StatusCode::UNAUTHORIZED,

            ErrorCode::CustomerNotFound => StatusCode::NOT_FOUND,

            ErrorCode::DatabaseError | ErrorCode::ConfigError | ErrorCode::InternalError => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Returns a default human-readable message for this error code.
    pub fn default_message(&self) -> &'static str {
        match self {
            ErrorCode::InvalidRequest => "Request payload is invalid",
            ErrorCode::InvalidField => "A field value is invalid",
            ErrorCode::MissingToken => "Authorization header is required",
            ErrorCode::InvalidToken => "You don't have authorization",
            ErrorCode::CustomerNotFound => "The requested customer does not exist",
            ErrorCode::DatabaseError => "Database operation failed",
            ErrorCode::ConfigError => "Server configuration error",
            ErrorCode::InternalError => "An unexpected error occurred",
        }
    }
}

/// The inner error object containing code, message, and optional details.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Machine-readable error code
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details (field name and the like)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// Standardized API error response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    pub error: ErrorBody,
}

impl ApiError {
    /// Creates a new API error with a custom message.
    pub fn with_message(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            error: ErrorBody {
                code,
                message: message.into(),
                details: None,
            },
        }
    }

    /// Creates a new API error with a custom message and details.
    pub fn with_details(
        code: ErrorCode,
        message: impl Into<String>,
        details: serde_json::Value,
    ) -> Self {
        Self {
            error: ErrorBody {
                code,
                message: message.into(),
                details: Some(details),
            },
        }
    }

    /// Returns the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        self.error.code.status_code()
    }

    // === Convenience constructors for common errors ===

    /// Request body could not be parsed; `reason` is the parser's own text.
    pub fn invalid_json(reason: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::InvalidRequest, reason)
    }

    /// Invalid field error with the field name in details.
    pub fn invalid_field(field: &str, reason: &str) -> Self {
        Self::with_details(
            ErrorCode::InvalidField,
            format!("Invalid value for '{}': {}", field, reason),
            serde_json::json!({ "field": field }),
        )
    }

    /// Customer not found, with the id in the message.
    pub fn customer_not_found(id: i64) -> Self {
        Self::with_message(
            ErrorCode::CustomerNotFound,
            format!("customer not found: {id}"),
        )
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        (status, Json(self)).into_response()
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: {}",
            self.error.code.default_message(),
            self.error.message
        )
    }
}

impl std::error::Error for ApiError {}

impl From<CustomerError> for ApiError {
    fn from(err: CustomerError) -> Self {
        match err {
            CustomerError::DatabaseError(msg) => {
                ApiError::with_message(ErrorCode::DatabaseError, msg)
            }
            CustomerError::ConfigError(msg) => ApiError::with_message(ErrorCode::ConfigError, msg),
            CustomerError::ServerError(msg) => {
                ApiError::with_message(ErrorCode::InternalError, msg)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_code_status_mapping() {
        assert_eq!(
            ErrorCode::InvalidRequest.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ErrorCode::InvalidField.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ErrorCode::MissingToken.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ErrorCode::InvalidToken.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ErrorCode::CustomerNotFound.status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ErrorCode::DatabaseError.status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn api_error_serialization() {
        let err = ApiError::customer_not_found(3);
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["error"]["code"], "CUSTOMER_NOT_FOUND");
        assert_eq!(json["error"]["message"], "customer not found: 3");
        assert!(json["error"].get("details").is_none());
    }

    #[test]
    fn api_error_with_details() {
        let err = ApiError::invalid_field("id", "must be an integer");
        let json = serde_json::to_string(&err).unwrap();
        assert!(json.contains("INVALID_FIELD"));
        assert!(json.contains("\"field\":\"id\""));
    }

    #[test]
    fn database_error_keeps_raw_text() {
        let err: ApiError =
            CustomerError::DatabaseError("no such table: customers".to_string()).into();
        assert_eq!(err.error.code, ErrorCode::DatabaseError);
        assert_eq!(err.error.message, "no such table: customers");
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn server_error_is_internal() {
        let err: ApiError =
            CustomerError::ServerError("failed to acquire customer table lock".to_string()).into();
        assert_eq!(err.error.code, ErrorCode::InternalError);
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
