//! # API Errors
//!
//! Every failure a client can see, with its HTTP status and machine code.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ValidationError ──┐                                                    │
//! │  CoreError ────────┼──► ApiError ──► (status, JSON body, ErrorInfo)     │
//! │  DbError ──────────┘                                                    │
//! │                                                                         │
//! │  400 VALIDATION_ERROR / BAD_REQUEST                                     │
//! │  404 NOT_FOUND                                                          │
//! │  409 DUPLICATE / CONFLICT                                               │
//! │  422 INVALID_REFERENCE / BUSINESS_RULE                                  │
//! │  500 INTERNAL_ERROR (detail hidden, logged)                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The body is `{"code", "message", "detail"}`. `message` is replaced by a
//! localized summary in [`crate::i18n::locale_middleware`], which finds the
//! code and detail in the response's [`ErrorInfo`] extension.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::{json, Value};
use thiserror::Error;
use tracing::{error, warn};

use bistro_core::{CoreError, ValidationError};
use bistro_db::DbError;

/// Machine-readable error code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    ValidationError,
    BadRequest,
    NotFound,
    Duplicate,
    InvalidReference,
    Conflict,
    BusinessRule,
    InternalError,
}

impl ErrorCode {
    pub const ALL: [ErrorCode; 8] = [
        ErrorCode::ValidationError,
        ErrorCode::BadRequest,
        ErrorCode::NotFound,
        ErrorCode::Duplicate,
        ErrorCode::InvalidReference,
        ErrorCode::Conflict,
        ErrorCode::BusinessRule,
        ErrorCode::InternalError,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::ValidationError => "VALIDATION_ERROR",
            ErrorCode::BadRequest => "BAD_REQUEST",
            ErrorCode::NotFound => "NOT_FOUND",
            ErrorCode::Duplicate => "DUPLICATE",
            ErrorCode::InvalidReference => "INVALID_REFERENCE",
            ErrorCode::Conflict => "CONFLICT",
            ErrorCode::BusinessRule => "BUSINESS_RULE",
            ErrorCode::InternalError => "INTERNAL_ERROR",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ErrorCode::ValidationError | ErrorCode::BadRequest => StatusCode::BAD_REQUEST,
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::Duplicate | ErrorCode::Conflict => StatusCode::CONFLICT,
            ErrorCode::InvalidReference | ErrorCode::BusinessRule => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Code and detail of an error response, stored in response extensions.
#[derive(Debug, Clone)]
pub struct ErrorInfo {
    pub code: ErrorCode,
    pub detail: Option<String>,
}

impl ErrorInfo {
    /// JSON body with the given summary message.
    pub fn body(&self, message: &str) -> Value {
        json!({
            "code": self.code,
            "message": message,
            "detail": self.detail,
        })
    }
}

/// API error type with automatic HTTP status mapping.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Body or query string could not be parsed.
    #[error("{0}")]
    BadRequest(String),

    #[error("{resource} not found: {id}")]
    NotFound { resource: String, id: String },

    #[error("Duplicate {field}: '{value}' already exists")]
    Duplicate { field: String, value: String },

    #[error("{0}")]
    InvalidReference(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    BusinessRule(String),

    #[error("{0}")]
    Internal(String),
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    pub fn not_found(resource: impl Into<String>, id: impl Into<String>) -> Self {
        ApiError::NotFound {
            resource: resource.into(),
            id: id.into(),
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            ApiError::Validation(_) => ErrorCode::ValidationError,
            ApiError::BadRequest(_) => ErrorCode::BadRequest,
            ApiError::NotFound { .. } => ErrorCode::NotFound,
            ApiError::Duplicate { .. } => ErrorCode::Duplicate,
            ApiError::InvalidReference(_) => ErrorCode::InvalidReference,
            ApiError::Conflict(_) => ErrorCode::Conflict,
            ApiError::BusinessRule(_) => ErrorCode::BusinessRule,
            ApiError::Internal(_) => ErrorCode::InternalError,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let code = self.code();
        let detail = match &self {
            ApiError::Internal(message) => {
                error!(error = %message, "Internal error");
                None
            }
            other => {
                warn!(code = code.as_str(), error = %other, "Request rejected");
                Some(other.to_string())
            }
        };

        let info = ErrorInfo { code, detail };
        let body = info.body(crate::i18n::message(code, Default::default()));
        let mut response = (code.status(), Json(body)).into_response();
        response.extensions_mut().insert(info);
        response
    }
}

impl From<DbError> for ApiError {
    fn from(e: DbError) -> Self {
        match e {
            DbError::NotFound { entity, id } => ApiError::NotFound { resource: entity, id },
            DbError::UniqueViolation { field, value } => ApiError::Duplicate { field, value },
            DbError::ForeignKeyViolation { message } => ApiError::InvalidReference(message),
            DbError::Conflict(message) => ApiError::Conflict(message),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<CoreError> for ApiError {
    fn from(e: CoreError) -> Self {
        match e {
            CoreError::Validation(v) => ApiError::Validation(v),
            other => ApiError::BusinessRule(other.to_string()),
        }
    }
}
