//! Gateway error types.
//!
//! [`ApiError`] is request-level and renders as `{"detail": ...}` with the
//! matching status code. [`GatewayError`] is service-level (startup, bind).

use axum::extract::rejection::JsonRejection;
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use std::any::Any;

use crate::domain::types::ErrorResponse;

/// Request-level error returned by handlers and middleware
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// Input rejected by validation
    #[error("{0}")]
    BadRequest(String),

    /// No `Authorization` header
    #[error("Not authenticated")]
    NotAuthenticated,

    /// `Authorization` header present but not a bearer credential
    #[error("Invalid authentication credentials")]
    InvalidCredentials,

    /// Bearer token does not match
    #[error("Invalid authentication token")]
    InvalidToken,

    /// No token configured on the server side
    #[error("GPU service token not configured")]
    TokenNotConfigured,

    /// Body could not be read or deserialized
    #[error("{detail}")]
    InvalidBody { status: StatusCode, detail: String },
}

impl ApiError {
    pub fn bad_request(detail: impl Into<String>) -> Self {
        ApiError::BadRequest(detail.into())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotAuthenticated | ApiError::InvalidCredentials => StatusCode::FORBIDDEN,
            ApiError::InvalidToken => StatusCode::UNAUTHORIZED,
            ApiError::TokenNotConfigured => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::InvalidBody { status, .. } => *status,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(serde_json::json!({ "detail": self.to_string() }));

        let mut response = (status, body).into_response();
        if matches!(self, ApiError::InvalidToken) {
            response
                .headers_mut()
                .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
        }
        response
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        let status = match rejection {
            // Unparseable bodies, wrong shapes and a missing JSON content type are all 422
            JsonRejection::JsonDataError(_)
            | JsonRejection::JsonSyntaxError(_)
            | JsonRejection::MissingJsonContentType(_) => StatusCode::UNPROCESSABLE_ENTITY,
            _ => rejection.status(),
        };
        ApiError::InvalidBody {
            status,
            detail: rejection.body_text(),
        }
    }
}

/// Result type for request handlers
pub type ApiResult<T> = Result<T, ApiError>;

/// Render a caught handler panic as a 500 [`ErrorResponse`].
///
/// The panic message is only exposed when `include_details` is set.
pub fn panic_response(panic: Box<dyn Any + Send + 'static>, include_details: bool) -> Response {
    let message = if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };
    tracing::error!(panic = %message, "Handler panicked");

    let details = include_details.then_some(message);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse::internal(details)),
    )
        .into_response()
}

/// Service-level errors (not returned to clients)
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Server socket bind error
    #[error("server bind error: {0}")]
    Bind(String),

    /// Server stopped with an I/O error
    #[error("server error: {0}")]
    Serve(String),
}

impl From<crate::domain::config::ConfigError> for GatewayError {
    fn from(e: crate::domain::config::ConfigError) -> Self {
        GatewayError::Config(e.to_string())
    }
}
