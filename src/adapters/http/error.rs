//! HTTP error mapping.
//!
//! Every failure leaves the API as `{"error": <message>, "code": <code>}`
//! with the status fixed by its [`ErrorCode`]. Internal faults are logged
//! with their detail and answered with a generic message.

use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::domain::account::AccountError;
use crate::domain::foundation::{AuthError, DomainError, ErrorCode};
use crate::domain::gift::RedeemError;
use crate::domain::intake::IntakeError;

const INTERNAL_MESSAGE: &str = "Internal server error.";

/// JSON error body.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: &'static str,
}

/// API error type that converts domain errors to HTTP responses.
#[derive(Debug, Clone)]
pub struct ApiError {
    code: ErrorCode,
    message: String,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ValidationFailed, message)
    }

    pub fn code(&self) -> ErrorCode {
        self.code
    }

    pub fn status(&self) -> StatusCode {
        status_for(self.code)
    }
}

/// Status for each error kind.
pub fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::ValidationFailed
        | ErrorCode::AuthorizationHeaderMissing
        | ErrorCode::EmailUnknown
        | ErrorCode::IdUnknown
        | ErrorCode::EmailInUse
        | ErrorCode::PasswordInvalid
        | ErrorCode::AlreadyConfirmed
        | ErrorCode::AlreadyClaimed
        | ErrorCode::NotYetFunded
        | ErrorCode::AuthenticationFailed => StatusCode::BAD_REQUEST,
        ErrorCode::TokenInvalid
        | ErrorCode::TokenExpired
        | ErrorCode::NotAdmin
        | ErrorCode::NotConfirmed
        | ErrorCode::BadToken => StatusCode::UNAUTHORIZED,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::DatabaseError | ErrorCode::ExternalServiceError | ErrorCode::InternalError => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let message = if self.code.is_internal() {
            tracing::error!(code = ?self.code, error = %self.message, "Request failed");
            INTERNAL_MESSAGE.to_string()
        } else {
            self.message
        };

        let body = ErrorResponse {
            error: message,
            code: self.code.as_str(),
        };
        (status_for(self.code), Json(body)).into_response()
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        Self::new(err.code, err.message)
    }
}

impl From<AccountError> for ApiError {
    fn from(err: AccountError) -> Self {
        Self::new(err.code(), err.message())
    }
}

impl From<RedeemError> for ApiError {
    fn from(err: RedeemError) -> Self {
        Self::new(err.code(), err.to_string())
    }
}

impl From<IntakeError> for ApiError {
    fn from(err: IntakeError) -> Self {
        Self::new(err.code(), err.to_string())
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        Self::new(err.code(), err.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

impl From<MultipartRejection> for ApiError {
    fn from(rejection: MultipartRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

impl From<MultipartError> for ApiError {
    fn from(err: MultipartError) -> Self {
        Self::bad_request(err.body_text())
    }
}
