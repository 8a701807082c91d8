//! HTTP handlers for account endpoints.
//!
//! These handlers connect Axum routes to application layer command/query handlers.

use axum::extract::multipart::{Multipart, MultipartRejection};
use axum::extract::rejection::JsonRejection;
use axum::extract::{Json, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::adapters::http::error::ApiError;
use crate::adapters::http::middleware::RequireAuth;
use crate::adapters::http::state::AppState;
use crate::application::handlers::{
    ConfirmAccountCommand, CreateTokenCommand, DocumentUpload, GetMeQuery, RegisterCommand,
    ResetPasswordCommand, StartConfirmationCommand, StartResetCommand, UploadDocumentsCommand,
};

use super::dto::{
    ConfirmRequest, CreateTokenRequest, DocumentsResponse, EmailRequest, MeResponse,
    RegisterRequest, RegisterResponse, ResetPasswordRequest, TokenResponse,
};

// ════════════════════════════════════════════════════════════════════════════════
// Public Endpoints
// ════════════════════════════════════════════════════════════════════════════════

/// POST /tokens - Log in
pub async fn create_token(
    State(state): State<AppState>,
    payload: Result<Json<CreateTokenRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(request) = payload?;
    let issued = state
        .create_token_handler()
        .handle(CreateTokenCommand {
            email: request.email,
            password: request.password,
        })
        .await?;

    Ok(Json(TokenResponse {
        token: issued.token,
    }))
}

/// POST /users - Register a new member
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(request) = payload?;
    let result = state
        .register_handler()
        .handle(RegisterCommand {
            input: request.into(),
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            id: result.account_id.to_string(),
        }),
    ))
}

/// POST /users/confirm - Confirm the account and log in
pub async fn confirm(
    State(state): State<AppState>,
    payload: Result<Json<ConfirmRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(request) = payload?;
    let issued = state
        .confirm_account_handler()
        .handle(ConfirmAccountCommand {
            email: request.email,
            token: request.token,
        })
        .await?;

    Ok(Json(TokenResponse {
        token: issued.token,
    }))
}

/// POST /users/confirm/start - Send a fresh confirmation token
pub async fn start_confirmation(
    State(state): State<AppState>,
    payload: Result<Json<EmailRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(request) = payload?;
    state
        .start_confirmation_handler()
        .handle(StartConfirmationCommand {
            email: request.email,
        })
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// POST /users/reset - Set a new password and log in
pub async fn reset_password(
    State(state): State<AppState>,
    payload: Result<Json<ResetPasswordRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(request) = payload?;
    let issued = state
        .reset_password_handler()
        .handle(ResetPasswordCommand {
            email: request.email,
            password: request.password,
            token: request.token,
        })
        .await?;

    Ok(Json(TokenResponse {
        token: issued.token,
    }))
}

/// POST /users/reset/start - Send a reset token
pub async fn start_reset(
    State(state): State<AppState>,
    payload: Result<Json<EmailRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(request) = payload?;
    state
        .start_reset_handler()
        .handle(StartResetCommand {
            email: request.email,
        })
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

// ════════════════════════════════════════════════════════════════════════════════
// Member Endpoints
// ════════════════════════════════════════════════════════════════════════════════

/// GET /users/me - Current member summary
pub async fn get_me(
    State(state): State<AppState>,
    RequireAuth(principal): RequireAuth,
) -> Result<impl IntoResponse, ApiError> {
    let result = state.get_me_handler().handle(GetMeQuery { principal }).await?;
    Ok(Json(MeResponse::from(result)))
}

/// POST /users/me/documents - Upload identity documents
///
/// Multipart fields `identity_front` and `address_proof` are required,
/// `identity_back` is optional. Unknown fields are ignored.
pub async fn upload_documents(
    State(state): State<AppState>,
    RequireAuth(principal): RequireAuth,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let mut multipart = multipart?;
    let mut identity_front = None;
    let mut identity_back = None;
    let mut address_proof = None;

    while let Some(field) = multipart.next_field().await? {
        let slot = match field.name() {
            Some("identity_front") => &mut identity_front,
            Some("identity_back") => &mut identity_back,
            Some("address_proof") => &mut address_proof,
            _ => continue,
        };
        let content = field.bytes().await?;
        *slot = Some(DocumentUpload {
            content: content.to_vec(),
        });
    }

    let identity_front =
        identity_front.ok_or_else(|| ApiError::bad_request("identity_front is required"))?;
    let address_proof =
        address_proof.ok_or_else(|| ApiError::bad_request("address_proof is required"))?;

    let documents = state
        .upload_documents_handler()
        .handle(UploadDocumentsCommand {
            account_id: principal.account_id,
            identity_front,
            identity_back,
            address_proof,
        })
        .await?;

    Ok(Json(DocumentsResponse {
        identity_front: documents.identity_front.map(|d| d.to_string()),
        identity_back: documents.identity_back.map(|d| d.to_string()),
        address_proof: documents.address_proof.map(|d| d.to_string()),
    }))
}
