//! HTTP handlers for admin endpoints.
//!
//! The `RequireAdmin` extractor rejects members before any handler runs; the
//! application handlers check the role again on their own.

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Json, Path, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;

use crate::adapters::http::error::ApiError;
use crate::adapters::http::middleware::RequireAdmin;
use crate::adapters::http::state::AppState;
use crate::application::handlers::{
    AcceptMemberCommand, ExportMembersCsvQuery, GetDocumentQuery, GetMemberQuery,
    GrantInitialSharesCommand, ListMembersQuery,
};
use crate::domain::foundation::{AccountId, DocumentId};

use super::dto::{GrantInitialSharesRequest, MemberDetailResponse, MemberSummaryResponse};

/// GET /admin/users - List members with balances
pub async fn list_members(
    State(state): State<AppState>,
    RequireAdmin(principal): RequireAdmin,
) -> Result<impl IntoResponse, ApiError> {
    let members = state
        .list_members_handler()
        .handle(ListMembersQuery { principal })
        .await?;

    let response: Vec<MemberSummaryResponse> =
        members.iter().map(MemberSummaryResponse::from).collect();
    Ok(Json(response))
}

/// GET /admin/users/:user_id - One member's record
pub async fn get_member(
    State(state): State<AppState>,
    RequireAdmin(principal): RequireAdmin,
    account_id: Result<Path<AccountId>, PathRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Path(account_id) = account_id?;
    let member = state
        .get_member_handler()
        .handle(GetMemberQuery {
            principal,
            account_id,
        })
        .await?;

    Ok(Json(MemberDetailResponse::from(member)))
}

/// GET /admin/users/:user_id/documents/:document_id - Download a document
pub async fn get_document(
    State(state): State<AppState>,
    RequireAdmin(principal): RequireAdmin,
    ids: Result<Path<(AccountId, DocumentId)>, PathRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Path((account_id, document_id)) = ids?;
    let bytes = state
        .get_document_handler()
        .handle(GetDocumentQuery {
            principal,
            account_id,
            document_id,
        })
        .await?;

    let disposition = format!("attachment; filename=\"{}\"", document_id);
    Ok((
        [
            (header::CONTENT_TYPE, "application/octet-stream".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        bytes,
    ))
}

/// GET /admin/csv/users - Member export
pub async fn export_members_csv(
    State(state): State<AppState>,
    RequireAdmin(principal): RequireAdmin,
) -> Result<impl IntoResponse, ApiError> {
    let csv = state
        .export_members_csv_handler()
        .handle(ExportMembersCsvQuery { principal })
        .await?;

    let disposition = format!("attachment; filename=\"{}\"", csv.filename);
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        csv.content,
    ))
}

/// PUT /admin/users/:user_id/initial-shares - Set the granted baseline
pub async fn grant_initial_shares(
    State(state): State<AppState>,
    RequireAdmin(principal): RequireAdmin,
    account_id: Result<Path<AccountId>, PathRejection>,
    payload: Result<Json<GrantInitialSharesRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Path(account_id) = account_id?;
    let Json(request) = payload?;
    state
        .grant_initial_shares_handler()
        .handle(GrantInitialSharesCommand {
            principal,
            account_id,
            initial_shares: request.initial_shares,
        })
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// POST /admin/users/:user_id/accept - Accept the member
pub async fn accept_member(
    State(state): State<AppState>,
    RequireAdmin(principal): RequireAdmin,
    account_id: Result<Path<AccountId>, PathRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Path(account_id) = account_id?;
    state
        .accept_member_handler()
        .handle(AcceptMemberCommand {
            principal,
            account_id,
        })
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
