//! HTTP handlers for share purchase and gift endpoints.

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Json, Path, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;

use crate::adapters::http::error::ApiError;
use crate::adapters::http::middleware::RequireAuth;
use crate::adapters::http::state::AppState;
use crate::application::handlers::{CreateCheckoutCommand, GetGiftCardQuery, RedeemGiftCommand};
use crate::domain::foundation::GiftCodeId;

use super::dto::{CheckoutRequest, CheckoutResponse, UseGiftCodeRequest};

const GIFT_CARD_DISPOSITION: &str = "attachment; filename=\"gift-card.svg\"";

/// POST /users/me/checkout/sessions - Start a share checkout
pub async fn create_checkout(
    State(state): State<AppState>,
    RequireAuth(principal): RequireAuth,
    payload: Result<Json<CheckoutRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(request) = payload?;
    let result = state
        .create_checkout_handler()
        .handle(CreateCheckoutCommand {
            account_id: principal.account_id,
            quantity: request.quantity,
            gift: request.gift,
        })
        .await?;

    Ok(Json(CheckoutResponse { url: result.url }))
}

/// POST /users/me/use-gift-code - Claim a funded gift
pub async fn use_gift_code(
    State(state): State<AppState>,
    RequireAuth(principal): RequireAuth,
    payload: Result<Json<UseGiftCodeRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(request) = payload?;
    state
        .redeem_gift_handler()
        .handle(RedeemGiftCommand {
            claimant: principal.account_id,
            code: request.gift_code,
        })
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// GET /gifts/:gift_id - Download the gift card
pub async fn get_gift_card(
    State(state): State<AppState>,
    gift_id: Result<Path<GiftCodeId>, PathRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Path(gift_id) = gift_id?;
    let card = state
        .gift_card_handler()
        .handle(GetGiftCardQuery { gift_id })
        .await?;

    Ok((
        [
            (header::CONTENT_TYPE, card.content_type),
            (header::CONTENT_DISPOSITION, GIFT_CARD_DISPOSITION),
        ],
        card.body,
    ))
}
