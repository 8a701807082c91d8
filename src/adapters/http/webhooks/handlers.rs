//! HTTP handler for Stripe webhook deliveries.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;

use crate::adapters::http::error::ApiError;
use crate::adapters::http::state::AppState;
use crate::application::handlers::IngestPaymentCommand;
use crate::domain::intake::IntakeError;

const SIGNATURE_HEADER: &str = "Stripe-Signature";

/// POST /stripe/webhook - Record a completed checkout
///
/// Duplicates and ignored event types answer 200 like fresh deliveries, so
/// Stripe stops retrying them.
pub async fn handle_stripe_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<impl IntoResponse, ApiError> {
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| IntakeError::MalformedHeader("missing Stripe-Signature".to_string()))?;

    state
        .ingest_payment_handler()
        .handle(IngestPaymentCommand {
            payload: body.to_vec(),
            signature: signature.to_string(),
        })
        .await?;

    Ok(StatusCode::OK)
}
