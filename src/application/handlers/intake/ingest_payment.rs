//! IngestPaymentHandler - Command handler for Stripe payment webhooks.

use std::sync::Arc;

use crate::domain::foundation::GiftCodeId;
use crate::domain::intake::{payment_from_event, IntakeError, StripeWebhookVerifier};
use crate::domain::ledger::{NewPaymentEvent, PaymentEvent};
use crate::ports::{PaymentEventRepository, RecordOutcome};

/// Command carrying a raw webhook delivery.
#[derive(Debug, Clone)]
pub struct IngestPaymentCommand {
    /// Raw request body, exactly as signed.
    pub payload: Vec<u8>,
    /// `Stripe-Signature` header value.
    pub signature: String,
}

/// What the delivery did to the ledger. Every variant is a success for the
/// processor, so none of them triggers a redelivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IngestOutcome {
    /// First delivery of a completed checkout.
    Recorded(PaymentEvent),
    /// This event id is already in the ledger.
    Duplicate,
    /// Authentic event of a type that carries no payment.
    Ignored,
}

/// Handler turning verified webhooks into ledger entries.
///
/// Authenticity is checked before anything in the payload is read. Storage
/// is idempotent on the event id.
pub struct IngestPaymentHandler {
    verifier: Arc<StripeWebhookVerifier>,
    payments: Arc<dyn PaymentEventRepository>,
}

impl IngestPaymentHandler {
    pub fn new(
        verifier: Arc<StripeWebhookVerifier>,
        payments: Arc<dyn PaymentEventRepository>,
    ) -> Self {
        Self { verifier, payments }
    }

    pub async fn handle(&self, cmd: IngestPaymentCommand) -> Result<IngestOutcome, IntakeError> {
        // 1. Authenticate
        let event = self
            .verifier
            .verify_and_parse(&cmd.payload, &cmd.signature)
            .map_err(|e| {
                tracing::warn!(error = %e, "Rejected webhook delivery");
                e
            })?;

        // 2. Extract the payment
        let payment = match payment_from_event(&event) {
            Ok(Some(payment)) => payment,
            Ok(None) => {
                tracing::debug!(event_id = %event.id, event_type = %event.event_type, "Ignoring webhook event");
                return Ok(IngestOutcome::Ignored);
            }
            Err(e) => {
                tracing::warn!(event_id = %event.id, error = %e, "Unusable checkout metadata");
                return Err(e);
            }
        };

        // 3. Record idempotently
        match self.payments.record(&payment).await? {
            RecordOutcome::Inserted(recorded) => {
                tracing::info!(
                    event_id = %recorded.external_event_id,
                    account_id = %recorded.account_id,
                    shares = recorded.shares.get(),
                    gift = recorded.funds_gift(),
                    "Payment recorded"
                );
                Ok(IngestOutcome::Recorded(recorded))
            }
            RecordOutcome::Duplicate => {
                tracing::info!(event_id = %payment.external_event_id, "Duplicate webhook delivery");
                Ok(IngestOutcome::Duplicate)
            }
            RecordOutcome::GiftMissing => Err(gift_fault(&payment, IntakeError::GiftMissing)),
            RecordOutcome::GiftAlreadyFunded => {
                Err(gift_fault(&payment, IntakeError::GiftAlreadyFunded))
            }
        }
    }
}

/// Builds and logs a consistency fault about the payment's gift.
fn gift_fault(
    payment: &NewPaymentEvent,
    fault: fn(GiftCodeId) -> IntakeError,
) -> IntakeError {
    let err = match payment.gift_id {
        Some(gift_id) => fault(gift_id),
        None => IntakeError::Storage("gift outcome reported for a payment without gift".to_string()),
    };
    tracing::error!(
        event_id = %payment.external_event_id,
        account_id = %payment.account_id,
        error = %err,
        "Payment references an inconsistent gift"
    );
    err
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::test_support::Fixture;
    use crate::domain::foundation::{AccountId, ErrorCode};
    use crate::domain::gift::{Gift, GiftCode, GiftState};
    use crate::domain::intake::sign_payload;
    use crate::ports::{GiftCodeRepository, LedgerReader};
    use secrecy::SecretString;
    use serde_json::json;

    const SECRET: &str = "whsec_test_secret";

    fn handler(fx: &Fixture) -> IngestPaymentHandler {
        IngestPaymentHandler::new(
            Arc::new(StripeWebhookVerifier::new(SecretString::new(SECRET.to_string()))),
            Arc::new(fx.store.clone()),
        )
    }

    fn checkout_event(event_id: &str, account: AccountId, shares: &str, gift: Option<GiftCodeId>) -> String {
        let mut metadata = json!({ "userID": account.to_string(), "shares": shares });
        if let Some(gift) = gift {
            metadata["giftID"] = json!(gift.to_string());
        }
        json!({
            "id": event_id,
            "type": "checkout.session.completed",
            "created": chrono::Utc::now().timestamp(),
            "data": { "object": { "id": "cs_test_1", "metadata": metadata } }
        })
        .to_string()
    }

    fn signed(payload: &str) -> IngestPaymentCommand {
        let signature = sign_payload(SECRET, chrono::Utc::now().timestamp(), payload).unwrap();
        IngestPaymentCommand {
            payload: payload.as_bytes().to_vec(),
            signature,
        }
    }

    #[tokio::test]
    async fn completed_checkout_is_recorded_once() {
        let fx = Fixture::new();
        let ada = fx.confirmed_member("ada@example.org").await;
        let payload = checkout_event("evt_1", ada.id, "4", None);

        let first = handler(&fx).handle(signed(&payload)).await.unwrap();
        assert!(matches!(first, IngestOutcome::Recorded(ref p) if p.shares.get() == 4));

        let second = handler(&fx).handle(signed(&payload)).await.unwrap();
        assert_eq!(second, IngestOutcome::Duplicate);

        assert_eq!(fx.store.payment_count(), 1);
        let balance = fx.store.balance(&ada.id).await.unwrap().unwrap();
        assert_eq!(balance.direct, 4);
    }

    #[tokio::test]
    async fn concurrent_duplicate_deliveries_store_one_payment() {
        let fx = Fixture::new();
        let ada = fx.confirmed_member("ada@example.org").await;
        let payload = checkout_event("evt_dup", ada.id, "2", None);

        let tasks: Vec<_> = (0..6)
            .map(|_| {
                let handler = handler(&fx);
                let cmd = signed(&payload);
                tokio::spawn(async move { handler.handle(cmd).await })
            })
            .collect();
        for task in tasks {
            task.await.unwrap().unwrap();
        }

        assert_eq!(fx.store.payment_count(), 1);
        assert_eq!(fx.store.balance(&ada.id).await.unwrap().unwrap().total(), 2);
    }

    #[tokio::test]
    async fn gift_payment_funds_gift_without_crediting_payer() {
        let fx = Fixture::new();
        let ada = fx.confirmed_member("ada@example.org").await;
        let gift = Gift::new(GiftCode::generate());
        fx.store.insert(&gift).await.unwrap();

        handler(&fx)
            .handle(signed(&checkout_event("evt_gift", ada.id, "3", Some(gift.id))))
            .await
            .unwrap();

        let stored = fx.store.find_by_id(&gift.id).await.unwrap().unwrap();
        assert_eq!(stored.state(), GiftState::Funded);
        assert_eq!(fx.store.balance(&ada.id).await.unwrap().unwrap().total(), 0);
    }

    #[tokio::test]
    async fn unknown_gift_is_an_internal_fault() {
        let fx = Fixture::new();
        let ada = fx.confirmed_member("ada@example.org").await;

        let err = handler(&fx)
            .handle(signed(&checkout_event("evt_x", ada.id, "3", Some(GiftCodeId::new()))))
            .await
            .unwrap_err();
        assert!(matches!(err, IntakeError::GiftMissing(_)));
        assert_eq!(err.code(), ErrorCode::InternalError);
        assert_eq!(fx.store.payment_count(), 0);
    }

    #[tokio::test]
    async fn unknown_account_is_a_storage_fault() {
        let fx = Fixture::new();

        let err = handler(&fx)
            .handle(signed(&checkout_event("evt_x", AccountId::new(), "3", None)))
            .await
            .unwrap_err();
        assert!(matches!(err, IntakeError::Storage(_)));
        assert!(err.code().is_internal());
        assert_eq!(fx.store.payment_count(), 0);
    }

    #[tokio::test]
    async fn bad_signature_is_authentication_failure() {
        let fx = Fixture::new();
        let payload = checkout_event("evt_1", AccountId::new(), "1", None);
        let cmd = IngestPaymentCommand {
            payload: payload.into_bytes(),
            signature: sign_payload("whsec_other", chrono::Utc::now().timestamp(), "{}").unwrap(),
        };

        let err = handler(&fx).handle(cmd).await.unwrap_err();
        assert!(err.is_authentication_failure());
        assert_eq!(fx.store.payment_count(), 0);
    }

    #[tokio::test]
    async fn stale_signature_is_rejected() {
        let fx = Fixture::new();
        let payload = checkout_event("evt_1", AccountId::new(), "1", None);
        let cmd = IngestPaymentCommand {
            signature: sign_payload(SECRET, chrono::Utc::now().timestamp() - 301, &payload).unwrap(),
            payload: payload.into_bytes(),
        };

        let err = handler(&fx).handle(cmd).await.unwrap_err();
        assert_eq!(err, IntakeError::TimestampOutOfRange);
    }

    #[tokio::test]
    async fn invalid_shares_are_a_validation_error() {
        let fx = Fixture::new();
        for shares in ["0", "-2", "three"] {
            let payload = checkout_event("evt_bad", AccountId::new(), shares, None);
            let err = handler(&fx).handle(signed(&payload)).await.unwrap_err();
            assert_eq!(err.code(), ErrorCode::ValidationFailed);
        }
    }

    #[tokio::test]
    async fn other_event_types_are_ignored() {
        let fx = Fixture::new();
        let payload = json!({
            "id": "evt_other",
            "type": "customer.created",
            "created": chrono::Utc::now().timestamp(),
            "data": { "object": { "id": "cus_1" } }
        })
        .to_string();

        let outcome = handler(&fx).handle(signed(&payload)).await.unwrap();
        assert_eq!(outcome, IngestOutcome::Ignored);
    }
}
