//! CreateCheckoutHandler - Command handler for buying shares.

use std::sync::Arc;

use crate::domain::foundation::{AccountId, DomainError, ErrorCode};
use crate::domain::gift::{Gift, GiftCode};
use crate::domain::intake::CheckoutMetadata;
use crate::domain::ledger::ShareQuantity;
use crate::ports::{
    AccountRepository, CreateCheckoutRequest, GiftCodeRepository, GiftInsertOutcome,
    PaymentProvider,
};

/// Fresh codes drawn before giving up on a gift.
pub const MAX_GIFT_CODE_ATTEMPTS: usize = 5;

/// Front-end pages the checkout redirects back to.
#[derive(Debug, Clone)]
pub struct CheckoutUrls {
    app_base_url: String,
}

impl CheckoutUrls {
    pub fn new(app_base_url: impl Into<String>) -> Self {
        Self {
            app_base_url: app_base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// `payment/success`, with `?giftID=` when the purchase is a gift.
    pub fn success(&self, gift: Option<&Gift>) -> String {
        match gift {
            Some(gift) => format!("{}/payment/success?giftID={}", self.app_base_url, gift.id),
            None => format!("{}/payment/success", self.app_base_url),
        }
    }

    pub fn cancel(&self) -> String {
        format!("{}/payment/cancel", self.app_base_url)
    }
}

/// Command to open a checkout session for `quantity` shares.
#[derive(Debug, Clone)]
pub struct CreateCheckoutCommand {
    pub account_id: AccountId,
    pub quantity: u32,
    pub gift: bool,
}

#[derive(Debug, Clone)]
pub struct CreateCheckoutResult {
    /// Hosted checkout page.
    pub url: String,
    pub gift: Option<Gift>,
}

/// Handler for opening share checkouts.
///
/// For a gift, the gift row is created first so its id can ride in the
/// session metadata. It stays unfunded until the payment webhook arrives.
pub struct CreateCheckoutHandler {
    accounts: Arc<dyn AccountRepository>,
    gifts: Arc<dyn GiftCodeRepository>,
    payment_provider: Arc<dyn PaymentProvider>,
    urls: CheckoutUrls,
}

impl CreateCheckoutHandler {
    pub fn new(
        accounts: Arc<dyn AccountRepository>,
        gifts: Arc<dyn GiftCodeRepository>,
        payment_provider: Arc<dyn PaymentProvider>,
        urls: CheckoutUrls,
    ) -> Self {
        Self {
            accounts,
            gifts,
            payment_provider,
            urls,
        }
    }

    pub async fn handle(
        &self,
        cmd: CreateCheckoutCommand,
    ) -> Result<CreateCheckoutResult, DomainError> {
        // 1. Validate quantity and load the buyer
        let quantity = ShareQuantity::try_new(cmd.quantity)?;
        let account = self
            .accounts
            .find_by_id(&cmd.account_id)
            .await?
            .ok_or_else(|| DomainError::new(ErrorCode::NotFound, "Account not found"))?;

        // 2. Create the gift, if any
        let gift = if cmd.gift {
            Some(self.create_gift().await?)
        } else {
            None
        };

        // 3. Open the session
        let metadata = CheckoutMetadata {
            account_id: account.id,
            shares: quantity,
            gift_id: gift.as_ref().map(|g| g.id),
        };
        let session = self
            .payment_provider
            .create_checkout_session(CreateCheckoutRequest {
                customer_id: account.customer_ref.clone(),
                quantity,
                metadata: metadata.to_map(),
                success_url: self.urls.success(gift.as_ref()),
                cancel_url: self.urls.cancel(),
            })
            .await?;

        tracing::info!(
            account_id = %account.id,
            session_id = %session.id,
            shares = quantity.get(),
            gift = gift.is_some(),
            "Checkout session created"
        );

        Ok(CreateCheckoutResult {
            url: session.url,
            gift,
        })
    }

    /// Inserts a gift with a fresh random code, redrawing on collision.
    async fn create_gift(&self) -> Result<Gift, DomainError> {
        for attempt in 1..=MAX_GIFT_CODE_ATTEMPTS {
            let gift = Gift::new(GiftCode::generate());
            match self.gifts.insert(&gift).await? {
                GiftInsertOutcome::Inserted => return Ok(gift),
                GiftInsertOutcome::CodeTaken => {
                    tracing::warn!(attempt, "Gift code collision, drawing again");
                }
            }
        }
        tracing::error!(
            attempts = MAX_GIFT_CODE_ATTEMPTS,
            "Could not draw an unused gift code"
        );
        Err(DomainError::internal("Failed to create gift code"))
    }
}
