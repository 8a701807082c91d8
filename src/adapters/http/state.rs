//! Shared application state for the HTTP adapter.

use std::sync::Arc;

use crate::application::handlers::{
    AcceptMemberHandler, CheckoutUrls, ConfirmAccountHandler, CreateCheckoutHandler,
    CreateTokenHandler, ExportMembersCsvHandler, GetDocumentHandler, GetGiftCardHandler,
    GetMeHandler, GetMemberHandler, GrantInitialSharesHandler, IngestPaymentHandler,
    ListMembersHandler, RedeemGiftHandler, RegisterHandler, ResetPasswordHandler,
    StartConfirmationHandler, StartResetHandler, UploadDocumentsHandler,
};
use crate::domain::intake::StripeWebhookVerifier;
use crate::ports::{
    AccountRepository, DocumentStorage, GiftCardRenderer, GiftCodeRepository, LedgerReader,
    NotificationSender, PasswordHasher, PaymentEventRepository, PaymentProvider, TokenIssuer,
};

/// Shared application state containing all dependencies.
///
/// This struct is cloned for each request and contains Arc-wrapped dependencies
/// for efficient sharing across handlers.
#[derive(Clone)]
pub struct AppState {
    pub accounts: Arc<dyn AccountRepository>,
    pub ledger: Arc<dyn LedgerReader>,
    pub payments: Arc<dyn PaymentEventRepository>,
    pub gifts: Arc<dyn GiftCodeRepository>,
    pub payment_provider: Arc<dyn PaymentProvider>,
    pub documents: Arc<dyn DocumentStorage>,
    pub notifier: Arc<dyn NotificationSender>,
    pub token_issuer: Arc<dyn TokenIssuer>,
    pub password_hasher: Arc<dyn PasswordHasher>,
    pub card_renderer: Arc<dyn GiftCardRenderer>,
    pub webhook_verifier: Arc<StripeWebhookVerifier>,
    pub checkout_urls: CheckoutUrls,
}

impl AppState {
    // Accounts

    pub fn register_handler(&self) -> RegisterHandler {
        RegisterHandler::new(
            self.accounts.clone(),
            self.payment_provider.clone(),
            self.password_hasher.clone(),
            self.notifier.clone(),
        )
    }

    pub fn create_token_handler(&self) -> CreateTokenHandler {
        CreateTokenHandler::new(
            self.accounts.clone(),
            self.password_hasher.clone(),
            self.token_issuer.clone(),
        )
    }

    pub fn confirm_account_handler(&self) -> ConfirmAccountHandler {
        ConfirmAccountHandler::new(self.accounts.clone(), self.token_issuer.clone())
    }

    pub fn start_confirmation_handler(&self) -> StartConfirmationHandler {
        StartConfirmationHandler::new(self.accounts.clone(), self.notifier.clone())
    }

    pub fn start_reset_handler(&self) -> StartResetHandler {
        StartResetHandler::new(self.accounts.clone(), self.notifier.clone())
    }

    pub fn reset_password_handler(&self) -> ResetPasswordHandler {
        ResetPasswordHandler::new(
            self.accounts.clone(),
            self.password_hasher.clone(),
            self.token_issuer.clone(),
        )
    }

    pub fn get_me_handler(&self) -> GetMeHandler {
        GetMeHandler::new(self.accounts.clone(), self.ledger.clone())
    }

    pub fn upload_documents_handler(&self) -> UploadDocumentsHandler {
        UploadDocumentsHandler::new(self.accounts.clone(), self.documents.clone())
    }

    // Gifts and checkout

    pub fn create_checkout_handler(&self) -> CreateCheckoutHandler {
        CreateCheckoutHandler::new(
            self.accounts.clone(),
            self.gifts.clone(),
            self.payment_provider.clone(),
            self.checkout_urls.clone(),
        )
    }

    pub fn redeem_gift_handler(&self) -> RedeemGiftHandler {
        RedeemGiftHandler::new(self.gifts.clone())
    }

    pub fn gift_card_handler(&self) -> GetGiftCardHandler {
        GetGiftCardHandler::new(self.gifts.clone(), self.card_renderer.clone())
    }

    // Webhooks

    pub fn ingest_payment_handler(&self) -> IngestPaymentHandler {
        IngestPaymentHandler::new(self.webhook_verifier.clone(), self.payments.clone())
    }

    // Admin

    pub fn list_members_handler(&self) -> ListMembersHandler {
        ListMembersHandler::new(self.ledger.clone())
    }

    pub fn get_member_handler(&self) -> GetMemberHandler {
        GetMemberHandler::new(self.ledger.clone())
    }

    pub fn get_document_handler(&self) -> GetDocumentHandler {
        GetDocumentHandler::new(self.accounts.clone(), self.documents.clone())
    }

    pub fn export_members_csv_handler(&self) -> ExportMembersCsvHandler {
        ExportMembersCsvHandler::new(self.ledger.clone())
    }

    pub fn grant_initial_shares_handler(&self) -> GrantInitialSharesHandler {
        GrantInitialSharesHandler::new(self.accounts.clone())
    }

    pub fn accept_member_handler(&self) -> AcceptMemberHandler {
        AcceptMemberHandler::new(self.accounts.clone())
    }
}
