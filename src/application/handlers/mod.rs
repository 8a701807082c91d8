//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations, grouped by
//! the area they serve:
//!
//! - `account` - registration, tokens, confirmation, password reset, documents
//! - `gift` - share checkout, gift redemption and gift cards
//! - `intake` - Stripe webhook ingestion into the ledger
//! - `admin` - member listing, export and review

pub mod account;
pub mod admin;
pub mod gift;
pub mod intake;

#[cfg(test)]
pub(crate) mod test_support;

pub use account::{
    ConfirmAccountCommand, ConfirmAccountHandler, CreateTokenCommand, CreateTokenHandler,
    DocumentUpload, GetMeHandler, GetMeQuery, GetMeResult, RegisterCommand, RegisterHandler,
    RegisterResult, ResetPasswordCommand, ResetPasswordHandler, StartConfirmationCommand,
    StartConfirmationHandler, StartResetCommand, StartResetHandler, UploadDocumentsCommand,
    UploadDocumentsHandler,
};
pub use admin::{
    AcceptMemberCommand, AcceptMemberHandler, ExportMembersCsvHandler, ExportMembersCsvQuery,
    GetDocumentHandler, GetDocumentQuery, GetMemberHandler, GetMemberQuery,
    GrantInitialSharesCommand, GrantInitialSharesHandler, ListMembersHandler, ListMembersQuery,
    MembersCsv,
};
pub use gift::{
    CheckoutUrls, CreateCheckoutCommand, CreateCheckoutHandler, CreateCheckoutResult,
    GetGiftCardHandler, GetGiftCardQuery, RedeemGiftCommand, RedeemGiftHandler,
};
pub use intake::{IngestOutcome, IngestPaymentCommand, IngestPaymentHandler};
