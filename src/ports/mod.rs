//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Persistence Ports
//!
//! - `AccountRepository` - Member accounts and one-time token consumption
//! - `LedgerReader` - Share balances, single and bulk
//! - `PaymentEventRepository` - Idempotent ledger entries
//! - `GiftCodeRepository` - Gift rows and the atomic claim
//! - `DocumentStorage` - Uploaded identity documents
//!
//! ## Service Ports
//!
//! - `PaymentProvider` - Customer and checkout session creation
//! - `NotificationSender` - Confirmation and reset emails
//! - `TokenIssuer` - Signed bearer tokens
//! - `PasswordHasher` - Password hashing
//! - `GiftCardRenderer` - Printable gift cards

mod account_repository;
mod document_storage;
mod gift_card_renderer;
mod gift_code_repository;
mod ledger_reader;
mod notification_sender;
mod password_hasher;
mod payment_event_repository;
mod payment_provider;
mod token_issuer;

pub use account_repository::AccountRepository;
pub use document_storage::{DocumentStorage, StorageError};
pub use gift_card_renderer::{GiftCardRenderer, RenderedCard};
pub use gift_code_repository::{GiftCodeRepository, GiftInsertOutcome};
pub use ledger_reader::{LedgerReader, MemberBalance};
pub use notification_sender::{Notification, NotificationSender, NotificationTemplate};
pub use password_hasher::PasswordHasher;
pub use payment_event_repository::{PaymentEventRepository, RecordOutcome};
pub use payment_provider::{
    CheckoutSession, CreateCheckoutRequest, CreateCustomerRequest, Customer, PaymentError,
    PaymentErrorCode, PaymentProvider,
};
pub use token_issuer::{IssuedToken, TokenIssuer};
