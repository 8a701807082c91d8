//! PostgreSQL adapters - Database implementations for repository ports.
//!
//! - `PostgresAccountRepository` - Member accounts and token consumption
//! - `PostgresLedgerReader` - Share balances through one SQL balance expression
//! - `PostgresPaymentEventRepository` - Idempotent payment entries
//! - `PostgresGiftCodeRepository` - Gifts and the conditional claim

mod account_repository;
mod account_row;
mod gift_code_repository;
mod ledger_reader;
mod payment_event_repository;

pub use account_repository::PostgresAccountRepository;
pub use gift_code_repository::PostgresGiftCodeRepository;
pub use ledger_reader::PostgresLedgerReader;
pub use payment_event_repository::PostgresPaymentEventRepository;

/// Embedded schema migrations.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");
