//! Ledger domain module.
//!
//! Payment entries and the share balance derived from them.

mod balance;
mod payment_event;

pub use balance::{compute_balance, credited_account, ShareBalance};
pub use payment_event::{NewPaymentEvent, PaymentEvent, ShareQuantity, MAX_SHARES_PER_PAYMENT};
