//! Gift and purchase handlers.
//!
//! ## Commands
//! - Opening a checkout session, optionally creating a gift code
//! - Redeeming a gift code
//!
//! ## Queries
//! - Rendering the printable card of a funded gift

mod create_checkout;
mod get_gift_card;
mod redeem_gift;

// Commands
pub use create_checkout::{
    CheckoutUrls, CreateCheckoutCommand, CreateCheckoutHandler, CreateCheckoutResult,
    MAX_GIFT_CODE_ATTEMPTS,
};
pub use redeem_gift::{RedeemGiftCommand, RedeemGiftHandler};

// Queries
pub use get_gift_card::{GetGiftCardHandler, GetGiftCardQuery};
