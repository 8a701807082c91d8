//! Gift code domain module.

mod card;
mod code;
mod errors;

pub use card::GiftCard;
pub use code::{
    Gift, GiftCode, GiftFunding, GiftState, GIFT_CODE_ALPHABET, GIFT_CODE_LENGTH,
};
pub use errors::RedeemError;
