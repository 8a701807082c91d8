//! Account domain module.
//!
//! Member records, registration validation, one-time tokens and the errors
//! raised by account flows.

mod errors;
mod one_time_token;
mod record;

pub use errors::AccountError;
pub use one_time_token::{OneTimeToken, TOKEN_DIGITS};
pub use record::{
    Account, Category, IdentityDocuments, Profile, Registration, RegistrationInput,
    VerificationState,
};
