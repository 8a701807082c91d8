//! Six-digit single-use tokens for account confirmation and password reset.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::ValidationError;

/// Number of decimal digits in a token.
pub const TOKEN_DIGITS: usize = 6;

/// A one-time token mailed to the account holder.
///
/// Stored on the account until consumed; consumption clears it in the same
/// conditional write that checks it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OneTimeToken(String);

impl OneTimeToken {
    /// Generates a fresh random token.
    pub fn generate() -> Self {
        let mut rng = rand::thread_rng();
        let digits: String = (0..TOKEN_DIGITS)
            .map(|_| char::from(b'0' + rng.gen_range(0..10u8)))
            .collect();
        Self(digits)
    }

    /// Parses a token presented by a caller.
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::empty_field("token"));
        }
        if trimmed.len() != TOKEN_DIGITS || !trimmed.chars().all(|c| c.is_ascii_digit()) {
            return Err(ValidationError::invalid_format(
                "token",
                format!("expected {} digits", TOKEN_DIGITS),
            ));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Wraps a value read back from storage.
    pub fn from_stored(value: String) -> Self {
        Self(value)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OneTimeToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
