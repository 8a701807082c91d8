//! Authentication adapters.
//!
//! - `jwt_token_issuer` - HS256 bearer tokens implementing `TokenIssuer`
//! - `argon2_hasher` - Argon2id implementation of `PasswordHasher`

mod argon2_hasher;
mod jwt_token_issuer;

pub use argon2_hasher::Argon2PasswordHasher;
pub use jwt_token_issuer::{JwtTokenIssuer, DEFAULT_TOKEN_TTL_DAYS};
