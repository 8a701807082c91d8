//! HMAC-SHA256 JWT bearer tokens.
//!
//! Claims carry the account id (`sub`), its role and the expiry. Anything
//! that fails to decode, fails the signature check or names an unknown role
//! is `InvalidToken`; a well-signed token past `exp` is `TokenExpired`.

use chrono::Duration;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::foundation::{AccountId, AuthError, Principal, Role, Timestamp};
use crate::ports::{IssuedToken, TokenIssuer};

/// Default bearer token lifetime.
pub const DEFAULT_TOKEN_TTL_DAYS: i64 = 14;

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    role: Role,
    iat: i64,
    exp: i64,
}

/// Issues and verifies HS256 bearer tokens with a shared secret.
pub struct JwtTokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl: Duration,
}

impl JwtTokenIssuer {
    pub fn new(secret: &SecretString, ttl_days: i64) -> Self {
        let bytes = secret.expose_secret().as_bytes();
        Self {
            encoding_key: EncodingKey::from_secret(bytes),
            decoding_key: DecodingKey::from_secret(bytes),
            ttl: Duration::days(ttl_days),
        }
    }

    fn validation() -> Validation {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.validate_exp = true;
        validation.set_required_spec_claims(&["exp", "sub"]);
        validation
    }

    fn encode_claims(&self, claims: &Claims) -> Result<String, AuthError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key).map_err(|e| {
            tracing::error!(error = %e, "Failed to sign bearer token");
            AuthError::Internal(e.to_string())
        })
    }
}

impl TokenIssuer for JwtTokenIssuer {
    fn issue(&self, principal: &Principal) -> Result<IssuedToken, AuthError> {
        let now = Timestamp::now();
        let expires_at = Timestamp::from_datetime(*now.as_datetime() + self.ttl);
        let claims = Claims {
            sub: principal.account_id.to_string(),
            role: principal.role,
            iat: now.as_unix_secs(),
            exp: expires_at.as_unix_secs(),
        };

        Ok(IssuedToken {
            token: self.encode_claims(&claims)?,
            expires_at,
        })
    }

    fn verify(&self, token: &str) -> Result<Principal, AuthError> {
        let data = decode::<Claims>(token, &self.decoding_key, &Self::validation()).map_err(|e| {
            use jsonwebtoken::errors::ErrorKind;
            match e.kind() {
                ErrorKind::ExpiredSignature => {
                    tracing::debug!("Token expired");
                    AuthError::TokenExpired
                }
                _ => {
                    tracing::debug!("Token validation failed: {}", e);
                    AuthError::InvalidToken
                }
            }
        })?;

        let account_id = Uuid::parse_str(&data.claims.sub)
            .map(AccountId::from_uuid)
            .map_err(|_| AuthError::InvalidToken)?;

        Ok(Principal::new(account_id, data.claims.role))
    }
}
