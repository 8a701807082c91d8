//! Stripe webhook signature verification.
//!
//! HMAC-SHA256 over `"<timestamp>.<payload>"` keyed with the endpoint secret,
//! compared in constant time, with a replay window on the signed timestamp.

use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;
use subtle::ConstantTimeEq;

use super::errors::IntakeError;
use super::stripe_event::StripeEvent;

/// Maximum allowed age for webhook events (5 minutes).
pub const MAX_EVENT_AGE_SECS: i64 = 300;

/// Maximum allowed clock skew for future events (1 minute).
pub const MAX_CLOCK_SKEW_SECS: i64 = 60;

/// Parsed components from the Stripe-Signature header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureHeader {
    /// Unix timestamp when the signature was generated.
    pub timestamp: i64,
    /// Every v1 signature present. Stripe sends several while a secret rolls.
    pub v1_signatures: Vec<Vec<u8>>,
}

impl SignatureHeader {
    /// Parses a Stripe-Signature header string.
    ///
    /// Format: `t=<timestamp>,v1=<signature>[,v1=<signature>][,v0=<legacy>]`
    ///
    /// # Errors
    ///
    /// Returns `IntakeError::MalformedHeader` if the header format is invalid.
    pub fn parse(header: &str) -> Result<Self, IntakeError> {
        let mut timestamp: Option<i64> = None;
        let mut v1_signatures = Vec::new();

        for part in header.split(',') {
            let (key, value) = part
                .trim()
                .split_once('=')
                .ok_or_else(|| IntakeError::MalformedHeader("invalid header format".into()))?;

            match key {
                "t" => {
                    timestamp = Some(value.parse().map_err(|_| {
                        IntakeError::MalformedHeader("invalid timestamp".into())
                    })?);
                }
                "v1" => {
                    v1_signatures.push(hex::decode(value).map_err(|_| {
                        IntakeError::MalformedHeader("invalid v1 signature hex".into())
                    })?);
                }
                // v0 and unknown schemes are ignored
                _ => {}
            }
        }

        let timestamp =
            timestamp.ok_or_else(|| IntakeError::MalformedHeader("missing timestamp".into()))?;
        if v1_signatures.is_empty() {
            return Err(IntakeError::MalformedHeader("missing v1 signature".into()));
        }

        Ok(SignatureHeader {
            timestamp,
            v1_signatures,
        })
    }
}

/// Verifier for Stripe webhook signatures.
pub struct StripeWebhookVerifier {
    secret: SecretString,
}

impl StripeWebhookVerifier {
    /// Creates a new verifier with the given webhook secret.
    pub fn new(secret: SecretString) -> Self {
        Self { secret }
    }

    /// Verifies the webhook signature and parses the event.
    ///
    /// Nothing in the payload is trusted until the signature has matched.
    ///
    /// # Errors
    ///
    /// - `MalformedHeader` - header missing parts or not hex
    /// - `TimestampOutOfRange` - signed more than 5 minutes ago
    /// - `InvalidTimestamp` - signed in the future
    /// - `InvalidSignature` - no v1 signature matches
    /// - `MalformedPayload` - authentic but not a Stripe event
    pub fn verify_and_parse(
        &self,
        payload: &[u8],
        signature_header: &str,
    ) -> Result<StripeEvent, IntakeError> {
        let header = SignatureHeader::parse(signature_header)?;

        self.validate_timestamp(header.timestamp, chrono::Utc::now().timestamp())?;

        let expected = self.compute_signature(header.timestamp, payload)?;
        if !header
            .v1_signatures
            .iter()
            .any(|candidate| constant_time_compare(&expected, candidate))
        {
            return Err(IntakeError::InvalidSignature);
        }

        serde_json::from_slice(payload).map_err(|e| IntakeError::MalformedPayload(e.to_string()))
    }

    /// Validates that the timestamp is within acceptable bounds.
    fn validate_timestamp(&self, timestamp: i64, now: i64) -> Result<(), IntakeError> {
        // `t` is attacker-controlled; only an absurdly old value can overflow.
        let Some(age) = now.checked_sub(timestamp) else {
            return Err(IntakeError::TimestampOutOfRange);
        };

        if age > MAX_EVENT_AGE_SECS {
            return Err(IntakeError::TimestampOutOfRange);
        }
        if age < -MAX_CLOCK_SKEW_SECS {
            return Err(IntakeError::InvalidTimestamp);
        }

        Ok(())
    }

    fn compute_signature(&self, timestamp: i64, payload: &[u8]) -> Result<Vec<u8>, IntakeError> {
        hmac_sha256(self.secret.expose_secret().as_bytes(), timestamp, payload)
    }
}

fn hmac_sha256(key: &[u8], timestamp: i64, payload: &[u8]) -> Result<Vec<u8>, IntakeError> {
    let mut mac =
        Hmac::<Sha256>::new_from_slice(key).map_err(|_| IntakeError::InvalidSignature)?;
    mac.update(timestamp.to_string().as_bytes());
    mac.update(b".");
    mac.update(payload);
    Ok(mac.finalize().into_bytes().to_vec())
}

/// Performs constant-time comparison of two byte slices.
fn constant_time_compare(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.ct_eq(b).into()
}

/// Builds a valid `Stripe-Signature` header for a payload.
pub fn sign_payload(secret: &str, timestamp: i64, payload: &str) -> Result<String, IntakeError> {
    let signature = hmac_sha256(secret.as_bytes(), timestamp, payload.as_bytes())?;
    Ok(format!("t={},v1={}", timestamp, hex::encode(signature)))
}
