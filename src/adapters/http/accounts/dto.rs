//! HTTP DTOs (Data Transfer Objects) for account endpoints.

use serde::{Deserialize, Serialize};

use crate::application::handlers::GetMeResult;
use crate::domain::account::RegistrationInput;

// ════════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Deserialize)]
pub struct CreateTokenRequest {
    pub email: String,
    pub password: String,
}

/// Registration form. Field presence is enforced here, content rules by
/// the domain.
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub phone_number: String,
    pub first_name: String,
    pub last_name: String,
    pub address: String,
    pub postal_code: String,
    pub city: String,
    pub country: String,
    pub category: String,
    #[serde(default)]
    pub reason: Option<String>,
}

impl From<RegisterRequest> for RegistrationInput {
    fn from(req: RegisterRequest) -> Self {
        RegistrationInput {
            email: req.email,
            password: req.password,
            phone_number: req.phone_number,
            first_name: req.first_name,
            last_name: req.last_name,
            address: req.address,
            postal_code: req.postal_code,
            city: req.city,
            country: req.country,
            category: req.category,
            reason: req.reason,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConfirmRequest {
    pub email: String,
    pub token: String,
}

/// Body of both `confirm/start` and `reset/start`.
#[derive(Debug, Clone, Deserialize)]
pub struct EmailRequest {
    pub email: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResetPasswordRequest {
    pub email: String,
    pub password: String,
    pub token: String,
}

// ════════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RegisterResponse {
    pub id: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MeResponse {
    pub email: String,
    pub must_upload_documents: bool,
    pub shares: u64,
}

impl From<GetMeResult> for MeResponse {
    fn from(result: GetMeResult) -> Self {
        Self {
            email: result.email,
            must_upload_documents: result.must_upload_documents,
            shares: result.shares,
        }
    }
}

/// Keys of the stored documents after an upload.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentsResponse {
    pub identity_front: Option<String>,
    pub identity_back: Option<String>,
    pub address_proof: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn me_response_uses_camel_case() {
        let json = serde_json::to_value(MeResponse {
            email: "ada@example.org".to_string(),
            must_upload_documents: true,
            shares: 4,
        })
        .unwrap();
        assert_eq!(json["mustUploadDocuments"], true);
        assert_eq!(json["shares"], 4);
    }

    #[test]
    fn register_request_reason_is_optional() {
        let req: RegisterRequest = serde_json::from_value(serde_json::json!({
            "email": "ada@example.org",
            "password": "pw",
            "phone_number": "0600000000",
            "first_name": "Ada",
            "last_name": "Lovelace",
            "address": "1 rue",
            "postal_code": "75001",
            "city": "Paris",
            "country": "France",
            "category": "supporters"
        }))
        .unwrap();
        assert!(req.reason.is_none());
    }
}
