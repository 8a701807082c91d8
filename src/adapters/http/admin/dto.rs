//! HTTP DTOs for admin endpoints.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::Role;
use crate::ports::MemberBalance;

// ════════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GrantInitialSharesRequest {
    pub initial_shares: u32,
}

// ════════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Row of the member listing.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberSummaryResponse {
    pub id: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub accepted: bool,
    pub category: &'static str,
    pub shares: u64,
}

impl From<&MemberBalance> for MemberSummaryResponse {
    fn from(member: &MemberBalance) -> Self {
        let account = &member.account;
        Self {
            id: account.id.to_string(),
            email: account.email.clone(),
            first_name: account.profile.first_name.clone(),
            last_name: account.profile.last_name.clone(),
            accepted: account.accepted,
            category: account.profile.category.as_str(),
            shares: member.balance.total(),
        }
    }
}

/// Full member record for review.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberDetailResponse {
    pub id: String,
    pub confirmed: bool,
    pub admin: bool,
    pub accepted: bool,
    pub email: String,
    pub phone_number: String,
    pub first_name: String,
    pub last_name: String,
    pub address: String,
    pub postal_code: String,
    pub city: String,
    pub country: String,
    pub category: &'static str,
    pub reason: Option<String>,
    pub identity_front: Option<String>,
    pub identity_back: Option<String>,
    pub address_proof: Option<String>,
    pub initial_shares: u32,
    pub shares: u64,
}

impl From<MemberBalance> for MemberDetailResponse {
    fn from(member: MemberBalance) -> Self {
        let shares = member.balance.total();
        let account = member.account;
        let confirmed = account.is_confirmed();
        let profile = account.profile;
        Self {
            id: account.id.to_string(),
            confirmed,
            admin: account.role == Role::Admin,
            accepted: account.accepted,
            email: account.email,
            phone_number: profile.phone_number,
            first_name: profile.first_name,
            last_name: profile.last_name,
            address: profile.address,
            postal_code: profile.postal_code,
            city: profile.city,
            country: profile.country,
            category: profile.category.as_str(),
            reason: profile.reason,
            identity_front: account.documents.identity_front.map(|d| d.to_string()),
            identity_back: account.documents.identity_back.map(|d| d.to_string()),
            address_proof: account.documents.address_proof.map(|d| d.to_string()),
            initial_shares: account.initial_shares,
            shares,
        }
    }
}
