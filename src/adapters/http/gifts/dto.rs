//! HTTP DTOs for share purchase and gift endpoints.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutRequest {
    pub quantity: u32,
    #[serde(default)]
    pub gift: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct CheckoutResponse {
    pub url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UseGiftCodeRequest {
    pub gift_code: String,
}
