//! Payment provider port for external payment processing.
//!
//! Defines the contract for payment gateway integrations (e.g., Stripe).
//! Only the outbound calls live here; completed payments come back through
//! the webhook and are handled by the intake domain.

use async_trait::async_trait;
use std::collections::HashMap;
use thiserror::Error;

use crate::domain::foundation::{DomainError, ErrorCode};
use crate::domain::ledger::ShareQuantity;

/// Port for payment provider integrations.
#[async_trait]
pub trait PaymentProvider: Send + Sync {
    /// Create a customer in the payment system.
    ///
    /// Returns the provider's customer ID, stored on the account at registration.
    async fn create_customer(&self, request: CreateCustomerRequest)
        -> Result<Customer, PaymentError>;

    /// Create a hosted checkout session for buying shares.
    ///
    /// The `metadata` map is echoed back verbatim in the
    /// `checkout.session.completed` webhook.
    async fn create_checkout_session(
        &self,
        request: CreateCheckoutRequest,
    ) -> Result<CheckoutSession, PaymentError>;
}

/// Request to create a customer.
#[derive(Debug, Clone)]
pub struct CreateCustomerRequest {
    pub email: String,
    pub name: String,
    pub phone: Option<String>,
}

/// Customer in the payment system.
#[derive(Debug, Clone)]
pub struct Customer {
    /// Provider's customer ID.
    pub id: String,
}

/// Request to create a checkout session.
#[derive(Debug, Clone)]
pub struct CreateCheckoutRequest {
    /// Provider's customer ID of the buyer.
    pub customer_id: String,

    /// Number of shares; billed as the quantity of the share price.
    pub quantity: ShareQuantity,

    pub metadata: HashMap<String, String>,

    /// URL to redirect after successful checkout.
    pub success_url: String,

    /// URL to redirect after canceled checkout.
    pub cancel_url: String,
}

/// Checkout session for payment completion.
#[derive(Debug, Clone)]
pub struct CheckoutSession {
    /// Provider's session ID.
    pub id: String,

    /// URL for customer to complete checkout.
    pub url: String,
}

/// Failure of a call to the payment provider.
#[derive(Debug, Clone, Error)]
#[error("{code}: {message}")]
pub struct PaymentError {
    pub code: PaymentErrorCode,
    pub message: String,

    /// Provider's own error code, e.g. Stripe's `resource_missing`.
    pub provider_code: Option<String>,
}

impl PaymentError {
    pub fn new(code: PaymentErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            provider_code: None,
        }
    }

    pub fn with_provider_code(mut self, code: impl Into<String>) -> Self {
        self.provider_code = Some(code.into());
        self
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(PaymentErrorCode::Network, message)
    }

    pub fn provider(message: impl Into<String>) -> Self {
        Self::new(PaymentErrorCode::Provider, message)
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(PaymentErrorCode::Configuration, message)
    }
}

impl From<PaymentError> for DomainError {
    fn from(err: PaymentError) -> Self {
        DomainError::new(ErrorCode::ExternalServiceError, err.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentErrorCode {
    Network,
    Authentication,
    InvalidRequest,
    RateLimited,
    Provider,
    Configuration,
}

impl std::fmt::Display for PaymentErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            PaymentErrorCode::Network => "network_error",
            PaymentErrorCode::Authentication => "authentication_error",
            PaymentErrorCode::InvalidRequest => "invalid_request",
            PaymentErrorCode::RateLimited => "rate_limited",
            PaymentErrorCode::Provider => "provider_error",
            PaymentErrorCode::Configuration => "configuration_error",
        };
        f.write_str(s)
    }
}
