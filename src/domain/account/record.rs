//! Member account record and registration input.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::OneTimeToken;
use crate::domain::foundation::{AccountId, DocumentId, Role, ValidationError};

/// Membership category chosen at registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Supporters,
    EmployeesAndVolunteers,
    BeneficiaryProducers,
    Partners,
    Experts,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Supporters => "supporters",
            Category::EmployeesAndVolunteers => "employees_and_volunteers",
            Category::BeneficiaryProducers => "beneficiary_producers",
            Category::Partners => "partners",
            Category::Experts => "experts",
        }
    }

    /// Supporters are the only category allowed to join without a reason.
    pub fn requires_reason(&self) -> bool {
        !matches!(self, Category::Supporters)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Category {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "supporters" => Ok(Category::Supporters),
            "employees_and_volunteers" => Ok(Category::EmployeesAndVolunteers),
            "beneficiary_producers" => Ok(Category::BeneficiaryProducers),
            "partners" => Ok(Category::Partners),
            "experts" => Ok(Category::Experts),
            other => Err(ValidationError::invalid_format(
                "category",
                format!("unknown category '{}'", other),
            )),
        }
    }
}

/// Whether the account holder has proven control of the email address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerificationState {
    Unconfirmed,
    Confirmed,
}

impl VerificationState {
    pub fn from_confirmed_flag(confirmed: bool) -> Self {
        if confirmed {
            VerificationState::Confirmed
        } else {
            VerificationState::Unconfirmed
        }
    }

    pub fn is_confirmed(&self) -> bool {
        matches!(self, VerificationState::Confirmed)
    }
}

/// Contact and membership details collected at registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub phone_number: String,
    pub first_name: String,
    pub last_name: String,
    pub address: String,
    pub postal_code: String,
    pub city: String,
    pub country: String,
    pub category: Category,
    pub reason: Option<String>,
}

impl Profile {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// References to identity documents held in document storage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityDocuments {
    pub identity_front: Option<DocumentId>,
    pub identity_back: Option<DocumentId>,
    pub address_proof: Option<DocumentId>,
}

impl IdentityDocuments {
    /// Front of the identity card and proof of address are mandatory.
    pub fn is_complete(&self) -> bool {
        self.identity_front.is_some() && self.address_proof.is_some()
    }

    /// Every document key attached to the account.
    pub fn all(&self) -> impl Iterator<Item = DocumentId> + '_ {
        [self.identity_front, self.identity_back, self.address_proof]
            .into_iter()
            .flatten()
    }
}

/// A member account as persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub id: AccountId,
    pub role: Role,
    pub verification: VerificationState,
    pub confirm_token: Option<OneTimeToken>,
    pub reset_token: Option<OneTimeToken>,
    pub email: String,
    pub password_hash: String,
    pub profile: Profile,
    pub customer_ref: String,
    pub documents: IdentityDocuments,
    pub accepted: bool,
    pub initial_shares: u32,
}

impl Account {
    /// Creates a freshly registered, unconfirmed member account.
    pub fn register(
        registration: Registration,
        password_hash: String,
        customer_ref: String,
        confirm_token: OneTimeToken,
    ) -> Self {
        Self {
            id: AccountId::new(),
            role: Role::Member,
            verification: VerificationState::Unconfirmed,
            confirm_token: Some(confirm_token),
            reset_token: None,
            email: registration.email,
            password_hash,
            profile: registration.profile,
            customer_ref,
            documents: IdentityDocuments::default(),
            accepted: false,
            initial_shares: 0,
        }
    }

    pub fn is_confirmed(&self) -> bool {
        self.verification.is_confirmed()
    }

    pub fn must_upload_documents(&self) -> bool {
        !self.documents.is_complete()
    }
}

/// Validated registration request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub email: String,
    pub password: String,
    pub profile: Profile,
}

/// Raw registration fields, as submitted.
#[derive(Debug, Clone, Default)]
pub struct RegistrationInput {
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
    pub reason: Option<String>,
}

impl Registration {
    /// Validates raw registration fields.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any required field is blank, the email has
    /// no `@`, the category is unknown, or a reason is missing for a category
    /// other than supporters.
    pub fn try_new(input: RegistrationInput) -> Result<Self, ValidationError> {
        let email = input.email.trim().to_lowercase();
        if email.is_empty() {
            return Err(ValidationError::empty_field("email"));
        }
        if !email.contains('@') {
            return Err(ValidationError::invalid_format("email", "missing @ symbol"));
        }
        if input.password.is_empty() {
            return Err(ValidationError::empty_field("password"));
        }

        let required = |field: &'static str, value: String| -> Result<String, ValidationError> {
            let value = value.trim().to_string();
            if value.is_empty() {
                Err(ValidationError::empty_field(field))
            } else {
                Ok(value)
            }
        };

        let category: Category = input.category.trim().parse()?;
        let reason = input
            .reason
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty());
        if category.requires_reason() && reason.is_none() {
            return Err(ValidationError::empty_field("reason"));
        }

        let profile = Profile {
            phone_number: required("phone_number", input.phone_number)?,
            first_name: required("first_name", input.first_name)?,
            last_name: required("last_name", input.last_name)?,
            address: required("address", input.address)?,
            postal_code: required("postal_code", input.postal_code)?,
            city: required("city", input.city)?,
            country: required("country", input.country)?,
            category,
            reason,
        };

        Ok(Self {
            email,
            password: input.password,
            profile,
        })
    }
}
