//! Fixtures shared by handler tests.

use async_trait::async_trait;
use secrecy::SecretString;
use std::sync::Arc;

use crate::adapters::auth::JwtTokenIssuer;
use crate::adapters::email::RecordingNotificationSender;
use crate::adapters::memory::InMemoryLedgerStore;
use crate::adapters::stripe::MockPaymentProvider;
use crate::domain::account::{
    Account, OneTimeToken, Registration, RegistrationInput, VerificationState,
};
use crate::domain::foundation::{AccountId, DomainError, GiftCodeId, Principal, Role, Timestamp};
use crate::domain::gift::{Gift, GiftCode};
use crate::domain::ledger::{NewPaymentEvent, ShareQuantity};
use crate::ports::{AccountRepository, GiftCodeRepository, PasswordHasher, PaymentEventRepository};

pub const TEST_JWT_SECRET: &str = "test-secret-test-secret-test-secret";

/// Reversible stand-in for Argon2 so handler tests stay fast.
pub struct PlainPasswordHasher;

#[async_trait]
impl PasswordHasher for PlainPasswordHasher {
    async fn hash(&self, password: &str) -> Result<String, DomainError> {
        Ok(format!("plain${}", password))
    }

    async fn verify(&self, password: &str, hash: &str) -> Result<bool, DomainError> {
        Ok(hash == format!("plain${}", password))
    }
}

/// Every port a handler may need, all in memory.
#[derive(Clone)]
pub struct Fixture {
    pub store: InMemoryLedgerStore,
    pub provider: MockPaymentProvider,
    pub mailer: RecordingNotificationSender,
    pub issuer: Arc<JwtTokenIssuer>,
    pub hasher: Arc<PlainPasswordHasher>,
}

impl Fixture {
    pub fn new() -> Self {
        Self {
            store: InMemoryLedgerStore::new(),
            provider: MockPaymentProvider::new(),
            mailer: RecordingNotificationSender::new(),
            issuer: Arc::new(JwtTokenIssuer::new(
                &SecretString::new(TEST_JWT_SECRET.to_string()),
                14,
            )),
            hasher: Arc::new(PlainPasswordHasher),
        }
    }

    pub fn accounts(&self) -> Arc<dyn AccountRepository> {
        Arc::new(self.store.clone())
    }

    /// Inserts a confirmed member whose password is `password`.
    pub async fn confirmed_member(&self, email: &str) -> Account {
        let mut account = Account::register(
            Registration::try_new(registration_input(email)).unwrap(),
            "plain$password".to_string(),
            format!("cus_{}", email),
            OneTimeToken::generate(),
        );
        account.verification = VerificationState::Confirmed;
        account.confirm_token = None;
        AccountRepository::insert(&self.store, &account).await.unwrap();
        account
    }

    pub async fn admin(&self, email: &str) -> Principal {
        let account = self.confirmed_member(email).await;
        assert!(self.store.grant_admin(&account.id));
        Principal::new(account.id, Role::Admin)
    }

    /// Creates a gift and funds it with a payment from `payer`.
    pub async fn funded_gift(&self, payer: AccountId, shares: u32) -> Gift {
        let gift = Gift::new(GiftCode::generate());
        GiftCodeRepository::insert(&self.store, &gift).await.unwrap();
        self.record_payment(payer, shares, Some(gift.id)).await;
        GiftCodeRepository::find_by_id(&self.store, &gift.id)
            .await
            .unwrap()
            .unwrap()
    }

    /// Records a payment with a fresh event id.
    pub async fn record_payment(&self, payer: AccountId, shares: u32, gift_id: Option<GiftCodeId>) {
        PaymentEventRepository::record(
            &self.store,
            &NewPaymentEvent {
                external_event_id: format!("evt_{}", uuid::Uuid::new_v4().simple()),
                account_id: payer,
                shares: ShareQuantity::try_new(shares).unwrap(),
                created_at: Timestamp::now(),
                gift_id,
            },
        )
        .await
        .unwrap();
    }
}

pub fn member(account: &Account) -> Principal {
    Principal::new(account.id, Role::Member)
}

pub fn registration_input(email: &str) -> RegistrationInput {
    RegistrationInput {
        email: email.to_string(),
        password: "password".to_string(),
        phone_number: "+33 6 00 00 00 00".to_string(),
        first_name: "Ada".to_string(),
        last_name: "Lovelace".to_string(),
        address: "12 rue des Lilas".to_string(),
        postal_code: "75011".to_string(),
        city: "Paris".to_string(),
        country: "France".to_string(),
        category: "supporters".to_string(),
        reason: None,
    }
}
