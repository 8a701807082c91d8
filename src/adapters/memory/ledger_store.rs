//! In-Memory Ledger Store
//!
//! Implements every persistence port over one mutex-guarded state. Each
//! operation takes the lock once, so conditional writes (token consumption,
//! gift claims, idempotent payment inserts) are atomic exactly as the
//! Postgres statements are. Useful for tests and local development.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::domain::account::{Account, IdentityDocuments, OneTimeToken, VerificationState};
use crate::domain::foundation::{
    AccountId, DomainError, ErrorCode, GiftCodeId, Principal,
};
use crate::domain::gift::{Gift, GiftCard, GiftCode, GiftFunding};
use crate::domain::ledger::{compute_balance, NewPaymentEvent, PaymentEvent, ShareBalance};
use crate::ports::{
    AccountRepository, GiftCodeRepository, GiftInsertOutcome, LedgerReader, MemberBalance,
    PaymentEventRepository, RecordOutcome,
};

#[derive(Debug, Clone)]
struct GiftRow {
    id: GiftCodeId,
    code: GiftCode,
    claimed_by: Option<AccountId>,
}

#[derive(Debug, Default)]
struct State {
    accounts: HashMap<AccountId, Account>,
    payments: Vec<PaymentEvent>,
    gifts: HashMap<GiftCodeId, GiftRow>,
}

impl State {
    fn account_by_email(&self, email: &str) -> Option<&Account> {
        self.accounts.values().find(|a| a.email == email)
    }

    fn account_by_email_mut(&mut self, email: &str) -> Option<&mut Account> {
        self.accounts.values_mut().find(|a| a.email == email)
    }

    fn funding_of(&self, gift_id: &GiftCodeId) -> Option<GiftFunding> {
        self.payments
            .iter()
            .find(|p| p.gift_id.as_ref() == Some(gift_id))
            .map(|p| GiftFunding {
                payment_id: p.id,
                payer: p.account_id,
                shares: p.shares,
            })
    }

    fn gift(&self, row: &GiftRow) -> Gift {
        Gift {
            id: row.id,
            code: row.code.clone(),
            claimed_by: row.claimed_by,
            funding: self.funding_of(&row.id),
        }
    }

    fn gift_by_code(&self, code: &GiftCode) -> Option<&GiftRow> {
        self.gifts.values().find(|g| &g.code == code)
    }

    fn claimants(&self) -> HashMap<GiftCodeId, AccountId> {
        self.gifts
            .values()
            .filter_map(|g| g.claimed_by.map(|c| (g.id, c)))
            .collect()
    }

    fn balance_of(&self, account: &Account, claimants: &HashMap<GiftCodeId, AccountId>) -> ShareBalance {
        compute_balance(account.id, account.initial_shares, &self.payments, claimants)
    }
}

/// All persistence ports backed by process memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryLedgerStore {
    state: Arc<Mutex<State>>,
}

impl InMemoryLedgerStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, State>, DomainError> {
        self.state
            .lock()
            .map_err(|_| DomainError::database("in-memory store poisoned"))
    }

    /// Number of recorded payments (for assertions).
    pub fn payment_count(&self) -> usize {
        self.state.lock().map(|s| s.payments.len()).unwrap_or(0)
    }

    /// Promotes an account to admin. Admin rights are granted out of band.
    pub fn grant_admin(&self, id: &AccountId) -> bool {
        match self.state.lock() {
            Ok(mut state) => match state.accounts.get_mut(id) {
                Some(account) => {
                    account.role = crate::domain::foundation::Role::Admin;
                    true
                }
                None => false,
            },
            Err(_) => false,
        }
    }
}

#[async_trait]
impl AccountRepository for InMemoryLedgerStore {
    async fn insert(&self, account: &Account) -> Result<(), DomainError> {
        let mut state = self.lock()?;
        if state.account_by_email(&account.email).is_some() {
            return Err(DomainError::new(ErrorCode::EmailInUse, "Email already used"));
        }
        state.accounts.insert(account.id, account.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &AccountId) -> Result<Option<Account>, DomainError> {
        Ok(self.lock()?.accounts.get(id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, DomainError> {
        Ok(self.lock()?.account_by_email(email).cloned())
    }

    async fn email_exists(&self, email: &str) -> Result<bool, DomainError> {
        Ok(self.lock()?.account_by_email(email).is_some())
    }

    async fn consume_confirm_token(
        &self,
        email: &str,
        token: &OneTimeToken,
    ) -> Result<Option<Principal>, DomainError> {
        let mut state = self.lock()?;
        let Some(account) = state.account_by_email_mut(email) else {
            return Ok(None);
        };
        if account.confirm_token.as_ref() != Some(token) {
            return Ok(None);
        }
        account.confirm_token = None;
        account.verification = VerificationState::Confirmed;
        Ok(Some(Principal::new(account.id, account.role)))
    }

    async fn replace_confirm_token(
        &self,
        id: &AccountId,
        token: &OneTimeToken,
    ) -> Result<bool, DomainError> {
        let mut state = self.lock()?;
        match state.accounts.get_mut(id) {
            Some(account) if !account.is_confirmed() => {
                account.confirm_token = Some(token.clone());
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn replace_reset_token(
        &self,
        id: &AccountId,
        token: &OneTimeToken,
    ) -> Result<(), DomainError> {
        let mut state = self.lock()?;
        if let Some(account) = state.accounts.get_mut(id) {
            account.reset_token = Some(token.clone());
        }
        Ok(())
    }

    async fn consume_reset_token(
        &self,
        email: &str,
        token: &OneTimeToken,
        password_hash: &str,
    ) -> Result<Option<Principal>, DomainError> {
        let mut state = self.lock()?;
        let Some(account) = state.account_by_email_mut(email) else {
            return Ok(None);
        };
        if account.reset_token.as_ref() != Some(token) {
            return Ok(None);
        }
        account.reset_token = None;
        account.confirm_token = None;
        account.verification = VerificationState::Confirmed;
        account.password_hash = password_hash.to_string();
        Ok(Some(Principal::new(account.id, account.role)))
    }

    async fn set_documents(
        &self,
        id: &AccountId,
        documents: &IdentityDocuments,
    ) -> Result<bool, DomainError> {
        let mut state = self.lock()?;
        Ok(match state.accounts.get_mut(id) {
            Some(account) => {
                account.documents = documents.clone();
                true
            }
            None => false,
        })
    }

    async fn set_initial_shares(&self, id: &AccountId, shares: u32) -> Result<bool, DomainError> {
        let mut state = self.lock()?;
        Ok(match state.accounts.get_mut(id) {
            Some(account) => {
                account.initial_shares = shares;
                true
            }
            None => false,
        })
    }

    async fn set_accepted(&self, id: &AccountId, accepted: bool) -> Result<bool, DomainError> {
        let mut state = self.lock()?;
        Ok(match state.accounts.get_mut(id) {
            Some(account) => {
                account.accepted = accepted;
                true
            }
            None => false,
        })
    }
}

#[async_trait]
impl LedgerReader for InMemoryLedgerStore {
    async fn balance(&self, account_id: &AccountId) -> Result<Option<ShareBalance>, DomainError> {
        let state = self.lock()?;
        let claimants = state.claimants();
        Ok(state
            .accounts
            .get(account_id)
            .map(|account| state.balance_of(account, &claimants)))
    }

    async fn member(&self, account_id: &AccountId) -> Result<Option<MemberBalance>, DomainError> {
        let state = self.lock()?;
        let claimants = state.claimants();
        Ok(state.accounts.get(account_id).map(|account| MemberBalance {
            account: account.clone(),
            balance: state.balance_of(account, &claimants),
        }))
    }

    async fn members(&self) -> Result<Vec<MemberBalance>, DomainError> {
        let state = self.lock()?;
        let claimants = state.claimants();
        let mut members: Vec<MemberBalance> = state
            .accounts
            .values()
            .map(|account| MemberBalance {
                account: account.clone(),
                balance: state.balance_of(account, &claimants),
            })
            .collect();
        members.sort_by(|a, b| a.account.email.cmp(&b.account.email));
        Ok(members)
    }
}

#[async_trait]
impl PaymentEventRepository for InMemoryLedgerStore {
    async fn record(&self, payment: &NewPaymentEvent) -> Result<RecordOutcome, DomainError> {
        let mut state = self.lock()?;
        if state
            .payments
            .iter()
            .any(|p| p.external_event_id == payment.external_event_id)
        {
            return Ok(RecordOutcome::Duplicate);
        }
        // Mirrors the `payments.user_id` foreign key.
        if !state.accounts.contains_key(&payment.account_id) {
            return Err(DomainError::database(format!(
                "record payment: account {} does not exist",
                payment.account_id
            )));
        }
        if let Some(gift_id) = &payment.gift_id {
            if !state.gifts.contains_key(gift_id) {
                return Ok(RecordOutcome::GiftMissing);
            }
            if state.funding_of(gift_id).is_some() {
                return Ok(RecordOutcome::GiftAlreadyFunded);
            }
        }
        let event = PaymentEvent::record(payment.clone());
        state.payments.push(event.clone());
        Ok(RecordOutcome::Inserted(event))
    }

    async fn find_by_external_id(
        &self,
        external_event_id: &str,
    ) -> Result<Option<PaymentEvent>, DomainError> {
        Ok(self
            .lock()?
            .payments
            .iter()
            .find(|p| p.external_event_id == external_event_id)
            .cloned())
    }
}

#[async_trait]
impl GiftCodeRepository for InMemoryLedgerStore {
    async fn insert(&self, gift: &Gift) -> Result<GiftInsertOutcome, DomainError> {
        let mut state = self.lock()?;
        if state.gift_by_code(&gift.code).is_some() {
            return Ok(GiftInsertOutcome::CodeTaken);
        }
        state.gifts.insert(
            gift.id,
            GiftRow {
                id: gift.id,
                code: gift.code.clone(),
                claimed_by: None,
            },
        );
        Ok(GiftInsertOutcome::Inserted)
    }

    async fn find_by_code(&self, code: &GiftCode) -> Result<Option<Gift>, DomainError> {
        let state = self.lock()?;
        Ok(state.gift_by_code(code).map(|row| state.gift(row)))
    }

    async fn find_by_id(&self, id: &GiftCodeId) -> Result<Option<Gift>, DomainError> {
        let state = self.lock()?;
        Ok(state.gifts.get(id).map(|row| state.gift(row)))
    }

    async fn claim(
        &self,
        code: &GiftCode,
        claimant: &AccountId,
    ) -> Result<Option<Gift>, DomainError> {
        let mut state = self.lock()?;
        let Some(id) = state.gift_by_code(code).map(|row| row.id) else {
            return Ok(None);
        };
        if state.funding_of(&id).is_none() {
            return Ok(None);
        }
        let Some(row) = state.gifts.get_mut(&id) else {
            return Ok(None);
        };
        if row.claimed_by.is_some() {
            return Ok(None);
        }
        row.claimed_by = Some(*claimant);
        let row = row.clone();
        Ok(Some(state.gift(&row)))
    }

    async fn find_card(&self, id: &GiftCodeId) -> Result<Option<GiftCard>, DomainError> {
        let state = self.lock()?;
        let Some(row) = state.gifts.get(id) else {
            return Ok(None);
        };
        let Some(funding) = state.funding_of(id) else {
            return Ok(None);
        };
        let giver_first_name = state
            .accounts
            .get(&funding.payer)
            .map(|a| a.profile.first_name.clone())
            .unwrap_or_default();
        Ok(Some(GiftCard {
            giver_first_name,
            code: row.code.clone(),
            shares: funding.shares,
        }))
    }
}
