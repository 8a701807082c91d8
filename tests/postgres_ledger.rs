//! Integration tests for the PostgreSQL adapters.
//!
//! These need a disposable database and are ignored by default:
//!
//! ```text
//! DATABASE_URL=postgres://localhost/coop_ledger_test cargo test -- --ignored
//! ```
//!
//! 1. Concurrent claims of one funded gift produce a single winner
//! 2. Concurrent redeliveries of one Stripe event record a single entry
//! 3. Single and bulk balances come from the same expression
//! 4. Payments for unknown accounts are storage faults

use futures::future::join_all;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use uuid::Uuid;

use coop_ledger::adapters::postgres::{
    PostgresAccountRepository, PostgresGiftCodeRepository, PostgresLedgerReader,
    PostgresPaymentEventRepository, MIGRATOR,
};
use coop_ledger::domain::account::{Account, OneTimeToken, Registration, RegistrationInput};
use coop_ledger::domain::foundation::{AccountId, ErrorCode, Timestamp};
use coop_ledger::domain::gift::{Gift, GiftCode, GiftState};
use coop_ledger::domain::ledger::{NewPaymentEvent, ShareQuantity};
use coop_ledger::ports::{
    AccountRepository, GiftCodeRepository, GiftInsertOutcome, LedgerReader,
    PaymentEventRepository, RecordOutcome,
};

// =============================================================================
// Test Infrastructure
// =============================================================================

async fn pool() -> PgPool {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for --ignored tests");
    let pool = PgPoolOptions::new()
        .max_connections(8)
        .connect(&url)
        .await
        .expect("connect to DATABASE_URL");
    MIGRATOR.run(&pool).await.expect("run migrations");
    pool
}

/// Inserts a member with a unique email so runs never collide.
async fn member(pool: &PgPool, name: &str) -> Account {
    let email = format!("{}-{}@example.org", name, Uuid::new_v4());
    let account = Account::register(
        Registration::try_new(RegistrationInput {
            email: email.clone(),
            password: "password".to_string(),
            phone_number: "0600000000".to_string(),
            first_name: "Camille".to_string(),
            last_name: "Martin".to_string(),
            address: "3 place du Marché".to_string(),
            postal_code: "69001".to_string(),
            city: "Lyon".to_string(),
            country: "France".to_string(),
            category: "supporters".to_string(),
            reason: None,
        })
        .unwrap(),
        "hash".to_string(),
        format!("cus_{}", email),
        OneTimeToken::generate(),
    );
    PostgresAccountRepository::new(pool.clone())
        .insert(&account)
        .await
        .unwrap();
    account
}

fn payment(event: &str, payer: AccountId, shares: u32, gift: Option<&Gift>) -> NewPaymentEvent {
    NewPaymentEvent {
        external_event_id: event.to_string(),
        account_id: payer,
        shares: ShareQuantity::try_new(shares).unwrap(),
        created_at: Timestamp::now(),
        gift_id: gift.map(|g| g.id),
    }
}

fn event_id() -> String {
    format!("evt_{}", Uuid::new_v4().simple())
}

// =============================================================================
// Gift Claims
// =============================================================================

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn concurrent_claims_have_one_winner() {
    let pool = pool().await;
    let gifts = PostgresGiftCodeRepository::new(pool.clone());
    let payments = PostgresPaymentEventRepository::new(pool.clone());
    let ledger = PostgresLedgerReader::new(pool.clone());

    let payer = member(&pool, "payer").await;
    let gift = Gift::new(GiftCode::generate());
    assert_eq!(gifts.insert(&gift).await.unwrap(), GiftInsertOutcome::Inserted);
    payments
        .record(&payment(&event_id(), payer.id, 4, Some(&gift)))
        .await
        .unwrap();

    let mut claimants = Vec::new();
    for i in 0..6 {
        claimants.push(member(&pool, &format!("claimant{}", i)).await);
    }

    let results = join_all(
        claimants
            .iter()
            .map(|claimant| gifts.claim(&gift.code, &claimant.id)),
    )
    .await;

    let winners: Vec<_> = results
        .into_iter()
        .map(Result::unwrap)
        .flatten()
        .collect();
    assert_eq!(winners.len(), 1);
    let winner = winners[0].claimed_by.unwrap();

    let stored = gifts.find_by_id(&gift.id).await.unwrap().unwrap();
    assert_eq!(stored.state(), GiftState::Claimed);
    assert_eq!(stored.claimed_by, Some(winner));

    for claimant in &claimants {
        let expected = if claimant.id == winner { 4 } else { 0 };
        let balance = ledger.balance(&claimant.id).await.unwrap().unwrap();
        assert_eq!(balance.total(), expected);
    }
    // Gift shares never count for the payer
    assert_eq!(ledger.balance(&payer.id).await.unwrap().unwrap().total(), 0);
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn unfunded_gift_cannot_be_claimed() {
    let pool = pool().await;
    let gifts = PostgresGiftCodeRepository::new(pool.clone());
    let claimant = member(&pool, "early").await;
    let gift = Gift::new(GiftCode::generate());
    gifts.insert(&gift).await.unwrap();

    assert!(gifts.claim(&gift.code, &claimant.id).await.unwrap().is_none());
    let stored = gifts.find_by_id(&gift.id).await.unwrap().unwrap();
    assert_eq!(stored.state(), GiftState::Created);
}

// =============================================================================
// Payment Intake
// =============================================================================

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn concurrent_redeliveries_record_once() {
    let pool = pool().await;
    let payments = PostgresPaymentEventRepository::new(pool.clone());
    let ledger = PostgresLedgerReader::new(pool.clone());
    let payer = member(&pool, "payer").await;

    let entry = payment(&event_id(), payer.id, 3, None);
    let outcomes = join_all((0..8).map(|_| payments.record(&entry))).await;

    let outcomes: Vec<_> = outcomes.into_iter().map(Result::unwrap).collect();
    let inserted = outcomes
        .iter()
        .filter(|o| matches!(o, RecordOutcome::Inserted(_)))
        .count();
    assert_eq!(inserted, 1);
    assert!(outcomes
        .iter()
        .all(|o| matches!(o, RecordOutcome::Inserted(_) | RecordOutcome::Duplicate)));

    assert_eq!(ledger.balance(&payer.id).await.unwrap().unwrap().total(), 3);
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn second_funding_of_a_gift_is_refused() {
    let pool = pool().await;
    let gifts = PostgresGiftCodeRepository::new(pool.clone());
    let payments = PostgresPaymentEventRepository::new(pool.clone());
    let payer = member(&pool, "payer").await;
    let gift = Gift::new(GiftCode::generate());
    gifts.insert(&gift).await.unwrap();

    let first = payments
        .record(&payment(&event_id(), payer.id, 2, Some(&gift)))
        .await
        .unwrap();
    assert!(matches!(first, RecordOutcome::Inserted(_)));

    let second = payments
        .record(&payment(&event_id(), payer.id, 2, Some(&gift)))
        .await
        .unwrap();
    assert_eq!(second, RecordOutcome::GiftAlreadyFunded);
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn unknown_gift_is_reported() {
    let pool = pool().await;
    let payments = PostgresPaymentEventRepository::new(pool.clone());
    let payer = member(&pool, "payer").await;
    let missing = Gift::new(GiftCode::generate());

    let outcome = payments
        .record(&payment(&event_id(), payer.id, 1, Some(&missing)))
        .await
        .unwrap();
    assert_eq!(outcome, RecordOutcome::GiftMissing);
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn unknown_account_is_a_storage_fault() {
    let pool = pool().await;
    let payments = PostgresPaymentEventRepository::new(pool.clone());

    let err = payments
        .record(&payment(&event_id(), AccountId::new(), 1, None))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::DatabaseError);
}

// =============================================================================
// Balances
// =============================================================================

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn bulk_balances_match_single_balances() {
    let pool = pool().await;
    let gifts = PostgresGiftCodeRepository::new(pool.clone());
    let payments = PostgresPaymentEventRepository::new(pool.clone());
    let ledger = PostgresLedgerReader::new(pool.clone());

    let alice = member(&pool, "alice").await;
    let bob = member(&pool, "bob").await;
    payments
        .record(&payment(&event_id(), alice.id, 5, None))
        .await
        .unwrap();
    let gift = Gift::new(GiftCode::generate());
    gifts.insert(&gift).await.unwrap();
    payments
        .record(&payment(&event_id(), alice.id, 2, Some(&gift)))
        .await
        .unwrap();
    gifts.claim(&gift.code, &bob.id).await.unwrap().unwrap();

    let members = ledger.members().await.unwrap();
    for account in [&alice, &bob] {
        let single = ledger.balance(&account.id).await.unwrap().unwrap();
        let listed = members
            .iter()
            .find(|m| m.account.id == account.id)
            .unwrap();
        assert_eq!(listed.balance, single);
    }
    assert_eq!(ledger.balance(&alice.id).await.unwrap().unwrap().total(), 5);
    assert_eq!(ledger.balance(&bob.id).await.unwrap().unwrap().total(), 2);
}
