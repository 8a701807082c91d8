//! RedeemGiftHandler - Command handler for claiming a gift code.

use std::sync::Arc;

use crate::domain::foundation::{AccountId, ErrorCode};
use crate::domain::gift::{Gift, GiftCode, RedeemError};
use crate::ports::GiftCodeRepository;

/// Command to redeem `code` for `claimant`.
#[derive(Debug, Clone)]
pub struct RedeemGiftCommand {
    pub claimant: AccountId,
    pub code: String,
}

/// Handler for gift redemption.
///
/// The claim is one conditional write; of concurrent redemptions of the same
/// code exactly one succeeds. When the write matches nothing, a follow-up
/// read says why. Gift states only move forward, so that read cannot report
/// a state the gift was never in.
pub struct RedeemGiftHandler {
    gifts: Arc<dyn GiftCodeRepository>,
}

impl RedeemGiftHandler {
    pub fn new(gifts: Arc<dyn GiftCodeRepository>) -> Self {
        Self { gifts }
    }

    pub async fn handle(&self, cmd: RedeemGiftCommand) -> Result<Gift, RedeemError> {
        let code = GiftCode::parse(&cmd.code)
            .map_err(|e| RedeemError::InvalidCode(e.to_string()))?;

        if let Some(gift) = self.gifts.claim(&code, &cmd.claimant).await? {
            tracing::info!(gift_id = %gift.id, claimant = %cmd.claimant, "Gift claimed");
            return Ok(gift);
        }

        let gift = self
            .gifts
            .find_by_code(&code)
            .await?
            .ok_or(RedeemError::NotFound)?;
        gift.check_redeemable()?;

        // Funded and unclaimed, yet the claim matched no row.
        tracing::error!(gift_id = %gift.id, "Gift claim matched no row for a redeemable gift");
        Err(RedeemError::Infrastructure {
            code: ErrorCode::InternalError,
            message: "Gift claim failed".to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::test_support::Fixture;
    use crate::domain::gift::GiftState;
    use crate::ports::LedgerReader;

    fn handler(fx: &Fixture) -> RedeemGiftHandler {
        RedeemGiftHandler::new(Arc::new(fx.store.clone()))
    }

    fn redeem(claimant: AccountId, code: &str) -> RedeemGiftCommand {
        RedeemGiftCommand {
            claimant,
            code: code.to_string(),
        }
    }

    #[tokio::test]
    async fn funded_gift_moves_shares_to_claimant() {
        let fx = Fixture::new();
        let payer = fx.confirmed_member("payer@example.org").await;
        let friend = fx.confirmed_member("friend@example.org").await;
        let gift = fx.funded_gift(payer.id, 3).await;

        let claimed = handler(&fx)
            .handle(redeem(friend.id, &gift.code.as_str().to_lowercase()))
            .await
            .unwrap();
        assert_eq!(claimed.state(), GiftState::Claimed);
        assert_eq!(claimed.claimed_by, Some(friend.id));

        let friend_balance = fx.store.balance(&friend.id).await.unwrap().unwrap();
        let payer_balance = fx.store.balance(&payer.id).await.unwrap().unwrap();
        assert_eq!(friend_balance.claimed_gifts, 3);
        assert_eq!(payer_balance.total(), 0);
    }

    #[tokio::test]
    async fn second_redemption_is_already_claimed_even_for_same_member() {
        let fx = Fixture::new();
        let payer = fx.confirmed_member("payer@example.org").await;
        let friend = fx.confirmed_member("friend@example.org").await;
        let gift = fx.funded_gift(payer.id, 3).await;
        handler(&fx)
            .handle(redeem(friend.id, gift.code.as_str()))
            .await
            .unwrap();

        for claimant in [friend.id, payer.id] {
            let err = handler(&fx)
                .handle(redeem(claimant, gift.code.as_str()))
                .await
                .unwrap_err();
            assert_eq!(err, RedeemError::AlreadyClaimed);
        }
    }

    #[tokio::test]
    async fn unfunded_gift_is_not_yet_funded() {
        let fx = Fixture::new();
        let friend = fx.confirmed_member("friend@example.org").await;
        let gift = Gift::new(GiftCode::generate());
        fx.store.insert(&gift).await.unwrap();

        let err = handler(&fx)
            .handle(redeem(friend.id, gift.code.as_str()))
            .await
            .unwrap_err();
        assert_eq!(err.code().as_str(), "gift-code-not-funded");
    }

    #[tokio::test]
    async fn unknown_code_is_not_found() {
        let fx = Fixture::new();
        let err = handler(&fx)
            .handle(redeem(AccountId::new(), "ZZZZ9999"))
            .await
            .unwrap_err();
        assert_eq!(err, RedeemError::NotFound);
    }

    #[tokio::test]
    async fn malformed_code_is_bad_request() {
        let fx = Fixture::new();
        let err = handler(&fx)
            .handle(redeem(AccountId::new(), "short"))
            .await
            .unwrap_err();
        assert_eq!(err.code().as_str(), "bad-request");
    }

    #[tokio::test]
    async fn concurrent_redemptions_have_one_winner() {
        let fx = Fixture::new();
        let payer = fx.confirmed_member("payer@example.org").await;
        let gift = fx.funded_gift(payer.id, 2).await;
        let mut claimants = Vec::new();
        for i in 0..8 {
            claimants.push(fx.confirmed_member(&format!("m{}@example.org", i)).await.id);
        }

        let tasks: Vec<_> = claimants
            .into_iter()
            .map(|claimant| {
                let handler = handler(&fx);
                let code = gift.code.as_str().to_string();
                tokio::spawn(async move { handler.handle(redeem(claimant, &code)).await })
            })
            .collect();

        let mut wins = 0;
        for task in tasks {
            match task.await.unwrap() {
                Ok(_) => wins += 1,
                Err(err) => assert_eq!(err, RedeemError::AlreadyClaimed),
            }
        }
        assert_eq!(wins, 1);
    }
}
