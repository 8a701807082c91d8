//! GiftCodeRepository port - gift rows and the claim compare-and-set.

use async_trait::async_trait;

use crate::domain::foundation::{AccountId, DomainError, GiftCodeId};
use crate::domain::gift::{Gift, GiftCard, GiftCode};

/// Result of inserting a new gift.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GiftInsertOutcome {
    Inserted,
    /// Another gift already uses this code; draw a new one.
    CodeTaken,
}

/// Port for the gifts table.
#[async_trait]
pub trait GiftCodeRepository: Send + Sync {
    /// Insert a newly created (unfunded, unclaimed) gift.
    async fn insert(&self, gift: &Gift) -> Result<GiftInsertOutcome, DomainError>;

    /// Gift by code, joined with its funding payment.
    async fn find_by_code(&self, code: &GiftCode) -> Result<Option<Gift>, DomainError>;

    /// Gift by id, joined with its funding payment.
    async fn find_by_id(&self, id: &GiftCodeId) -> Result<Option<Gift>, DomainError>;

    /// Sets the claimant if the gift is funded and unclaimed.
    ///
    /// Must be a single atomic conditional write
    /// (`SET claimed_by = $1 WHERE claimed_by IS NULL AND <funded>`), never a
    /// read followed by a write. Of two concurrent calls for the same code, at
    /// most one returns `Some`. Returns `None` when nothing matched; the
    /// caller classifies why with a follow-up read.
    async fn claim(
        &self,
        code: &GiftCode,
        claimant: &AccountId,
    ) -> Result<Option<Gift>, DomainError>;

    /// Card contents of a funded gift, `None` if unknown or unfunded.
    async fn find_card(&self, id: &GiftCodeId) -> Result<Option<GiftCard>, DomainError>;
}
