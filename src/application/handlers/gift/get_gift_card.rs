//! GetGiftCardHandler - Query handler for the printable gift card.

use std::sync::Arc;

use crate::domain::foundation::{DomainError, ErrorCode, GiftCodeId};
use crate::ports::{GiftCardRenderer, GiftCodeRepository, RenderedCard};

/// Query for the card of a gift.
#[derive(Debug, Clone)]
pub struct GetGiftCardQuery {
    pub gift_id: GiftCodeId,
}

/// Renders the card of a funded gift: payer's first name, code and shares.
///
/// Unknown and unfunded gifts are both `NotFound`.
pub struct GetGiftCardHandler {
    gifts: Arc<dyn GiftCodeRepository>,
    renderer: Arc<dyn GiftCardRenderer>,
}

impl GetGiftCardHandler {
    pub fn new(gifts: Arc<dyn GiftCodeRepository>, renderer: Arc<dyn GiftCardRenderer>) -> Self {
        Self { gifts, renderer }
    }

    pub async fn handle(&self, query: GetGiftCardQuery) -> Result<RenderedCard, DomainError> {
        let card = self
            .gifts
            .find_card(&query.gift_id)
            .await?
            .ok_or_else(|| DomainError::new(ErrorCode::NotFound, "Gift not found."))?;
        self.renderer.render(&card)
    }
}
