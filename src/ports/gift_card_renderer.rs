//! Gift card rendering port.

use crate::domain::foundation::DomainError;
use crate::domain::gift::GiftCard;

/// A rendered card ready to be served.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedCard {
    pub content_type: &'static str,
    pub body: Vec<u8>,
}

/// Turns gift card contents into a printable image.
///
/// Rendering assets are loaded when the renderer is built, so a missing asset
/// fails at startup instead of on the first request.
pub trait GiftCardRenderer: Send + Sync {
    fn render(&self, card: &GiftCard) -> Result<RenderedCard, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gift_card_renderer_is_object_safe() {
        fn _accepts_dyn(_renderer: &dyn GiftCardRenderer) {}
    }
}
