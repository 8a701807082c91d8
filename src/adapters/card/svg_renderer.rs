//! SVG gift card renderer.
//!
//! The template is an SVG document with `{{first_name}}`, `{{code}}` and
//! `{{shares}}` placeholders. It is read and checked once when the renderer
//! is built, then shared read-only.

use std::path::Path;

use crate::domain::foundation::DomainError;
use crate::domain::gift::GiftCard;
use crate::ports::{GiftCardRenderer, RenderedCard};

/// Template shipped with the crate.
pub const DEFAULT_GIFT_CARD_TEMPLATE: &str = include_str!("../../../assets/gift-card.svg");

const PLACEHOLDER_FIRST_NAME: &str = "{{first_name}}";
const PLACEHOLDER_CODE: &str = "{{code}}";
const PLACEHOLDER_SHARES: &str = "{{shares}}";

pub const SVG_CONTENT_TYPE: &str = "image/svg+xml";

/// Renders gift cards by filling an SVG template.
#[derive(Debug, Clone)]
pub struct SvgGiftCardRenderer {
    template: String,
}

impl SvgGiftCardRenderer {
    /// Builds a renderer from template text.
    ///
    /// # Errors
    ///
    /// Fails if the template lacks the code placeholder, without which the
    /// card would be useless.
    pub fn from_template(template: impl Into<String>) -> Result<Self, DomainError> {
        let template = template.into();
        if !template.contains(PLACEHOLDER_CODE) {
            return Err(DomainError::internal(format!(
                "Gift card template has no {} placeholder",
                PLACEHOLDER_CODE
            )));
        }
        Ok(Self { template })
    }

    /// Uses the built-in template.
    pub fn builtin() -> Result<Self, DomainError> {
        Self::from_template(DEFAULT_GIFT_CARD_TEMPLATE)
    }

    /// Loads the template at `path`, or the built-in one when `path` is `None`.
    pub fn load(path: Option<&Path>) -> Result<Self, DomainError> {
        match path {
            None => Self::builtin(),
            Some(path) => {
                let template = std::fs::read_to_string(path).map_err(|e| {
                    DomainError::internal(format!(
                        "Failed to read gift card template {}: {}",
                        path.display(),
                        e
                    ))
                })?;
                tracing::info!(path = %path.display(), "Loaded gift card template");
                Self::from_template(template)
            }
        }
    }
}

/// Escapes text for use inside SVG character data.
fn xml_escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}

impl GiftCardRenderer for SvgGiftCardRenderer {
    fn render(&self, card: &GiftCard) -> Result<RenderedCard, DomainError> {
        let svg = self
            .template
            .replace(PLACEHOLDER_FIRST_NAME, &xml_escape(&card.giver_first_name))
            .replace(PLACEHOLDER_CODE, card.code.as_str())
            .replace(PLACEHOLDER_SHARES, &card.shares.to_string());

        Ok(RenderedCard {
            content_type: SVG_CONTENT_TYPE,
            body: svg.into_bytes(),
        })
    }
}
