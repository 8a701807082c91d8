//! Gift card rendering adapters.

mod svg_renderer;

pub use svg_renderer::{SvgGiftCardRenderer, DEFAULT_GIFT_CARD_TEMPLATE, SVG_CONTENT_TYPE};
