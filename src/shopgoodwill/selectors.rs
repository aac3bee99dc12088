//! CSS selectors for ShopGoodwill HTML parsing.
//!
//! Update this file when ShopGoodwill changes their markup.

use scraper::Selector;
use std::sync::LazyLock;

/// Script element carrying the server-rendered application state.
pub static SERVER_STATE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("#serverApp-state").unwrap());

/// Selectors for the shipping calculator fragment.
pub mod shipping {
    use super::*;

    /// Shipping amount.
    pub static SHIPPING: LazyLock<Selector> =
        LazyLock::new(|| Selector::parse("#shipping-span").unwrap());

    /// Summary paragraphs; the second to last holds the handling fee.
    pub static PARAGRAPH: LazyLock<Selector> = LazyLock::new(|| Selector::parse("p").unwrap());
}
