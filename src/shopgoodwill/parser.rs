//! Parsing helpers for ShopGoodwill pages: the embedded application state,
//! shape-based payload lookup, and the shipping calculator fragment.

use crate::shopgoodwill::error::{Error, Result};
use crate::shopgoodwill::selectors::{self, shipping};
use scraper::Html;
use serde_json::{Map, Value};
use tracing::{debug, trace};

/// Reverses the entity escaping used in the `serverApp-state` script.
///
/// `&a;` is replaced last so that an escaped ampersand cannot form a new entity.
pub fn unescape_state(raw: &str) -> String {
    raw.replace("&q;", "\"")
        .replace("&s;", "'")
        .replace("&l;", "<")
        .replace("&g;", ">")
        .replace("&a;", "&")
}

/// Extracts and parses the embedded application state from a page.
pub fn extract_state(html: &str) -> Result<Value> {
    let document = Html::parse_document(html);

    let raw = document
        .select(&selectors::SERVER_STATE)
        .next()
        .map(|e| e.text().collect::<String>())
        .ok_or(Error::PayloadNotFound("serverApp-state"))?;

    trace!("Embedded state is {} bytes", raw.len());
    Ok(serde_json::from_str(&unescape_state(&raw))?)
}

/// Scans the top-level state entries in order and returns the first `body`
/// accepted by `predicate`.
pub fn find_payload<'a, F>(state: &'a Value, predicate: F) -> Option<&'a Value>
where
    F: Fn(&Value) -> bool,
{
    let entries = state.as_object()?;

    let found = entries.iter().find_map(|(key, entry)| {
        entry.get("body").filter(|body| predicate(body)).map(|body| (key, body))
    });

    if let Some((key, _)) = found {
        debug!("Matched embedded payload under key {}", key);
    }

    found.map(|(_, body)| body)
}

/// The category tree payload.
pub fn categories_payload(state: &Value) -> Option<&Value> {
    find_payload(state, |body| {
        body.pointer("/categoryListModel/categoryModel").is_some_and(Value::is_array)
    })
    .and_then(|body| body.pointer("/categoryListModel/categoryModel"))
}

/// The seller (location) list payload.
pub fn sellers_payload(state: &Value) -> Option<&Value> {
    find_payload(state, |body| {
        body.as_array()
            .and_then(|sellers| sellers.first())
            .is_some_and(|first| first.get("sellerId").is_some())
    })
}

/// The listing detail payload, recognized by its `buyerCountry` field.
pub fn item_payload(state: &Value) -> Option<&Map<String, Value>> {
    find_payload(state, |body| body.get("buyerCountry").is_some()).and_then(Value::as_object)
}

/// Parses a price from display text.
///
/// Every character other than ASCII digits and `.` is dropped, so currency
/// symbols and thousands commas disappear. Text without digits is `0.0`. When
/// several dots remain, the last one is the decimal point.
pub fn parse_price(text: &str) -> f64 {
    let kept: String = text.chars().filter(|c| c.is_ascii_digit() || *c == '.').collect();

    if !kept.chars().any(|c| c.is_ascii_digit()) {
        return 0.0;
    }

    let normalized = match kept.rfind('.') {
        Some(idx) => {
            let (whole, fraction) = kept.split_at(idx);
            format!("{}{}", whole.replace('.', ""), fraction)
        }
        None => kept,
    };

    normalized.parse().unwrap_or(0.0)
}

/// Reads `(shipping, handling)` from the shipping calculator fragment.
pub fn parse_shipping_fragment(html: &str) -> Result<(f64, f64)> {
    let document = Html::parse_fragment(html);

    let shipping_text = document
        .select(&shipping::SHIPPING)
        .next()
        .map(|e| e.text().collect::<String>())
        .ok_or_else(|| Error::parse("shipping response", "missing #shipping-span"))?;

    let paragraphs: Vec<_> = document.select(&shipping::PARAGRAPH).collect();
    let handling_text = paragraphs
        .len()
        .checked_sub(2)
        .map(|idx| paragraphs[idx].text().collect::<String>())
        .ok_or_else(|| {
            Error::parse(
                "shipping response",
                format!("expected at least 2 paragraphs, found {}", paragraphs.len()),
            )
        })?;

    Ok((parse_price(&shipping_text), parse_price(&handling_text)))
}
