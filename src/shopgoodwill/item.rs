//! A single auction listing: detail retrieval, shipping and bidding.

use crate::shopgoodwill::client::{PostOptions, Transport};
use crate::shopgoodwill::error::{Error, Result};
use crate::shopgoodwill::models::ShippingCost;
use crate::shopgoodwill::parser;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tracing::{debug, info, warn};

/// Shipping calculator endpoint.
pub const CALCULATE_SHIPPING: &str = "/ItemDetail/CalculateShipping";

/// Bid endpoint.
pub const PLACE_BID: &str = "/ItemBid/PlaceBid";

/// Shipping price that marks the One Cent Shipping promotion.
pub const ONE_CENT_SHIPPING: f64 = 0.01;

/// Client IP placeholder the shipping calculator expects.
const PLACEHOLDER_CLIENT_IP: &str = "0.0.0.3";

/// One auction listing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Item {
    /// Listing id; kept as text so leading zeros survive
    pub id: Option<String>,
    /// Raw listing fields from search results and the listing page
    pub details: Map<String, Value>,
    /// Shipping cost, once computed
    pub shipping: ShippingCost,
}

impl Item {
    /// Creates an item with only an id.
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: Some(id.into()), ..Self::default() }
    }

    /// Creates an item from a search result entry, taking the id from `itemId`.
    pub fn from_listing(listing: Map<String, Value>) -> Self {
        let id = listing.get("itemId").and_then(id_text);
        Self { id, details: listing, shipping: ShippingCost::default() }
    }

    /// Listing title, if known.
    pub fn title(&self) -> Option<&str> {
        self.details.get("title").and_then(Value::as_str)
    }

    /// Current bid price, if known.
    pub fn current_price(&self) -> Option<f64> {
        self.details.get("currentPrice").and_then(Value::as_f64)
    }

    /// Number of bids, if known.
    pub fn num_bids(&self) -> Option<u64> {
        self.details.get("numBids").and_then(Value::as_u64)
    }

    /// Auction end time as reported by the site.
    pub fn end_time(&self) -> Option<&str> {
        self.details.get("endTime").and_then(Value::as_str)
    }

    /// Seller id, if known.
    pub fn seller_id(&self) -> Option<i64> {
        self.details.get("sellerId").and_then(Value::as_i64)
    }

    /// Path of the listing page.
    pub fn page_path(&self) -> Result<String> {
        Ok(format!("/item/{}", urlencoding::encode(self.require_id()?)))
    }

    fn require_id(&self) -> Result<&str> {
        self.id.as_deref().ok_or(Error::MissingItemId)
    }

    /// Merges listing fields into the details (new values win) and applies
    /// the One Cent Shipping rule.
    pub fn merge_details(&mut self, details: Map<String, Value>) {
        self.details.extend(details);

        let shipping_price = self.details.get("shippingPrice").and_then(Value::as_f64);
        if shipping_price != Some(ONE_CENT_SHIPPING) {
            return;
        }

        match self.details.get("handlingPrice").and_then(Value::as_f64) {
            Some(handling) => {
                debug!("One Cent Shipping with handling {:.2}", handling);
                self.shipping = ShippingCost::new(ONE_CENT_SHIPPING, handling);
            }
            None => warn!("One Cent Shipping listing without a handling price"),
        }
    }

    /// Fetches the listing page and merges its detail payload.
    pub async fn fetch_details<T: Transport + ?Sized>(&mut self, transport: &T) -> Result<()> {
        let path = self.page_path()?;
        info!("Fetching item details: {}", self.require_id()?);

        let html = transport.render_page(&path).await?;
        let state = parser::extract_state(&html)?;
        let details = parser::item_payload(&state).ok_or(Error::PayloadNotFound("item details"))?;

        self.merge_details(details.clone());
        Ok(())
    }

    /// Asks the shipping calculator for a US ZIP code and returns the total.
    pub async fn calculate_shipping<T: Transport + ?Sized>(
        &mut self,
        transport: &T,
        zip_code: &str,
    ) -> Result<f64> {
        let id = self.require_id()?;
        info!("Calculating shipping for item {} to {}", id, zip_code);

        let request = json!({
            "itemId": id_value(id),
            "country": "US",
            "province": null,
            "zipCode": zip_code,
            "quantity": 1,
            "clientIP": PLACEHOLDER_CLIENT_IP,
        });

        let response = transport.post(CALCULATE_SHIPPING, &request, &PostOptions::default()).await?;
        if !response.is_ok() {
            return Err(Error::Status { status: response.status, url: CALCULATE_SHIPPING.to_string() });
        }

        let (shipping, handling) = parser::parse_shipping_fragment(&response.body)?;
        self.shipping = ShippingCost::new(shipping, handling);

        Ok(shipping + handling)
    }
}

/// A bid on a listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BidRequest {
    pub item_id: String,
    pub seller_id: i64,
    pub amount: f64,
    pub quantity: u32,
}

impl BidRequest {
    /// Creates a bid for a single unit.
    pub fn new(item_id: impl Into<String>, seller_id: i64, amount: f64) -> Self {
        Self { item_id: item_id.into(), seller_id, amount, quantity: 1 }
    }

    /// Sets the quantity.
    pub fn quantity(mut self, quantity: u32) -> Self {
        self.quantity = quantity;
        self
    }
}

/// Places a bid; returns true iff the server answered below 400.
pub async fn place_bid<T: Transport + ?Sized>(
    transport: &T,
    bid: &BidRequest,
    options: &PostOptions,
) -> Result<bool> {
    info!("Bidding {:.2} on item {} (quantity {})", bid.amount, bid.item_id, bid.quantity);

    let request = json!({
        "itemId": id_value(&bid.item_id),
        "quantity": bid.quantity,
        "sellerId": bid.seller_id,
        "bidAmount": amount_text(bid.amount),
    });

    let response = transport.post(PLACE_BID, &request, options).await?;
    debug!("Bid response status: {}", response.status);

    Ok(response.is_ok())
}

/// Bid amounts always carry a decimal point: `15.0` goes out as `"15.0"`.
fn amount_text(amount: f64) -> String {
    if amount.fract() == 0.0 {
        format!("{:.1}", amount)
    } else {
        amount.to_string()
    }
}

fn id_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Ids go out as numbers unless that would lose leading zeros.
fn id_value(id: &str) -> Value {
    match id.parse::<u64>() {
        Ok(n) if n.to_string() == id => Value::from(n),
        _ => Value::String(id.to_string()),
    }
}
