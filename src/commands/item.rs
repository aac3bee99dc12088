//! Item lookup, shipping estimate and bidding commands.

use crate::config::Config;
use crate::format::Formatter;
use crate::shopgoodwill::{place_bid, BidRequest, Item, PostOptions, ShopGoodwillClient, Transport};
use anyhow::{Context, Result};
use tracing::{info, warn};

/// Executes item lookups and shipping estimates.
pub struct ItemCommand {
    config: Config,
}

impl ItemCommand {
    /// Creates a new item command.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Fetches an item's listing page and returns formatted output.
    pub async fn execute(&self, id: &str) -> Result<String> {
        let client = ShopGoodwillClient::new(&self.config).context("Failed to create HTTP client")?;

        self.execute_with_client(&client, id).await
    }

    /// Fetches an item with a provided client (for testing).
    ///
    /// With a configured ZIP code the shipping estimate is added; a failed
    /// estimate is logged and the item is still shown.
    pub async fn execute_with_client(&self, client: &impl Transport, id: &str) -> Result<String> {
        let id = validate_id(id)?;
        info!("Looking up item: {}", id);

        let mut item = Item::new(id);
        item.fetch_details(client).await?;

        if let Some(zip) = &self.config.zip_code {
            if let Err(e) = item.calculate_shipping(client, zip).await {
                warn!("Shipping estimate failed: {}", e);
            }
        }

        Ok(self.formatter().format_item(&item))
    }

    /// Estimates shipping for an item to a US ZIP code.
    pub async fn shipping(&self, id: &str, zip: &str) -> Result<String> {
        let client = ShopGoodwillClient::new(&self.config).context("Failed to create HTTP client")?;

        self.shipping_with_client(&client, id, zip).await
    }

    /// Estimates shipping with a provided client (for testing).
    pub async fn shipping_with_client(&self, client: &impl Transport, id: &str, zip: &str) -> Result<String> {
        let id = validate_id(id)?;
        let zip = zip.trim();
        if zip.is_empty() {
            anyhow::bail!("ZIP code must not be empty");
        }

        let mut item = Item::new(id);
        item.calculate_shipping(client, zip)
            .await
            .with_context(|| format!("Failed to estimate shipping for item {}", id))?;

        Ok(self.formatter().format_item(&item))
    }

    fn formatter(&self) -> Formatter {
        Formatter::new(self.config.format).with_site_url(&self.config.site_url)
    }
}

/// Places bids using the session cookies from the configuration.
pub struct BidCommand {
    config: Config,
}

impl BidCommand {
    /// Creates a new bid command.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub async fn execute(&self, bid: &BidRequest) -> Result<String> {
        let client = ShopGoodwillClient::new(&self.config).context("Failed to create HTTP client")?;

        self.execute_with_client(&client, bid).await
    }

    /// Places a bid with a provided client (for testing).
    pub async fn execute_with_client(&self, client: &impl Transport, bid: &BidRequest) -> Result<String> {
        validate_id(&bid.item_id)?;
        if !(bid.amount.is_finite() && bid.amount > 0.0) {
            anyhow::bail!("Bid amount must be positive, got {}", bid.amount);
        }
        if bid.quantity == 0 {
            anyhow::bail!("Bid quantity must be at least 1");
        }

        if self.config.cookies.is_empty() {
            warn!("No session cookies configured; the bid will likely be rejected");
        }

        let options = PostOptions::with_cookies(self.config.cookies.clone());
        let accepted = place_bid(client, bid, &options).await?;

        if accepted {
            Ok(format!("Bid of ${:.2} placed on item {}", bid.amount, bid.item_id))
        } else {
            anyhow::bail!("Bid on item {} was rejected", bid.item_id)
        }
    }
}

fn validate_id(id: &str) -> Result<&str> {
    let id = id.trim();
    if id.is_empty() || !id.chars().all(|c| c.is_ascii_digit()) {
        anyhow::bail!("Invalid item id: '{}'. Item ids are numeric.", id);
    }
    Ok(id)
}
