//! Search command implementation.

use crate::config::Config;
use crate::format::Formatter;
use crate::shopgoodwill::catalog::ALL_CATEGORIES;
use crate::shopgoodwill::{Catalog, SearchOptions, SearchTemplate, ShopGoodwillClient, Transport};
use anyhow::{Context, Result};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Executes an item search.
pub struct SearchCommand {
    config: Config,
    query: Option<String>,
    filters: Vec<String>,
    category: i64,
    details: bool,
}

impl SearchCommand {
    /// Creates a new search command.
    pub fn new(config: Config) -> Self {
        Self { config, query: None, filters: Vec::new(), category: ALL_CATEGORIES, details: false }
    }

    /// Sets the search text.
    pub fn query(mut self, query: Option<String>) -> Self {
        self.query = query;
        self
    }

    /// Adds raw `key=value` filter overrides.
    pub fn filters(mut self, filters: Vec<String>) -> Self {
        self.filters = filters;
        self
    }

    pub fn category(mut self, category: i64) -> Self {
        self.category = category;
        self
    }

    /// Fetches each listing page after the search.
    pub fn details(mut self, details: bool) -> Self {
        self.details = details;
        self
    }

    /// Executes the search and returns formatted output.
    pub async fn execute(&self) -> Result<String> {
        let client = ShopGoodwillClient::new(&self.config).context("Failed to create HTTP client")?;

        self.execute_with_client(&client).await
    }

    /// Executes the search with a provided client (for testing).
    pub async fn execute_with_client(&self, client: &impl Transport) -> Result<String> {
        let catalog = Catalog::new(client)?;
        let options = self.options(catalog.template())?;

        match &self.query {
            Some(query) => info!("Searching for: {}", query),
            None => info!("Searching without a query"),
        }

        let mut results = catalog.search(&options).await?;
        info!("Found {} items ({} total matches)", results.items.len(), results.result_count);

        if let Some(zip) = &self.config.zip_code {
            for item in results.items.iter_mut() {
                match item.calculate_shipping(client, zip).await {
                    Ok(total) => debug!("Shipping for {:?}: {:.2}", item.id, total),
                    Err(e) => warn!("Shipping estimate failed for {:?}: {}", item.id, e),
                }
            }
        }

        let formatter = Formatter::new(self.config.format).with_site_url(&self.config.site_url);
        Ok(formatter.format_results(&results))
    }

    fn options(&self, template: &SearchTemplate) -> Result<SearchOptions> {
        let mut options = SearchOptions::new()
            .category(self.category)
            .include_details(self.details)
            .delay(Duration::from_secs(self.config.delay_secs))
            .max_results(self.config.max_results);

        for raw in &self.filters {
            let (key, value) = parse_filter_arg(raw)?;
            options = options.filter(key, template.coerce(key, value)?);
        }

        // Explicit query wins over a searchText filter
        if let Some(query) = &self.query {
            options = options.query(query.clone());
        }

        Ok(options)
    }
}

/// Splits a `key=value` filter argument.
pub fn parse_filter_arg(raw: &str) -> Result<(&str, &str)> {
    let (key, value) = raw
        .split_once('=')
        .with_context(|| format!("Invalid filter '{}': expected key=value", raw))?;

    let key = key.trim();
    if key.is_empty() {
        anyhow::bail!("Invalid filter '{}': empty key", raw);
    }

    Ok((key, value.trim()))
}
