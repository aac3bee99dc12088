//! Search facade: request construction, item listing, and directory browsing.

use crate::shopgoodwill::client::{PostOptions, Transport};
use crate::shopgoodwill::directory::DirectoryCache;
use crate::shopgoodwill::error::{Error, Result};
use crate::shopgoodwill::item::Item;
use crate::shopgoodwill::models::{Category, Directory, Seller};
use crate::shopgoodwill::request::{resolve_category, CategoryFields, Filters, SearchTemplate};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, trace};

/// Item listing search endpoint.
pub const ITEM_LISTING: &str = "/Search/ItemListing";

/// Category id meaning "all categories".
pub const ALL_CATEGORIES: i64 = 0;

/// Parameters of a search.
#[derive(Debug, Clone, Default)]
pub struct SearchOptions {
    /// Overrides of template fields
    pub filters: Filters,
    /// Category to search in, `ALL_CATEGORIES` for none
    pub category: i64,
    /// Fetch each listing page after the search
    pub include_details: bool,
    /// Pause between listing page fetches
    pub delay: Duration,
    /// Keep at most this many items
    pub max_results: Option<usize>,
}

impl SearchOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the search text.
    pub fn query(self, text: impl Into<String>) -> Self {
        self.filter("searchText", Value::String(text.into()))
    }

    /// Overrides one template field.
    pub fn filter(mut self, key: impl Into<String>, value: Value) -> Self {
        self.filters.insert(key.into(), value);
        self
    }

    pub fn category(mut self, category: i64) -> Self {
        self.category = category;
        self
    }

    pub fn include_details(mut self, enabled: bool) -> Self {
        self.include_details = enabled;
        self
    }

    pub fn delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn max_results(mut self, max: Option<usize>) -> Self {
        self.max_results = max;
        self
    }
}

/// Items returned by a search.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchResults {
    /// Total matches reported by the site; may exceed `items.len()`
    pub result_count: u64,
    pub items: Vec<Item>,
}

#[derive(Deserialize)]
struct ListingResponse {
    #[serde(rename = "searchResults")]
    search_results: ListingResults,
}

#[derive(Deserialize)]
struct ListingResults {
    #[serde(default)]
    items: Option<Vec<Map<String, Value>>>,
    #[serde(rename = "itemCount", default)]
    item_count: u64,
}

/// Entry point for searching and browsing ShopGoodwill.
pub struct Catalog<T: Transport> {
    transport: T,
    directory: DirectoryCache,
    template: SearchTemplate,
}

impl<T: Transport> Catalog<T> {
    /// Creates a catalog using the bundled search template.
    pub fn new(transport: T) -> Result<Self> {
        Ok(Self::with_template(transport, SearchTemplate::bundled()?))
    }

    /// Creates a catalog with a custom search template.
    pub fn with_template(transport: T, template: SearchTemplate) -> Self {
        Self { transport, directory: DirectoryCache::new(), template }
    }

    /// Shares an existing directory cache.
    pub fn with_directory(mut self, directory: DirectoryCache) -> Self {
        self.directory = directory;
        self
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn template(&self) -> &SearchTemplate {
        &self.template
    }

    /// Every recognized search filter with its default value.
    pub fn filter_template(&self) -> &Map<String, Value> {
        self.template.fields()
    }

    /// Builds the search request body.
    ///
    /// Filters are validated before anything is fetched; a category other than
    /// `ALL_CATEGORIES` loads the directory to resolve its level and parent.
    pub async fn build_request(&self, filters: &Filters, category: i64) -> Result<Map<String, Value>> {
        self.template.validate(filters)?;

        if category == ALL_CATEGORIES {
            return self.template.build(filters, None);
        }

        let directory = self.directory.get_or_load(&self.transport).await?;
        let fields = CategoryFields::from_match(resolve_category(&directory.categories, category))
            .ok_or(Error::InvalidCategory(category))?;

        self.template.build(filters, Some(&fields))
    }

    /// Runs a search and optionally fetches each listing page.
    pub async fn search(&self, options: &SearchOptions) -> Result<SearchResults> {
        let body = self.build_request(&options.filters, options.category).await?;

        info!("Searching ShopGoodwill");
        trace!("Search request: {:?}", body);

        let response = self.transport.post(ITEM_LISTING, &Value::Object(body), &PostOptions::default()).await?;
        if !response.is_ok() {
            return Err(Error::Status { status: response.status, url: ITEM_LISTING.to_string() });
        }

        let listing: ListingResponse = response.json()?;
        let limit = options.max_results.unwrap_or(usize::MAX);

        let mut items: Vec<Item> = listing
            .search_results
            .items
            .unwrap_or_default()
            .into_iter()
            .take(limit)
            .map(Item::from_listing)
            .collect();

        debug!(
            "Search returned {} items ({} total matches)",
            items.len(),
            listing.search_results.item_count
        );

        if options.include_details {
            self.fetch_details(&mut items, options.delay).await?;
        }

        Ok(SearchResults { result_count: listing.search_results.item_count, items })
    }

    /// Fetches listing details for each item in order, pausing `delay`
    /// between items but not after the last.
    pub async fn fetch_details(&self, items: &mut [Item], delay: Duration) -> Result<()> {
        let last = items.len().saturating_sub(1);

        for (idx, item) in items.iter_mut().enumerate() {
            item.fetch_details(&self.transport).await?;

            if idx < last && !delay.is_zero() {
                debug!("Sleeping {:?} before next item", delay);
                tokio::time::sleep(delay).await;
            }
        }

        Ok(())
    }

    /// The category/seller directory, fetched on first use.
    pub async fn directory(&self) -> Result<Arc<Directory>> {
        self.directory.get_or_load(&self.transport).await
    }

    /// Top-level categories with their children.
    pub async fn categories(&self) -> Result<Vec<Category>> {
        Ok(self.directory().await?.categories.clone())
    }

    /// Participating seller locations.
    pub async fn sellers(&self) -> Result<Vec<Seller>> {
        Ok(self.directory().await?.sellers.clone())
    }

    /// Fetches the directory again.
    pub async fn refresh_directory(&self) -> Result<Arc<Directory>> {
        self.directory.refresh(&self.transport).await
    }

    /// Forgets the cached directory.
    pub async fn clear_directory(&self) {
        self.directory.clear().await;
    }
}
