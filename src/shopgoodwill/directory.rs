//! Category and seller directory, scraped from a category page and cached.

use crate::shopgoodwill::client::Transport;
use crate::shopgoodwill::error::{Error, Result};
use crate::shopgoodwill::models::{Category, Directory, Seller};
use crate::shopgoodwill::parser;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info};

/// Page whose embedded state carries the full category tree and seller list.
pub const CATEGORY_PAGE: &str = "/categories/antiques";

/// Parses the directory out of a category page.
pub fn parse_directory(html: &str) -> Result<Directory> {
    let state = parser::extract_state(html)?;

    let categories = parser::categories_payload(&state).ok_or(Error::PayloadNotFound("categories"))?;
    let sellers = parser::sellers_payload(&state).ok_or(Error::PayloadNotFound("sellers"))?;

    let categories: Vec<Category> = serde_json::from_value(categories.clone())?;
    let sellers: Vec<Seller> = serde_json::from_value(sellers.clone())?;

    debug!("Parsed {} categories and {} sellers", categories.len(), sellers.len());
    Ok(Directory { categories, sellers })
}

/// Fetches and parses the directory.
pub async fn fetch_directory<T: Transport + ?Sized>(transport: &T) -> Result<Directory> {
    info!("Fetching ShopGoodwill categories and sellers");
    let html = transport.get_page(CATEGORY_PAGE).await?;
    parse_directory(&html)
}

/// Directory cache, filled on first use and kept until refreshed or cleared.
///
/// The lock is held across the fetch, so concurrent callers trigger at most
/// one request.
#[derive(Default)]
pub struct DirectoryCache {
    slot: Mutex<Option<Arc<Directory>>>,
}

impl DirectoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a cache that is already filled.
    pub fn with_directory(directory: Directory) -> Self {
        Self { slot: Mutex::new(Some(Arc::new(directory))) }
    }

    /// Returns the cached directory, fetching it through `transport` if empty.
    pub async fn get_or_load<T: Transport + ?Sized>(&self, transport: &T) -> Result<Arc<Directory>> {
        let mut slot = self.slot.lock().await;

        if let Some(directory) = slot.as_ref() {
            return Ok(Arc::clone(directory));
        }

        let directory = Arc::new(load(transport).await?);
        *slot = Some(Arc::clone(&directory));
        Ok(directory)
    }

    /// Fetches the directory again and replaces the cached copy.
    ///
    /// On failure the previous copy is kept.
    pub async fn refresh<T: Transport + ?Sized>(&self, transport: &T) -> Result<Arc<Directory>> {
        let mut slot = self.slot.lock().await;
        let directory = Arc::new(load(transport).await?);
        *slot = Some(Arc::clone(&directory));
        Ok(directory)
    }

    /// Drops the cached directory.
    pub async fn clear(&self) {
        *self.slot.lock().await = None;
    }

    /// Returns true if a directory is cached.
    pub async fn is_loaded(&self) -> bool {
        self.slot.lock().await.is_some()
    }
}

async fn load<T: Transport + ?Sized>(transport: &T) -> Result<Directory> {
    fetch_directory(transport).await.map_err(|e| Error::DirectoryUnavailable(Box::new(e)))
}
