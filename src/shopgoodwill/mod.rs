//! ShopGoodwill-specific modules for HTTP transport, parsing, and data models.

pub mod catalog;
pub mod client;
pub mod directory;
pub mod error;
pub mod item;
pub mod models;
pub mod parser;
pub mod request;
pub mod selectors;
pub mod user_agent;

#[cfg(test)]
pub(crate) mod testing;

pub use catalog::{Catalog, SearchOptions, SearchResults};
pub use client::{ApiResponse, PostOptions, ShopGoodwillClient, Transport};
pub use directory::DirectoryCache;
pub use error::{Error, Result};
pub use item::{place_bid, BidRequest, Item};
pub use models::{Category, Directory, Seller, ShippingCost};
pub use request::{CategoryMatch, Filters, SearchTemplate};
