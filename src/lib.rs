//! shopgoodwill - Search, inspect and bid on ShopGoodwill.com auctions
//!
//! A thin client over the ShopGoodwill buyer API and server-rendered pages,
//! with TLS fingerprint emulation for page fetches.

pub mod commands;
pub mod config;
pub mod format;
pub mod shopgoodwill;

pub use config::Config;
pub use shopgoodwill::{Catalog, Category, Item, SearchOptions, Seller, ShippingCost};
