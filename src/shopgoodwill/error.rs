//! Error type shared by the ShopGoodwill client, item and catalog modules.

use thiserror::Error;

/// Result alias for ShopGoodwill operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while talking to ShopGoodwill.
#[derive(Debug, Error)]
pub enum Error {
    /// A search filter key that the request template does not know.
    #[error("Invalid ShopGoodwill filter: {0}")]
    InvalidFilter(String),

    /// A filter value that cannot be converted to the template's type.
    #[error("Invalid value for ShopGoodwill filter {key}: {reason}")]
    InvalidFilterValue { key: String, reason: String },

    /// A category id that is neither a top-level category nor a subcategory.
    #[error("Invalid ShopGoodwill category: {0}")]
    InvalidCategory(i64),

    /// An item operation was attempted without an item id.
    #[error("ShopGoodwill item has no item id set")]
    MissingItemId,

    /// The category/seller directory could not be fetched or parsed.
    #[error(
        "Failed to retrieve and parse ShopGoodwill sellers or categories. \
         Check your internet connection. ({0})"
    )]
    DirectoryUnavailable(#[source] Box<Error>),

    /// No embedded-state payload had the expected shape.
    #[error("No embedded state payload found for {0}")]
    PayloadNotFound(&'static str),

    /// The server answered with a status the caller cannot use.
    #[error("Request to {url} failed with status: {status}")]
    Status { status: u16, url: String },

    /// A response did not contain what we expected.
    #[error("Failed to parse {what}: {reason}")]
    Parse { what: &'static str, reason: String },

    #[error("HTTP request failed: {0}")]
    Http(#[from] wreq::Error),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn parse(what: &'static str, reason: impl Into<String>) -> Self {
        Self::Parse { what, reason: reason.into() }
    }
}
