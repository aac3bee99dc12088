//! CLI command implementations.

pub mod directory;
pub mod item;
pub mod search;

pub use directory::DirectoryCommand;
pub use item::{BidCommand, ItemCommand};
pub use search::SearchCommand;
