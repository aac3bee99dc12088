//! shopgoodwill - Search, inspect and bid on ShopGoodwill.com auctions
//!
//! Talks to the buyer API directly, with TLS fingerprint emulation for page fetches.

use anyhow::Result;
use clap::{Parser, Subcommand};
use shopgoodwill::commands::{BidCommand, DirectoryCommand, ItemCommand, SearchCommand};
use shopgoodwill::config::{Config, OutputFormat};
use shopgoodwill::shopgoodwill::BidRequest;
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "shopgoodwill",
    version,
    about = "Search, inspect and bid on ShopGoodwill.com auctions",
    long_about = "A command-line client for the ShopGoodwill.com buyer API: search listings, fetch item details, estimate shipping and place bids."
)]
struct Cli {
    /// Proxy URL (e.g., socks5://host:port)
    #[arg(long, global = true, env = "SGW_PROXY")]
    proxy: Option<String>,

    /// Delay between item detail requests in seconds
    #[arg(long, global = true, env = "SGW_DELAY")]
    delay: Option<u64>,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true)]
    format: Option<OutputFormat>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search auction listings
    #[command(alias = "s")]
    Search {
        /// Search text
        query: Option<String>,

        /// Override a search filter (repeatable), e.g. --filter lowPrice=10
        #[arg(long = "filter", value_name = "KEY=VALUE")]
        filters: Vec<String>,

        /// Category id to search in (see `categories --children`)
        #[arg(long, default_value = "0")]
        category: i64,

        /// Fetch each listing page for full details
        #[arg(long)]
        details: bool,

        /// Maximum number of results
        #[arg(short, long)]
        max: Option<usize>,

        /// Estimate shipping to this US ZIP code
        #[arg(long, env = "SGW_ZIP")]
        zip: Option<String>,
    },

    /// Show one listing
    #[command(alias = "i")]
    Item {
        /// Item id
        id: String,

        /// Estimate shipping to this US ZIP code
        #[arg(long, env = "SGW_ZIP")]
        zip: Option<String>,
    },

    /// Estimate shipping for a listing
    Shipping {
        /// Item id
        id: String,

        /// US ZIP code
        zip: String,
    },

    /// Place a bid (needs session cookies in the config file)
    Bid {
        /// Item id
        item_id: String,

        /// Seller id of the listing
        seller_id: i64,

        /// Bid amount in dollars
        amount: f64,

        /// Quantity to bid on
        #[arg(short, long, default_value = "1")]
        quantity: u32,
    },

    /// List categories
    Categories {
        /// Include subcategories
        #[arg(long)]
        children: bool,
    },

    /// List seller locations
    Locations,

    /// List search filters and their default values
    Filters,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new(Level::DEBUG.to_string())
    } else {
        EnvFilter::from_default_env().add_directive(Level::WARN.into())
    };

    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();

    // Load config with layered overrides
    let mut config = Config::load(cli.config.as_deref())?.with_env();

    // Apply CLI overrides
    if let Some(format) = cli.format {
        config.format = format;
    }
    if let Some(delay) = cli.delay {
        config.delay_secs = delay;
    }
    if let Some(proxy) = cli.proxy {
        config.proxy = Some(proxy);
    }

    let output = match cli.command {
        Commands::Search { query, filters, category, details, max, zip } => {
            if max.is_some() {
                config.max_results = max;
            }
            if zip.is_some() {
                config.zip_code = zip;
            }

            SearchCommand::new(config)
                .query(query)
                .filters(filters)
                .category(category)
                .details(details)
                .execute()
                .await?
        }

        Commands::Item { id, zip } => {
            if zip.is_some() {
                config.zip_code = zip;
            }
            ItemCommand::new(config).execute(&id).await?
        }

        Commands::Shipping { id, zip } => ItemCommand::new(config).shipping(&id, &zip).await?,

        Commands::Bid { item_id, seller_id, amount, quantity } => {
            let bid = BidRequest::new(item_id, seller_id, amount).quantity(quantity);
            BidCommand::new(config).execute(&bid).await?
        }

        Commands::Categories { children } => DirectoryCommand::new(config).categories(children).await?,

        Commands::Locations => DirectoryCommand::new(config).locations().await?,

        Commands::Filters => DirectoryCommand::new(config).filters()?,
    };

    println!("{}", output);

    Ok(())
}
