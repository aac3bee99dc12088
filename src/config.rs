//! Configuration management with TOML, environment variables, and CLI overrides.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;

/// Default base URL of the buyer API.
pub const DEFAULT_API_URL: &str = "https://buyerapi.shopgoodwill.com/api";

/// Default base URL of the public site (category and item pages).
pub const DEFAULT_SITE_URL: &str = "https://shopgoodwill.com";

/// Application configuration with layered loading.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Buyer API base URL
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Public site base URL
    #[serde(default = "default_site_url")]
    pub site_url: String,

    /// Proxy URL (e.g., socks5://host:port)
    #[serde(default)]
    pub proxy: Option<String>,

    /// Delay in seconds between item detail requests
    #[serde(default)]
    pub delay_secs: u64,

    /// Maximum number of items to keep from a search (unbounded if unset)
    #[serde(default)]
    pub max_results: Option<usize>,

    /// Output format
    #[serde(default)]
    pub format: OutputFormat,

    /// Fixed User-Agent, overrides rotation
    #[serde(default)]
    pub user_agent: Option<String>,

    /// URL of a newline-separated user agent list to rotate through (bundled list if unset)
    #[serde(default)]
    pub user_agent_source: Option<String>,

    /// ZIP code used for shipping estimates
    #[serde(default)]
    pub zip_code: Option<String>,

    /// Session cookies sent with bids
    #[serde(default)]
    pub cookies: BTreeMap<String, String>,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_site_url() -> String {
    DEFAULT_SITE_URL.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            site_url: default_site_url(),
            proxy: None,
            delay_secs: 0,
            max_results: None,
            format: OutputFormat::Table,
            user_agent: None,
            user_agent_source: None,
            zip_code: None,
            cookies: BTreeMap::new(),
        }
    }
}

impl Config {
    /// Creates a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading config from: {}", path.display());

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Loads configuration with fallback to default locations.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit_path {
            return Self::from_file(path);
        }

        let local_config = Path::new("config.toml");
        if local_config.exists() {
            debug!("Found config.toml in current directory");
            return Self::from_file(local_config);
        }

        if let Some(config_dir) = dirs::config_dir() {
            let xdg_config = config_dir.join("shopgoodwill").join("config.toml");
            if xdg_config.exists() {
                debug!("Found config in XDG config directory");
                return Self::from_file(xdg_config);
            }
        }

        debug!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Applies environment variable overrides.
    pub fn with_env(mut self) -> Self {
        if let Ok(proxy) = std::env::var("SGW_PROXY") {
            self.proxy = Some(proxy);
        }

        if let Ok(delay) = std::env::var("SGW_DELAY") {
            if let Ok(d) = delay.parse() {
                self.delay_secs = d;
            }
        }

        if let Ok(zip) = std::env::var("SGW_ZIP") {
            self.zip_code = Some(zip);
        }

        if let Ok(ua) = std::env::var("SGW_USER_AGENT") {
            self.user_agent = Some(ua);
        }

        self
    }
}

/// Output format for results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Markdown,
    Csv,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            "markdown" | "md" => Ok(OutputFormat::Markdown),
            "csv" => Ok(OutputFormat::Csv),
            _ => Err(format!("Unknown format: {}. Use: table, json, markdown, csv", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Table => write!(f, "table"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Markdown => write!(f, "markdown"),
            OutputFormat::Csv => write!(f, "csv"),
        }
    }
}
