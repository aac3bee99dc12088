//! HTTP transport for ShopGoodwill requests using wreq for TLS fingerprint emulation.

use crate::config::Config;
use crate::shopgoodwill::error::{Error, Result};
use crate::shopgoodwill::user_agent::UserAgentPool;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::debug;
use wreq::Client;
use wreq_util::Emulation;

/// Per-request overrides for POST calls.
#[derive(Debug, Clone, Default)]
pub struct PostOptions {
    /// Cookies sent as a single `Cookie` header
    pub cookies: Option<BTreeMap<String, String>>,
    /// Replaces the rotated browser user agent
    pub user_agent: Option<String>,
}

impl PostOptions {
    /// Options carrying the given cookies.
    pub fn with_cookies(cookies: BTreeMap<String, String>) -> Self {
        Self { cookies: Some(cookies), user_agent: None }
    }
}

/// Raw API response: status and body, whatever the status.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    /// True for any status below 400.
    pub fn is_ok(&self) -> bool {
        self.status < 400
    }

    /// Deserializes the body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_str(&self.body)?)
    }
}

/// Trait for ShopGoodwill HTTP access - enables mocking for tests.
///
/// Paths are relative: `post` resolves against the buyer API, the page
/// methods against the public site.
#[async_trait]
pub trait Transport: Send + Sync {
    /// POSTs a JSON body and returns the raw response.
    async fn post(&self, path: &str, body: &Value, options: &PostOptions) -> Result<ApiResponse>;

    /// GETs a server-rendered HTML page.
    async fn get_page(&self, path: &str) -> Result<String>;

    /// Fetches a page whose content is materialized by client-side scripts.
    ///
    /// The default implementation is a plain GET; plug in a script-capable
    /// renderer by overriding it.
    async fn render_page(&self, path: &str) -> Result<String> {
        self.get_page(path).await
    }
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for &T {
    async fn post(&self, path: &str, body: &Value, options: &PostOptions) -> Result<ApiResponse> {
        (**self).post(path, body, options).await
    }

    async fn get_page(&self, path: &str) -> Result<String> {
        (**self).get_page(path).await
    }

    async fn render_page(&self, path: &str) -> Result<String> {
        (**self).render_page(path).await
    }
}

/// ShopGoodwill HTTP client with browser user agents.
pub struct ShopGoodwillClient {
    client: Client,
    api_url: String,
    site_url: String,
    user_agent: Option<String>,
    agents: UserAgentPool,
}

impl ShopGoodwillClient {
    /// Creates a new client with the given configuration.
    pub fn new(config: &Config) -> Result<Self> {
        let mut builder = Client::builder()
            .cookie_store(true)
            .gzip(true)
            .brotli(true)
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10));

        if let Some(proxy_url) = &config.proxy {
            debug!("Configuring proxy: {}", proxy_url);
            builder = builder.proxy(wreq::Proxy::all(proxy_url)?);
        }

        Ok(Self {
            client: builder.build()?,
            api_url: config.api_url.trim_end_matches('/').to_string(),
            site_url: config.site_url.trim_end_matches('/').to_string(),
            user_agent: config.user_agent.clone(),
            agents: UserAgentPool::new(config.user_agent_source.clone()),
        })
    }

    /// Returns the API base URL.
    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Returns the site base URL.
    pub fn site_url(&self) -> &str {
        &self.site_url
    }

    async fn user_agent(&self, requested: Option<&str>) -> String {
        match requested.or(self.user_agent.as_deref()) {
            Some(ua) => ua.to_string(),
            None => self.agents.chrome(&self.client).await,
        }
    }
}

fn cookie_header(cookies: &BTreeMap<String, String>) -> String {
    cookies.iter().map(|(k, v)| format!("{}={}", k, v)).collect::<Vec<_>>().join("; ")
}

#[async_trait]
impl Transport for ShopGoodwillClient {
    async fn post(&self, path: &str, body: &Value, options: &PostOptions) -> Result<ApiResponse> {
        let url = format!("{}{}", self.api_url, path);
        let user_agent = self.user_agent(options.user_agent.as_deref()).await;

        debug!("POST {}", url);

        let mut request = self
            .client
            .post(&url)
            .emulation(Emulation::Chrome131)
            .header("User-Agent", user_agent)
            .header("Accept", "application/json, text/plain, */*")
            .header("Content-Type", "application/json");

        if let Some(cookies) = options.cookies.as_ref().filter(|c| !c.is_empty()) {
            request = request.header("Cookie", cookie_header(cookies));
        }

        let response = request.body(serde_json::to_string(body)?).send().await?;

        let status = response.status().as_u16();
        debug!("Response status: {}", status);

        Ok(ApiResponse { status, body: response.text().await? })
    }

    async fn get_page(&self, path: &str) -> Result<String> {
        let url = format!("{}{}", self.site_url, path);
        let user_agent = self.user_agent(None).await;

        debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .emulation(Emulation::Chrome131)
            .header("User-Agent", user_agent)
            .header("Accept", "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,*/*;q=0.8")
            .header("Accept-Language", "en-US,en;q=0.9")
            .header("Cache-Control", "no-cache")
            .header("Pragma", "no-cache")
            .header("Upgrade-Insecure-Requests", "1")
            .send()
            .await?;

        let status = response.status();
        debug!("Response status: {}", status);

        if !status.is_success() {
            return Err(Error::Status { status: status.as_u16(), url });
        }

        Ok(response.text().await?)
    }
}
