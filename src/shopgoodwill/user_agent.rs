//! Browser user agents for outgoing requests.
//!
//! Agents rotate through a Chrome list: the bundled one by default, or one
//! loaded once from a configured source (plain text, one agent per line). The
//! single fallback agent is used only when that source cannot be reached.

use rand::seq::IndexedRandom;
use tokio::sync::OnceCell;
use tracing::{debug, warn};
use wreq::Client;

const FALLBACK_UA: &str = include_str!("../../resources/fallback_ua.txt");
const BUNDLED_AGENTS: &str = include_str!("../../resources/user_agents.txt");

/// Returns the bundled fallback user agent.
pub fn fallback() -> &'static str {
    FALLBACK_UA.lines().next().map(str::trim).unwrap_or_default()
}

/// Chrome agents shipped with the crate.
pub fn bundled() -> Vec<String> {
    parse_agent_list(BUNDLED_AGENTS)
}

/// Keeps the Chrome entries of a newline-separated user agent list.
pub fn parse_agent_list(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| line.contains("Chrome/") && !line.contains("Edg/") && !line.contains("OPR/"))
        .map(String::from)
        .collect()
}

/// Lazily loaded pool of Chrome user agents.
pub struct UserAgentPool {
    source: Option<String>,
    agents: OnceCell<Vec<String>>,
}

impl UserAgentPool {
    /// Creates a pool backed by the given rotation source URL, or by the
    /// bundled list when `source` is `None`.
    pub fn new(source: Option<String>) -> Self {
        Self { source, agents: OnceCell::new() }
    }

    /// Picks a random Chrome user agent, loading the source on first use.
    pub async fn chrome(&self, client: &Client) -> String {
        let agents = self.agents.get_or_init(|| self.load(client)).await;

        match agents.choose(&mut rand::rng()) {
            Some(agent) => agent.clone(),
            None => fallback().to_string(),
        }
    }

    async fn load(&self, client: &Client) -> Vec<String> {
        let Some(url) = &self.source else {
            return bundled();
        };

        debug!("Loading user agents from {}", url);

        let body = match client.get(url).send().await {
            Ok(response) if response.status().is_success() => response.text().await,
            Ok(response) => {
                warn!("User agent source returned {}, using fallback", response.status());
                return Vec::new();
            }
            Err(e) => {
                warn!("User agent source unavailable ({}), using fallback", e);
                return Vec::new();
            }
        };

        match body {
            Ok(text) => {
                let agents = parse_agent_list(&text);
                if agents.is_empty() {
                    warn!("User agent source had no Chrome agents, using fallback");
                }
                agents
            }
            Err(e) => {
                warn!("Failed to read user agent source ({}), using fallback", e);
                Vec::new()
            }
        }
    }
}
