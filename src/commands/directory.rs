//! Category, seller location and filter listing commands.

use crate::config::Config;
use crate::format::Formatter;
use crate::shopgoodwill::{Catalog, SearchTemplate, ShopGoodwillClient, Transport};
use anyhow::{Context, Result};
use tracing::info;

/// Lists what can be searched: categories, seller locations and filters.
pub struct DirectoryCommand {
    config: Config,
}

impl DirectoryCommand {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Lists top-level categories, optionally with their subcategories.
    pub async fn categories(&self, show_children: bool) -> Result<String> {
        let client = ShopGoodwillClient::new(&self.config).context("Failed to create HTTP client")?;

        self.categories_with_client(&client, show_children).await
    }

    /// Lists categories with a provided client (for testing).
    pub async fn categories_with_client(&self, client: &impl Transport, show_children: bool) -> Result<String> {
        let catalog = Catalog::new(client)?;
        let categories = catalog.categories().await?;
        info!("Found {} top-level categories", categories.len());

        Ok(self.formatter().format_categories(&categories, show_children))
    }

    /// Lists participating seller locations.
    pub async fn locations(&self) -> Result<String> {
        let client = ShopGoodwillClient::new(&self.config).context("Failed to create HTTP client")?;

        self.locations_with_client(&client).await
    }

    /// Lists seller locations with a provided client (for testing).
    pub async fn locations_with_client(&self, client: &impl Transport) -> Result<String> {
        let catalog = Catalog::new(client)?;
        let sellers = catalog.sellers().await?;
        info!("Found {} seller locations", sellers.len());

        Ok(self.formatter().format_sellers(&sellers))
    }

    /// Lists every search filter with its default value. Needs no network.
    pub fn filters(&self) -> Result<String> {
        let template = SearchTemplate::bundled()?;
        Ok(self.formatter().format_filters(template.fields()))
    }

    fn formatter(&self) -> Formatter {
        Formatter::new(self.config.format).with_site_url(&self.config.site_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OutputFormat;
    use crate::shopgoodwill::directory::CATEGORY_PAGE;
    use crate::shopgoodwill::testing::{directory_state, state_page, MockTransport};
    use crate::shopgoodwill::Error;

    fn make_transport() -> MockTransport {
        MockTransport::new().with_page(CATEGORY_PAGE, state_page(&directory_state()))
    }

    #[tokio::test]
    async fn test_categories() {
        let cmd = DirectoryCommand::new(Config::default());
        let output = cmd.categories_with_client(&make_transport(), false).await.unwrap();
        assert_eq!(output, "1 Antiques\n12 Clothing");
    }

    #[tokio::test]
    async fn test_categories_with_children() {
        let cmd = DirectoryCommand::new(Config::default());
        let output = cmd.categories_with_client(&make_transport(), true).await.unwrap();
        assert_eq!(output, "1 Antiques\n* 5 Furniture\n12 Clothing\n* 34 Baby\n* 35 Men");
    }

    #[tokio::test]
    async fn test_locations() {
        let cmd = DirectoryCommand::new(Config::default());
        let output = cmd.locations_with_client(&make_transport()).await.unwrap();
        assert_eq!(output, "6 Portland, OR\n22 Tacoma, WA");
    }

    #[tokio::test]
    async fn test_locations_unavailable() {
        let cmd = DirectoryCommand::new(Config::default());
        let err = cmd.locations_with_client(&MockTransport::new()).await.unwrap_err();
        assert!(matches!(err.downcast_ref::<Error>(), Some(Error::DirectoryUnavailable(_))));
    }

    #[test]
    fn test_filters() {
        let output = DirectoryCommand::new(Config::default()).filters().unwrap();
        assert!(output.contains("searchText = \"\""));
        assert!(output.contains("savedSearchId = 0"));
        assert!(output.contains("highPrice = \"999999\""));
    }

    #[test]
    fn test_filters_json() {
        let config = Config { format: OutputFormat::Json, ..Config::default() };
        let output = DirectoryCommand::new(config).filters().unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed.as_object().unwrap().len(), 34);
    }
}
