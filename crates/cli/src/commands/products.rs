//! `mercado products`: the paged product feed.

use mercado_storefront::api::MarketplaceClient;
use mercado_storefront::catalog::{Dataset, LocalSource};
use mercado_storefront::config::{DataSourceMode, StorefrontConfig};
use mercado_storefront::discovery::{
    DiscoveryController, LoadOutcome, MarketplaceSource, ProductSource,
};
use tracing::info;

use super::CliError;
use crate::output::{self, Format};

/// Load up to `pages` pages of the feed and print them.
pub async fn run(
    config: &StorefrontConfig,
    search: Option<&str>,
    category: Option<&str>,
    pages: u32,
    format: Format,
) -> Result<(), CliError> {
    match config.data_source {
        DataSourceMode::Api => {
            let client = MarketplaceClient::new(config.require_api()?)?;
            let controller =
                DiscoveryController::new(MarketplaceSource::new(client), config.page_size);
            feed(&controller, search, category, pages, format).await
        }
        DataSourceMode::Local => {
            let dataset = Dataset::load(&config.dataset_dir).await?;
            let source = LocalSource::new(dataset.products().to_vec());
            let controller = DiscoveryController::new(source, config.page_size);
            feed(&controller, search, category, pages, format).await
        }
    }
}

async fn feed<S: ProductSource>(
    controller: &DiscoveryController<S>,
    search: Option<&str>,
    category: Option<&str>,
    pages: u32,
    format: Format,
) -> Result<(), CliError> {
    match (search, category) {
        (Some(term), _) => controller.submit_search(term).await,
        (None, Some(category)) => controller.select_category(Some(category)).await,
        (None, None) => controller.start().await,
    };

    for _ in 1..pages {
        if let LoadOutcome::Skipped(reason) = controller.load_more().await {
            info!(?reason, "Stopped loading pages");
            break;
        }
        if controller.snapshot().error.is_some() {
            break;
        }
    }

    output::feed(&controller.snapshot(), format)
}
