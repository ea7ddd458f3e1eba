//! API directory commands: `communities`, `stores`, and `store`.

use mercado_core::{CommunityId, StoreId};
use mercado_storefront::api::MarketplaceClient;
use mercado_storefront::config::StorefrontConfig;
use mercado_storefront::pages::{StoreProductsPage, load_communities, load_stores};
use mercado_storefront::routing::RouteParams;

use super::CliError;
use crate::output::{self, Format};

fn client(config: &StorefrontConfig) -> Result<MarketplaceClient, CliError> {
    Ok(MarketplaceClient::new(config.require_api()?)?)
}

pub async fn communities(config: &StorefrontConfig, format: Format) -> Result<(), CliError> {
    let page = load_communities(&client(config)?).await.into_result()?;
    output::communities(&page, format)
}

pub async fn stores(
    config: &StorefrontConfig,
    community: Option<&str>,
    format: Format,
) -> Result<(), CliError> {
    let route = RouteParams {
        community: community.map(CommunityId::new),
        store: None,
    };
    let page = load_stores(&client(config)?, &route).await.into_result()?;
    output::stores(&page, format)
}

pub async fn store(
    config: &StorefrontConfig,
    id: &str,
    search: Option<&str>,
    page: u32,
    format: Format,
) -> Result<(), CliError> {
    let mut view =
        StoreProductsPage::open(client(config)?, StoreId::new(id), config.store_page_size).await;

    if let Some(term) = search {
        view.search(term).await;
    }
    if page > 1 && !view.go_to_page(page).await {
        tracing::warn!(page, total = view.results().total_pages, "Page out of range");
    }

    output::store_products(&view, format)
}
