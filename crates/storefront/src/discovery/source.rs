//! Where discovery pages come from.

use async_trait::async_trait;
use mercado_core::{ResultPage, StoreId};
use tracing::instrument;

use super::query::Query;
use crate::api::MarketplaceClient;
use crate::error::BrowseError;

/// A paged product backend.
///
/// Implementations map "nothing matched" to [`BrowseError::NotFound`] so the
/// discovery state can stop paginating instead of retrying.
#[async_trait]
pub trait ProductSource: Send + Sync {
    /// Fetch the page `query` points at.
    async fn fetch_page(&self, query: &Query) -> Result<ResultPage, BrowseError>;
}

/// Which product listing a [`MarketplaceSource`] reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProductScope {
    /// Every published product.
    Marketplace,
    /// One store's products.
    Store(StoreId),
}

/// [`ProductSource`] backed by the marketplace REST API.
#[derive(Debug, Clone)]
pub struct MarketplaceSource {
    client: MarketplaceClient,
    scope: ProductScope,
}

impl MarketplaceSource {
    #[must_use]
    pub const fn new(client: MarketplaceClient) -> Self {
        Self {
            client,
            scope: ProductScope::Marketplace,
        }
    }

    /// Restrict to one store's products.
    #[must_use]
    pub fn for_store(client: MarketplaceClient, store: StoreId) -> Self {
        Self {
            client,
            scope: ProductScope::Store(store),
        }
    }
}

#[async_trait]
impl ProductSource for MarketplaceSource {
    #[instrument(skip(self, query), fields(page = query.page(), scope = ?self.scope))]
    async fn fetch_page(&self, query: &Query) -> Result<ResultPage, BrowseError> {
        let params = query.to_params();
        let page = match &self.scope {
            ProductScope::Marketplace => self.client.list_products(&params).await?,
            ProductScope::Store(store) => self.client.list_store_products(store, &params).await?,
        };
        Ok(page)
    }
}
