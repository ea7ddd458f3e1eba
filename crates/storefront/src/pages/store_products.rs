//! One store's products with numbered pagination.
//!
//! Unlike the marketplace feed this page replaces its items on every page
//! change instead of accumulating them.

use mercado_core::{ResultPage, Store, StoreId};
use tracing::{instrument, warn};

use crate::api::MarketplaceClient;
use crate::discovery::{MarketplaceSource, ProductSource, Query};
use crate::error::BrowseError;

/// Products per page on store pages.
pub const STORE_PAGE_SIZE: u32 = 12;

pub const NO_PRODUCTS: &str = "No se encontraron productos para esta tienda";

/// Interactive state of a store's product listing.
#[derive(Debug)]
pub struct StoreProductsPage {
    source: MarketplaceSource,
    store_id: StoreId,
    store: Option<Store>,
    query: Query,
    page: ResultPage,
    error: Option<BrowseError>,
}

impl StoreProductsPage {
    /// Load the store header and the first page of products.
    ///
    /// A failed store lookup is logged and leaves [`Self::store`] empty; the
    /// product listing is still shown.
    #[instrument(skip(client))]
    pub async fn open(client: MarketplaceClient, store_id: StoreId, page_size: u32) -> Self {
        let source = MarketplaceSource::for_store(client.clone(), store_id.clone());
        let query = Query::new(page_size);

        let (store, first) = tokio::join!(client.get_store(&store_id), source.fetch_page(&query));
        let store = store
            .inspect_err(|err| warn!(error = %err, store = %store_id, "Failed to load store info"))
            .ok();

        let mut page = Self {
            source,
            store_id,
            store,
            query: query.clone(),
            page: ResultPage::empty(),
            error: None,
        };
        page.apply(query, first);
        page
    }

    #[must_use]
    pub const fn store(&self) -> Option<&Store> {
        self.store.as_ref()
    }

    #[must_use]
    pub const fn store_id(&self) -> &StoreId {
        &self.store_id
    }

    #[must_use]
    pub const fn results(&self) -> &ResultPage {
        &self.page
    }

    #[must_use]
    pub fn search_term(&self) -> &str {
        self.query.search()
    }

    #[must_use]
    pub const fn error(&self) -> Option<&BrowseError> {
        self.error.as_ref()
    }

    /// Text to show instead of the listing, if the last fetch failed.
    #[must_use]
    pub fn error_message(&self) -> Option<String> {
        self.error.as_ref().map(|err| match err {
            BrowseError::NotFound(_) => NO_PRODUCTS.to_string(),
            other => other.product_listing_message(),
        })
    }

    /// Submit a search and return to page 1.
    #[instrument(skip(self), fields(store = %self.store_id))]
    pub async fn search(&mut self, term: &str) {
        let query = self.query.with_search(term);
        self.fetch(query).await;
    }

    /// Clear the search and return to page 1.
    pub async fn clear_search(&mut self) {
        self.search("").await;
    }

    /// Go to `page`. Pages outside `1..=total_pages` are ignored.
    ///
    /// Returns whether a fetch happened.
    #[instrument(skip(self), fields(store = %self.store_id))]
    pub async fn go_to_page(&mut self, page: u32) -> bool {
        if page < 1 || page > self.page.total_pages {
            return false;
        }
        let query = self.query.at_page(page);
        self.fetch(query).await;
        true
    }

    async fn fetch(&mut self, query: Query) {
        let result = self.source.fetch_page(&query).await;
        self.apply(query, result);
    }

    /// A `NotFound` empties the listing. Any other failure keeps the last
    /// good page and query so the visitor can try the same page again.
    fn apply(&mut self, query: Query, result: Result<ResultPage, BrowseError>) {
        match result {
            Ok(page) => {
                self.page = page;
                self.query = query;
                self.error = None;
            }
            Err(err @ BrowseError::NotFound(_)) => {
                self.page = ResultPage::empty();
                self.query = query;
                self.error = Some(err);
            }
            Err(err) => {
                warn!(error = %err, page = query.page(), "Failed to load store products");
                self.error = Some(err);
            }
        }
    }
}
