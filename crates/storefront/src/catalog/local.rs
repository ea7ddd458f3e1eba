//! [`ProductSource`] over an in-memory product set.

use async_trait::async_trait;
use mercado_core::{Product, ResultPage};

use super::listing::ListingFilter;
use crate::discovery::{ProductSource, Query};
use crate::error::BrowseError;

/// Serves discovery pages from memory, in dataset order.
///
/// Lets the infinite-scroll pipeline run without a backend. Unlike the
/// shuffled listing the order is stable, so appended pages line up.
#[derive(Debug, Clone)]
pub struct LocalSource {
    products: Vec<Product>,
}

impl LocalSource {
    #[must_use]
    pub const fn new(products: Vec<Product>) -> Self {
        Self { products }
    }
}

#[async_trait]
impl ProductSource for LocalSource {
    async fn fetch_page(&self, query: &Query) -> Result<ResultPage, BrowseError> {
        let filter = match query.category() {
            Some(category) => ListingFilter::category(Some(category)),
            None => ListingFilter::search(query.search()),
        };
        let matched: Vec<Product> = self
            .products
            .iter()
            .filter(|p| filter.matches(p))
            .cloned()
            .collect();

        if matched.is_empty() {
            return Err(BrowseError::NotFound(format!("no products for {filter:?}")));
        }
        Ok(ResultPage::from_slice(&matched, query.page(), query.page_size()))
    }
}
