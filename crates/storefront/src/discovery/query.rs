//! The discovery query: search term, category, and page.
//!
//! Search and category are mutually exclusive. Setting one clears the other
//! and sends pagination back to page 1.

use crate::api::ProductListParams;

/// Default number of products per discovery page.
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// A product discovery query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    search: String,
    category: Option<String>,
    page: u32,
    page_size: u32,
}

impl Default for Query {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl Query {
    /// Unfiltered page 1.
    #[must_use]
    pub fn new(page_size: u32) -> Self {
        Self {
            search: String::new(),
            category: None,
            page: 1,
            page_size: page_size.max(1),
        }
    }

    /// Free-text search term, trimmed; empty when not searching.
    #[must_use]
    pub fn search(&self) -> &str {
        &self.search
    }

    /// Selected category, if any.
    #[must_use]
    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    /// 1-indexed page.
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    #[must_use]
    pub const fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Replace the search term. Clears the category and resets to page 1.
    #[must_use]
    pub fn with_search(&self, term: &str) -> Self {
        Self {
            search: term.trim().to_string(),
            category: None,
            page: 1,
            page_size: self.page_size,
        }
    }

    /// Replace the category (`None` or blank for all). Clears the search term
    /// and resets to page 1.
    #[must_use]
    pub fn with_category(&self, category: Option<&str>) -> Self {
        Self {
            search: String::new(),
            category: category
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .map(str::to_string),
            page: 1,
            page_size: self.page_size,
        }
    }

    /// Same filter at another page.
    #[must_use]
    pub fn at_page(&self, page: u32) -> Self {
        Self {
            page: page.max(1),
            ..self.clone()
        }
    }

    /// Query string for the product endpoints.
    #[must_use]
    pub fn to_params(&self) -> ProductListParams {
        ProductListParams {
            page: self.page,
            limit: self.page_size,
            search: (!self.search.is_empty()).then(|| self.search.clone()),
            category: self.category.clone(),
        }
    }
}
