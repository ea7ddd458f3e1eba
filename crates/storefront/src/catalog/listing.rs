//! Shuffled, numbered listing over a fully loaded product set.
//!
//! The filtered set is shuffled once per filter and then sliced into fixed
//! pages, so moving between pages never reorders, duplicates, or drops items.

use mercado_core::{Product, ResultPage};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use tracing::debug;

use crate::discovery::{DEFAULT_PAGE_SIZE, Facet, distinct_categories};

/// Active filter. Search and category exclude each other.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ListingFilter {
    #[default]
    All,
    /// Case-insensitive substring over title, description, and store name.
    Search(String),
    /// Exact category match.
    Category(String),
}

impl ListingFilter {
    /// Search filter for `term`; blank means [`ListingFilter::All`].
    #[must_use]
    pub fn search(term: &str) -> Self {
        let term = term.trim();
        if term.is_empty() {
            Self::All
        } else {
            Self::Search(term.to_string())
        }
    }

    /// Category filter; `None` or blank means [`ListingFilter::All`].
    #[must_use]
    pub fn category(category: Option<&str>) -> Self {
        match category.map(str::trim) {
            Some(c) if !c.is_empty() => Self::Category(c.to_string()),
            _ => Self::All,
        }
    }

    /// Whether `product` passes this filter.
    #[must_use]
    pub fn matches(&self, product: &Product) -> bool {
        match self {
            Self::All => true,
            Self::Search(term) => product.matches_search(&term.to_lowercase()),
            Self::Category(category) => product.in_category(category),
        }
    }

    /// Current search term, empty when not searching.
    #[must_use]
    pub fn search_term(&self) -> &str {
        match self {
            Self::Search(term) => term,
            _ => "",
        }
    }

    /// Selected category, if any.
    #[must_use]
    pub fn selected_category(&self) -> Option<&str> {
        match self {
            Self::Category(category) => Some(category),
            _ => None,
        }
    }
}

/// In-memory listing with a per-filter random order.
#[derive(Debug, Clone)]
pub struct ShuffledListing {
    products: Vec<Product>,
    filter: ListingFilter,
    /// Indices into `products`: the filtered set in shuffled order.
    order: Vec<usize>,
    page: u32,
    page_size: u32,
    rng: StdRng,
}

impl ShuffledListing {
    /// Listing seeded from the thread-local generator.
    #[must_use]
    pub fn new(products: Vec<Product>, page_size: u32) -> Self {
        Self::with_rng(products, page_size, StdRng::from_rng(&mut rand::rng()))
    }

    /// Listing with a reproducible order.
    #[must_use]
    pub fn with_seed(products: Vec<Product>, page_size: u32, seed: u64) -> Self {
        Self::with_rng(products, page_size, StdRng::seed_from_u64(seed))
    }

    fn with_rng(products: Vec<Product>, page_size: u32, rng: StdRng) -> Self {
        let mut listing = Self {
            products,
            filter: ListingFilter::All,
            order: Vec::new(),
            page: 1,
            page_size: if page_size == 0 { DEFAULT_PAGE_SIZE } else { page_size },
            rng,
        };
        listing.reshuffle();
        listing
    }

    /// Replace the generator with a seeded one and reshuffle.
    pub fn reseed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
        self.reshuffle();
    }

    #[must_use]
    pub const fn filter(&self) -> &ListingFilter {
        &self.filter
    }

    /// Current 1-indexed page.
    #[must_use]
    pub const fn current_page(&self) -> u32 {
        self.page
    }

    /// Number of products passing the filter.
    #[must_use]
    pub fn matched(&self) -> usize {
        self.order.len()
    }

    #[must_use]
    pub fn total_pages(&self) -> u32 {
        mercado_core::total_pages(self.order.len() as u64, self.page_size)
    }

    /// Search for `term`. Clears any category.
    pub fn search(&mut self, term: &str) {
        self.set_filter(ListingFilter::search(term));
    }

    /// Filter by `category` (`None` for all). Clears any search term.
    pub fn select_category(&mut self, category: Option<&str>) {
        self.set_filter(ListingFilter::category(category));
    }

    /// Drop every filter.
    pub fn clear_filters(&mut self) {
        self.set_filter(ListingFilter::All);
    }

    /// Apply `filter`, reshuffling and returning to page 1 if it changed.
    pub fn set_filter(&mut self, filter: ListingFilter) {
        if filter == self.filter {
            return;
        }
        self.filter = filter;
        self.reshuffle();
    }

    /// Jump to `page`, clamped to the available range.
    pub fn go_to_page(&mut self, page: u32) {
        self.page = page.clamp(1, self.total_pages().max(1));
    }

    /// Products on the current page.
    #[must_use]
    pub fn page_items(&self) -> Vec<&Product> {
        let size = self.page_size as usize;
        let start = (self.page as usize - 1).saturating_mul(size);
        self.order
            .iter()
            .skip(start)
            .take(size)
            .filter_map(|&i| self.products.get(i))
            .collect()
    }

    /// The current page as a [`ResultPage`].
    #[must_use]
    pub fn current(&self) -> ResultPage {
        ResultPage {
            items: self.page_items().into_iter().cloned().collect(),
            total_count: self.order.len() as u64,
            current_page: self.page,
            total_pages: self.total_pages(),
        }
    }

    /// Category chips over the whole loaded set, uncapped.
    #[must_use]
    pub fn facets(&self) -> Vec<Facet> {
        crate::discovery::facets::facets_for(&distinct_categories(&self.products, None))
    }

    fn reshuffle(&mut self) {
        self.order = self
            .products
            .iter()
            .enumerate()
            .filter(|(_, p)| self.filter.matches(p))
            .map(|(i, _)| i)
            .collect();
        self.order.shuffle(&mut self.rng);
        self.page = 1;
        debug!(filter = ?self.filter, matched = self.order.len(), "Reshuffled listing");
    }
}
