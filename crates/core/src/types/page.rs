//! One page of product results plus the totals needed to paginate.

use serde::{Deserialize, Serialize};

use super::product::Product;

/// A page of products.
///
/// Pages are 1-indexed. `total_pages` is `ceil(total_count / page_size)`,
/// so an empty result set has zero pages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultPage {
    pub items: Vec<Product>,
    pub total_count: u64,
    pub current_page: u32,
    pub total_pages: u32,
}

impl ResultPage {
    /// Empty page 1 of an empty result set.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            items: Vec::new(),
            total_count: 0,
            current_page: 1,
            total_pages: 0,
        }
    }

    /// Cut page `page` of `page_size` out of an ordered collection.
    ///
    /// Pages past the end come back empty but still report the totals.
    #[must_use]
    pub fn from_slice(all: &[Product], page: u32, page_size: u32) -> Self {
        let page = page.max(1);
        let size = page_size.max(1) as usize;
        let start = (page as usize - 1).saturating_mul(size);
        let items = all.iter().skip(start).take(size).cloned().collect();

        Self {
            items,
            total_count: all.len() as u64,
            current_page: page,
            total_pages: total_pages(all.len() as u64, page_size),
        }
    }

    /// Whether pages remain after this one.
    #[must_use]
    pub const fn has_more(&self) -> bool {
        self.current_page < self.total_pages
    }

    /// Whether a page before this one exists.
    #[must_use]
    pub const fn has_previous(&self) -> bool {
        self.current_page > 1
    }
}

/// Number of pages needed for `total` items at `page_size` per page.
#[must_use]
pub fn total_pages(total: u64, page_size: u32) -> u32 {
    let size = u64::from(page_size.max(1));
    u32::try_from(total.div_ceil(size)).unwrap_or(u32::MAX)
}
