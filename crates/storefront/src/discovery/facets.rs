//! Category facets derived from loaded products.

use std::collections::HashSet;

use mercado_core::Product;
use serde::Serialize;

/// Number of category chips shown next to the "all" chip.
pub const DEFAULT_FACET_LIMIT: usize = 5;

/// A category filter chip.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Facet {
    /// No category filter.
    All,
    /// Exact category match.
    Category(String),
}

impl Facet {
    /// Chip label.
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::All => "Todos",
            Self::Category(name) => name,
        }
    }

    /// Category value to filter by; `None` for [`Facet::All`].
    #[must_use]
    pub fn category(&self) -> Option<&str> {
        match self {
            Self::All => None,
            Self::Category(name) => Some(name),
        }
    }
}

/// Distinct non-empty categories in first-seen order, up to `limit` of them.
#[must_use]
pub fn distinct_categories(products: &[Product], limit: Option<usize>) -> Vec<String> {
    let mut seen = HashSet::new();
    products
        .iter()
        .map(|p| p.category.trim())
        .filter(|c| !c.is_empty())
        .filter(|c| seen.insert(*c))
        .take(limit.unwrap_or(usize::MAX))
        .map(str::to_string)
        .collect()
}

/// Chips for `categories`, with [`Facet::All`] first.
#[must_use]
pub fn facets_for(categories: &[String]) -> Vec<Facet> {
    std::iter::once(Facet::All)
        .chain(categories.iter().cloned().map(Facet::Category))
        .collect()
}

/// Chips for the categories present in `products`, capped at `limit`.
#[must_use]
pub fn category_facets(products: &[Product], limit: Option<usize>) -> Vec<Facet> {
    facets_for(&distinct_categories(products, limit))
}
