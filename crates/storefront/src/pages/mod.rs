//! Page loaders: everything a page needs, resolved from route parameters.
//!
//! Loaders never fail outward. Errors are folded into [`PageView::Failed`]
//! together with the message the page shows.

mod blog;
mod communities;
mod home;
mod product;
mod store_products;
mod stores;

pub use blog::{BlogIndexPage, BlogPostPage, PostView, load_blog, load_blog_post};
pub use communities::{CommunitiesPage, CommunityCard, load_communities};
pub use home::{HomePage, load_home};
pub use product::{ProductPage, load_product};
pub use store_products::{STORE_PAGE_SIZE, StoreProductsPage};
pub use stores::{StoresPage, load_stores};

use crate::error::BrowseError;

/// Outcome of loading a page.
#[derive(Debug, Clone)]
pub enum PageView<T> {
    Ready(T),
    Failed {
        error: BrowseError,
        /// Text shown in place of the page.
        message: String,
    },
}

impl<T> PageView<T> {
    /// Fold `result` into a view. Configuration errors show their own text;
    /// anything else shows `fallback`.
    pub fn from_result(result: Result<T, BrowseError>, fallback: &str) -> Self {
        match result {
            Ok(page) => Self::Ready(page),
            Err(error) => {
                let message = match &error {
                    BrowseError::Configuration(msg) => msg.clone(),
                    BrowseError::NotFound(_) | BrowseError::Transient(_) => fallback.to_string(),
                };
                tracing::debug!(error = %error, "Page failed to load");
                Self::Failed { error, message }
            }
        }
    }

    #[must_use]
    pub const fn ready(&self) -> Option<&T> {
        match self {
            Self::Ready(page) => Some(page),
            Self::Failed { .. } => None,
        }
    }

    #[must_use]
    pub const fn error(&self) -> Option<&BrowseError> {
        match self {
            Self::Ready(_) => None,
            Self::Failed { error, .. } => Some(error),
        }
    }

    #[must_use]
    pub fn into_result(self) -> Result<T, BrowseError> {
        match self {
            Self::Ready(page) => Ok(page),
            Self::Failed { error, .. } => Err(error),
        }
    }
}
