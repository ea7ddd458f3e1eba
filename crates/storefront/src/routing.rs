//! Navigation state carried in URL query parameters.
//!
//! `comunidad` selects the community (the marketplace community when absent)
//! and `tienda` narrows the view to one store. Page loaders take these as
//! explicit inputs rather than reading any ambient location.

use mercado_core::{BlogPostId, CommunityId, ProductId, StoreId};
use url::form_urlencoded;

pub const COMMUNITY_PARAM: &str = "comunidad";
pub const STORE_PARAM: &str = "tienda";

/// Parsed routing parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteParams {
    /// Community as given; `None` when the parameter is missing or empty.
    pub community: Option<CommunityId>,
    pub store: Option<StoreId>,
}

impl RouteParams {
    /// Parse a query string, with or without the leading `?`.
    ///
    /// Empty values count as absent. The last occurrence of a key wins.
    #[must_use]
    pub fn from_query(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        let mut params = Self::default();

        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            let value = value.trim();
            match key.as_ref() {
                COMMUNITY_PARAM => {
                    params.community = (!value.is_empty()).then(|| CommunityId::new(value));
                }
                STORE_PARAM => {
                    params.store = (!value.is_empty()).then(|| StoreId::new(value));
                }
                _ => {}
            }
        }
        params
    }

    /// Params pointing at `community` with no store.
    #[must_use]
    pub const fn for_community(community: CommunityId) -> Self {
        Self {
            community: Some(community),
            store: None,
        }
    }

    /// Community to show, defaulting to the marketplace.
    #[must_use]
    pub fn community_or_default(&self) -> CommunityId {
        self.community.clone().unwrap_or_else(CommunityId::marketplace)
    }

    /// Same params narrowed to `store`.
    #[must_use]
    pub fn with_store(&self, store: StoreId) -> Self {
        Self {
            community: self.community.clone(),
            store: Some(store),
        }
    }

    /// The stores menu is only offered when no store is selected.
    #[must_use]
    pub const fn shows_stores_menu(&self) -> bool {
        self.store.is_none()
    }

    /// Encoded query string without the leading `?`.
    #[must_use]
    pub fn to_query(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        if let Some(community) = &self.community {
            serializer.append_pair(COMMUNITY_PARAM, community.as_str());
        }
        if let Some(store) = &self.store {
            serializer.append_pair(STORE_PARAM, store.as_str());
        }
        serializer.finish()
    }

    /// Home page link for these params.
    #[must_use]
    pub fn home_path(&self) -> String {
        with_query("/", &self.to_query())
    }

    /// Product detail link, keeping the current community.
    #[must_use]
    pub fn product_path(&self, product: ProductId) -> String {
        let params = Self::for_community(self.community_or_default());
        with_query(&format!("/product/{product}"), &params.to_query())
    }
}

/// Stores listing link for `community`.
#[must_use]
pub fn stores_path(community: &CommunityId) -> String {
    with_query(
        "/stores",
        &RouteParams::for_community(community.clone()).to_query(),
    )
}

/// A store's paginated product listing.
#[must_use]
pub fn store_products_path(store: &StoreId) -> String {
    format!("/stores/{}/products", urlencoding::encode(store.as_str()))
}

pub const BLOG_PATH: &str = "/blog";

/// A blog article.
#[must_use]
pub fn blog_post_path(id: BlogPostId) -> String {
    format!("{BLOG_PATH}/{id}")
}

fn with_query(path: &str, query: &str) -> String {
    if query.is_empty() {
        path.to_string()
    } else {
        format!("{path}?{query}")
    }
}
