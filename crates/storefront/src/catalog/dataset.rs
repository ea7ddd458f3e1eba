//! Static marketplace dataset loaded from JSON files.
//!
//! The dataset directory holds four files:
//!
//! - `products.json`: `{ "products": [...] }`
//! - `community.json`: `{ "communities": [...] }`
//! - `stores.json`: `{ "stores": [...] }`
//! - `blogs.json`: `{ "blogs": [...] }`

use std::path::{Path, PathBuf};
use std::sync::Arc;

use mercado_core::{
    BlogPost, BlogPostId, Community, CommunityId, Product, ProductId, Store, StoreId,
};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, instrument};

pub const PRODUCTS_FILE: &str = "products.json";
pub const COMMUNITIES_FILE: &str = "community.json";
pub const STORES_FILE: &str = "stores.json";
pub const BLOGS_FILE: &str = "blogs.json";

/// Errors from loading the dataset.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

#[derive(Deserialize)]
struct ProductsFile {
    #[serde(default)]
    products: Vec<Product>,
}

#[derive(Deserialize)]
struct CommunitiesFile {
    #[serde(default)]
    communities: Vec<Community>,
}

#[derive(Deserialize)]
struct StoresFile {
    #[serde(default)]
    stores: Vec<Store>,
}

#[derive(Deserialize)]
struct BlogsFile {
    #[serde(default)]
    blogs: Vec<BlogPost>,
}

/// In-memory dataset. Cheap to clone.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    products: Arc<Vec<Product>>,
    communities: Arc<Vec<Community>>,
    stores: Arc<Vec<Store>>,
    /// Newest first.
    posts: Arc<Vec<BlogPost>>,
}

impl Dataset {
    /// Load every dataset file from `dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if a file is missing or does not parse.
    #[instrument(fields(dir = %dir.display()))]
    pub async fn load(dir: &Path) -> Result<Self, CatalogError> {
        let products: ProductsFile = read_json(&dir.join(PRODUCTS_FILE)).await?;
        let communities: CommunitiesFile = read_json(&dir.join(COMMUNITIES_FILE)).await?;
        let stores: StoresFile = read_json(&dir.join(STORES_FILE)).await?;
        let blogs: BlogsFile = read_json(&dir.join(BLOGS_FILE)).await?;

        debug!(
            products = products.products.len(),
            communities = communities.communities.len(),
            stores = stores.stores.len(),
            posts = blogs.blogs.len(),
            "Loaded dataset"
        );

        Ok(
            Self::from_parts(products.products, communities.communities, stores.stores)
                .with_posts(blogs.blogs),
        )
    }

    /// Build a dataset from already-parsed records.
    #[must_use]
    pub fn from_parts(products: Vec<Product>, communities: Vec<Community>, stores: Vec<Store>) -> Self {
        Self {
            products: Arc::new(products),
            communities: Arc::new(communities),
            stores: Arc::new(stores),
            posts: Arc::default(),
        }
    }

    /// Attach blog posts, sorted newest first.
    #[must_use]
    pub fn with_posts(mut self, mut posts: Vec<BlogPost>) -> Self {
        posts.sort_by(|a, b| b.date.cmp(&a.date));
        self.posts = Arc::new(posts);
        self
    }

    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    #[must_use]
    pub fn communities(&self) -> &[Community] {
        &self.communities
    }

    #[must_use]
    pub fn stores(&self) -> &[Store] {
        &self.stores
    }

    #[must_use]
    pub fn community(&self, id: &CommunityId) -> Option<&Community> {
        self.communities.iter().find(|c| &c.id == id)
    }

    #[must_use]
    pub fn store(&self, id: &StoreId) -> Option<&Store> {
        self.stores.iter().find(|s| &s.id == id)
    }

    #[must_use]
    pub fn product(&self, id: ProductId) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    /// Blog posts, newest first.
    #[must_use]
    pub fn posts(&self) -> &[BlogPost] {
        &self.posts
    }

    #[must_use]
    pub fn post(&self, id: BlogPostId) -> Option<&BlogPost> {
        self.posts.iter().find(|p| p.id == id)
    }

    /// Up to `limit` newest posts other than `exclude`.
    #[must_use]
    pub fn recent_posts(&self, limit: usize, exclude: Option<BlogPostId>) -> Vec<&BlogPost> {
        self.posts
            .iter()
            .filter(|p| exclude.is_none_or(|id| p.id != id))
            .take(limit)
            .collect()
    }

    /// Every distinct tag, sorted.
    #[must_use]
    pub fn post_tags(&self) -> Vec<String> {
        let mut tags: Vec<String> = self.posts.iter().flat_map(|p| p.tags.clone()).collect();
        tags.sort();
        tags.dedup();
        tags
    }

    /// Products visible in a community, optionally narrowed to one store.
    ///
    /// The marketplace community shows every store's products.
    #[must_use]
    pub fn scoped_products(&self, community: &CommunityId, store: Option<&StoreId>) -> Vec<Product> {
        self.products
            .iter()
            .filter(|p| community.is_marketplace() || &p.community_id == community)
            .filter(|p| store.is_none_or(|s| &p.store_id == s))
            .cloned()
            .collect()
    }
}

async fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, CatalogError> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;

    serde_json::from_str(&content).map_err(|source| CatalogError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
