//! Marketplace REST API client (the data source adapter).
//!
//! # Endpoints
//!
//! - `GET /public/products` - paged products with `page`, `limit`, `search`, `categoria`
//! - `GET /public/stores/{id}/products` - same paging, scoped to one store
//! - `GET /public/communities`, `GET /public/communities/{id}`
//! - `GET /public/stores/{id}`, `GET /public/stores?comunidad={id}`
//!
//! # Example
//!
//! ```rust,ignore
//! use mercado_storefront::api::{MarketplaceClient, ProductListParams};
//!
//! let client = MarketplaceClient::new(config.require_api()?)?;
//! let page = client
//!     .list_products(&ProductListParams { page: 1, limit: 20, search: None, category: None })
//!     .await?;
//! ```

mod client;
mod error;
pub mod types;

pub use client::MarketplaceClient;
pub use error::ApiError;
pub use types::ProductListParams;
