//! Marketplace REST client.
//!
//! Every request carries the static public bearer token. No retries happen
//! here; callers decide what to do with a failure.

use std::sync::Arc;

use mercado_core::{Community, CommunityId, ResultPage, Store, StoreId};
use reqwest::{Client, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, error, instrument, warn};
use url::Url;

use super::error::ApiError;
use super::types::{
    CommunitiesEnvelope, ErrorBody, ProductListParams, ProductPageResponse, StoresResponse,
};
use crate::config::{ApiConfig, bearer};

/// Maximum number of body characters copied into logs and error messages.
const BODY_PREVIEW_CHARS: usize = 200;

/// Client for the public marketplace API.
///
/// Cheap to clone; clones share one connection pool.
#[derive(Clone)]
pub struct MarketplaceClient {
    inner: Arc<MarketplaceClientInner>,
}

struct MarketplaceClientInner {
    client: Client,
    config: ApiConfig,
}

impl std::fmt::Debug for MarketplaceClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MarketplaceClient")
            .field("config", &self.inner.config)
            .finish_non_exhaustive()
    }
}

impl MarketplaceClient {
    /// Create a new client.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let client = Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            inner: Arc::new(MarketplaceClientInner {
                client,
                config: config.clone(),
            }),
        })
    }

    /// Issue a GET and decode the JSON body.
    async fn get_json<T, Q>(&self, url: Url, query: Option<&Q>) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let endpoint = url.path().to_string();

        let mut request = self
            .inner
            .client
            .get(url)
            .bearer_auth(bearer(&self.inner.config));
        if let Some(query) = query {
            request = request.query(query);
        }

        let response = request.send().await?;
        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            return Err(ApiError::RateLimited(retry_after));
        }

        // Read as text first for better error diagnostics
        let body = response.text().await?;

        if status == StatusCode::NOT_FOUND {
            debug!(endpoint = %endpoint, "Backend reported not found");
            return Err(ApiError::NotFound(
                error_message(&body).unwrap_or_else(|| endpoint.clone()),
            ));
        }

        if !status.is_success() {
            error!(
                status = %status,
                endpoint = %endpoint,
                body = %preview(&body),
                "Marketplace API returned non-success status"
            );
            return Err(ApiError::Status {
                status: status.as_u16(),
                message: error_message(&body).unwrap_or_else(|| preview(&body)),
            });
        }

        serde_json::from_str(&body).map_err(|e| {
            warn!(
                error = %e,
                endpoint = %endpoint,
                body = %preview(&body),
                "Rejected malformed marketplace payload"
            );
            ApiError::Malformed {
                endpoint,
                reason: e.to_string(),
            }
        })
    }

    fn url(&self, segments: &[&str]) -> Url {
        self.inner.config.endpoint(segments)
    }

    // =========================================================================
    // Product Methods
    // =========================================================================

    /// Get one page of marketplace products.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` when nothing matches, or another variant
    /// when the request or payload fails.
    #[instrument(skip(self), fields(page = params.page, limit = params.limit))]
    pub async fn list_products(&self, params: &ProductListParams) -> Result<ResultPage, ApiError> {
        let url = self.url(&["public", "products"]);
        let endpoint = url.path().to_string();

        let response: ProductPageResponse = self.get_json(url, Some(params)).await?;
        let page = response.into_result_page(&endpoint)?;

        debug!(
            items = page.items.len(),
            total = page.total_count,
            total_pages = page.total_pages,
            "Fetched product page"
        );
        Ok(page)
    }

    /// Get one page of a single store's products.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` when the store has no matching products.
    #[instrument(skip(self), fields(store = %store, page = params.page))]
    pub async fn list_store_products(
        &self,
        store: &StoreId,
        params: &ProductListParams,
    ) -> Result<ResultPage, ApiError> {
        let url = self.url(&["public", "stores", store.as_str(), "products"]);
        let endpoint = url.path().to_string();

        let response: ProductPageResponse = self.get_json(url, Some(params)).await?;
        let page = response.into_result_page(&endpoint)?;

        debug!(items = page.items.len(), total = page.total_count, "Fetched store products");
        Ok(page)
    }

    // =========================================================================
    // Community and Store Methods
    // =========================================================================

    /// List all communities.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the payload is malformed.
    #[instrument(skip(self))]
    pub async fn list_communities(&self) -> Result<Vec<Community>, ApiError> {
        let envelopes: Vec<CommunitiesEnvelope> = self
            .get_json::<_, ()>(self.url(&["public", "communities"]), None)
            .await?;

        Ok(envelopes
            .into_iter()
            .next()
            .map(|envelope| envelope.comunidades)
            .unwrap_or_default())
    }

    /// Get a community by its slug.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` if the community does not exist.
    #[instrument(skip(self), fields(community = %id))]
    pub async fn get_community(&self, id: &CommunityId) -> Result<Community, ApiError> {
        self.get_json::<_, ()>(self.url(&["public", "communities", id.as_str()]), None)
            .await
    }

    /// Get a store by its slug.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` if the store does not exist.
    #[instrument(skip(self), fields(store = %id))]
    pub async fn get_store(&self, id: &StoreId) -> Result<Store, ApiError> {
        self.get_json::<_, ()>(self.url(&["public", "stores", id.as_str()]), None)
            .await
    }

    /// List the stores of a community.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the payload is malformed.
    #[instrument(skip(self), fields(community = %community))]
    pub async fn list_stores(&self, community: &CommunityId) -> Result<Vec<Store>, ApiError> {
        let response: StoresResponse = self
            .get_json(
                self.url(&["public", "stores"]),
                Some(&[("comunidad", community.as_str())]),
            )
            .await?;
        Ok(response.stores)
    }
}

/// Pull the `error` field out of a JSON error body.
fn error_message(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.error)
        .filter(|m| !m.is_empty())
}

fn preview(body: &str) -> String {
    body.chars().take(BODY_PREVIEW_CHARS).collect()
}
