//! Wire schemas for the marketplace REST API.
//!
//! Every endpoint gets an explicit response type. Payloads are parsed and
//! checked here so nothing downstream sees a half-formed page.

use mercado_core::{Community, Product, ResultPage, Store};
use serde::{Deserialize, Serialize};

use super::ApiError;

/// Query string for the paged product endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductListParams {
    pub page: u32,
    pub limit: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(rename = "categoria", skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

/// `GET /public/products` and `GET /public/stores/{id}/products`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPageResponse {
    #[serde(default)]
    pub products: Vec<Product>,
    pub total: u64,
    pub page: u32,
    pub limit: u32,
    pub total_pages: u32,
    #[serde(default)]
    pub has_next: Option<bool>,
    #[serde(default)]
    pub has_prev: Option<bool>,
}

impl ProductPageResponse {
    /// Check the page against its own totals and convert it.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Malformed` when the counts contradict each other.
    pub fn into_result_page(self, endpoint: &str) -> Result<ResultPage, ApiError> {
        let malformed = |reason: String| ApiError::Malformed {
            endpoint: endpoint.to_string(),
            reason,
        };

        if self.page == 0 {
            return Err(malformed("page must be >= 1".to_string()));
        }
        if self.products.len() as u64 > self.total {
            return Err(malformed(format!(
                "{} products exceed reported total {}",
                self.products.len(),
                self.total
            )));
        }
        if self.limit > 0 && self.products.len() > self.limit as usize {
            return Err(malformed(format!(
                "{} products exceed page limit {}",
                self.products.len(),
                self.limit
            )));
        }
        if self.total > 0 && self.total_pages == 0 {
            return Err(malformed(format!(
                "total {} with zero pages",
                self.total
            )));
        }
        if let Some(has_next) = self.has_next
            && has_next != (self.page < self.total_pages)
        {
            tracing::debug!(
                endpoint,
                has_next,
                page = self.page,
                total_pages = self.total_pages,
                "hasNext disagrees with page counts, using counts"
            );
        }

        Ok(ResultPage {
            items: self.products,
            total_count: self.total,
            current_page: self.page,
            total_pages: self.total_pages,
        })
    }
}

/// `GET /public/stores?comunidad={id}`.
#[derive(Debug, Clone, Deserialize)]
pub struct StoresResponse {
    #[serde(default)]
    pub stores: Vec<Store>,
}

/// One element of the `GET /public/communities` array.
///
/// The backend wraps the list as `[ { "comunidades": [...] } ]`.
#[derive(Debug, Clone, Deserialize)]
pub struct CommunitiesEnvelope {
    #[serde(default)]
    pub comunidades: Vec<Community>,
}

/// Error body returned alongside non-success statuses.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorBody {
    pub error: Option<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn page_json(products: usize, total: u64, page: u32, total_pages: u32) -> serde_json::Value {
        let products: Vec<_> = (0..products)
            .map(|i| serde_json::json!({ "id": i, "title": format!("P{i}"), "price": 1000 }))
            .collect();
        serde_json::json!({
            "products": products,
            "total": total,
            "page": page,
            "limit": 20,
            "totalPages": total_pages
        })
    }

    #[test]
    fn test_params_serialize_wire_names() {
        let params = ProductListParams {
            page: 2,
            limit: 20,
            search: None,
            category: Some("Ropa".to_string()),
        };
        let value = serde_json::to_value(&params).unwrap();
        assert_eq!(value, serde_json::json!({ "page": 2, "limit": 20, "categoria": "Ropa" }));
    }

    #[test]
    fn test_valid_page_converts() {
        let response: ProductPageResponse =
            serde_json::from_value(page_json(20, 45, 1, 3)).unwrap();
        let page = response.into_result_page("public/products").unwrap();
        assert_eq!(page.items.len(), 20);
        assert_eq!(page.total_pages, 3);
        assert!(page.has_more());
    }

    #[test]
    fn test_items_beyond_total_rejected() {
        let response: ProductPageResponse =
            serde_json::from_value(page_json(5, 3, 1, 1)).unwrap();
        let err = response.into_result_page("public/products").unwrap_err();
        assert!(matches!(err, ApiError::Malformed { .. }));
    }

    #[test]
    fn test_zero_page_rejected() {
        let response: ProductPageResponse =
            serde_json::from_value(page_json(0, 0, 0, 0)).unwrap();
        assert!(response.into_result_page("public/products").is_err());
    }

    #[test]
    fn test_missing_totals_fail_to_parse() {
        let result: Result<ProductPageResponse, _> =
            serde_json::from_value(serde_json::json!({ "products": [] }));
        assert!(result.is_err());
    }

    #[test]
    fn test_communities_envelope() {
        let body: Vec<CommunitiesEnvelope> = serde_json::from_value(serde_json::json!([
            { "comunidades": [ { "id": "valdivia", "title": "Valdivia" } ] }
        ]))
        .unwrap();
        assert_eq!(body[0].comunidades[0].id.as_str(), "valdivia");
    }
}
