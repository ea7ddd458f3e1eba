//! Marketplace client against the mock backend.

#![allow(clippy::unwrap_used)]

use mercado_core::{CommunityId, StoreId};
use mercado_integration_tests::{Fixture, MockMarketplace, TOKEN};
use mercado_storefront::api::{ApiError, MarketplaceClient, ProductListParams};
use mercado_storefront::config::StorefrontConfig;
use mercado_storefront::error::{BrowseError, ErrorKind};
use std::collections::HashMap;

fn params(page: u32) -> ProductListParams {
    ProductListParams {
        page,
        limit: 20,
        search: None,
        category: None,
    }
}

// ============================================================================
// Product Pages
// ============================================================================

#[tokio::test]
async fn test_pages_of_forty_five() {
    let mock = MockMarketplace::start(Fixture::catalog(45)).await;
    let client = mock.client();

    let first = client.list_products(&params(1)).await.unwrap();
    assert_eq!(first.items.len(), 20);
    assert_eq!(first.total_pages, 3);
    assert_eq!(first.total_count, 45);

    let last = client.list_products(&params(3)).await.unwrap();
    assert_eq!(last.items.len(), 5);
    assert!(!last.has_more());
}

#[tokio::test]
async fn test_search_and_category_sent_as_query() {
    let mock = MockMarketplace::start(Fixture::catalog(10)).await;
    let client = mock.client();

    let mut with_search = params(1);
    with_search.search = Some("producto 1".to_string());
    client.list_products(&with_search).await.unwrap();

    let mut with_category = params(1);
    with_category.category = Some("Ropa".to_string());
    client.list_products(&with_category).await.unwrap();

    let queries = mock.product_queries();
    assert_eq!(queries[0].get("search").map(String::as_str), Some("producto 1"));
    assert!(!queries[0].contains_key("categoria"));
    assert_eq!(queries[1].get("categoria").map(String::as_str), Some("Ropa"));
    assert!(!queries[1].contains_key("search"));
    assert_eq!(queries[1].get("limit").map(String::as_str), Some("20"));
}

#[tokio::test]
async fn test_no_match_is_not_found() {
    let mock = MockMarketplace::start(Fixture::catalog(10)).await;
    let mut query = params(1);
    query.search = Some("inexistente".to_string());

    let err = mock.client().list_products(&query).await.unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(BrowseError::from(err).kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn test_malformed_payload_is_transient() {
    let mock = MockMarketplace::start(Fixture::catalog(10)).await;
    mock.set_malformed(true);

    let err = mock.client().list_products(&params(1)).await.unwrap_err();
    assert!(matches!(err, ApiError::Malformed { .. }));
    assert_eq!(BrowseError::from(err).kind(), ErrorKind::Transient);
}

#[tokio::test]
async fn test_server_error_is_transient() {
    let mock = MockMarketplace::start(Fixture::catalog(10)).await;
    mock.fail_with(Some(503));

    let err = mock.client().list_products(&params(1)).await.unwrap_err();
    assert!(matches!(err, ApiError::Status { status: 503, .. }));
    assert!(BrowseError::from(err).is_retryable());
}

#[tokio::test]
async fn test_wrong_token_rejected() {
    let mock = MockMarketplace::start(Fixture::catalog(3)).await;
    let vars = HashMap::from([
        ("MERCADO_API_URL".to_string(), mock.base_url()),
        (
            "MERCADO_PUBLIC_TOKEN".to_string(),
            TOKEN.chars().rev().collect::<String>(),
        ),
    ]);
    let config = StorefrontConfig::from_lookup(move |key: &str| vars.get(key).cloned()).unwrap();
    let client = MarketplaceClient::new(config.require_api().unwrap()).unwrap();

    let err = client.list_products(&params(1)).await.unwrap_err();
    assert!(matches!(err, ApiError::Status { status: 401, .. }));
}

// ============================================================================
// Communities and Stores
// ============================================================================

#[tokio::test]
async fn test_communities_envelope_unwrapped() {
    let mock = MockMarketplace::start(Fixture::catalog(3)).await;
    let communities = mock.client().list_communities().await.unwrap();

    assert_eq!(communities.len(), 1);
    assert_eq!(communities[0].id, CommunityId::new("valdivia"));
    assert!(communities[0].open);
}

#[tokio::test]
async fn test_store_lookups() {
    let mock = MockMarketplace::start(Fixture::catalog(10)).await;
    let client = mock.client();

    let store = client.get_store(&StoreId::new("muebles-sur")).await.unwrap();
    assert_eq!(store.name, "Muebles del Sur");
    assert_eq!(store.social_links().len(), 1);

    let err = client.get_store(&StoreId::new("nada")).await.unwrap_err();
    assert!(matches!(err, ApiError::NotFound(msg) if msg == "Tienda no encontrada"));

    let stores = client.list_stores(&CommunityId::new("valdivia")).await.unwrap();
    assert_eq!(stores.len(), 2);

    let page = client
        .list_store_products(&StoreId::new("tejidos-lago"), &params(1))
        .await
        .unwrap();
    assert!(page.items.iter().all(|p| p.store_id.as_str() == "tejidos-lago"));
}
