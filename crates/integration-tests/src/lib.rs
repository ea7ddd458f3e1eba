//! Integration test harness for Mercado Comunidad.
//!
//! [`MockMarketplace`] serves the public marketplace endpoints from memory on
//! an ephemeral localhost port, so the HTTP client and everything built on it
//! can be exercised end to end without a real backend.
//!
//! ```rust,ignore
//! let mock = MockMarketplace::start(Fixture::catalog(45)).await;
//! let client = mock.client();
//! let page = client.list_products(&params).await?;
//! ```

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::missing_panics_doc
)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Path, Query, Request, State};
use axum::http::{StatusCode, header};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use mercado_core::{Community, Product, ResultPage, Store};
use mercado_storefront::api::MarketplaceClient;
use mercado_storefront::config::{ApiConfig, StorefrontConfig};
use serde_json::{Value, json};

/// Bearer token the mock accepts.
pub const TOKEN: &str = "eyJhbGciOiJIUzI1NiJ9.aB3xY9mK2nL5pQ7rT0uW4zC6";

/// Data served by the mock.
#[derive(Debug, Clone, Default)]
pub struct Fixture {
    pub products: Vec<Product>,
    pub communities: Vec<Community>,
    pub stores: Vec<Store>,
}

impl Fixture {
    /// `n` products with ids `1..=n`, titled "Producto N", over three
    /// categories and two stores, plus one community and its stores.
    #[must_use]
    pub fn catalog(n: i64) -> Self {
        let categories = ["Ropa", "Hogar", "Alimentos"];
        let stores = ["muebles-sur", "tejidos-lago"];
        let products = (1..=n)
            .map(|i| {
                let idx = usize::try_from(i).unwrap_or_default();
                product(
                    i,
                    &format!("Producto {i}"),
                    categories[idx % categories.len()],
                    stores[idx % stores.len()],
                )
            })
            .collect();

        Self {
            products,
            communities: vec![
                serde_json::from_value(json!({
                    "id": "valdivia",
                    "title": "Comunidad Valdivia",
                    "description": "Emprendedores de Valdivia",
                    "phone": "+56 9 5555 0101",
                    "open": true
                }))
                .unwrap(),
            ],
            stores: vec![
                serde_json::from_value(json!({
                    "ID": "muebles-sur",
                    "Name": "Muebles del Sur",
                    "DNI": "76.123.456-7",
                    "Instagram": "https://instagram.com/mueblesdelsur",
                    "communities": ["valdivia"]
                }))
                .unwrap(),
                serde_json::from_value(json!({
                    "ID": "tejidos-lago",
                    "Name": "Tejidos del Lago",
                    "communities": ["valdivia"]
                }))
                .unwrap(),
            ],
        }
    }

    /// Append a product.
    #[must_use]
    pub fn with_product(mut self, product: Product) -> Self {
        self.products.push(product);
        self
    }
}

/// Build a product the way the backend serves it.
#[must_use]
pub fn product(id: i64, title: &str, category: &str, store: &str) -> Product {
    serde_json::from_value(json!({
        "id": id,
        "title": title,
        "description": format!("Descripción de {title}"),
        "price": 1_000 * id,
        "images": [format!("https://cdn.example.cl/{id}.jpg")],
        "phone": "+56 9 8765 4321",
        "storeName": store,
        "categoria": category,
        "id_community": "valdivia",
        "id_store": store
    }))
    .unwrap()
}

struct MockState {
    fixture: Fixture,
    delay_ms: AtomicU64,
    malformed: AtomicBool,
    fail_status: Mutex<Option<u16>>,
    product_requests: AtomicUsize,
    queries: Mutex<Vec<HashMap<String, String>>>,
}

/// In-process marketplace backend.
pub struct MockMarketplace {
    addr: SocketAddr,
    state: Arc<MockState>,
}

impl MockMarketplace {
    /// Bind an ephemeral port and start serving `fixture`.
    pub async fn start(fixture: Fixture) -> Self {
        let state = Arc::new(MockState {
            fixture,
            delay_ms: AtomicU64::new(0),
            malformed: AtomicBool::new(false),
            fail_status: Mutex::new(None),
            product_requests: AtomicUsize::new(0),
            queries: Mutex::new(Vec::new()),
        });

        let app = Router::new()
            .route("/public/products", get(list_products))
            .route("/public/communities", get(list_communities))
            .route("/public/communities/{id}", get(get_community))
            .route("/public/stores", get(list_stores))
            .route("/public/stores/{id}", get(get_store))
            .route("/public/stores/{id}/products", get(list_store_products))
            .layer(middleware::from_fn(require_bearer))
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind mock backend");
        let addr = listener.local_addr().expect("Mock backend has no address");

        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Mock backend crashed");
        });

        Self { addr, state }
    }

    #[must_use]
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// API configuration pointing at this mock.
    #[must_use]
    pub fn api_config(&self) -> ApiConfig {
        let vars = HashMap::from([
            ("MERCADO_API_URL".to_string(), self.base_url()),
            ("MERCADO_PUBLIC_TOKEN".to_string(), TOKEN.to_string()),
            ("MERCADO_HTTP_TIMEOUT_SECS".to_string(), "5".to_string()),
        ]);
        let config = StorefrontConfig::from_lookup(move |key: &str| vars.get(key).cloned())
            .expect("Mock configuration is valid");
        config.require_api().expect("Api mode").clone()
    }

    #[must_use]
    pub fn client(&self) -> MarketplaceClient {
        MarketplaceClient::new(&self.api_config()).expect("Failed to build client")
    }

    /// Delay every product response by `delay`.
    pub fn set_delay(&self, delay: Duration) {
        let ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
        self.state.delay_ms.store(ms, Ordering::SeqCst);
    }

    /// Serve product pages that are missing required fields.
    pub fn set_malformed(&self, malformed: bool) {
        self.state.malformed.store(malformed, Ordering::SeqCst);
    }

    /// Answer product requests with `status` until cleared.
    pub fn fail_with(&self, status: Option<u16>) {
        *self.state.fail_status.lock().unwrap() = status;
    }

    /// Number of product page requests served.
    #[must_use]
    pub fn product_requests(&self) -> usize {
        self.state.product_requests.load(Ordering::SeqCst)
    }

    /// Query strings received by the product endpoints, in order.
    #[must_use]
    pub fn product_queries(&self) -> Vec<HashMap<String, String>> {
        self.state.queries.lock().unwrap().clone()
    }
}

async fn require_bearer(request: Request, next: Next) -> Response {
    let expected = format!("Bearer {TOKEN}");
    let authorized = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == expected);

    if authorized {
        next.run(request).await
    } else {
        (StatusCode::UNAUTHORIZED, Json(json!({ "error": "No autorizado" }))).into_response()
    }
}

fn not_found(message: &str) -> Response {
    (StatusCode::NOT_FOUND, Json(json!({ "error": message }))).into_response()
}

async fn product_page(
    state: &MockState,
    query: HashMap<String, String>,
    scope: impl Fn(&Product) -> bool,
) -> Response {
    state.product_requests.fetch_add(1, Ordering::SeqCst);
    state.queries.lock().unwrap().push(query.clone());

    let delay = state.delay_ms.load(Ordering::SeqCst);
    if delay > 0 {
        tokio::time::sleep(Duration::from_millis(delay)).await;
    }

    if let Some(status) = *state.fail_status.lock().unwrap() {
        let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        return (status, Json(json!({ "error": "Falla simulada" }))).into_response();
    }
    if state.malformed.load(Ordering::SeqCst) {
        return Json(json!({ "products": [{ "title": "sin id" }] })).into_response();
    }

    let page: u32 = query.get("page").and_then(|p| p.parse().ok()).unwrap_or(1);
    let limit: u32 = query.get("limit").and_then(|l| l.parse().ok()).unwrap_or(20);
    let search = query.get("search").map(|s| s.to_lowercase());
    let category = query.get("categoria");

    let matched: Vec<Product> = state
        .fixture
        .products
        .iter()
        .filter(|p| scope(p))
        .filter(|p| search.as_deref().is_none_or(|s| p.matches_search(s)))
        .filter(|p| category.is_none_or(|c| p.in_category(c)))
        .cloned()
        .collect();

    if matched.is_empty() {
        return not_found("No se encontraron productos");
    }

    let result = ResultPage::from_slice(&matched, page, limit);
    Json(json!({
        "products": result.items,
        "total": result.total_count,
        "page": result.current_page,
        "limit": limit,
        "totalPages": result.total_pages,
        "hasNext": result.has_more(),
        "hasPrev": result.has_previous()
    }))
    .into_response()
}

async fn list_products(
    State(state): State<Arc<MockState>>,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    product_page(&state, query, |_| true).await
}

async fn list_store_products(
    State(state): State<Arc<MockState>>,
    Path(id): Path<String>,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    if !state.fixture.stores.iter().any(|s| s.id.as_str() == id) {
        return not_found("Tienda no encontrada");
    }
    product_page(&state, query, |p| p.store_id.as_str() == id).await
}

async fn list_communities(State(state): State<Arc<MockState>>) -> Json<Value> {
    Json(json!([{ "comunidades": state.fixture.communities }]))
}

async fn get_community(State(state): State<Arc<MockState>>, Path(id): Path<String>) -> Response {
    state
        .fixture
        .communities
        .iter()
        .find(|c| c.id.as_str() == id)
        .map_or_else(
            || not_found("Comunidad no encontrada"),
            |c| Json(c.clone()).into_response(),
        )
}

async fn get_store(State(state): State<Arc<MockState>>, Path(id): Path<String>) -> Response {
    state
        .fixture
        .stores
        .iter()
        .find(|s| s.id.as_str() == id)
        .map_or_else(
            || not_found("Tienda no encontrada"),
            |s| Json(s.clone()).into_response(),
        )
}

async fn list_stores(
    State(state): State<Arc<MockState>>,
    Query(query): Query<HashMap<String, String>>,
) -> Json<Value> {
    let stores: Vec<&Store> = match query.get("comunidad") {
        Some(community) => state
            .fixture
            .stores
            .iter()
            .filter(|s| s.communities.iter().any(|c| c.as_str() == community))
            .collect(),
        None => state.fixture.stores.iter().collect(),
    };
    Json(json!({ "stores": stores }))
}
