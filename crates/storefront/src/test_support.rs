//! Fixtures shared by unit tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use mercado_core::{
    BlogPost, Community, CommunityId, Price, Product, ProductId, ResultPage, Store, StoreId,
};

use crate::catalog::{Dataset, LocalSource};
use crate::discovery::{ProductSource, Query, VisibilityObserver, VisibleCallback};
use crate::error::BrowseError;

pub fn product(id: i64, title: &str, category: &str) -> Product {
    Product {
        id: ProductId::new(id),
        title: title.to_string(),
        description: String::new(),
        long_description: String::new(),
        price: Price::new(1_000 * id),
        images: Vec::new(),
        phone: None,
        email: None,
        store_name: String::new(),
        store_dni: String::new(),
        store_logo: String::new(),
        facebook_link: None,
        instagram_link: None,
        category: category.to_string(),
        community_id: CommunityId::default(),
        store_id: StoreId::default(),
    }
}

/// `n` products with ids `1..=n` spread over seven categories.
pub fn catalog(n: usize) -> Vec<Product> {
    (1..=n)
        .map(|i| {
            let id = i64::try_from(i).unwrap_or(i64::MAX);
            product(id, &format!("Producto {i}"), &format!("Cat-{}", i % 7))
        })
        .collect()
}

/// Post `id` published on `date` (`YYYY-MM-DD`).
pub fn blog_post(id: i64, date: &str, tags: &[&str]) -> BlogPost {
    serde_json::from_value(serde_json::json!({
        "id": id,
        "title": format!("Artículo {id}"),
        "summary": format!("Resumen {id}"),
        "content": "Primer párrafo.\nSegundo párrafo.",
        "author": "Equipo Mercado",
        "date": date,
        "tags": tags,
    }))
    .unwrap_or_else(|err| panic!("invalid blog fixture: {err}"))
}

pub fn page_of(all: &[Product], page: u32, page_size: u32) -> ResultPage {
    ResultPage::from_slice(all, page, page_size)
}

pub fn sample_dataset() -> Dataset {
    let community = |id: &str, title: &str| Community {
        id: CommunityId::new(id),
        title: title.to_string(),
        name: None,
        description: String::new(),
        email: Some(format!("{id}@mercadocomunidad.cl")),
        phone: Some("+56 9 1111 2222".to_string()),
        open: true,
    };
    let store = |id: &str, name: &str, community: &str| Store {
        id: StoreId::new(id),
        name: name.to_string(),
        dni: "76.123.456-7".to_string(),
        logo: String::new(),
        description: String::new(),
        email: None,
        phone: Some("+56 9 3333 4444".to_string()),
        facebook: None,
        instagram: None,
        tiktok: None,
        link_store: None,
        communities: vec![CommunityId::new(community)],
    };
    let listed = |id: i64, title: &str, category: &str, store: &str, community: &str| {
        let mut p = product(id, title, category);
        p.store_id = StoreId::new(store);
        p.community_id = CommunityId::new(community);
        p.phone = Some("+56 9 3333 4444".to_string());
        p
    };

    Dataset::from_parts(
        vec![
            listed(1, "Silla de madera", "Hogar", "muebles-sur", "valdivia"),
            listed(2, "Mesa de comedor", "Hogar", "muebles-sur", "valdivia"),
            listed(3, "Pan amasado", "Alimentos", "panaderia-sur", "osorno"),
        ],
        vec![
            community(CommunityId::MARKETPLACE, "Mercado Comunidad"),
            community("valdivia", "Valdivia"),
        ],
        vec![
            store("muebles-sur", "Muebles del Sur", "valdivia"),
            store("panaderia-sur", "Panadería Sur", "osorno"),
        ],
    )
    .with_posts(vec![
        blog_post(1, "2024-02-14", &["Ventas"]),
        blog_post(2, "2024-05-03", &["Comunidad"]),
    ])
}

/// In-memory source that can be told to fail its next fetches.
pub struct ScriptedSource {
    inner: LocalSource,
    failures: Mutex<VecDeque<BrowseError>>,
    delay: Option<Duration>,
}

impl ScriptedSource {
    pub fn new(products: Vec<Product>) -> Self {
        Self {
            inner: LocalSource::new(products),
            failures: Mutex::new(VecDeque::new()),
            delay: None,
        }
    }

    /// Every fetch sleeps for `delay` before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn fail_next(&self, err: BrowseError) {
        self.failures
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(err);
    }
}

#[async_trait]
impl ProductSource for ScriptedSource {
    async fn fetch_page(&self, query: &Query) -> Result<ResultPage, BrowseError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        let failure = self
            .failures
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front();
        match failure {
            Some(err) => Err(err),
            None => self.inner.fetch_page(query).await,
        }
    }
}

#[derive(Default)]
struct ObserverState {
    next_handle: u64,
    observe_calls: usize,
    active: Vec<(u64, ProductId, VisibleCallback)>,
}

/// Observer whose visibility events are fired by hand.
#[derive(Clone, Default)]
pub struct FakeObserver {
    state: Arc<Mutex<ObserverState>>,
}

impl FakeObserver {
    /// Fire visibility for every observation of `target`.
    pub fn reveal(&self, target: ProductId) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        for (_, id, callback) in &mut state.active {
            if *id == target {
                callback();
            }
        }
    }

    pub fn active(&self) -> Vec<ProductId> {
        let state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.active.iter().map(|(_, id, _)| *id).collect()
    }

    pub fn observe_calls(&self) -> usize {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .observe_calls
    }
}

impl VisibilityObserver for FakeObserver {
    type Handle = u64;

    fn observe(&mut self, target: ProductId, on_visible: VisibleCallback) -> u64 {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.next_handle += 1;
        state.observe_calls += 1;
        let handle = state.next_handle;
        state.active.push((handle, target, on_visible));
        handle
    }

    fn unobserve(&mut self, handle: u64) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.active.retain(|(h, _, _)| *h != handle);
    }
}
