//! Home page: the shuffled product listing of a community or store.

use mercado_core::{Community, ContactCard, Store};

use super::PageView;
use crate::catalog::{Dataset, ShuffledListing};
use crate::error::BrowseError;
use crate::routing::RouteParams;

/// Shown when loading the dataset itself failed.
pub const LOAD_FAILED: &str = "Error cargando los datos";

/// Resolved home page.
#[derive(Debug, Clone)]
pub struct HomePage {
    pub route: RouteParams,
    pub community: Community,
    /// Store the view is narrowed to, if any.
    pub store: Option<Store>,
    /// Who the contact button reaches.
    pub contact: ContactCard,
    /// Stores offered in the menu; empty when a store is already selected.
    pub stores_menu: Vec<Store>,
    pub listing: ShuffledListing,
}

/// Resolve the home page for `route` from the local dataset.
pub fn load_home(dataset: &Dataset, route: &RouteParams, page_size: u32) -> PageView<HomePage> {
    PageView::from_result(resolve(dataset, route, page_size), LOAD_FAILED)
}

fn resolve(dataset: &Dataset, route: &RouteParams, page_size: u32) -> Result<HomePage, BrowseError> {
    let community_id = route.community_or_default();
    let community = dataset
        .community(&community_id)
        .cloned()
        .ok_or_else(|| BrowseError::Configuration("Comunidad no encontrada".to_string()))?;

    let store = route
        .store
        .as_ref()
        .map(|id| {
            dataset
                .store(id)
                .cloned()
                .ok_or_else(|| BrowseError::Configuration("Tienda no encontrada".to_string()))
        })
        .transpose()?;

    let stores_menu = if route.shows_stores_menu() {
        dataset
            .stores()
            .iter()
            .filter(|s| community_id.is_marketplace() || s.belongs_to(&community_id))
            .cloned()
            .collect()
    } else {
        Vec::new()
    };

    let products = dataset.scoped_products(&community_id, route.store.as_ref());
    tracing::debug!(
        community = %community_id,
        store = ?route.store,
        products = products.len(),
        "Resolved home page"
    );

    Ok(HomePage {
        route: route.clone(),
        contact: ContactCard::for_scope(&community, store.as_ref()),
        community,
        store,
        stores_menu,
        listing: ShuffledListing::new(products, page_size),
    })
}
