//! Stores of one community.

use mercado_core::{Community, Store};
use serde::Serialize;
use tracing::instrument;

use super::PageView;
use crate::api::MarketplaceClient;
use crate::error::BrowseError;
use crate::routing::{RouteParams, store_products_path};

pub const LOAD_FAILED: &str = "Hubo un problema al cargar los datos.";
pub const MISSING_COMMUNITY: &str = "No se proporcionó ID de comunidad";

#[derive(Debug, Clone, Serialize)]
pub struct StoresPage {
    pub community: Community,
    /// Each store with the link to its product listing.
    pub stores: Vec<(Store, String)>,
}

impl StoresPage {
    /// Whether to show the "no stores" message.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stores.is_empty()
    }
}

/// Load a community and its stores. Requires `comunidad` in `route`.
#[instrument(skip(client))]
pub async fn load_stores(client: &MarketplaceClient, route: &RouteParams) -> PageView<StoresPage> {
    let Some(community_id) = &route.community else {
        return PageView::from_result(
            Err(BrowseError::Configuration(MISSING_COMMUNITY.to_string())),
            LOAD_FAILED,
        );
    };

    let result = tokio::try_join!(
        client.get_community(community_id),
        client.list_stores(community_id),
    )
    .map(|(community, stores)| StoresPage {
        community,
        stores: stores
            .into_iter()
            .map(|store| {
                let link = store_products_path(&store.id);
                (store, link)
            })
            .collect(),
    });

    PageView::from_result(result.map_err(Into::into), LOAD_FAILED)
}
