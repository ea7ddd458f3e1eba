//! Communities directory.

use mercado_core::Community;
use serde::Serialize;
use tracing::instrument;

use super::PageView;
use crate::api::MarketplaceClient;
use crate::routing::stores_path;

pub const LOAD_FAILED: &str = "Hubo un problema al cargar las comunidades.";

/// One entry of the directory.
#[derive(Debug, Clone, Serialize)]
pub struct CommunityCard {
    pub community: Community,
    /// "Activa" or "Inactiva".
    pub status: &'static str,
    /// Link to the community's stores.
    pub link: String,
}

impl From<Community> for CommunityCard {
    fn from(community: Community) -> Self {
        Self {
            status: if community.open { "Activa" } else { "Inactiva" },
            link: stores_path(&community.id),
            community,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CommunitiesPage {
    pub communities: Vec<CommunityCard>,
}

/// Load every community from the API.
#[instrument(skip(client))]
pub async fn load_communities(client: &MarketplaceClient) -> PageView<CommunitiesPage> {
    let result = client.list_communities().await.map(|communities| CommunitiesPage {
        communities: communities.into_iter().map(CommunityCard::from).collect(),
    });
    PageView::from_result(result.map_err(Into::into), LOAD_FAILED)
}
