//! Stores: sellers that belong to one or more communities.

use serde::{Deserialize, Serialize};

use super::id::{CommunityId, StoreId};
use super::product::empty_string_as_none;

/// A store as served by the backend.
///
/// The backend uses capitalized keys for most store fields; older fixtures use
/// lowercase ones, which are accepted as aliases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Store {
    #[serde(alias = "ID")]
    pub id: StoreId,
    #[serde(default, rename = "Name", alias = "name")]
    pub name: String,
    /// Tax identifier (RUT).
    #[serde(default, rename = "DNI", alias = "dni")]
    pub dni: String,
    #[serde(default, rename = "Logo", alias = "logo")]
    pub logo: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub phone: Option<String>,
    #[serde(
        default,
        rename = "Facebook",
        alias = "facebook",
        deserialize_with = "empty_string_as_none"
    )]
    pub facebook: Option<String>,
    #[serde(
        default,
        rename = "Instagram",
        alias = "instagram",
        deserialize_with = "empty_string_as_none"
    )]
    pub instagram: Option<String>,
    #[serde(
        default,
        rename = "TikTok",
        alias = "tiktok",
        deserialize_with = "empty_string_as_none"
    )]
    pub tiktok: Option<String>,
    /// Slug used in the store's public product listing URL.
    #[serde(
        default,
        rename = "LinkStore",
        alias = "linkStore",
        deserialize_with = "empty_string_as_none"
    )]
    pub link_store: Option<String>,
    #[serde(default)]
    pub communities: Vec<CommunityId>,
}

impl Store {
    /// Social profile links that are present, labelled by platform.
    #[must_use]
    pub fn social_links(&self) -> Vec<(&'static str, &str)> {
        [
            ("Facebook", self.facebook.as_deref()),
            ("Instagram", self.instagram.as_deref()),
            ("TikTok", self.tiktok.as_deref()),
        ]
        .into_iter()
        .filter_map(|(platform, link)| link.map(|link| (platform, link)))
        .collect()
    }

    /// Whether the store is listed in `community`.
    #[must_use]
    pub fn belongs_to(&self, community: &CommunityId) -> bool {
        self.communities.contains(community)
    }
}
