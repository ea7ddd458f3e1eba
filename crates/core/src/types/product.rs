//! Product records as published by marketplace stores.

use serde::{Deserialize, Deserializer, Serialize};

use super::contact::{product_inquiry, whatsapp_link};
use super::id::{CommunityId, ProductId, StoreId};
use super::price::Price;

/// A product listed by a store.
///
/// `id`, `title`, and `price` are required on the wire; every other field
/// defaults to empty so that sparse records from older datasets still parse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    /// Short description shown on cards.
    #[serde(default)]
    pub description: String,
    /// Long description shown on the detail page.
    #[serde(default)]
    pub long_description: String,
    pub price: Price,
    /// Image URLs in display order.
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub email: Option<String>,
    #[serde(default)]
    pub store_name: String,
    /// Store tax identifier (RUT), shown under the store name.
    #[serde(default, rename = "storeDNI")]
    pub store_dni: String,
    #[serde(default)]
    pub store_logo: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub facebook_link: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub instagram_link: Option<String>,
    #[serde(default, rename = "categoria")]
    pub category: String,
    #[serde(default, rename = "id_community")]
    pub community_id: CommunityId,
    #[serde(default, rename = "id_store")]
    pub store_id: StoreId,
}

impl Product {
    /// Case-insensitive substring match over title, description, and store name.
    ///
    /// `needle` must already be lowercased; an empty needle matches everything.
    #[must_use]
    pub fn matches_search(&self, needle: &str) -> bool {
        needle.is_empty()
            || self.title.to_lowercase().contains(needle)
            || self.description.to_lowercase().contains(needle)
            || self.store_name.to_lowercase().contains(needle)
    }

    /// Exact category match.
    #[must_use]
    pub fn in_category(&self, category: &str) -> bool {
        self.category == category
    }

    /// First image, used as the card thumbnail.
    #[must_use]
    pub fn primary_image(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }

    /// WhatsApp deep link asking the seller about this product.
    #[must_use]
    pub fn whatsapp_link(&self) -> Option<String> {
        self.phone
            .as_deref()
            .map(|phone| whatsapp_link(phone, &product_inquiry(&self.title)))
    }
}

/// Deserialize empty strings (and nulls) as `None`.
pub(crate) fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    Ok(s.filter(|s| !s.trim().is_empty()))
}
