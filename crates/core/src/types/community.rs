//! Communities: the top-level grouping of stores.

use serde::{Deserialize, Serialize};

use super::id::CommunityId;
use super::product::empty_string_as_none;

/// A marketplace community.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Community {
    pub id: CommunityId,
    #[serde(default)]
    pub title: String,
    /// Short name; older records carry only this and no `title`.
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub phone: Option<String>,
    /// Whether the community accepts new stores.
    #[serde(default)]
    pub open: bool,
}

impl Community {
    /// Title if present, falling back to the short name and then the slug.
    #[must_use]
    pub fn display_name(&self) -> &str {
        if !self.title.is_empty() {
            return &self.title;
        }
        self.name.as_deref().unwrap_or_else(|| self.id.as_str())
    }
}
