//! Blog posts published by the marketplace.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use super::id::BlogPostId;

const MONTHS_ES: [&str; 12] = [
    "enero",
    "febrero",
    "marzo",
    "abril",
    "mayo",
    "junio",
    "julio",
    "agosto",
    "septiembre",
    "octubre",
    "noviembre",
    "diciembre",
];

/// A blog article.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlogPost {
    pub id: BlogPostId,
    pub title: String,
    /// Teaser shown on the index card.
    #[serde(default)]
    pub summary: String,
    /// Body text, one paragraph per line.
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub author: String,
    /// Publication date (`YYYY-MM-DD`).
    pub date: NaiveDate,
    /// Cover image URL.
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl BlogPost {
    /// Non-blank paragraphs of the body.
    pub fn paragraphs(&self) -> impl Iterator<Item = &str> {
        self.content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
    }

    /// Publication date as shown to readers, e.g. `15 de marzo de 2024`.
    #[must_use]
    pub fn display_date(&self) -> String {
        long_date_es(self.date)
    }

    /// Case-insensitive tag match.
    #[must_use]
    pub fn has_tag(&self, tag: &str) -> bool {
        let tag = tag.to_lowercase();
        self.tags.iter().any(|t| t.to_lowercase() == tag)
    }
}

/// Long Spanish date: day, month name, and year.
#[must_use]
pub fn long_date_es(date: NaiveDate) -> String {
    let month = MONTHS_ES
        .get(date.month0() as usize)
        .copied()
        .unwrap_or_default();
    format!("{} de {month} de {}", date.day(), date.year())
}
