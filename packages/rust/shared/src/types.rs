//! Core domain types for the sitekb knowledge base.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Maximum length (in characters) of a projected product description.
pub const DESCRIPTION_MAX_CHARS: usize = 200;

// ---------------------------------------------------------------------------
// Entry
// ---------------------------------------------------------------------------

/// One crawled page's extracted record.
///
/// An entry exists for a URL only when both `title` and `content` came out
/// non-empty after extraction. `content` is plain text with whitespace runs
/// collapsed to single spaces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    /// Unique entry identifier (UUID v7, generated at extraction time).
    pub id: Uuid,
    /// The page URL this entry was extracted from.
    pub url: String,
    /// Page title, trimmed.
    pub title: String,
    /// Normalized plain-text body.
    pub content: String,
    /// Category derived from breadcrumbs or the URL path.
    pub category: String,
    /// Tags from meta keywords and tag elements, insertion order preserved.
    pub tags: Vec<String>,
    /// When this entry was extracted.
    pub last_updated: DateTime<Utc>,
}

impl Entry {
    /// Create an entry with a fresh id and timestamp.
    pub fn new(
        url: impl Into<String>,
        title: impl Into<String>,
        content: impl Into<String>,
        category: impl Into<String>,
        tags: Vec<String>,
    ) -> Self {
        Self {
            id: Uuid::now_v7(),
            url: url.into(),
            title: title.into(),
            content: content.into(),
            category: category.into(),
            tags,
            last_updated: Utc::now(),
        }
    }
}

// ---------------------------------------------------------------------------
// Category projections
// ---------------------------------------------------------------------------

/// Lossy product view of an entry (category `"products"`).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub category: String,
    /// First [`DESCRIPTION_MAX_CHARS`] characters of the entry content.
    pub description: String,
}

impl From<&Entry> for Product {
    fn from(entry: &Entry) -> Self {
        Self {
            id: entry.id,
            name: entry.title.clone(),
            category: entry.category.clone(),
            description: entry.content.chars().take(DESCRIPTION_MAX_CHARS).collect(),
        }
    }
}

/// Lossy client view of an entry (category `"clients"`).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Client {
    pub id: Uuid,
    pub name: String,
    /// Representative tag, when the entry has one.
    pub industry: Option<String>,
}

impl From<&Entry> for Client {
    fn from(entry: &Entry) -> Self {
        Self {
            id: entry.id,
            name: entry.title.clone(),
            industry: entry.tags.first().cloned(),
        }
    }
}

/// Lossy supplier view of an entry (category `"suppliers"`).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Supplier {
    pub id: Uuid,
    pub name: String,
    /// Representative tag, when the entry has one.
    pub category: Option<String>,
}

impl From<&Entry> for Supplier {
    fn from(entry: &Entry) -> Self {
        Self {
            id: entry.id,
            name: entry.title.clone(),
            category: entry.tags.first().cloned(),
        }
    }
}
