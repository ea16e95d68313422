//! Client-side search index
//!
//! Every post is projected onto five fields and rendered as one JSON array.
//! Order follows the collection; nothing is filtered, deduplicated or sorted.

use chrono::{DateTime, Utc};
use newsdesk_core::{Category, Collection, Error, Post, Result};
use serde::{Serialize, Serializer};

/// Reduced, serializable view of a [`Post`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchIndexEntry {
    pub title: String,
    pub description: String,
    pub slug: String,
    pub category: Category,
    #[serde(serialize_with = "serialize_js_date")]
    pub date: DateTime<Utc>,
}

impl From<&Post> for SearchIndexEntry {
    fn from(post: &Post) -> Self {
        Self {
            title: post.title.clone(),
            description: post.description.clone(),
            slug: post.slug.clone(),
            category: post.category,
            date: post.date,
        }
    }
}

/// `2024-01-01T00:00:00.000Z`, the form a browser's `Date` serializes to
fn serialize_js_date<S: Serializer>(
    date: &DateTime<Utc>,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.collect_str(&date.format("%Y-%m-%dT%H:%M:%S%.3fZ"))
}

pub fn build_search_index(collection: &Collection) -> Vec<SearchIndexEntry> {
    collection.iter().map(SearchIndexEntry::from).collect()
}

pub fn render_search_index(entries: &[SearchIndexEntry]) -> Result<String> {
    serde_json::to_string(entries)
        .map_err(|e| Error::InvalidData(format!("Failed to serialize search index: {}", e)))
}
