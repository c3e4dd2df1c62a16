//! Static post registry
//!
//! The registry is the single table of posts the rest of the application
//! reads from: an ordered id list (display order, most-recent-first by
//! convention) plus an id -> entry mapping. It is built once from
//! configuration and never mutated afterwards, so it can be shared across
//! views without locking.

use chrono::{DateTime, FixedOffset};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Registry construction errors
#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("duplicate post id: {0}")]
    DuplicateId(String),

    #[error("post id is not slug-shaped: {0:?}")]
    InvalidId(String),
}

/// Display metadata for a single post
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostEntry {
    /// Unique slug identifying the post and its markdown document
    pub id: String,

    /// Post title
    pub title: String,

    /// Publication date as an ISO-8601 timestamp string
    pub date: String,

    /// Short description shown in list views
    #[serde(default)]
    pub description: String,
}

impl PostEntry {
    /// Parsed publication date, if `date` is a valid ISO-8601 timestamp
    pub fn published(&self) -> Option<DateTime<FixedOffset>> {
        DateTime::parse_from_rfc3339(&self.date).ok()
    }
}

/// Immutable id -> entry table with a stable display order
#[derive(Debug, Clone)]
pub struct PostRegistry {
    ids: Vec<String>,
    entries: IndexMap<String, PostEntry>,
}

impl PostRegistry {
    /// Build a registry from a post table, validating its invariants:
    /// ids are unique and slug-shaped. A non-parseable date is tolerated
    /// (views fall back to the raw string) but logged.
    pub fn new(posts: Vec<PostEntry>) -> Result<Self, RegistryError> {
        let mut ids = Vec::with_capacity(posts.len());
        let mut entries = IndexMap::with_capacity(posts.len());

        for post in posts {
            if post.id.is_empty() || slug::slugify(&post.id) != post.id {
                return Err(RegistryError::InvalidId(post.id));
            }
            if entries.contains_key(&post.id) {
                return Err(RegistryError::DuplicateId(post.id));
            }
            if post.published().is_none() {
                tracing::warn!("post `{}` has a non ISO-8601 date: {}", post.id, post.date);
            }
            ids.push(post.id.clone());
            entries.insert(post.id.clone(), post);
        }

        Ok(Self { ids, entries })
    }

    /// Look up a post by id. `None` means the id is absent from the table;
    /// callers render placeholder fields instead of failing.
    pub fn get(&self, id: &str) -> Option<&PostEntry> {
        self.entries.get(id)
    }

    /// Post ids in declaration order
    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    /// Entries in declaration order
    pub fn entries(&self) -> impl Iterator<Item = &PostEntry> {
        self.entries.values()
    }

    /// Number of posts
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Whether the registry holds no posts
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::default_posts;

    fn entry(id: &str) -> PostEntry {
        PostEntry {
            id: id.to_string(),
            title: format!("Title for {}", id),
            date: "2018-06-18T13:37:27+00:00".to_string(),
            description: String::new(),
        }
    }

    #[test]
    fn test_every_listed_id_resolves() {
        let registry = PostRegistry::new(default_posts()).unwrap();
        for id in registry.ids() {
            let post = registry.get(id).unwrap();
            assert!(!post.title.is_empty());
        }
    }

    #[test]
    fn test_order_matches_declaration() {
        let registry = PostRegistry::new(vec![entry("b-post"), entry("a-post")]).unwrap();
        assert_eq!(registry.ids(), ["b-post", "a-post"]);
        let titles: Vec<_> = registry.entries().map(|p| p.id.as_str()).collect();
        assert_eq!(titles, ["b-post", "a-post"]);
    }

    #[test]
    fn test_missing_id_is_none() {
        let registry = PostRegistry::new(default_posts()).unwrap();
        assert!(registry.get("nonexistent").is_none());
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let err = PostRegistry::new(vec![entry("same"), entry("same")]).unwrap_err();
        assert!(matches!(err, RegistryError::DuplicateId(id) if id == "same"));
    }

    #[test]
    fn test_non_slug_id_rejected() {
        let err = PostRegistry::new(vec![entry("Not A Slug")]).unwrap_err();
        assert!(matches!(err, RegistryError::InvalidId(_)));

        let err = PostRegistry::new(vec![entry("")]).unwrap_err();
        assert!(matches!(err, RegistryError::InvalidId(_)));
    }

    #[test]
    fn test_invalid_date_is_tolerated() {
        let mut post = entry("odd-date");
        post.date = "sometime in june".to_string();
        let registry = PostRegistry::new(vec![post]).unwrap();
        assert!(registry.get("odd-date").unwrap().published().is_none());
    }

    #[test]
    fn test_default_table_shape() {
        let registry = PostRegistry::new(default_posts()).unwrap();
        assert_eq!(registry.len(), 8);
        assert_eq!(registry.ids()[0], "thinking-prpl");
    }
}
