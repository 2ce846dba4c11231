use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Metadata for one published article, keyed by slug in [`SearchIndex::articles`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ArticleMeta {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub date: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct IndexMetadata {
    pub total_articles: usize,
    pub total_keywords: usize,
    #[serde(default)]
    pub total_tags: usize,
    pub generated_at: String,
}

/// The immutable search artifact.
///
/// Serializes to the current published format. `sorted_keywords` is `None`
/// only for artifacts decoded from the legacy layout, which never carried a
/// sorted keyword list; the engine falls back to substring matching then.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct SearchIndex {
    #[serde(rename = "index")]
    pub keyword_index: HashMap<String, Vec<String>>,
    #[serde(rename = "keywords", default, skip_serializing_if = "Option::is_none")]
    pub sorted_keywords: Option<Vec<String>>,
    #[serde(default)]
    pub tag_index: HashMap<String, Vec<String>>,
    pub articles: HashMap<String, ArticleMeta>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub metadata: IndexMetadata,
}

impl SearchIndex {
    #[must_use]
    pub fn article(&self, slug: &str) -> Option<&ArticleMeta> {
        self.articles.get(slug)
    }

    #[must_use]
    pub fn keyword_slugs(&self, keyword: &str) -> &[String] {
        self.keyword_index
            .get(keyword)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    #[must_use]
    pub fn tag_slugs(&self, tag: &str) -> &[String] {
        self.tag_index
            .get(tag)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    #[must_use]
    pub fn has_sorted_keywords(&self) -> bool {
        self.sorted_keywords.is_some()
    }
}
