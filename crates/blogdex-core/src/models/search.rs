use serde::{Deserialize, Serialize};

use super::ArticleMeta;

/// Normalized search input produced by the query planner.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchRequest {
    pub query: String,
    pub terms: Vec<String>,
    pub tags: Vec<String>,
}

impl SearchRequest {
    /// No terms and no tags: the caller has nothing to search for.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty() && self.tags.is_empty()
    }

    #[must_use]
    pub fn is_combined(&self) -> bool {
        !self.terms.is_empty() && !self.tags.is_empty()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    pub slug: String,
    pub title: String,
    pub description: String,
    pub tags: Vec<String>,
    pub date: String,
    pub relevance: usize,
    pub matched_keywords: Vec<String>,
}

impl SearchResult {
    pub(crate) fn from_article(slug: &str, article: &ArticleMeta, relevance: usize) -> Self {
        Self {
            slug: slug.to_string(),
            title: article.title.clone(),
            description: article.description.clone(),
            tags: article.tags.clone(),
            date: article.date.clone(),
            relevance,
            matched_keywords: Vec::new(),
        }
    }

    /// Returns `true` when the keyword was not matched before.
    pub(crate) fn record_keyword(&mut self, keyword: &str) -> bool {
        if self.matched_keywords.iter().any(|seen| seen == keyword) {
            return false;
        }
        self.matched_keywords.push(keyword.to_string());
        true
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    pub available_tags: Vec<String>,
    pub count: usize,
    pub results: Vec<SearchResult>,
}

/// Per-phase wall clock timings in milliseconds.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SearchTiming {
    pub index_fetch: f64,
    pub tag_filter: f64,
    pub text_search: f64,
    pub post_filter: f64,
    pub total: f64,
}

/// Coarse result-count category recorded with telemetry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultCountBucket {
    Zero,
    OneToFive,
    SixToTen,
    ElevenPlus,
}

impl ResultCountBucket {
    #[must_use]
    pub const fn from_count(count: usize) -> Self {
        match count {
            0 => Self::Zero,
            1..=5 => Self::OneToFive,
            6..=10 => Self::SixToTen,
            _ => Self::ElevenPlus,
        }
    }

    /// Stable index value used by analytics consumers.
    #[must_use]
    pub const fn as_index(self) -> &'static str {
        match self {
            Self::Zero => "0",
            Self::OneToFive => "1",
            Self::SixToTen => "2",
            Self::ElevenPlus => "3",
        }
    }
}
