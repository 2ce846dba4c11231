use std::collections::{BTreeSet, HashMap, HashSet};

use serde::Deserialize;
use serde_json::Value;

use crate::error::{Result, SearchError};
use crate::models::{ArticleMeta, IndexMetadata, SearchIndex};

/// Layout published before the sorted keyword list and tag index existed.
#[derive(Debug, Deserialize)]
struct LegacyArtifact {
    index: HashMap<String, Vec<LegacyArticleRef>>,
    articles: Vec<LegacyArticle>,
    #[serde(default)]
    metadata: IndexMetadata,
}

#[derive(Debug, Deserialize)]
struct LegacyArticleRef {
    slug: String,
}

#[derive(Debug, Deserialize)]
struct LegacyArticle {
    slug: String,
    #[serde(flatten)]
    meta: ArticleMeta,
}

/// Decode a published artifact, accepting both the current and the legacy
/// layout, and repair the derived structures the engine relies on.
pub fn decode_artifact(bytes: &[u8]) -> Result<SearchIndex> {
    let value: Value = serde_json::from_slice(bytes)
        .map_err(|err| SearchError::IndexMalformed(format!("artifact is not valid JSON: {err}")))?;
    if !value.is_object() {
        return Err(SearchError::IndexMalformed(
            "artifact root must be a JSON object".to_string(),
        ));
    }

    let index = if value.get("articles").is_some_and(Value::is_array) {
        let legacy: LegacyArtifact = serde_json::from_value(value)
            .map_err(|err| SearchError::IndexMalformed(format!("legacy artifact: {err}")))?;
        from_legacy(legacy)
    } else {
        let current: SearchIndex = serde_json::from_value(value)
            .map_err(|err| SearchError::IndexMalformed(format!("artifact: {err}")))?;
        current
    };

    Ok(normalize(index))
}

fn from_legacy(legacy: LegacyArtifact) -> SearchIndex {
    let keyword_index = legacy
        .index
        .into_iter()
        .map(|(keyword, refs)| {
            let slugs = refs.into_iter().map(|article| article.slug).collect();
            (keyword, slugs)
        })
        .collect::<HashMap<_, Vec<_>>>();

    let mut articles = HashMap::with_capacity(legacy.articles.len());
    for article in legacy.articles {
        articles.insert(article.slug, article.meta);
    }

    let (tag_index, tags) = derive_tag_index(&articles);
    let mut metadata = legacy.metadata;
    metadata.total_tags = tags.len();

    SearchIndex {
        keyword_index,
        sorted_keywords: None,
        tag_index,
        articles,
        tags,
        metadata,
    }
}

/// Build `tag -> slugs` (lowercase keys, slugs in ascending order) and the
/// sorted list of distinct tags from article metadata.
pub(crate) fn derive_tag_index(
    articles: &HashMap<String, ArticleMeta>,
) -> (HashMap<String, Vec<String>>, Vec<String>) {
    let mut slugs = articles.keys().collect::<Vec<_>>();
    slugs.sort();

    let mut tag_index: HashMap<String, Vec<String>> = HashMap::new();
    let mut tags = BTreeSet::new();
    for slug in slugs {
        let mut seen = HashSet::new();
        for tag in &articles[slug].tags {
            let tag = tag.trim().to_lowercase();
            if tag.is_empty() || !seen.insert(tag.clone()) {
                continue;
            }
            tag_index.entry(tag.clone()).or_default().push(slug.clone());
            tags.insert(tag);
        }
    }
    (tag_index, tags.into_iter().collect())
}

fn normalize(mut index: SearchIndex) -> SearchIndex {
    let listed = index.sorted_keywords.as_ref().map_or(0, Vec::len);
    let stale = index
        .sorted_keywords
        .as_ref()
        .is_some_and(|sorted| !sorted_keywords_consistent(sorted, &index.keyword_index));
    if stale {
        tracing::warn!(
            listed,
            indexed = index.keyword_index.len(),
            "sorted keyword list disagrees with keyword index; rebuilding it"
        );
        index.sorted_keywords = Some(sorted_keys(&index.keyword_index));
    }

    if index.tag_index.keys().any(|tag| *tag != tag.to_lowercase()) {
        tracing::warn!("tag index carries non-lowercase keys; folding them");
        let mut folded: HashMap<String, Vec<String>> = HashMap::new();
        for (tag, slugs) in std::mem::take(&mut index.tag_index) {
            let entry = folded.entry(tag.to_lowercase()).or_default();
            for slug in slugs {
                if !entry.contains(&slug) {
                    entry.push(slug);
                }
            }
        }
        index.tag_index = folded;
    }

    let dangling = count_dangling_slugs(&index);
    if dangling > 0 {
        tracing::debug!(
            dangling,
            "artifact references slugs without article metadata; they will be skipped"
        );
    }

    index
}

pub(crate) fn sorted_keys(keyword_index: &HashMap<String, Vec<String>>) -> Vec<String> {
    let mut keys = keyword_index.keys().cloned().collect::<Vec<_>>();
    keys.sort();
    keys
}

fn sorted_keywords_consistent(
    sorted: &[String],
    keyword_index: &HashMap<String, Vec<String>>,
) -> bool {
    sorted.len() == keyword_index.len()
        && sorted.windows(2).all(|pair| pair[0] < pair[1])
        && sorted.iter().all(|key| keyword_index.contains_key(key))
}

fn count_dangling_slugs(index: &SearchIndex) -> usize {
    index
        .keyword_index
        .values()
        .chain(index.tag_index.values())
        .flatten()
        .filter(|slug| !index.articles.contains_key(slug.as_str()))
        .count()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn current_artifact() -> Value {
        json!({
            "index": {
                "rust": ["intro-rust"],
                "async": ["intro-rust", "tokio-notes"]
            },
            "keywords": ["async", "rust"],
            "tagIndex": { "rust": ["intro-rust"] },
            "articles": {
                "intro-rust": {
                    "title": "Intro to Rust",
                    "description": "First steps",
                    "tags": ["rust"],
                    "date": "2025-02-01"
                },
                "tokio-notes": {
                    "title": "Tokio notes",
                    "description": "Runtime notes",
                    "tags": [],
                    "date": "2025-03-01"
                }
            },
            "tags": ["rust"],
            "metadata": {
                "total_articles": 2,
                "total_keywords": 2,
                "total_tags": 1,
                "generated_at": "2025-03-02T00:00:00Z"
            }
        })
    }

    fn to_bytes(value: &Value) -> Vec<u8> {
        serde_json::to_vec(value).expect("serialize artifact")
    }

    #[test]
    fn decodes_current_layout() {
        let index = decode_artifact(&to_bytes(&current_artifact())).expect("decode");
        assert_eq!(
            index.sorted_keywords.as_deref(),
            Some(&["async".to_string(), "rust".to_string()][..])
        );
        assert_eq!(index.tag_slugs("rust"), ["intro-rust".to_string()]);
        assert_eq!(index.metadata.total_tags, 1);
        assert_eq!(
            index.article("tokio-notes").map(|a| a.title.as_str()),
            Some("Tokio notes")
        );
    }

    #[test]
    fn rebuilds_unsorted_keyword_list() {
        let mut raw = current_artifact();
        raw["keywords"] = json!(["rust", "async", "rust"]);
        let index = decode_artifact(&to_bytes(&raw)).expect("decode");
        assert_eq!(
            index.sorted_keywords,
            Some(vec!["async".to_string(), "rust".to_string()])
        );
    }

    #[test]
    fn folds_uppercase_tag_keys() {
        let mut raw = current_artifact();
        raw["tagIndex"] = json!({ "Rust": ["intro-rust"], "rust": ["intro-rust", "tokio-notes"] });
        let index = decode_artifact(&to_bytes(&raw)).expect("decode");
        let mut slugs = index.tag_slugs("rust").to_vec();
        slugs.sort();
        assert_eq!(slugs, vec!["intro-rust", "tokio-notes"]);
        assert!(index.tag_index.get("Rust").is_none());
    }

    #[test]
    fn decodes_legacy_layout_without_sorted_keywords() {
        let raw = json!({
            "index": {
                "rust": [{
                    "slug": "intro-rust",
                    "title": "Intro to Rust",
                    "description": "First steps",
                    "tags": ["Rust", "Beginner"],
                    "date": "2025-02-01"
                }]
            },
            "articles": [{
                "slug": "intro-rust",
                "title": "Intro to Rust",
                "description": "First steps",
                "tags": ["Rust", "Beginner"],
                "date": "2025-02-01",
                "keywords": ["rust"]
            }],
            "metadata": {
                "total_articles": 1,
                "total_keywords": 1,
                "generated_at": "BUILD_TIME"
            }
        });
        let index = decode_artifact(&to_bytes(&raw)).expect("decode legacy");
        assert!(!index.has_sorted_keywords());
        assert_eq!(index.keyword_slugs("rust"), ["intro-rust".to_string()]);
        assert_eq!(index.tags, vec!["beginner", "rust"]);
        assert_eq!(index.tag_slugs("beginner"), ["intro-rust".to_string()]);
        assert_eq!(index.metadata.total_tags, 2);
    }

    #[test]
    fn rejects_schema_violations_as_malformed() {
        let mut raw = current_artifact();
        raw["index"] = json!({ "rust": "intro-rust" });
        let err = decode_artifact(&to_bytes(&raw)).expect_err("must reject");
        assert!(matches!(err, SearchError::IndexMalformed(_)));

        let err = decode_artifact(b"not json").expect_err("must reject");
        assert!(matches!(err, SearchError::IndexMalformed(_)));

        let err = decode_artifact(b"[1, 2]").expect_err("must reject");
        assert!(matches!(err, SearchError::IndexMalformed(_)));
    }
}
