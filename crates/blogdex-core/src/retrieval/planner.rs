use crate::models::SearchRequest;

/// Turn raw request parameters into a [`SearchRequest`].
///
/// Terms are the lowercase whitespace-separated tokens of `raw_query`. Tags
/// are the trimmed, lowercase, non-empty entries of the comma-separated
/// `raw_tags`, in request order; duplicates are kept for the engine to fold.
#[must_use]
pub fn plan_query(raw_query: Option<&str>, raw_tags: Option<&str>) -> SearchRequest {
    let query = raw_query.unwrap_or_default().trim().to_string();
    SearchRequest {
        terms: split_terms(&query),
        tags: split_tags(raw_tags.unwrap_or_default()),
        query,
    }
}

#[must_use]
pub fn split_terms(query: &str) -> Vec<String> {
    query
        .to_lowercase()
        .split_whitespace()
        .map(ToString::to_string)
        .collect()
}

#[must_use]
pub fn split_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|tag| tag.trim().to_lowercase())
        .filter(|tag| !tag.is_empty())
        .collect()
}
