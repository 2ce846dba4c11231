use crate::models::{SearchIndex, SearchRequest, SearchResponse, SearchResult};

/// Shape ranked results into the client response.
///
/// The query and tags are echoed only when non-empty; tags are echoed in
/// their normalized form. `availableTags` always lists every indexed tag.
#[must_use]
pub fn format_response(
    index: &SearchIndex,
    request: &SearchRequest,
    results: Vec<SearchResult>,
) -> SearchResponse {
    SearchResponse {
        query: (!request.query.is_empty()).then(|| request.query.clone()),
        tags: (!request.tags.is_empty()).then(|| request.tags.clone()),
        available_tags: index.tags.clone(),
        count: results.len(),
        results,
    }
}
