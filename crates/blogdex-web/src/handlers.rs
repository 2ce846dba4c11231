use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};

use blogdex_core::SearchError;

use crate::WebState;
use crate::dto::SearchQuery;
use crate::error::{method_not_allowed_response, search_error_response};

pub const CACHE_CONTROL: &str = "public, max-age=300";

pub async fn search(
    State(state): State<WebState>,
    params: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Response {
    let query = match params {
        Ok(Query(pairs)) => SearchQuery::from_pairs(pairs),
        Err(rejection) => {
            return search_error_response(SearchError::InvalidRequest(rejection.body_text()));
        }
    };
    let text = query.text().map(ToString::to_string);
    let tags = query.tags;
    let service = state.service.clone();
    let task = move || service.execute(text.as_deref(), tags.as_deref());

    // Index fetches use a blocking HTTP client; keep them off the async workers.
    match tokio::task::spawn_blocking(task).await {
        Ok(Ok(response)) => (
            StatusCode::OK,
            [(header::CACHE_CONTROL, CACHE_CONTROL)],
            Json(response),
        )
            .into_response(),
        Ok(Err(err)) => search_error_response(err),
        Err(join_err) => search_error_response(SearchError::Internal(format!(
            "search task failed: {join_err}"
        ))),
    }
}

pub async fn preflight() -> StatusCode {
    StatusCode::NO_CONTENT
}

pub async fn method_not_allowed() -> Response {
    method_not_allowed_response()
}
