use axum::{
    Json,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde_json::json;

use blogdex_core::SearchError;

use crate::cors::ALLOWED_METHODS;

#[expect(
    clippy::needless_pass_by_value,
    reason = "handlers naturally own error values from `Result` and pass them through"
)]
pub fn search_error_response(err: SearchError) -> Response {
    let status = status_for_search_error(&err);
    let payload = err.to_payload();
    if status.is_server_error() {
        tracing::error!(
            code = %payload.code,
            trace_id = %payload.trace_id,
            error = %err,
            "search request failed"
        );
    } else {
        tracing::debug!(code = %payload.code, error = %err, "search request rejected");
    }
    (status, Json(payload)).into_response()
}

pub fn method_not_allowed_response() -> Response {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        [(header::ALLOW, ALLOWED_METHODS)],
        Json(json!({
            "error": "Method not allowed",
            "results": [],
        })),
    )
        .into_response()
}

fn status_for_search_error(err: &SearchError) -> StatusCode {
    match err {
        SearchError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
        SearchError::IndexUnavailable(_)
        | SearchError::IndexMalformed(_)
        | SearchError::Validation(_)
        | SearchError::Io(_)
        | SearchError::Json(_)
        | SearchError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}
