use axum::http::StatusCode;
use serde_json::Value;

use super::harness::{TestHarness, decode_json, header_value};

fn assert_cors(headers: &axum::http::HeaderMap) {
    assert_eq!(
        header_value(headers, "access-control-allow-origin"),
        Some("*")
    );
    assert_eq!(
        header_value(headers, "access-control-allow-methods"),
        Some("GET, OPTIONS")
    );
    assert_eq!(
        header_value(headers, "access-control-allow-headers"),
        Some("Content-Type")
    );
}

#[tokio::test]
async fn preflight_is_no_content_with_cors_headers() {
    let harness = TestHarness::setup();
    let response = harness.request("OPTIONS", "/api/search").await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert_cors(response.headers());
}

#[tokio::test]
async fn disallowed_verbs_get_json_405() {
    let harness = TestHarness::setup();
    for method in ["POST", "PUT", "DELETE"] {
        let response = harness.request(method, "/api/search?q=rust").await;
        let status = response.status();
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED, "{method}");
        assert_cors(response.headers());

        let body: Value = decode_json(response).await;
        assert_eq!(body["error"], "Method not allowed");
        assert_eq!(body["results"], serde_json::json!([]));
    }
}

#[tokio::test]
async fn success_and_error_responses_carry_cors_headers() {
    let harness = TestHarness::setup();
    let ok = harness.get("/api/search?q=rust").await;
    assert_eq!(ok.status(), StatusCode::OK);
    assert_cors(ok.headers());

    let failing = TestHarness::empty_bucket();
    let err = failing.get("/api/search?q=rust").await;
    assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_cors(err.headers());
}
