//! HTTP boundary tests against the router, without binding a socket

use super::support::{plan_with_topics, service, FakeModel, FakeSearch};
use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use roadmap::server::{build_router, INVALID_JSON_MESSAGE, MISSING_FIELDS_MESSAGE};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

fn router(model: Arc<FakeModel>, search: Arc<FakeSearch>) -> Router {
    build_router(Arc::new(service(model, search)))
}

fn post_generate(body: impl Into<Body>) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri("/api/generate")
        .header(header::CONTENT_TYPE, "application/json")
        .body(body.into())
        .unwrap()
}

async fn read_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn health_reports_ok() {
    let app = router(FakeModel::returning("{}"), Arc::new(FakeSearch::new(0)));
    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_json(response).await, json!({ "status": "ok" }));
}

#[tokio::test]
async fn generate_returns_enriched_plan() {
    let model = FakeModel::returning(plan_with_topics(&["HTTP"]).to_string());
    let search = Arc::new(FakeSearch::new(3));
    let body = json!({
        "goal": "Backend Engineer",
        "purpose": "Career switch",
        "level": "Beginner",
        "experience": "CS degree",
        "timeframe": "10 hours"
    });

    let response = router(model.clone(), search.clone())
        .oneshot(post_generate(body.to_string()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let plan = read_json(response).await;
    let resources = plan["phases"][0]["steps"][0]["topics"][0]["resources"]
        .as_array()
        .unwrap();
    assert_eq!(resources.len(), 5);
    assert_eq!(resources[0]["type"], "documentation");
    assert_eq!(resources[2]["type"], "video");
    assert!(resources[2]["link"]
        .as_str()
        .unwrap()
        .starts_with("https://www.youtube.com/watch?v="));
    assert!(model.prompts()[0].contains("- Prior Experience: CS degree"));
}

#[tokio::test]
async fn invalid_json_is_rejected_without_provider_calls() {
    let model = FakeModel::returning(plan_with_topics(&["A"]).to_string());
    let search = Arc::new(FakeSearch::new(3));
    let response = router(model.clone(), search.clone())
        .oneshot(post_generate("{ not json"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(read_json(response).await, json!({ "error": INVALID_JSON_MESSAGE }));
    assert_eq!(model.call_count(), 0);
    assert_eq!(search.call_count(), 0);
}

#[tokio::test]
async fn empty_required_field_is_rejected_without_provider_calls() {
    let model = FakeModel::returning(plan_with_topics(&["A"]).to_string());
    let search = Arc::new(FakeSearch::new(3));
    let body = json!({ "goal": "Backend Engineer", "purpose": "   ", "level": "Beginner" });

    let response = router(model.clone(), search.clone())
        .oneshot(post_generate(body.to_string()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(read_json(response).await, json!({ "error": MISSING_FIELDS_MESSAGE }));
    assert_eq!(model.call_count(), 0);
    assert_eq!(search.call_count(), 0);
}

#[tokio::test]
async fn missing_required_field_is_rejected() {
    let model = FakeModel::returning(plan_with_topics(&["A"]).to_string());
    let response = router(model.clone(), Arc::new(FakeSearch::new(3)))
        .oneshot(post_generate(json!({ "goal": "x", "purpose": "y" }).to_string()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(model.call_count(), 0);
}

#[tokio::test]
async fn wrongly_typed_required_field_is_incomplete_not_invalid_json() {
    let model = FakeModel::returning(plan_with_topics(&["A"]).to_string());
    let search = Arc::new(FakeSearch::new(3));
    let body = json!({ "goal": 5, "purpose": "p", "level": ["x"] });

    let response = router(model.clone(), search.clone())
        .oneshot(post_generate(body.to_string()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(read_json(response).await, json!({ "error": MISSING_FIELDS_MESSAGE }));
    assert_eq!(model.call_count(), 0);
    assert_eq!(search.call_count(), 0);
}

#[tokio::test]
async fn non_object_body_is_invalid_json() {
    let model = FakeModel::returning(plan_with_topics(&["A"]).to_string());
    let response = router(model.clone(), Arc::new(FakeSearch::new(3)))
        .oneshot(post_generate("[\"goal\", \"purpose\", \"level\"]"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(read_json(response).await, json!({ "error": INVALID_JSON_MESSAGE }));
    assert_eq!(model.call_count(), 0);
}

#[tokio::test]
async fn generation_failure_is_server_error() {
    let model = FakeModel::returning("I cannot help with that.");
    let search = Arc::new(FakeSearch::new(3));
    let body = json!({ "goal": "a", "purpose": "b", "level": "c" });

    let response = router(model, search.clone())
        .oneshot(post_generate(body.to_string()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let error = read_json(response).await;
    assert!(error["error"]
        .as_str()
        .unwrap()
        .contains("Malformed generation response"));
    assert_eq!(search.call_count(), 0);
}

#[tokio::test]
async fn cors_allows_any_origin() {
    let app = router(FakeModel::returning("{}"), Arc::new(FakeSearch::new(0)));
    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .header(header::ORIGIN, "http://localhost:5173")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .and_then(|v| v.to_str().ok()),
        Some("*")
    );
}
