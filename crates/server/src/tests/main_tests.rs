use super::*;
use axum::{body, body::Body, http::Request};
use serde_json::{json, Value};
use tower::ServiceExt;

fn test_app(profiles: Vec<guard::GuestProfile>) -> Router {
    let repository = Arc::new(InMemoryGuestRepository::new(profiles));
    let api = ApiContext {
        guard: Arc::new(GuardService::new(repository)),
    };
    build_router(Arc::new(AppState { api }))
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    serde_json::from_slice(&bytes).expect("json")
}

async fn post_authorize(app: Router, payload: Value) -> axum::response::Response {
    let request = Request::post("/api/authorize")
        .header("content-type", "application/json")
        .body(Body::from(payload.to_string()))
        .expect("request");
    app.oneshot(request).await.expect("response")
}

#[tokio::test]
async fn healthz_reports_ok() {
    let app = test_app(default_roster());
    let request = Request::get("/healthz")
        .body(Body::empty())
        .expect("request");
    let response = app.oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::OK);

    let body = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    assert_eq!(body.as_ref(), b"ok");
}

#[tokio::test]
async fn next_guest_returns_minimal_payload() {
    let app = test_app(default_roster());
    let request = Request::get("/api/next-guest")
        .body(Body::empty())
        .expect("request");
    let response = app.oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::OK);

    let payload = json_body(response).await;
    let object = payload.as_object().expect("object");
    let mut keys: Vec<_> = object.keys().map(String::as_str).collect();
    keys.sort_unstable();
    assert_eq!(keys, ["facts", "guestId", "introduction", "name"]);
    assert!(!payload["facts"].as_array().expect("facts").is_empty());
}

#[tokio::test]
async fn next_guest_on_empty_roster_is_not_found_with_detail() {
    let app = test_app(Vec::new());
    let request = Request::get("/api/next-guest")
        .body(Body::empty())
        .expect("request");
    let response = app.oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let payload = json_body(response).await;
    assert_eq!(payload["detail"], "no guests available");
    assert_eq!(payload["code"], "not_found");
}

#[tokio::test]
async fn authorize_judges_roster_guests() {
    let app = test_app(default_roster());
    let cases = [
        ("vip", "allow", true, true),
        ("banned", "deny", false, true),
        ("crew", "deny", true, false),
    ];
    for (guest_id, action, allowed, correct) in cases {
        let response = post_authorize(
            app.clone(),
            json!({ "guestId": guest_id, "action": action }),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK, "{guest_id}");
        let payload = json_body(response).await;
        assert_eq!(payload["allowed"], allowed, "{guest_id}");
        assert_eq!(payload["correct"], correct, "{guest_id}");
        assert!(payload["message"].as_str().is_some_and(|m| !m.is_empty()));
    }
}

#[tokio::test]
async fn authorize_unknown_guest_is_not_found() {
    let app = test_app(default_roster());
    let response = post_authorize(app, json!({ "guestId": "unknown", "action": "allow" })).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let payload = json_body(response).await;
    assert_eq!(payload["detail"], "unknown guest 'unknown'");
}

#[tokio::test]
async fn authorize_rejects_unknown_action() {
    let app = test_app(default_roster());
    let response = post_authorize(app, json!({ "guestId": "vip", "action": "maybe" })).await;
    assert!(response.status().is_client_error());
}

#[tokio::test]
async fn authorize_rejects_oversized_body() {
    let app = test_app(default_roster());
    let padding = "x".repeat(MAX_REQUEST_BYTES + 1);
    let response = post_authorize(
        app,
        json!({ "guestId": "vip", "action": "allow", "padding": padding }),
    )
    .await;
    assert!(response.status().is_client_error());
}
