//! Visualization pages through the router: authentication gate, provider fetch,
//! validation and the missing-title redirect.

mod common;

use axum::http::StatusCode;
use common::*;
use serde_json::json;

#[tokio::test]
async fn anonymous_visitor_is_sent_to_login() {
    let provider = FakeProvider::new();
    let app = test_app(provider.clone(), true);

    let res = send(&app, get("/", None)).await;

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(location(&res), Some("/auth"));
    assert!(provider.calls().is_empty());

    let cookie = session_cookie(&res).expect("session cookie");
    let page = json_body(send(&app, get("/auth", Some(&cookie))).await).await;
    assert_eq!(page["message"], "No User found... Please log in.");
}

#[tokio::test]
async fn index_lists_visualizations() {
    let provider = FakeProvider::new();
    let app = test_app(provider.clone(), true);
    let cookie = login(&app, &provider).await;
    provider.on(
        "GET",
        "/api",
        200,
        json!({"visualizations": [{"title": "chart1"}, {"title": "chart2"}]}),
    );

    let res = send(&app, get("/", Some(&cookie))).await;

    assert_eq!(res.status(), StatusCode::OK);
    let body = json_body(res).await;
    assert_eq!(
        body["visualizations"],
        json!([{"title": "chart1"}, {"title": "chart2"}])
    );
    assert_eq!(body["user"], json!({"username": "ada"}));
}

#[tokio::test]
async fn single_visualization_is_attached_as_is() {
    let provider = FakeProvider::new();
    let app = test_app(provider.clone(), true);
    let cookie = login(&app, &provider).await;
    provider.on("GET", "/api/chart1", 200, json!({"id": "chart1"}));

    let res = send(&app, get("/visualizations/chart1", Some(&cookie))).await;

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(
        json_body(res).await,
        json!({"visualization": {"id": "chart1"}})
    );
    assert_eq!(
        provider.calls(),
        vec!["POST /auth".to_string(), "GET /api/chart1".to_string()]
    );
}

#[tokio::test]
async fn missing_title_redirects_home_without_provider_call() {
    let provider = FakeProvider::new();
    let app = test_app(provider.clone(), true);
    let cookie = login(&app, &provider).await;

    let res = send(&app, get("/visualizations", Some(&cookie))).await;

    assert_eq!(res.status(), StatusCode::FOUND);
    assert_eq!(location(&res), Some("/"));
    assert_eq!(provider.calls(), vec!["POST /auth".to_string()]);
}

#[tokio::test]
async fn invalid_provider_payload_is_bad_gateway() {
    let provider = FakeProvider::new();
    let app = test_app(provider.clone(), false);
    let cookie = login(&app, &provider).await;
    provider.on("GET", "/api", 200, json!({"visualizations": 7}));

    let res = send(&app, get("/", Some(&cookie))).await;

    assert_eq!(res.status(), StatusCode::BAD_GATEWAY);
    let body = json_body(res).await;
    assert_eq!(body["error"]["code"], "PROVIDER_INVALID_RESPONSE");
}

#[tokio::test]
async fn health_needs_no_session() {
    let app = test_app(FakeProvider::new(), true);

    let res = send(&app, get("/health", None)).await;

    assert_eq!(res.status(), StatusCode::OK);
    assert!(session_cookie(&res).is_none());
    assert_eq!(json_body(res).await, json!({"status": "ok"}));
}
