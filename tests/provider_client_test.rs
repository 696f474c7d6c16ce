//! `HttpProviderClient` against an in-process provider stub.

use std::collections::HashMap;
use std::time::Duration;

use axum::{
    Form, Json, Router,
    http::{HeaderMap, StatusCode, header},
    routing::{get, post},
};
use serde_json::{Value, json};
use viz_portal::services::provider::{HttpProviderClient, ProviderClient, ProviderError};

async fn spawn_provider() -> String {
    let app = Router::new()
        .route(
            "/api",
            get(|headers: HeaderMap| async move {
                let accept = headers
                    .get(header::ACCEPT)
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or_default()
                    .to_string();
                Json(json!({"visualizations": [], "accept": accept}))
            }),
        )
        .route(
            "/api/{title}",
            get(|axum::extract::Path(title): axum::extract::Path<String>| async move {
                Json(json!({"title": title}))
            }),
        )
        .route(
            "/auth",
            post(|Form(form): Form<HashMap<String, String>>| async move {
                let username = form.get("username").cloned().unwrap_or_default();
                if form.get("password").map(String::as_str) == Some("secret") {
                    (StatusCode::OK, Json(json!({"username": username})))
                } else {
                    (
                        StatusCode::UNAUTHORIZED,
                        Json(json!({"error": "Invalid password."})),
                    )
                }
            }),
        )
        .route("/plain", get(|| async { "maintenance" }));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind provider stub");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("provider stub");
    });

    format!("http://{addr}")
}

fn client(base: &str) -> HttpProviderClient {
    HttpProviderClient::new(base, Duration::from_secs(5)).expect("client")
}

#[tokio::test]
async fn get_parses_json_and_asks_for_json() {
    let base = spawn_provider().await;

    let res = client(&base).get("/api").await.expect("provider GET");

    assert_eq!(res.status, 200);
    assert_eq!(res.body["visualizations"], json!([]));
    assert_eq!(res.body["accept"], "application/json");
}

#[tokio::test]
async fn encoded_title_reaches_provider_decoded() {
    let base = spawn_provider().await;

    let res = client(&base)
        .get("/api/sales%20q1")
        .await
        .expect("provider GET");

    assert_eq!(res.body, json!({"title": "sales q1"}));
}

#[tokio::test]
async fn post_form_sends_urlencoded_credentials() {
    let base = spawn_provider().await;
    let client = client(&base);

    let ok = client
        .post_form("/auth", &[("username", "ada"), ("password", "secret")])
        .await
        .expect("provider POST");
    assert_eq!(ok.status, 200);
    assert_eq!(ok.body, json!({"username": "ada"}));

    let rejected = client
        .post_form("/auth", &[("username", "ada"), ("password", "nope")])
        .await
        .expect("provider POST");
    assert_eq!(rejected.status, 401);
    assert_eq!(rejected.body["error"], "Invalid password.");
}

#[tokio::test]
async fn non_json_body_is_kept_as_string() {
    let base = spawn_provider().await;

    let res = client(&base).get("/plain").await.expect("provider GET");

    assert_eq!(res.body, Value::String("maintenance".into()));
}

#[tokio::test]
async fn unreachable_provider_is_a_transport_error() {
    // bind して即 drop したポートには誰もいない
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = client(&format!("http://{addr}"))
        .get("/api")
        .await
        .unwrap_err();

    assert!(matches!(err, ProviderError::Transport(_)));
}
