//! Shared fixtures for router-level tests.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Request, Response, header},
};
use serde_json::Value;
use tower::ServiceExt;
use viz_portal::{
    app::build_app,
    services::{
        augmenter::RequestAugmenter,
        cache::MemoryClient,
        provider::{ProviderClient, ProviderError, ProviderResponse, client::ProviderResult},
        session::CacheSessionStore,
        validators::{Validators, Verdict},
    },
    state::{AppState, SessionSettings},
};

/// Provider double: canned response per `METHOD path`, records calls.
#[derive(Default)]
pub struct FakeProvider {
    routes: Mutex<HashMap<String, ProviderResponse>>,
    calls: Mutex<Vec<String>>,
}

impl FakeProvider {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn on(&self, method: &str, path: &str, status: u16, body: Value) {
        self.routes.lock().unwrap().insert(
            format!("{method} {path}"),
            ProviderResponse::new(status, body),
        );
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn respond(&self, key: String) -> ProviderResult<ProviderResponse> {
        self.calls.lock().unwrap().push(key.clone());
        self.routes
            .lock()
            .unwrap()
            .get(&key)
            .cloned()
            .ok_or_else(|| ProviderError::InvalidUrl(format!("no fake route for {key}")))
    }
}

#[async_trait]
impl ProviderClient for FakeProvider {
    async fn get(&self, path: &str) -> ProviderResult<ProviderResponse> {
        self.respond(format!("GET {path}"))
    }

    async fn post_form(
        &self,
        path: &str,
        _form: &[(&str, &str)],
    ) -> ProviderResult<ProviderResponse> {
        self.respond(format!("POST {path}"))
    }
}

/// Validator double with a fixed verdict.
pub struct FixedVerdict(pub bool);

impl Validators for FixedVerdict {
    fn list(&self, _body: &Value) -> Verdict {
        self.verdict()
    }

    fn item(&self, _body: &Value) -> Verdict {
        self.verdict()
    }
}

impl FixedVerdict {
    fn verdict(&self) -> Verdict {
        if self.0 {
            Verdict::valid()
        } else {
            Verdict::invalid(vec!["/: rejected by test".to_string()])
        }
    }
}

pub fn test_app(provider: Arc<FakeProvider>, valid: bool) -> Router {
    let augmenter = RequestAugmenter::new(provider, Arc::new(FixedVerdict(valid)));
    let sessions = Arc::new(CacheSessionStore::new_with_cache(
        Arc::new(MemoryClient::new()),
        "session",
    ));
    let state = AppState::new(augmenter, sessions, SessionSettings::default(), 1024 * 1024);
    build_app(state)
}

pub async fn send(app: &Router, req: Request<Body>) -> Response<Body> {
    app.clone().oneshot(req).await.expect("request execution")
}

pub fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).expect("request build")
}

pub fn post_form(uri: &str, body: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(body.to_string())).expect("request build")
}

pub fn post_json(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request build")
}

/// `name=value` part of the first Set-Cookie header.
pub fn session_cookie(res: &Response<Body>) -> Option<String> {
    res.headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .map(str::to_string)
}

pub fn location(res: &Response<Body>) -> Option<&str> {
    res.headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
}

pub async fn json_body(res: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(res.into_body(), usize::MAX)
        .await
        .expect("body extraction");
    serde_json::from_slice(&bytes).expect("json deserialization")
}

/// Logs in through `POST /auth` and returns the session cookie.
pub async fn login(app: &Router, provider: &FakeProvider) -> String {
    provider.on("POST", "/auth", 200, serde_json::json!({"username": "ada"}));

    let res = send(app, post_form("/auth", "username=ada&password=secret", None)).await;
    assert_eq!(res.status(), axum::http::StatusCode::SEE_OTHER);

    session_cookie(&res).expect("session cookie after login")
}
