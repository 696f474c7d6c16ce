use axum::extract::FromRequestParts;
use axum::http::{StatusCode, request::Parts};

use crate::services::session::Session;

/// Handler で `Session` を受け取るための extractor
/// session middleware が掛かっていない route では 500
impl<S> FromRequestParts<S> for Session
where
    S: Send + Sync,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts.extensions.get::<Session>().cloned().ok_or_else(|| {
            tracing::error!("Session requested on a route without the session middleware");
            StatusCode::INTERNAL_SERVER_ERROR
        })
    }
}
