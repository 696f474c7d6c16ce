/*
 * Responsibility
 * - augmenter の入出力の型 (RequestContext / Credentials / Outcome)
 * - middleware はこの型だけを介して request extensions / session とやり取りする
 */
use axum::{
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use serde_json::Value;

use crate::services::session::SessionData;

/// Per-request values an augmenter operation may read or write.
///
/// - `session`: read/write (`user`, `message`)
/// - `visualizations`: written by `populate_visualization_list`
/// - `visualization`: written by `populate_visualization`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestContext {
    pub session: Option<SessionData>,
    pub visualizations: Option<Value>,
    pub visualization: Option<Value>,
}

impl RequestContext {
    pub fn new(session: Option<SessionData>) -> Self {
        Self {
            session,
            ..Self::default()
        }
    }
}

/// Login credentials from the request body. Empty strings count as missing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Credentials {
    pub username: Option<String>,
    pub password: Option<String>,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: Some(username.into()),
            password: Some(password.into()),
        }
    }

    pub fn username(&self) -> Option<&str> {
        self.username.as_deref().filter(|s| !s.is_empty())
    }

    pub fn password(&self) -> Option<&str> {
        self.password.as_deref().filter(|s| !s.is_empty())
    }

    pub fn is_empty(&self) -> bool {
        self.username().is_none() && self.password().is_none()
    }
}

/// A response the augmenter decided on by itself (redirects).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Termination {
    pub status: StatusCode,
    pub location: &'static str,
}

impl Termination {
    /// 302 → location
    pub fn redirect(location: &'static str) -> Self {
        Self {
            status: StatusCode::FOUND,
            location,
        }
    }

    /// 401 + `Location`, used for every authentication failure.
    pub fn unauthorized(location: &'static str) -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            location,
        }
    }
}

impl IntoResponse for Termination {
    fn into_response(self) -> Response {
        (self.status, [(header::LOCATION, self.location)]).into_response()
    }
}

/// What the caller must do after an operation succeeds.
///
/// `Terminated` means the response is already decided; the next handler must not run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Continue,
    Terminated(Termination),
}
