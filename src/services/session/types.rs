/*
 * Responsibility
 * - セッションに保存する値 (SessionData) と、request extensions に載せるハンドル (Session)
 * - 保存先 (store) の詳細はここでは扱わない
 */
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::Mutex;

/// Values kept across requests for one browser session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionData {
    /// Provider's `/auth` response body for the logged-in user.
    pub user: Option<Value>,
    /// One-shot message shown on the login page.
    pub message: Option<String>,
    pub authenticated_at: Option<DateTime<Utc>>,
}

#[derive(Debug)]
struct SessionState {
    data: SessionData,
    dirty: bool,
    destroyed: bool,
    rotated: bool,
}

/// Per-request handle to the current session.
///
/// The session middleware inserts it into request extensions and persists the data
/// after the inner service returns, if anything changed.
#[derive(Clone, Debug)]
pub struct Session {
    id: String,
    is_new: bool,
    state: Arc<Mutex<SessionState>>,
}

impl Session {
    pub fn new(id: impl Into<String>, data: SessionData, is_new: bool) -> Self {
        Self {
            id: id.into(),
            is_new,
            state: Arc::new(Mutex::new(SessionState {
                data,
                dirty: false,
                destroyed: false,
                rotated: false,
            })),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn is_new(&self) -> bool {
        self.is_new
    }

    pub async fn data(&self) -> SessionData {
        self.state.lock().await.data.clone()
    }

    pub async fn is_dirty(&self) -> bool {
        self.state.lock().await.dirty
    }

    pub async fn is_destroyed(&self) -> bool {
        self.state.lock().await.destroyed
    }

    pub async fn is_rotated(&self) -> bool {
        self.state.lock().await.rotated
    }

    /// Asks the middleware to move the data to a fresh id (privilege change, e.g. login).
    pub async fn rotate(&self) {
        let mut state = self.state.lock().await;
        state.rotated = true;
        state.dirty = true;
    }

    /// Drops the session; the middleware deletes it from the store and expires the cookie.
    pub async fn destroy(&self) {
        let mut state = self.state.lock().await;
        state.data = SessionData::default();
        state.destroyed = true;
    }

    /// Replaces the stored data; marks the session dirty only when it differs.
    pub async fn replace(&self, data: SessionData) {
        let mut state = self.state.lock().await;
        if state.data != data {
            state.data = data;
            state.dirty = true;
        }
    }

    /// Reads and clears the flash message.
    pub async fn take_message(&self) -> Option<String> {
        let mut state = self.state.lock().await;
        let message = state.data.message.take();
        if message.is_some() {
            state.dirty = true;
        }
        message
    }
}
