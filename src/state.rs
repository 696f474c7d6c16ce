/*
 * Responsibility
 * - Router に紐づける共有コンテキスト (AppState)
 *   - augmenter (provider client + validators), session store, session cookie 設定
 * - Clone 前提で持つ (内部は Arc/Clone cheap)
 */
use std::sync::Arc;

use crate::config::Config;
use crate::services::{augmenter::RequestAugmenter, session::SessionStore};

#[derive(Clone, Debug)]
pub struct SessionSettings {
    pub cookie_name: String,
    pub ttl_seconds: u64,
    pub secure_cookie: bool,
}

impl SessionSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            cookie_name: config.session_cookie_name.clone(),
            ttl_seconds: config.session_ttl_seconds,
            secure_cookie: config.app_env.is_production(),
        }
    }
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            cookie_name: "viz.sid".to_string(),
            ttl_seconds: 86_400,
            secure_cookie: false,
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub augmenter: RequestAugmenter,
    pub sessions: Arc<dyn SessionStore>,
    pub session: SessionSettings,
    pub body_limit: usize,
}

impl AppState {
    pub fn new(
        augmenter: RequestAugmenter,
        sessions: Arc<dyn SessionStore>,
        session: SessionSettings,
        body_limit: usize,
    ) -> Self {
        Self {
            augmenter,
            sessions,
            session,
            body_limit,
        }
    }
}
