use std::{future::Future, pin::Pin, sync::Arc};

use crate::services::{
    cache::{CacheClient, CacheError, ValkeyClient, client::ttl_seconds},
    session::types::SessionData,
};

type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, SessionStoreError>> + Send + 'a>>;

/// Session persistence.
///
/// - `load`: `Ok(None)` when the id is unknown or expired
/// - `save`: overwrite with TTL
/// - `Err(_)`: backend failure (caller fails closed)
pub trait SessionStore: Send + Sync {
    fn load<'a>(&'a self, id: &'a str) -> StoreFuture<'a, Option<SessionData>>;

    fn save<'a>(&'a self, id: &'a str, data: &'a SessionData, ttl_secs: u64) -> StoreFuture<'a, ()>;

    fn remove<'a>(&'a self, id: &'a str) -> StoreFuture<'a, ()>;
}

#[derive(Debug, thiserror::Error)]
pub enum SessionStoreError {
    #[error(transparent)]
    Cache(#[from] CacheError),

    #[error("session payload error: {0}")]
    Payload(#[from] serde_json::Error),
}

/// Session store on top of any `CacheClient` (JSON payloads).
#[derive(Clone)]
pub struct CacheSessionStore<C: CacheClient> {
    cache: Arc<C>,
    // Optional key prefix to avoid collisions across environments
    prefix: String,
}

impl CacheSessionStore<ValkeyClient> {
    pub async fn connect(valkey_url: &str) -> Result<Self, SessionStoreError> {
        let client = ValkeyClient::new(valkey_url).await?;
        Ok(Self::new_with_cache(Arc::new(client), "session"))
    }
}

impl<C: CacheClient> CacheSessionStore<C> {
    pub fn new_with_cache(cache: Arc<C>, prefix: impl Into<String>) -> Self {
        Self {
            cache,
            prefix: prefix.into(),
        }
    }

    pub fn backend_name(&self) -> &'static str {
        self.cache.backend_name()
    }

    fn key(&self, id: &str) -> String {
        format!("{}:{}", self.prefix, id)
    }
}

impl<C: CacheClient> SessionStore for CacheSessionStore<C> {
    fn load<'a>(&'a self, id: &'a str) -> StoreFuture<'a, Option<SessionData>> {
        Box::pin(async move {
            let Some(raw) = self.cache.get_string(&self.key(id)).await? else {
                return Ok(None);
            };

            match serde_json::from_str::<SessionData>(&raw) {
                Ok(data) => Ok(Some(data)),
                Err(err) => {
                    // 壊れた payload は新規セッション扱いにする
                    tracing::warn!(error = ?err, "discarding unreadable session payload");
                    Ok(None)
                }
            }
        })
    }

    fn save<'a>(&'a self, id: &'a str, data: &'a SessionData, ttl_secs: u64) -> StoreFuture<'a, ()> {
        Box::pin(async move {
            let raw = serde_json::to_string(data)?;
            self.cache
                .set_with_ttl(&self.key(id), &raw, ttl_seconds(ttl_secs))
                .await?;
            Ok(())
        })
    }

    fn remove<'a>(&'a self, id: &'a str) -> StoreFuture<'a, ()> {
        Box::pin(async move {
            self.cache.del(&self.key(id)).await?;
            Ok(())
        })
    }
}
