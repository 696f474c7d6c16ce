use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

use crate::services::cache::client::{CacheClient, CacheResult};

/// In-process cache with per-key TTL.
///
/// Used when no Valkey URL is configured (local development, tests).
/// Expired entries are dropped on read and swept on every write, so keys that
/// are never read again (abandoned sessions) do not accumulate.
#[derive(Clone, Default)]
pub struct MemoryClient {
    entries: Arc<Mutex<HashMap<String, (String, Instant)>>>,
}

impl MemoryClient {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    async fn stored(&self) -> usize {
        self.entries.lock().await.len()
    }
}

#[async_trait]
impl CacheClient for MemoryClient {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn get_string(&self, key: &str) -> CacheResult<Option<String>> {
        let mut entries = self.entries.lock().await;

        match entries.get(key) {
            Some((value, expires_at)) if *expires_at > Instant::now() => Ok(Some(value.clone())),
            Some(_) => {
                entries.remove(key);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn set_with_ttl(&self, key: &str, value: &str, ttl: Duration) -> CacheResult<()> {
        // Valkey 側と揃えて最低 1 秒
        let ttl = ttl.max(Duration::from_secs(1));
        let now = Instant::now();
        let mut entries = self.entries.lock().await;
        entries.retain(|_, (_, expires_at)| *expires_at > now);
        entries.insert(key.to_string(), (value.to_string(), now + ttl));
        Ok(())
    }

    async fn del(&self, key: &str) -> CacheResult<u64> {
        let mut entries = self.entries.lock().await;
        Ok(u64::from(entries.remove(key).is_some()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn set_get_del() {
        let cache = MemoryClient::new();

        assert_eq!(cache.get_string("k").await.unwrap(), None);

        cache
            .set_with_ttl("k", "v1", Duration::from_secs(60))
            .await
            .unwrap();
        cache
            .set_with_ttl("k", "v2", Duration::from_secs(60))
            .await
            .unwrap();
        assert_eq!(cache.get_string("k").await.unwrap().as_deref(), Some("v2"));
        assert_eq!(cache.stored().await, 1);

        assert_eq!(cache.del("k").await.unwrap(), 1);
        assert_eq!(cache.del("k").await.unwrap(), 0);
        assert_eq!(cache.get_string("k").await.unwrap(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn entries_expire_after_ttl() {
        let cache = MemoryClient::new();
        cache
            .set_with_ttl("k", "v", Duration::from_secs(2))
            .await
            .unwrap();

        tokio::time::sleep(Duration::from_secs(3)).await;

        assert_eq!(cache.get_string("k").await.unwrap(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn write_sweeps_expired_keys_that_are_never_read() {
        let cache = MemoryClient::new();
        for i in 0..1000 {
            cache
                .set_with_ttl(&format!("session:{i}"), "{}", Duration::from_secs(1))
                .await
                .unwrap();
        }
        assert_eq!(cache.stored().await, 1000);

        tokio::time::sleep(Duration::from_secs(3600)).await;
        cache
            .set_with_ttl("session:fresh", "{}", Duration::from_secs(60))
            .await
            .unwrap();

        assert_eq!(cache.stored().await, 1);
        assert_eq!(
            cache.get_string("session:fresh").await.unwrap().as_deref(),
            Some("{}")
        );
    }
}
