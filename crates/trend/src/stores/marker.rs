//! TTL presence markers for Redis.
//!
//! Backs both action cooldowns and the promotion guard. A marker is nothing
//! but a key with a TTL; its presence is the whole signal.

use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use redis::AsyncCommands;

/// Key/TTL capability for cooldown and promotion markers.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MarkerStore: Send + Sync {
    /// Whether the marker is currently set.
    async fn exists(&self, key: &str) -> Result<bool>;

    /// Set the marker, expiring after `ttl`.
    async fn set_with_ttl(&self, key: &str, ttl: Duration) -> Result<()>;

    /// Atomically set the marker only if absent. Returns `true` when this
    /// call created it, `false` when it was already set.
    async fn set_if_absent(&self, key: &str, ttl: Duration) -> Result<bool>;
}

/// Redis implementation of MarkerStore.
#[derive(Clone)]
pub struct RedisMarkerStore {
    client: redis::Client,
}

impl RedisMarkerStore {
    pub fn new(client: redis::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl MarkerStore for RedisMarkerStore {
    async fn exists(&self, key: &str) -> Result<bool> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;

        let exists: bool = conn.exists(key).await?;
        Ok(exists)
    }

    async fn set_with_ttl(&self, key: &str, ttl: Duration) -> Result<()> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;

        let _: () = conn.set_ex(key, "", ttl.as_secs()).await?;
        Ok(())
    }

    async fn set_if_absent(&self, key: &str, ttl: Duration) -> Result<bool> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;

        let set: Option<String> = redis::cmd("SET")
            .arg(key)
            .arg("")
            .arg("NX")
            .arg("EX")
            .arg(ttl.as_secs())
            .query_async(&mut conn)
            .await?;
        Ok(set.is_some())
    }
}
