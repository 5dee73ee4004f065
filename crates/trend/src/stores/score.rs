//! Sorted-set score storage for Redis.

use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use redis::AsyncCommands;

/// One member increment within a batched dispatch.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreIncrement {
    pub key: String,
    pub member: String,
    pub delta: f64,
}

/// Keyed sorted-set capability the trend core runs on.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ScoreStore: Send + Sync {
    /// Increment a member's score, returning the post-increment value.
    async fn incr_by(&self, key: &str, member: &str, delta: f64) -> Result<f64>;

    /// Apply several increments in one round-trip. Post-increment values are
    /// returned in input order.
    async fn incr_by_batched(&self, increments: &[ScoreIncrement]) -> Result<Vec<f64>>;

    /// Store the weighted union of the source sets into `dest`
    /// (sum aggregation, equal members combined).
    async fn union_store_weighted(&self, dest: &str, sources: &[(String, f64)]) -> Result<()>;

    /// Remove every member whose score lies in `[min, max]`.
    async fn remove_range_by_score(&self, key: &str, min: f64, max: f64) -> Result<()>;

    /// Members between the given ranks (inclusive), highest score first.
    async fn range_by_rank_desc(&self, key: &str, start: isize, stop: isize)
        -> Result<Vec<(String, f64)>>;

    /// Score of a single member, `None` if absent.
    async fn score_of(&self, key: &str, member: &str) -> Result<Option<f64>>;

    /// Scores of several members in one round-trip, input order preserved,
    /// `None` for absent members.
    async fn scores_of_batch(&self, key: &str, members: &[String]) -> Result<Vec<Option<f64>>>;

    /// Expire the whole key after `ttl`.
    async fn expire(&self, key: &str, ttl: Duration) -> Result<()>;

    /// Whether the key holds any data.
    async fn exists(&self, key: &str) -> Result<bool>;
}

/// Redis implementation of ScoreStore.
#[derive(Clone)]
pub struct RedisScoreStore {
    client: redis::Client,
}

impl RedisScoreStore {
    pub fn new(client: redis::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ScoreStore for RedisScoreStore {
    async fn incr_by(&self, key: &str, member: &str, delta: f64) -> Result<f64> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;

        let score: f64 = conn.zincr(key, member, delta).await?;
        Ok(score)
    }

    async fn incr_by_batched(&self, increments: &[ScoreIncrement]) -> Result<Vec<f64>> {
        if increments.is_empty() {
            return Ok(Vec::new());
        }
        let mut conn = self.client.get_multiplexed_async_connection().await?;

        let mut pipe = redis::pipe();
        for incr in increments {
            pipe.zincr(&incr.key, &incr.member, incr.delta);
        }

        let scores: Vec<f64> = pipe.query_async(&mut conn).await?;
        Ok(scores)
    }

    async fn union_store_weighted(&self, dest: &str, sources: &[(String, f64)]) -> Result<()> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;

        let mut cmd = redis::cmd("ZUNIONSTORE");
        cmd.arg(dest).arg(sources.len());
        for (key, _) in sources {
            cmd.arg(key);
        }
        cmd.arg("WEIGHTS");
        for (_, weight) in sources {
            cmd.arg(*weight);
        }

        let _: i64 = cmd.query_async(&mut conn).await?;
        Ok(())
    }

    async fn remove_range_by_score(&self, key: &str, min: f64, max: f64) -> Result<()> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;

        let _: i64 = conn.zrembyscore(key, min, max).await?;
        Ok(())
    }

    async fn range_by_rank_desc(
        &self,
        key: &str,
        start: isize,
        stop: isize,
    ) -> Result<Vec<(String, f64)>> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;

        let entries: Vec<(String, f64)> = conn.zrevrange_withscores(key, start, stop).await?;
        Ok(entries)
    }

    async fn score_of(&self, key: &str, member: &str) -> Result<Option<f64>> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;

        let score: Option<f64> = conn.zscore(key, member).await?;
        Ok(score)
    }

    async fn scores_of_batch(&self, key: &str, members: &[String]) -> Result<Vec<Option<f64>>> {
        if members.is_empty() {
            return Ok(Vec::new());
        }
        let mut conn = self.client.get_multiplexed_async_connection().await?;

        let scores: Vec<Option<f64>> = redis::cmd("ZMSCORE")
            .arg(key)
            .arg(members)
            .query_async(&mut conn)
            .await?;
        Ok(scores)
    }

    async fn expire(&self, key: &str, ttl: Duration) -> Result<()> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;

        let _: () = conn.expire(key, ttl.as_secs() as i64).await?;
        Ok(())
    }

    async fn exists(&self, key: &str) -> Result<bool> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;

        let exists: bool = conn.exists(key).await?;
        Ok(exists)
    }
}
