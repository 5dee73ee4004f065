//! The trend scoring core.
//!
//! Applies weighted, cooldown-deduplicated score increments for post actions,
//! serves score reads from the current cycle's leaderboard, and dispatches an
//! at-most-once promotion event when a post's rolling score crosses the
//! threshold.
//!
//! All state lives in the external stores; the engine itself holds no mutable
//! state and every operation may be called concurrently.

use std::sync::Arc;

use anyhow::Result;
use chrono::{DateTime, Duration as TimeDelta, Local};

use crate::{
    config::Config,
    cycle::{cycle_id, trend_cycle_key, trend_list_key},
    models::{ActionKind, PromotionEvent, CYCLE_HOURS, PROMOTION_MARKER_TTL, PROMOTION_THRESHOLD},
    services::{FeedPublisher, HttpFeedPublisher, HttpPostLookup, PostLookup},
    stores::{MarkerStore, RedisMarkerStore, RedisScoreStore, ScoreIncrement, ScoreStore},
};

/// Cooldown marker key for one actor/action/content triple. The format is
/// shared with pre-existing data and must stay byte-compatible.
fn cooldown_key(actor_id: i64, kind: ActionKind, content_id: &str) -> String {
    format!("{actor_id}{}{content_id}", kind.marker())
}

/// The scoring engine. Cheap to clone; all fields are shared handles.
#[derive(Clone)]
pub struct TrendEngine {
    scores: Arc<dyn ScoreStore>,
    cooldowns: Arc<dyn MarkerStore>,
    promotions: Arc<dyn MarkerStore>,
    posts: Arc<dyn PostLookup>,
    feed: Arc<dyn FeedPublisher>,
}

impl TrendEngine {
    pub fn new(
        scores: Arc<dyn ScoreStore>,
        cooldowns: Arc<dyn MarkerStore>,
        promotions: Arc<dyn MarkerStore>,
        posts: Arc<dyn PostLookup>,
        feed: Arc<dyn FeedPublisher>,
    ) -> Self {
        Self {
            scores,
            cooldowns,
            promotions,
            posts,
            feed,
        }
    }

    /// Wire the engine against the configured Redis databases and
    /// collaborator endpoints.
    pub fn from_config(config: &Config) -> Result<Self> {
        let redis = redis::Client::open(config.redis_url.as_str())?;
        // Promotion markers are plain content ids; keeping them in their own
        // database keeps that keyspace clear of cooldown keys.
        let feed_redis = redis::Client::open(config.feed_redis_url.as_str())?;

        Ok(Self::new(
            Arc::new(RedisScoreStore::new(redis.clone())),
            Arc::new(RedisMarkerStore::new(redis)),
            Arc::new(RedisMarkerStore::new(feed_redis)),
            Arc::new(HttpPostLookup::new(config.posts_base_url.clone())),
            Arc::new(HttpFeedPublisher::new(config.feed_url.clone())),
        ))
    }

    /// Record an action on a post.
    ///
    /// Returns the post's score on the current leaderboard after the
    /// increment, or `None` when the action was suppressed — either by an
    /// active cooldown (the expected dedup outcome) or by a dropped write,
    /// which only under-counts popularity and is tolerated.
    pub async fn apply_action(
        &self,
        content_id: &str,
        actor_id: i64,
        kind: ActionKind,
    ) -> Result<Option<f64>> {
        self.apply_action_at(content_id, actor_id, kind, Local::now())
            .await
    }

    pub(crate) async fn apply_action_at(
        &self,
        content_id: &str,
        actor_id: i64,
        kind: ActionKind,
        now: DateTime<Local>,
    ) -> Result<Option<f64>> {
        let cooldown = cooldown_key(actor_id, kind, content_id);
        if self.cooldowns.exists(&cooldown).await? {
            return Ok(None);
        }
        // A race between the check above and this set can admit a second
        // increment within the window; over-counting one legitimate action
        // is accepted.
        if let Err(err) = self.cooldowns.set_with_ttl(&cooldown, kind.cooldown()).await {
            tracing::warn!("cooldown marker set failed for {}: {:?}", cooldown, err);
        }

        let current = cycle_id(&now);
        let next = cycle_id(&(now + TimeDelta::hours(CYCLE_HOURS)));
        let weight = kind.weight();

        // One pipelined round-trip: current leaderboard, raw accumulator,
        // and the next cycle's leaderboard so boundary-adjacent actions
        // survive until rollover pre-stages it.
        let increments = [
            ScoreIncrement {
                key: trend_list_key(&current),
                member: content_id.to_string(),
                delta: weight,
            },
            ScoreIncrement {
                key: trend_cycle_key(&current),
                member: content_id.to_string(),
                delta: weight,
            },
            ScoreIncrement {
                key: trend_list_key(&next),
                member: content_id.to_string(),
                delta: weight,
            },
        ];
        let results = match self.scores.incr_by_batched(&increments).await {
            Ok(results) => results,
            Err(err) => {
                tracing::warn!("trend increment dropped for {}: {:?}", content_id, err);
                return Ok(None);
            }
        };

        let score = results.first().copied().unwrap_or(0.0);
        if score >= PROMOTION_THRESHOLD {
            self.maybe_promote(content_id).await;
        }
        Ok(Some(score))
    }

    /// Current-cycle score of a post; unknown posts score 0.
    pub async fn get_score(&self, content_id: &str) -> Result<f64> {
        let key = trend_list_key(&cycle_id(&Local::now()));
        let score = self.scores.score_of(&key, content_id).await?;
        Ok(score.unwrap_or(0.0))
    }

    /// Current-cycle scores for a batch of posts. Input order is preserved
    /// and unknown posts score 0.
    pub async fn get_scores(&self, content_ids: &[String]) -> Result<Vec<f64>> {
        let key = trend_list_key(&cycle_id(&Local::now()));
        let scores = self.scores.scores_of_batch(&key, content_ids).await?;
        Ok(scores.into_iter().map(|s| s.unwrap_or(0.0)).collect())
    }

    /// Leaderboard slice between the given ranks (inclusive), highest score
    /// first.
    pub async fn get_top_range(&self, start: isize, stop: isize) -> Result<Vec<(String, f64)>> {
        let key = trend_list_key(&cycle_id(&Local::now()));
        self.scores.range_by_rank_desc(&key, start, stop).await
    }

    /// Promote a post that just crossed the threshold, at most once per
    /// rolling week. The marker is claimed atomically before anything is
    /// dispatched, so a failure past that point means the post is simply not
    /// retried into the feed this week.
    async fn maybe_promote(&self, content_id: &str) {
        let claimed = match self
            .promotions
            .set_if_absent(content_id, PROMOTION_MARKER_TTL)
            .await
        {
            Ok(claimed) => claimed,
            Err(err) => {
                tracing::warn!("promotion marker claim failed for {}: {:?}", content_id, err);
                return;
            }
        };
        if !claimed {
            return;
        }

        let post = match self.posts.get_by_id(content_id).await {
            Ok(post) => post,
            Err(err) => {
                tracing::error!(
                    "post lookup failed after promotion mark for {}: {:?}",
                    content_id,
                    err
                );
                return;
            }
        };

        let event = PromotionEvent::for_post(content_id, &post);
        let feed = Arc::clone(&self.feed);
        let content_id = content_id.to_string();
        // Detached publish: the client action that crossed the threshold
        // does not wait on the feed service.
        tokio::spawn(async move {
            tracing::info!("promoting {} into the feed", content_id);
            if let Err(err) = feed.promote(event).await {
                tracing::error!("feed publish failed for {}: {:?}", content_id, err);
            }
        });
    }
}
