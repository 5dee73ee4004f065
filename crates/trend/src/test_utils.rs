//! Shared test fakes.
//!
//! In-memory implementations of the store capabilities, for tests that want
//! real accumulation semantics across several calls instead of per-call
//! mockall expectations (dedup laws, rollover decay, end-to-end scenarios).

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;

use crate::stores::{MarkerStore, ScoreIncrement, ScoreStore};

/// In-memory sorted-set store. TTLs are recorded, not enforced.
#[derive(Default)]
pub struct InMemoryScoreStore {
    sets: Mutex<HashMap<String, HashMap<String, f64>>>,
    ttls: Mutex<HashMap<String, Duration>>,
}

impl InMemoryScoreStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// TTL recorded for a key by `expire`, if any.
    pub fn ttl_of(&self, key: &str) -> Option<Duration> {
        self.ttls.lock().unwrap().get(key).copied()
    }
}

#[async_trait]
impl ScoreStore for InMemoryScoreStore {
    async fn incr_by(&self, key: &str, member: &str, delta: f64) -> Result<f64> {
        let mut sets = self.sets.lock().unwrap();
        let score = sets
            .entry(key.to_string())
            .or_default()
            .entry(member.to_string())
            .or_insert(0.0);
        *score += delta;
        Ok(*score)
    }

    async fn incr_by_batched(&self, increments: &[ScoreIncrement]) -> Result<Vec<f64>> {
        let mut results = Vec::with_capacity(increments.len());
        for incr in increments {
            results.push(self.incr_by(&incr.key, &incr.member, incr.delta).await?);
        }
        Ok(results)
    }

    async fn union_store_weighted(&self, dest: &str, sources: &[(String, f64)]) -> Result<()> {
        let mut sets = self.sets.lock().unwrap();
        let mut union: HashMap<String, f64> = HashMap::new();
        for (key, weight) in sources {
            if let Some(set) = sets.get(key) {
                for (member, score) in set {
                    *union.entry(member.clone()).or_insert(0.0) += score * weight;
                }
            }
        }
        sets.insert(dest.to_string(), union);
        Ok(())
    }

    async fn remove_range_by_score(&self, key: &str, min: f64, max: f64) -> Result<()> {
        let mut sets = self.sets.lock().unwrap();
        if let Some(set) = sets.get_mut(key) {
            set.retain(|_, score| *score < min || *score > max);
        }
        Ok(())
    }

    async fn range_by_rank_desc(
        &self,
        key: &str,
        start: isize,
        stop: isize,
    ) -> Result<Vec<(String, f64)>> {
        let sets = self.sets.lock().unwrap();
        let mut entries: Vec<(String, f64)> = sets
            .get(key)
            .map(|set| set.iter().map(|(m, s)| (m.clone(), *s)).collect())
            .unwrap_or_default();
        entries.sort_by(|a, b| b.1.total_cmp(&a.1));

        let start = start.max(0) as usize;
        let stop = (stop.max(-1) as usize).min(entries.len().saturating_sub(1));
        if start >= entries.len() {
            return Ok(Vec::new());
        }
        Ok(entries[start..=stop].to_vec())
    }

    async fn score_of(&self, key: &str, member: &str) -> Result<Option<f64>> {
        let sets = self.sets.lock().unwrap();
        Ok(sets.get(key).and_then(|set| set.get(member)).copied())
    }

    async fn scores_of_batch(&self, key: &str, members: &[String]) -> Result<Vec<Option<f64>>> {
        let sets = self.sets.lock().unwrap();
        let set = sets.get(key);
        Ok(members
            .iter()
            .map(|member| set.and_then(|s| s.get(member)).copied())
            .collect())
    }

    async fn expire(&self, key: &str, ttl: Duration) -> Result<()> {
        self.ttls.lock().unwrap().insert(key.to_string(), ttl);
        Ok(())
    }

    async fn exists(&self, key: &str) -> Result<bool> {
        let sets = self.sets.lock().unwrap();
        Ok(sets.get(key).is_some_and(|set| !set.is_empty()))
    }
}

/// In-memory marker store. TTLs are recorded, not enforced; expiry is
/// simulated with [`InMemoryMarkerStore::clear`].
#[derive(Default)]
pub struct InMemoryMarkerStore {
    keys: Mutex<HashMap<String, Duration>>,
}

impl InMemoryMarkerStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop a marker, as TTL expiry would.
    pub fn clear(&self, key: &str) {
        self.keys.lock().unwrap().remove(key);
    }
}

#[async_trait]
impl MarkerStore for InMemoryMarkerStore {
    async fn exists(&self, key: &str) -> Result<bool> {
        Ok(self.keys.lock().unwrap().contains_key(key))
    }

    async fn set_with_ttl(&self, key: &str, ttl: Duration) -> Result<()> {
        self.keys.lock().unwrap().insert(key.to_string(), ttl);
        Ok(())
    }

    async fn set_if_absent(&self, key: &str, ttl: Duration) -> Result<bool> {
        let mut keys = self.keys.lock().unwrap();
        if keys.contains_key(key) {
            return Ok(false);
        }
        keys.insert(key.to_string(), ttl);
        Ok(true)
    }
}
