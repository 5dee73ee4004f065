//! Sliding-window rollover.
//!
//! A single long-lived loop that wakes shortly after every two-hour cycle
//! boundary and pre-stages the next cycle's leaderboard: carry the current
//! rolling scores forward and subtract what was contributed in the cycle
//! exactly one week ago in the same intra-day slot. That union, plus the
//! next-cycle pre-increment in the engine, implements seven-day decay at
//! two-hour granularity, and the two are commutative in either order.
//!
//! Run exactly one instance per deployment; a second one would apply the
//! decay twice.

use std::sync::Arc;

use anyhow::Result;
use chrono::{DateTime, Duration as TimeDelta, Local, Timelike};

use crate::{
    cycle::{cycle_id, trend_cycle_key, trend_list_key},
    models::{CYCLE_HOURS, TREND_CYCLE_TTL, TREND_LIST_TTL, WINDOW_DAYS},
};
use crate::stores::ScoreStore;

/// Delay past the cycle boundary before rolling over, so the loop never races
/// the clock edge.
const BOUNDARY_BUFFER_SECS: u64 = 10;

/// Time to sleep from `now` until shortly after the next cycle boundary.
pub fn time_until_next_cycle<T: Timelike>(now: &T) -> std::time::Duration {
    let hours: u64 = if now.hour() % 2 == 0 { 1 } else { 0 };
    let minutes = u64::from(59 - now.minute());
    let seconds = u64::from(60 - now.second());
    std::time::Duration::from_secs(hours * 3600 + minutes * 60 + seconds + BOUNDARY_BUFFER_SECS)
}

/// The rollover loop. One instance per deployment.
pub struct RolloverScheduler {
    scores: Arc<dyn ScoreStore>,
}

impl RolloverScheduler {
    pub fn new(scores: Arc<dyn ScoreStore>) -> Self {
        Self { scores }
    }

    /// Run forever, rolling over once per cycle. Iteration failures are
    /// logged and the loop keeps going; cancellation comes from the caller
    /// dropping this future on shutdown.
    pub async fn run(&self) {
        loop {
            if let Err(err) = self.rollover_once(Local::now()).await {
                tracing::warn!("rollover pass failed: {:?}", err);
            }

            let wait = time_until_next_cycle(&Local::now());
            tracing::debug!("next rollover pass in {}s", wait.as_secs());
            tokio::time::sleep(wait).await;
        }
    }

    /// One rollover pass at `now`.
    ///
    /// No-op until the current cycle's Trend List exists (nothing has been
    /// scored yet). Otherwise store
    /// `TrendList{next} = 1 * TrendList{now} + (-1) * TrendCycle{now - 7d}`,
    /// drop members that decayed to zero or below, and start expiry on the
    /// current cycle's keys: the rolling list only needs to outlive its
    /// cycle, the raw accumulator must survive long enough to serve as decay
    /// input one week out.
    pub async fn rollover_once(&self, now: DateTime<Local>) -> Result<()> {
        let current = cycle_id(&now);
        let next = cycle_id(&(now + TimeDelta::hours(CYCLE_HOURS)));
        let expired = cycle_id(&(now - TimeDelta::days(WINDOW_DAYS)));

        let current_list = trend_list_key(&current);
        if !self.scores.exists(&current_list).await? {
            return Ok(());
        }

        let next_list = trend_list_key(&next);
        self.scores
            .union_store_weighted(
                &next_list,
                &[
                    (current_list.clone(), 1.0),
                    (trend_cycle_key(&expired), -1.0),
                ],
            )
            .await?;

        let current_cycle = trend_cycle_key(&current);
        tokio::try_join!(
            self.scores
                .remove_range_by_score(&next_list, f64::NEG_INFINITY, 0.0),
            self.scores.expire(&current_list, TREND_LIST_TTL),
            self.scores.expire(&current_cycle, TREND_CYCLE_TTL),
        )?;

        tracing::info!("rolled {} over into {}", current_list, next_list);
        Ok(())
    }
}
