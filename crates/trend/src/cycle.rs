//! Cycle calculation for trend scoring.
//!
//! A cycle is a fixed two-hour calendar bucket, twelve per day, derived from
//! local wall-clock time. Every component (score increments, rollover) must
//! derive cycles through [`cycle_id`] so they agree on bucket boundaries.
//!
//! ## Redis Key Patterns
//!
//! ```text
//! TrendList{y}-{m}-{d}-{n}   → sorted set, content id → decayed rolling score
//! TrendCycle{y}-{m}-{d}-{n}  → sorted set, content id → raw per-cycle score
//! ```
//!
//! Components are intentionally not zero-padded; the format is shared with
//! pre-existing data and must stay byte-compatible.

use chrono::{Datelike, Timelike};

/// Compute the cycle identifier for a timestamp.
///
/// Buckets run `00:00-01:59` (index 1) through `22:00-23:59` (index 12),
/// formatted as `{year}-{month}-{day}-{index}`.
pub fn cycle_id<T: Datelike + Timelike>(t: &T) -> String {
    format!("{}-{}-{}-{}", t.year(), t.month(), t.day(), t.hour() / 2 + 1)
}

/// Key of the rolling (decayed) leaderboard for a cycle. This is the only
/// score surface readers see.
pub fn trend_list_key(cycle: &str) -> String {
    format!("TrendList{cycle}")
}

/// Key of the raw per-cycle accumulator. Read only by rollover, as the decay
/// input for the cycle exactly seven days later in the same intra-day slot.
pub fn trend_cycle_key(cycle: &str) -> String {
    format!("TrendCycle{cycle}")
}
