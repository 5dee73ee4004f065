//! Ephemeral stores (Redis).
//!
//! This module contains the capability traits the scoring core relies on and
//! their Redis implementations. All data stored here is ephemeral: trend keys
//! are expired by rollover, markers expire through their own TTLs.
//!
//! ## Stores
//!
//! - **score** - Sorted-set score store (increments, weighted unions, ranks)
//! - **marker** - TTL presence markers (action cooldowns, promotion guards)
//!
//! ## Redis Key Patterns
//!
//! ```text
//! TrendList{cycle}               → content id → rolling decayed score
//! TrendCycle{cycle}              → content id → raw per-cycle score
//! {actor}reads{content}          → view cooldown (10 min TTL)
//! {actor}likes{content}          → like cooldown (1 h TTL)
//! {actor}replies{content}        → reply cooldown (5 min TTL)
//! {content}                      → promotion guard, feed database (7 d TTL)
//! ```
//!
//! The design depends only on atomic per-key increments, weighted
//! union-store, range-by-rank and TTL expiry, so the backing store is
//! swappable behind these traits.

mod marker;
mod score;

pub use marker::{MarkerStore, RedisMarkerStore};
pub use score::{RedisScoreStore, ScoreIncrement, ScoreStore};

#[cfg(test)]
pub use marker::MockMarkerStore;
#[cfg(test)]
pub use score::MockScoreStore;
