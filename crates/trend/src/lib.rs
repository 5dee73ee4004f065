//! Decaying, time-bucketed popularity scoring for posts.
//!
//! Scores accumulate in two-hour cycles and decay over a seven-day sliding
//! window. The [`TrendEngine`] applies weighted, cooldown-deduplicated
//! increments and promotes a post into the feed (at most once per week) when
//! its rolling score crosses the threshold. The [`RolloverScheduler`]
//! advances the window once per cycle; the `trend` binary runs it as a
//! singleton daemon.
//!
//! The consuming API service constructs the engine via
//! [`TrendEngine::from_config`] and calls it once per inbound view, like or
//! reply.

pub mod config;
pub mod cycle;
pub mod engine;
pub mod models;
pub mod rollover;
pub mod services;
pub mod stores;
#[cfg(test)]
mod test_utils;

pub use engine::TrendEngine;
pub use rollover::RolloverScheduler;
