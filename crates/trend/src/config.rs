use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Redis holding trend sorted sets and cooldown markers.
    pub redis_url: String,
    /// Redis database holding promotion markers (keys are bare content ids,
    /// kept apart from the cooldown keyspace).
    pub feed_redis_url: String,
    /// Base URL of the document-store service, for post summary lookups.
    pub posts_base_url: String,
    /// Endpoint of the feed service receiving promotion events.
    pub feed_url: String,
    /// Set to "production" for JSON logging, anything else for human-readable.
    #[serde(default)]
    pub env: String,
    /// Sentry DSN for error tracking.
    #[serde(default)]
    pub sentry_dsn: Option<String>,
}

impl Config {
    pub fn is_production(&self) -> bool {
        self.env == "production"
    }
}
