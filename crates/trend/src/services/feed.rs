//! Promotion event dispatch to the feed service.

use anyhow::{Context, Result};
use async_trait::async_trait;

use crate::models::PromotionEvent;

/// Sink for one-shot promotion events. Fire-and-forget: the core only cares
/// about success or failure for logging.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FeedPublisher: Send + Sync {
    /// Push a single promotion event into the feed.
    async fn promote(&self, event: PromotionEvent) -> Result<()>;
}

/// HTTP implementation of FeedPublisher.
#[derive(Clone)]
pub struct HttpFeedPublisher {
    http: reqwest::Client,
    url: String,
}

impl HttpFeedPublisher {
    pub fn new(url: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            url,
        }
    }
}

#[async_trait]
impl FeedPublisher for HttpFeedPublisher {
    async fn promote(&self, event: PromotionEvent) -> Result<()> {
        self.http
            .post(&self.url)
            .json(&event)
            .send()
            .await
            .context("feed publish request failed")?
            .error_for_status()
            .context("feed publish returned error status")?;
        Ok(())
    }
}
