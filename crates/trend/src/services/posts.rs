//! Post summary lookup against the document-store service.

use anyhow::{Context, Result};
use async_trait::async_trait;

use crate::models::PostSummary;

/// Lookup of post content needed by the promotion path.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PostLookup: Send + Sync {
    /// Fetch the summary (text and media list) of a post by id.
    async fn get_by_id(&self, content_id: &str) -> Result<PostSummary>;
}

/// HTTP implementation of PostLookup.
#[derive(Clone)]
pub struct HttpPostLookup {
    http: reqwest::Client,
    base_url: String,
}

impl HttpPostLookup {
    pub fn new(base_url: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl PostLookup for HttpPostLookup {
    async fn get_by_id(&self, content_id: &str) -> Result<PostSummary> {
        let url = format!("{}/posts/{}", self.base_url, content_id);

        let summary = self
            .http
            .get(&url)
            .send()
            .await
            .context("post lookup request failed")?
            .error_for_status()
            .context("post lookup returned error status")?
            .json::<PostSummary>()
            .await
            .context("post lookup returned malformed body")?;
        Ok(summary)
    }
}
