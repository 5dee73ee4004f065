//! External service abstractions.
//!
//! Collaborators owned by other services, abstracted behind traits so the
//! scoring core can be exercised without them.
//!
//! ## Services
//!
//! - **posts** - Post summary lookup against the document-store service
//! - **feed** - Promotion event dispatch to the feed service

mod feed;
mod posts;

pub use feed::{FeedPublisher, HttpFeedPublisher};
pub use posts::{HttpPostLookup, PostLookup};

#[cfg(test)]
pub use feed::MockFeedPublisher;
#[cfg(test)]
pub use posts::MockPostLookup;
