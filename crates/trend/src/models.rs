//! Domain types and fixed constants of the scoring design.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Score a post must reach within the current window to be promoted.
pub const PROMOTION_THRESHOLD: f64 = 500.0;
/// A promoted post is not promoted again for this long.
pub const PROMOTION_MARKER_TTL: Duration = Duration::from_secs(7 * 24 * 60 * 60);
/// Length of the sliding decay window.
pub const WINDOW_DAYS: i64 = 7;
/// Width of one scoring cycle.
pub const CYCLE_HOURS: i64 = 2;
/// A rolled-over Trend List stays readable this long past its cycle.
pub const TREND_LIST_TTL: Duration = Duration::from_secs(8 * 60 * 60);
/// A raw cycle accumulator must outlive the window to serve as decay input.
pub const TREND_CYCLE_TTL: Duration = Duration::from_secs(8 * 24 * 60 * 60);

/// A scoring action taken by an actor on a post.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    /// Post was viewed.
    View,
    /// Post was liked.
    Like,
    /// Post received a reply.
    Reply,
}

impl ActionKind {
    /// Score contribution of one admitted action.
    pub fn weight(self) -> f64 {
        match self {
            ActionKind::View => 2.0,
            ActionKind::Like => 5.0,
            ActionKind::Reply => 25.0,
        }
    }

    /// Window within which repeats from the same actor do not count.
    pub fn cooldown(self) -> Duration {
        match self {
            ActionKind::View => Duration::from_secs(10 * 60),
            ActionKind::Like => Duration::from_secs(60 * 60),
            ActionKind::Reply => Duration::from_secs(5 * 60),
        }
    }

    /// Marker segment used in cooldown keys. Shared with pre-existing data;
    /// must stay byte-compatible.
    pub fn marker(self) -> &'static str {
        match self {
            ActionKind::View => "reads",
            ActionKind::Like => "likes",
            ActionKind::Reply => "replies",
        }
    }
}

/// One media attachment on a post, as served by the document-store service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MediaItem {
    /// Media kind, `"video"` or an image type.
    #[serde(rename = "type")]
    pub kind: String,
    pub url: String,
    pub aspect_ratio: f64,
    /// Poster frame, only meaningful for videos.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preview_image: Option<String>,
    /// Video length in milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_total: Option<i64>,
}

/// The slice of a post the promotion path needs.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostSummary {
    pub text: String,
    #[serde(default)]
    pub medias: Vec<MediaItem>,
}

/// Event dispatched to the feed service when a post is promoted.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PromotionEvent {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover: Option<MediaItem>,
    pub preview_content: String,
    pub title: String,
    pub description: String,
    pub open_page_url: String,
}

impl PromotionEvent {
    /// Build the event for a post: first media item becomes the cover, the
    /// post text the preview. Title/description are fixed strings and the
    /// deep link embeds the content id, matching what the feed service
    /// renders today.
    pub fn for_post(content_id: &str, post: &PostSummary) -> Self {
        let cover = post.medias.first().map(|media| {
            let mut cover = media.clone();
            if cover.kind == "video" {
                cover.time_total = Some(cover.time_total.unwrap_or(0));
            } else {
                cover.preview_image = None;
                cover.time_total = None;
            }
            cover
        });

        PromotionEvent {
            cover,
            preview_content: post.text.clone(),
            title: "来墙贴".to_string(),
            description: "贴出你的想法".to_string(),
            open_page_url: format!("/miniApps/wallSticker/stickerDetailsPage/{content_id}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn video(url: &str) -> MediaItem {
        MediaItem {
            kind: "video".to_string(),
            url: url.to_string(),
            aspect_ratio: 1.78,
            preview_image: Some("poster.jpg".to_string()),
            time_total: None,
        }
    }

    #[test]
    fn weights_match_design_table() {
        assert_eq!(ActionKind::View.weight(), 2.0);
        assert_eq!(ActionKind::Like.weight(), 5.0);
        assert_eq!(ActionKind::Reply.weight(), 25.0);
    }

    #[test]
    fn cooldowns_match_design_table() {
        assert_eq!(ActionKind::View.cooldown(), Duration::from_secs(600));
        assert_eq!(ActionKind::Like.cooldown(), Duration::from_secs(3600));
        assert_eq!(ActionKind::Reply.cooldown(), Duration::from_secs(300));
    }

    #[test]
    fn first_media_becomes_cover() {
        let post = PostSummary {
            text: "hello".to_string(),
            medias: vec![video("a.mp4"), video("b.mp4")],
        };
        let event = PromotionEvent::for_post("abc", &post);

        let cover = event.cover.unwrap();
        assert_eq!(cover.url, "a.mp4");
        // Missing video length defaults to zero rather than being omitted.
        assert_eq!(cover.time_total, Some(0));
        assert_eq!(event.preview_content, "hello");
        assert_eq!(
            event.open_page_url,
            "/miniApps/wallSticker/stickerDetailsPage/abc"
        );
    }

    #[test]
    fn image_cover_drops_video_fields() {
        let post = PostSummary {
            text: "pic".to_string(),
            medias: vec![MediaItem {
                kind: "image".to_string(),
                url: "a.png".to_string(),
                aspect_ratio: 1.0,
                preview_image: Some("stale".to_string()),
                time_total: Some(9),
            }],
        };
        let cover = PromotionEvent::for_post("p", &post).cover.unwrap();

        assert_eq!(cover.preview_image, None);
        assert_eq!(cover.time_total, None);
    }

    #[test]
    fn event_serializes_with_camel_case_fields() {
        let post = PostSummary {
            text: "hello".to_string(),
            medias: vec![],
        };
        let value = serde_json::to_value(PromotionEvent::for_post("abc", &post)).unwrap();

        assert_eq!(value["previewContent"], "hello");
        assert_eq!(
            value["openPageUrl"],
            "/miniApps/wallSticker/stickerDetailsPage/abc"
        );
        // Absent cover is omitted, not null.
        assert!(value.get("cover").is_none());
    }

    #[test]
    fn post_without_media_has_no_cover() {
        let post = PostSummary {
            text: "plain".to_string(),
            medias: vec![],
        };
        assert!(PromotionEvent::for_post("p", &post).cover.is_none());
    }
}
