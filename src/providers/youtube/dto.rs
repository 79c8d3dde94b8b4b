//! Data API v3 Data Transfer Objects
//!
//! These types match EXACTLY what the YouTube Data API v3 returns.
//! DO NOT add fields that aren't in the API response.
//! DO NOT use these types outside the youtube module - convert to domain types.
//!
//! API Reference: https://developers.google.com/youtube/v3/docs
//!
//! Example search response:
//! ```json
//! {
//!   "items": [{
//!     "id": {"kind": "youtube#video", "videoId": "dQw4w9WgXcQ"},
//!     "snippet": {
//!       "title": "Song Title",
//!       "channelTitle": "Artist",
//!       "thumbnails": {"medium": {"url": "https://i.ytimg.com/vi/dQw4w9WgXcQ/mqdefault.jpg"}}
//!     }
//!   }]
//! }
//! ```

use serde::{Deserialize, Serialize};

/// `search.list` response
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchListResponse {
    #[serde(default)]
    pub items: Vec<SearchItem>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchItem {
    pub id: Option<SearchItemId>,
    pub snippet: Option<Snippet>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchItemId {
    #[serde(rename = "videoId")]
    pub video_id: Option<String>,
}

/// `videos.list` response (used for the trending chart)
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct VideoListResponse {
    #[serde(default)]
    pub items: Vec<VideoItem>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct VideoItem {
    /// Plain string id here, unlike search results
    pub id: Option<String>,
    pub snippet: Option<Snippet>,
    #[serde(rename = "contentDetails")]
    pub content_details: Option<ContentDetails>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ContentDetails {
    /// ISO 8601, e.g. "PT3M45S"
    pub duration: Option<String>,
}

/// `playlistItems.list` response
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PlaylistItemsResponse {
    #[serde(default)]
    pub items: Vec<PlaylistItem>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PlaylistItem {
    pub snippet: Option<Snippet>,
}

/// Shared snippet shape across list endpoints.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Snippet {
    pub title: Option<String>,
    #[serde(rename = "channelTitle")]
    pub channel_title: Option<String>,
    pub thumbnails: Option<Thumbnails>,
    /// Present on playlist items only
    #[serde(rename = "resourceId")]
    pub resource_id: Option<ResourceId>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ResourceId {
    #[serde(rename = "videoId")]
    pub video_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Thumbnails {
    pub default: Option<Thumbnail>,
    pub medium: Option<Thumbnail>,
    pub high: Option<Thumbnail>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Thumbnail {
    pub url: Option<String>,
}

/// Error envelope, e.g. quota exhaustion.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ErrorBody {
    pub code: i32,
    pub message: Option<String>,
    #[serde(default)]
    pub errors: Vec<ErrorDetail>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ErrorDetail {
    pub reason: Option<String>,
}

impl ErrorResponse {
    /// Quota and rate signals come back as 403s with a reason string.
    pub fn is_quota_error(&self) -> bool {
        self.error.errors.iter().any(|e| {
            matches!(
                e.reason.as_deref(),
                Some("quotaExceeded" | "rateLimitExceeded" | "dailyLimitExceeded")
            )
        })
    }
}

// ============================================================================
// CONTRACT TESTS
// These verify our DTOs match what the real API returns.
// If these fail, the API has changed and we need to update our DTOs.
// ============================================================================
