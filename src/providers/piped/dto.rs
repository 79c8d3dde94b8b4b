//! Piped API Data Transfer Objects
//!
//! These types match EXACTLY what Piped instances return.
//! DO NOT add fields that aren't in the API response.
//! DO NOT use these types outside the piped module - convert to domain types.
//!
//! API Reference: https://docs.piped.video/docs/api-documentation/
//!
//! Example search response:
//! ```json
//! {
//!   "items": [{
//!     "url": "/watch?v=dQw4w9WgXcQ",
//!     "type": "stream",
//!     "title": "Song Title",
//!     "thumbnail": "https://pipedproxy.example/vi/dQw4w9WgXcQ/hqdefault.jpg",
//!     "uploaderName": "Artist",
//!     "duration": 213
//!   }],
//!   "nextpage": "..."
//! }
//! ```

use serde::{Deserialize, Serialize};

/// `/search` response
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub items: Vec<StreamItem>,
}

/// One entry of a search result, trending list or playlist.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StreamItem {
    /// Relative watch URL, e.g. "/watch?v=dQw4w9WgXcQ"
    pub url: Option<String>,
    /// "stream", "channel" or "playlist"
    #[serde(rename = "type")]
    pub item_type: Option<String>,
    pub title: Option<String>,
    pub thumbnail: Option<String>,
    #[serde(rename = "uploaderName")]
    pub uploader_name: Option<String>,
    /// Seconds; -1 for live streams
    pub duration: Option<i64>,
}

/// `/playlists/{id}` response
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PlaylistResponse {
    pub name: Option<String>,
    #[serde(rename = "relatedStreams", default)]
    pub related_streams: Vec<StreamItem>,
}

/// `/streams/{videoId}` response
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StreamsResponse {
    pub title: Option<String>,
    pub uploader: Option<String>,
    /// Seconds
    pub duration: Option<i64>,
    #[serde(rename = "audioStreams", default)]
    pub audio_streams: Vec<AudioStream>,
}

/// One audio variant within a streams response.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AudioStream {
    pub url: Option<String>,
    #[serde(rename = "mimeType")]
    pub mime_type: Option<String>,
    /// e.g. "mp4a.40.2" or "opus"
    pub codec: Option<String>,
    /// Bits per second
    pub bitrate: Option<u64>,
    /// Display label, e.g. "128 kbps"
    pub quality: Option<String>,
}

/// Error body Piped returns alongside non-2xx statuses.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiError {
    pub error: Option<String>,
    pub message: Option<String>,
}

impl ApiError {
    pub fn text(&self) -> String {
        self.error
            .clone()
            .or_else(|| self.message.clone())
            .unwrap_or_else(|| "unknown error".to_string())
    }
}

// ============================================================================
// CONTRACT TESTS
// These verify our DTOs match what the real API returns.
// If these fail, the API has changed and we need to update our DTOs.
// ============================================================================
