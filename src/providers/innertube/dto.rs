//! InnerTube Data Transfer Objects
//!
//! These types match EXACTLY the slices of the web client's internal
//! JSON API that we consume. The payloads are enormous and duck-typed;
//! every field here is optional and unknown fields are ignored, so a
//! renderer we don't model simply falls out during normalization.
//! DO NOT use these types outside the innertube module - convert to
//! domain types.
//!
//! Example player response (trimmed):
//! ```json
//! {
//!   "playabilityStatus": {"status": "OK"},
//!   "streamingData": {
//!     "adaptiveFormats": [{
//!       "itag": 140,
//!       "url": "https://rr3---sn-xyz.googlevideo.com/videoplayback?expire=1700003600...",
//!       "mimeType": "audio/mp4; codecs=\"mp4a.40.2\"",
//!       "bitrate": 130269,
//!       "audioQuality": "AUDIO_QUALITY_MEDIUM"
//!     }]
//!   },
//!   "videoDetails": {"videoId": "...", "title": "...", "lengthSeconds": "213"}
//! }
//! ```

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// /player
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PlayerResponse {
    #[serde(rename = "playabilityStatus")]
    pub playability_status: Option<PlayabilityStatus>,
    #[serde(rename = "streamingData")]
    pub streaming_data: Option<StreamingData>,
    #[serde(rename = "videoDetails")]
    pub video_details: Option<VideoDetails>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PlayabilityStatus {
    /// "OK", "ERROR", "UNPLAYABLE", "LOGIN_REQUIRED", ...
    pub status: Option<String>,
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StreamingData {
    #[serde(rename = "adaptiveFormats", default)]
    pub adaptive_formats: Vec<AdaptiveFormat>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AdaptiveFormat {
    pub itag: Option<i64>,
    pub url: Option<String>,
    /// e.g. "audio/webm; codecs=\"opus\""
    #[serde(rename = "mimeType")]
    pub mime_type: Option<String>,
    /// Bits per second
    pub bitrate: Option<u64>,
    #[serde(rename = "averageBitrate")]
    pub average_bitrate: Option<u64>,
    /// "AUDIO_QUALITY_LOW" / "AUDIO_QUALITY_MEDIUM" / "AUDIO_QUALITY_HIGH"
    #[serde(rename = "audioQuality")]
    pub audio_quality: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct VideoDetails {
    #[serde(rename = "videoId")]
    pub video_id: Option<String>,
    pub title: Option<String>,
    pub author: Option<String>,
    /// Stringly-typed seconds, e.g. "213"
    #[serde(rename = "lengthSeconds")]
    pub length_seconds: Option<String>,
    pub thumbnail: Option<ThumbnailList>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ThumbnailList {
    #[serde(default)]
    pub thumbnails: Vec<Thumbnail>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Thumbnail {
    pub url: Option<String>,
    pub width: Option<u32>,
}

// ---------------------------------------------------------------------------
// /search (web client renderer tree)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchResponse {
    pub contents: Option<SearchContents>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchContents {
    #[serde(rename = "twoColumnSearchResultsRenderer")]
    pub two_column: Option<TwoColumnRenderer>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TwoColumnRenderer {
    #[serde(rename = "primaryContents")]
    pub primary_contents: Option<PrimaryContents>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PrimaryContents {
    #[serde(rename = "sectionListRenderer")]
    pub section_list: Option<SectionListRenderer>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SectionListRenderer {
    #[serde(default)]
    pub contents: Vec<Section>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Section {
    #[serde(rename = "itemSectionRenderer")]
    pub item_section: Option<ItemSectionRenderer>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ItemSectionRenderer {
    #[serde(default)]
    pub contents: Vec<Item>,
}

/// One search result slot; ads, shelves and channels leave `video` empty.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Item {
    #[serde(rename = "videoRenderer")]
    pub video: Option<VideoRenderer>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct VideoRenderer {
    #[serde(rename = "videoId")]
    pub video_id: Option<String>,
    pub title: Option<Runs>,
    #[serde(rename = "ownerText")]
    pub owner_text: Option<Runs>,
    /// Display text like "3:45"
    #[serde(rename = "lengthText")]
    pub length_text: Option<SimpleText>,
    pub thumbnail: Option<ThumbnailList>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Runs {
    #[serde(default)]
    pub runs: Vec<Run>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Run {
    pub text: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SimpleText {
    #[serde(rename = "simpleText")]
    pub simple_text: Option<String>,
}

impl Runs {
    /// Concatenate all run fragments into one string.
    pub fn joined(&self) -> String {
        self.runs
            .iter()
            .filter_map(|r| r.text.as_deref())
            .collect::<Vec<_>>()
            .join("")
    }
}

// ============================================================================
// CONTRACT TESTS
// These verify our DTOs match what the real API returns.
// If these fail, the API has changed and we need to update our DTOs.
// ============================================================================
