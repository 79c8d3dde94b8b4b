//! yt-dlp JSON dump Data Transfer Objects
//!
//! These types match EXACTLY what `yt-dlp -J` prints.
//! DO NOT add fields that aren't in the dump.
//! DO NOT use these types outside the ytdlp module - convert to domain types.
//!
//! Two dump shapes matter:
//! - a single-video dump (`-J --no-playlist <id>`) with a `formats` list
//! - a flat playlist dump (`-J --flat-playlist <url|ytsearchN:query>`)
//!   with an `entries` list of skeleton items

use serde::{Deserialize, Serialize};

/// Single-video dump.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct VideoDump {
    pub id: Option<String>,
    pub title: Option<String>,
    pub uploader: Option<String>,
    pub channel: Option<String>,
    /// Seconds, fractional
    pub duration: Option<f64>,
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub formats: Vec<Format>,
}

/// One media format within a video dump.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Format {
    pub format_id: Option<String>,
    pub url: Option<String>,
    /// Container extension: "m4a", "webm", ...
    pub ext: Option<String>,
    /// "none" when the format has no audio
    pub acodec: Option<String>,
    /// "none" for audio-only formats
    pub vcodec: Option<String>,
    /// Average audio bitrate in kbps
    pub abr: Option<f64>,
    pub format_note: Option<String>,
}

/// Flat playlist dump (also what `ytsearchN:` produces).
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PlaylistDump {
    #[serde(rename = "_type")]
    pub dump_type: Option<String>,
    pub title: Option<String>,
    #[serde(default)]
    pub entries: Vec<Entry>,
}

/// Skeleton entry of a flat dump.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Entry {
    pub id: Option<String>,
    pub title: Option<String>,
    pub uploader: Option<String>,
    pub channel: Option<String>,
    pub duration: Option<f64>,
    #[serde(default)]
    pub thumbnails: Vec<EntryThumbnail>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EntryThumbnail {
    pub url: Option<String>,
}

// ============================================================================
// CONTRACT TESTS
// These verify our DTOs match what yt-dlp actually prints.
// If these fail, the dump format has changed and we need to update them.
// ============================================================================

#[cfg(test)]
mod contract_tests {
    use super::*;

    #[test]
    fn test_parse_video_dump() {
        let json = r#"{
            "id": "dQw4w9WgXcQ",
            "title": "Never Gonna Give You Up",
            "uploader": "Rick Astley",
            "channel": "Rick Astley",
            "duration": 212.091,
            "thumbnail": "https://i.ytimg.com/vi/dQw4w9WgXcQ/maxresdefault.jpg",
            "formats": [
                {
                    "format_id": "251",
                    "url": "https://rr3---sn-xyz.googlevideo.com/videoplayback?expire=1700003600",
                    "ext": "webm",
                    "acodec": "opus",
                    "vcodec": "none",
                    "abr": 129.5,
                    "format_note": "medium"
                },
                {
                    "format_id": "137",
                    "url": "https://rr3---sn-xyz.googlevideo.com/videoplayback?itag=137",
                    "ext": "mp4",
                    "acodec": "none",
                    "vcodec": "avc1.640028",
                    "format_note": "1080p"
                }
            ]
        }"#;

        let dump: VideoDump = serde_json::from_str(json).expect("Should parse video dump");

        assert_eq!(dump.id.as_deref(), Some("dQw4w9WgXcQ"));
        assert_eq!(dump.duration, Some(212.091));
        assert_eq!(dump.formats.len(), 2);
        assert_eq!(dump.formats[0].acodec.as_deref(), Some("opus"));
        assert_eq!(dump.formats[1].vcodec.as_deref(), Some("avc1.640028"));
    }

    #[test]
    fn test_parse_flat_search_dump() {
        let json = r#"{
            "_type": "playlist",
            "id": "lofi beats",
            "title": "lofi beats",
            "entries": [
                {
                    "_type": "url",
                    "id": "abc123",
                    "title": "lofi hip hop radio",
                    "uploader": "Lofi Girl",
                    "channel": "Lofi Girl",
                    "duration": null,
                    "thumbnails": [{"url": "https://i.ytimg.com/vi/abc123/hq720.jpg"}]
                }
            ]
        }"#;

        let dump: PlaylistDump = serde_json::from_str(json).expect("Should parse flat dump");

        assert_eq!(dump.dump_type.as_deref(), Some("playlist"));
        assert_eq!(dump.entries.len(), 1);
        let entry = &dump.entries[0];
        assert_eq!(entry.id.as_deref(), Some("abc123"));
        assert!(entry.duration.is_none());
    }

    #[test]
    fn test_parse_minimal_dump() {
        let dump: VideoDump = serde_json::from_str(r#"{"id": "x"}"#).expect("Should parse");
        assert!(dump.formats.is_empty());
        assert!(dump.title.is_none());
    }
}
