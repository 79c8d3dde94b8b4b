//! Adapter layer: Convert InnerTube DTOs to domain models
//!
//! This is the ONLY place where DTO types are converted to domain types.
//! Scraped payloads are the most hostile input in the system: titles
//! arrive as run fragments, durations as display text ("3:45"),
//! thumbnails protocol-relative. Everything here is total - a malformed
//! tree normalizes to an empty list.

use super::dto;
use crate::providers::normalize;
use crate::resolver::domain::{ProviderError, ProviderTag, StreamCandidate, StreamPayload, Track};

/// Flatten the search renderer tree into tracks. Ads, shelves and
/// channel results fall out; entries missing an id or title are dropped.
pub fn search_to_tracks(response: dto::SearchResponse, limit: usize) -> Vec<Track> {
    let sections = response
        .contents
        .and_then(|c| c.two_column)
        .and_then(|t| t.primary_contents)
        .and_then(|p| p.section_list)
        .map(|s| s.contents)
        .unwrap_or_default();

    sections
        .into_iter()
        .filter_map(|section| section.item_section)
        .flat_map(|s| s.contents)
        .filter_map(|item| item.video)
        .filter_map(to_track)
        .take(limit)
        .collect()
}

fn to_track(video: dto::VideoRenderer) -> Option<Track> {
    let id = video.video_id.filter(|v| !v.trim().is_empty())?;
    let title = video
        .title
        .map(|t| t.joined())
        .filter(|t| !t.trim().is_empty())?;

    Some(Track {
        id,
        title,
        artist: video
            .owner_text
            .map(|o| o.joined())
            .filter(|a| !a.trim().is_empty()),
        thumbnail: best_thumbnail(video.thumbnail),
        duration_secs: video
            .length_text
            .and_then(|l| l.simple_text)
            .as_deref()
            .and_then(normalize::parse_clock_duration),
        source: ProviderTag::InnerTube,
    })
}

/// Non-OK playability means the player call can't yield streams.
/// "Video unavailable" style statuses are the empty outcome; anything
/// else (age gates, region locks) is an invalid-response classification
/// so it shows up in exhaustion reports.
pub fn playability_error(response: &dto::PlayerResponse) -> Option<ProviderError> {
    let status = response.playability_status.as_ref()?;
    match status.status.as_deref() {
        None | Some("OK") => None,
        Some("ERROR") => Some(ProviderError::NotFound),
        Some(other) => Some(ProviderError::InvalidResponse(format!(
            "{}: {}",
            other,
            status.reason.as_deref().unwrap_or("not playable")
        ))),
    }
}

/// Convert a player response into the candidate payload. Only audio
/// formats are kept; combined audio+video formats are useless to us.
pub fn to_stream_payload(response: dto::PlayerResponse) -> StreamPayload {
    let candidates = response
        .streaming_data
        .map(|s| s.adaptive_formats)
        .unwrap_or_default()
        .into_iter()
        .filter(|f| {
            f.mime_type
                .as_deref()
                .is_some_and(|m| m.starts_with("audio/"))
        })
        .map(to_candidate)
        .collect();

    let details = response.video_details;
    StreamPayload {
        title: details.as_ref().and_then(|d| d.title.clone()),
        duration_secs: details
            .as_ref()
            .and_then(|d| d.length_seconds.as_deref())
            .and_then(|s| s.parse().ok()),
        candidates,
    }
}

fn to_candidate(format: dto::AdaptiveFormat) -> StreamCandidate {
    let (mime, codec) = split_mime(format.mime_type.as_deref().unwrap_or_default());
    let url = format.url.unwrap_or_default();

    StreamCandidate {
        expires_at_unix: normalize::parse_url_expiry(&url),
        url,
        mime_type: mime,
        bitrate_kbps: format
            .average_bitrate
            .or(format.bitrate)
            .and_then(normalize::bits_to_kbps),
        codec,
        quality_label: format.audio_quality,
    }
}

/// Split "audio/webm; codecs=\"opus\"" into ("audio/webm", Some("opus")).
fn split_mime(raw: &str) -> (String, Option<String>) {
    let Some((mime, params)) = raw.split_once(';') else {
        return (raw.trim().to_string(), None);
    };
    let codec = params
        .split_once("codecs=")
        .map(|(_, c)| c.trim().trim_matches('"').to_string())
        .filter(|c| !c.is_empty());
    (mime.trim().to_string(), codec)
}

/// Last entry is the largest variant in practice; prefer width when given.
fn best_thumbnail(list: Option<dto::ThumbnailList>) -> Option<String> {
    let mut thumbnails = list?.thumbnails;
    thumbnails.sort_by_key(|t| t.width.unwrap_or(0));
    thumbnails
        .into_iter()
        .rev()
        .filter_map(|t| t.url)
        .find_map(|url| normalize::absolutize_thumbnail(&url))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn runs(text: &str) -> dto::Runs {
        dto::Runs {
            runs: vec![dto::Run {
                text: Some(text.to_string()),
            }],
        }
    }

    fn video(id: Option<&str>, title: Option<&str>) -> dto::VideoRenderer {
        dto::VideoRenderer {
            video_id: id.map(String::from),
            title: title.map(runs),
            owner_text: None,
            length_text: None,
            thumbnail: None,
        }
    }

    fn wrap_search(items: Vec<dto::Item>) -> dto::SearchResponse {
        dto::SearchResponse {
            contents: Some(dto::SearchContents {
                two_column: Some(dto::TwoColumnRenderer {
                    primary_contents: Some(dto::PrimaryContents {
                        section_list: Some(dto::SectionListRenderer {
                            contents: vec![dto::Section {
                                item_section: Some(dto::ItemSectionRenderer { contents: items }),
                            }],
                        }),
                    }),
                }),
            }),
        }
    }

    #[test]
    fn test_search_conversion_with_textual_duration() {
        let mut v = video(Some("abc123"), Some("Song"));
        v.owner_text = Some(runs("Artist"));
        v.length_text = Some(dto::SimpleText {
            simple_text: Some("4:05".to_string()),
        });
        v.thumbnail = Some(dto::ThumbnailList {
            thumbnails: vec![dto::Thumbnail {
                url: Some("//i.ytimg.com/vi/abc123/mq.jpg".to_string()),
                width: Some(320),
            }],
        });

        let tracks = search_to_tracks(wrap_search(vec![dto::Item { video: Some(v) }]), 10);

        assert_eq!(tracks.len(), 1);
        let track = &tracks[0];
        assert_eq!(track.duration_secs, Some(245));
        assert_eq!(
            track.thumbnail.as_deref(),
            Some("https://i.ytimg.com/vi/abc123/mq.jpg")
        );
        assert_eq!(track.source, ProviderTag::InnerTube);
    }

    #[test]
    fn test_search_drops_ads_and_incomplete_entries() {
        let items = vec![
            dto::Item { video: None }, // ad slot
            dto::Item {
                video: Some(video(None, Some("No id"))),
            },
            dto::Item {
                video: Some(video(Some("noTitle"), None)),
            },
            dto::Item {
                video: Some(video(Some("keep"), Some("Keeper"))),
            },
        ];

        let tracks = search_to_tracks(wrap_search(items), 10);

        assert_eq!(tracks.len(), 1);
        assert_eq!(tracks[0].id, "keep");
    }

    #[test]
    fn test_search_on_empty_tree_is_empty() {
        let response = dto::SearchResponse { contents: None };
        assert!(search_to_tracks(response, 10).is_empty());
    }

    #[test]
    fn test_playability_classification() {
        let ok = dto::PlayerResponse {
            playability_status: Some(dto::PlayabilityStatus {
                status: Some("OK".to_string()),
                reason: None,
            }),
            streaming_data: None,
            video_details: None,
        };
        assert!(playability_error(&ok).is_none());

        let gone = dto::PlayerResponse {
            playability_status: Some(dto::PlayabilityStatus {
                status: Some("ERROR".to_string()),
                reason: Some("Video unavailable".to_string()),
            }),
            streaming_data: None,
            video_details: None,
        };
        assert_eq!(playability_error(&gone), Some(ProviderError::NotFound));

        let gated = dto::PlayerResponse {
            playability_status: Some(dto::PlayabilityStatus {
                status: Some("LOGIN_REQUIRED".to_string()),
                reason: Some("Sign in to confirm your age".to_string()),
            }),
            streaming_data: None,
            video_details: None,
        };
        assert!(matches!(
            playability_error(&gated),
            Some(ProviderError::InvalidResponse(_))
        ));
    }

    #[test]
    fn test_stream_payload_keeps_audio_formats_only() {
        let response = dto::PlayerResponse {
            playability_status: None,
            streaming_data: Some(dto::StreamingData {
                adaptive_formats: vec![
                    dto::AdaptiveFormat {
                        itag: Some(137),
                        url: Some("https://cdn/video".to_string()),
                        mime_type: Some("video/mp4; codecs=\"avc1\"".to_string()),
                        bitrate: Some(2_500_000),
                        average_bitrate: None,
                        audio_quality: None,
                    },
                    dto::AdaptiveFormat {
                        itag: Some(251),
                        url: Some("https://cdn/audio?expire=1700003600".to_string()),
                        mime_type: Some("audio/webm; codecs=\"opus\"".to_string()),
                        bitrate: Some(135_000),
                        average_bitrate: Some(129_000),
                        audio_quality: Some("AUDIO_QUALITY_MEDIUM".to_string()),
                    },
                ],
            }),
            video_details: Some(dto::VideoDetails {
                video_id: Some("abc".to_string()),
                title: Some("Song".to_string()),
                author: Some("Artist".to_string()),
                length_seconds: Some("213".to_string()),
                thumbnail: None,
            }),
        };

        let payload = to_stream_payload(response);

        assert_eq!(payload.candidates.len(), 1);
        let candidate = &payload.candidates[0];
        assert_eq!(candidate.mime_type, "audio/webm");
        assert_eq!(candidate.codec.as_deref(), Some("opus"));
        // averageBitrate preferred over peak bitrate
        assert_eq!(candidate.bitrate_kbps, Some(129));
        assert_eq!(candidate.expires_at_unix, Some(1_700_003_600));
        assert_eq!(payload.title.as_deref(), Some("Song"));
        assert_eq!(payload.duration_secs, Some(213));
    }

    #[test]
    fn test_split_mime_variants() {
        assert_eq!(
            split_mime("audio/webm; codecs=\"opus\""),
            ("audio/webm".to_string(), Some("opus".to_string()))
        );
        assert_eq!(split_mime("audio/mp4"), ("audio/mp4".to_string(), None));
        assert_eq!(split_mime(""), (String::new(), None));
    }

    #[test]
    fn test_best_thumbnail_prefers_largest() {
        let list = dto::ThumbnailList {
            thumbnails: vec![
                dto::Thumbnail {
                    url: Some("//i.ytimg.com/small.jpg".to_string()),
                    width: Some(120),
                },
                dto::Thumbnail {
                    url: Some("//i.ytimg.com/large.jpg".to_string()),
                    width: Some(640),
                },
            ],
        };

        assert_eq!(
            best_thumbnail(Some(list)).as_deref(),
            Some("https://i.ytimg.com/large.jpg")
        );
    }
}
