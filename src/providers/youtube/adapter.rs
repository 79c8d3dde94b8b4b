//! Adapter layer: Convert Data API DTOs to domain models
//!
//! This is the ONLY place where DTO types are converted to domain types.
//! This isolates API changes - if the Data API changes their response
//! format, only this file and dto.rs need to change.

use super::dto;
use crate::providers::normalize;
use crate::resolver::domain::{ProviderTag, Track};

/// Convert search results into tracks. Items without a video id or
/// title (e.g. channel results) are dropped.
pub fn search_to_tracks(response: dto::SearchListResponse, limit: usize) -> Vec<Track> {
    response
        .items
        .into_iter()
        .filter_map(|item| {
            let id = item.id?.video_id?;
            make_track(id, item.snippet?, None)
        })
        .take(limit)
        .collect()
}

/// Convert a videos list (trending chart) into tracks. These carry an
/// ISO 8601 duration in contentDetails.
pub fn videos_to_tracks(response: dto::VideoListResponse, limit: usize) -> Vec<Track> {
    response
        .items
        .into_iter()
        .filter_map(|item| {
            let id = item.id?;
            let duration = item
                .content_details
                .and_then(|d| d.duration)
                .as_deref()
                .and_then(normalize::parse_iso8601_duration);
            make_track(id, item.snippet?, duration)
        })
        .take(limit)
        .collect()
}

/// Convert playlist items into tracks. The video id hides inside the
/// snippet's resourceId here.
pub fn playlist_items_to_tracks(response: dto::PlaylistItemsResponse, limit: usize) -> Vec<Track> {
    response
        .items
        .into_iter()
        .filter_map(|item| {
            let snippet = item.snippet?;
            let id = snippet.resource_id.as_ref()?.video_id.clone()?;
            make_track(id, snippet, None)
        })
        .take(limit)
        .collect()
}

fn make_track(id: String, snippet: dto::Snippet, duration_secs: Option<u32>) -> Option<Track> {
    if id.trim().is_empty() {
        return None;
    }
    let title = snippet.title.filter(|t| !t.trim().is_empty())?;

    Some(Track {
        id,
        title,
        artist: snippet.channel_title.filter(|c| !c.trim().is_empty()),
        thumbnail: pick_thumbnail(snippet.thumbnails),
        duration_secs,
        source: ProviderTag::YouTube,
    })
}

/// Medium is the sweet spot for list views; fall back outward.
fn pick_thumbnail(thumbnails: Option<dto::Thumbnails>) -> Option<String> {
    let t = thumbnails?;
    [t.medium, t.high, t.default]
        .into_iter()
        .flatten()
        .filter_map(|thumb| thumb.url)
        .find_map(|url| normalize::absolutize_thumbnail(&url))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snippet(title: Option<&str>, channel: Option<&str>) -> dto::Snippet {
        dto::Snippet {
            title: title.map(String::from),
            channel_title: channel.map(String::from),
            thumbnails: None,
            resource_id: None,
        }
    }

    #[test]
    fn test_search_conversion() {
        let response = dto::SearchListResponse {
            items: vec![dto::SearchItem {
                id: Some(dto::SearchItemId {
                    video_id: Some("abc123".to_string()),
                }),
                snippet: Some(snippet(Some("Song"), Some("Artist"))),
            }],
        };

        let tracks = search_to_tracks(response, 10);

        assert_eq!(tracks.len(), 1);
        assert_eq!(tracks[0].id, "abc123");
        assert_eq!(tracks[0].artist.as_deref(), Some("Artist"));
        assert_eq!(tracks[0].source, ProviderTag::YouTube);
        assert_eq!(tracks[0].duration_secs, None);
    }

    #[test]
    fn test_search_drops_items_without_video_id() {
        // Channel results have no videoId
        let response = dto::SearchListResponse {
            items: vec![
                dto::SearchItem {
                    id: Some(dto::SearchItemId { video_id: None }),
                    snippet: Some(snippet(Some("A Channel"), None)),
                },
                dto::SearchItem {
                    id: None,
                    snippet: Some(snippet(Some("No id at all"), None)),
                },
            ],
        };

        assert!(search_to_tracks(response, 10).is_empty());
    }

    #[test]
    fn test_videos_parse_iso_duration() {
        let response = dto::VideoListResponse {
            items: vec![dto::VideoItem {
                id: Some("abc".to_string()),
                snippet: Some(snippet(Some("Song"), Some("Artist"))),
                content_details: Some(dto::ContentDetails {
                    duration: Some("PT3M45S".to_string()),
                }),
            }],
        };

        let tracks = videos_to_tracks(response, 10);

        assert_eq!(tracks[0].duration_secs, Some(225));
    }

    #[test]
    fn test_videos_with_malformed_duration_keep_track() {
        let response = dto::VideoListResponse {
            items: vec![dto::VideoItem {
                id: Some("abc".to_string()),
                snippet: Some(snippet(Some("Live"), None)),
                content_details: Some(dto::ContentDetails {
                    duration: Some("P0D".to_string()),
                }),
            }],
        };

        let tracks = videos_to_tracks(response, 10);

        // Bad duration is dropped, the track itself survives
        assert_eq!(tracks.len(), 1);
        assert_eq!(tracks[0].duration_secs, None);
    }

    #[test]
    fn test_playlist_items_use_resource_id() {
        let mut s = snippet(Some("Song"), Some("Uploads"));
        s.resource_id = Some(dto::ResourceId {
            video_id: Some("vid42".to_string()),
        });
        let response = dto::PlaylistItemsResponse {
            items: vec![dto::PlaylistItem { snippet: Some(s) }],
        };

        let tracks = playlist_items_to_tracks(response, 10);

        assert_eq!(tracks[0].id, "vid42");
    }

    #[test]
    fn test_thumbnail_preference_order() {
        let thumbnails = dto::Thumbnails {
            default: Some(dto::Thumbnail {
                url: Some("https://i.ytimg.com/d.jpg".to_string()),
            }),
            medium: Some(dto::Thumbnail {
                url: Some("https://i.ytimg.com/m.jpg".to_string()),
            }),
            high: None,
        };

        assert_eq!(
            pick_thumbnail(Some(thumbnails)).as_deref(),
            Some("https://i.ytimg.com/m.jpg")
        );
        assert_eq!(pick_thumbnail(None), None);
    }

    #[test]
    fn test_limit_is_applied() {
        let response = dto::SearchListResponse {
            items: (0..8)
                .map(|i| dto::SearchItem {
                    id: Some(dto::SearchItemId {
                        video_id: Some(format!("id{i}")),
                    }),
                    snippet: Some(snippet(Some("T"), None)),
                })
                .collect(),
        };

        assert_eq!(search_to_tracks(response, 3).len(), 3);
    }
}
