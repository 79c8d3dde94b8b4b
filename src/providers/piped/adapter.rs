//! Adapter layer: Convert Piped DTOs to domain models
//!
//! This is the ONLY place where DTO types are converted to domain types.
//! This isolates API changes - if Piped changes their response format,
//! only this file and dto.rs need to change.

use super::dto;
use crate::providers::normalize;
use crate::resolver::domain::{ProviderTag, StreamCandidate, StreamPayload, Track};

/// Convert stream items (search results, trending, playlist entries)
/// into tracks. Entries that aren't streams or lack an id or title are
/// dropped.
pub fn to_tracks(items: Vec<dto::StreamItem>, limit: usize) -> Vec<Track> {
    items
        .into_iter()
        .filter_map(to_track)
        .take(limit)
        .collect()
}

fn to_track(item: dto::StreamItem) -> Option<Track> {
    // Search results mix in channels and playlists; only streams are tracks
    if let Some(kind) = item.item_type.as_deref()
        && kind != "stream"
    {
        return None;
    }

    let id = extract_video_id(item.url.as_deref()?)?;
    let title = item.title.filter(|t| !t.trim().is_empty())?;

    Some(Track {
        id,
        title,
        artist: item.uploader_name.filter(|u| !u.trim().is_empty()),
        thumbnail: item
            .thumbnail
            .as_deref()
            .and_then(normalize::absolutize_thumbnail),
        duration_secs: item
            .duration
            .filter(|d| *d >= 0)
            .and_then(|d| u32::try_from(d).ok()),
        source: ProviderTag::Piped,
    })
}

/// Convert a streams response into the candidate payload.
pub fn to_stream_payload(response: dto::StreamsResponse) -> StreamPayload {
    let candidates = response
        .audio_streams
        .into_iter()
        .map(|audio| {
            let url = audio.url.unwrap_or_default();
            StreamCandidate {
                expires_at_unix: normalize::parse_url_expiry(&url),
                url,
                mime_type: audio.mime_type.unwrap_or_default(),
                bitrate_kbps: audio.bitrate.and_then(normalize::bits_to_kbps),
                codec: audio.codec,
                quality_label: audio.quality,
            }
        })
        .collect();

    StreamPayload {
        title: response.title,
        duration_secs: response
            .duration
            .filter(|d| *d >= 0)
            .and_then(|d| u32::try_from(d).ok()),
        candidates,
    }
}

/// Pull the video id out of a relative watch URL ("/watch?v=ID&...").
fn extract_video_id(url: &str) -> Option<String> {
    let (_, query) = url.split_once("v=")?;
    let id: &str = query.split('&').next().unwrap_or(query);
    if id.is_empty() {
        return None;
    }
    Some(id.to_string())
}
