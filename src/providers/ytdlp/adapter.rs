//! Adapter layer: Convert yt-dlp dumps to domain models
//!
//! This is the ONLY place where dump types are converted to domain
//! types. If the dump format changes, only this file and dto.rs need
//! to change.

use super::dto;
use crate::providers::normalize;
use crate::resolver::domain::{ProviderTag, StreamCandidate, StreamPayload, Track};

/// Convert a single-video dump into the candidate payload. Only
/// audio-only formats survive; muxed video formats are useless here.
pub fn to_stream_payload(dump: dto::VideoDump) -> StreamPayload {
    let candidates = dump
        .formats
        .into_iter()
        .filter(is_audio_only)
        .map(to_candidate)
        .collect();

    StreamPayload {
        title: dump.title,
        duration_secs: dump.duration.map(|d| d.round() as u32),
        candidates,
    }
}

fn is_audio_only(format: &dto::Format) -> bool {
    let has_audio = format
        .acodec
        .as_deref()
        .is_some_and(|a| !a.is_empty() && a != "none");
    let has_video = format
        .vcodec
        .as_deref()
        .is_some_and(|v| !v.is_empty() && v != "none");
    has_audio && !has_video
}

fn to_candidate(format: dto::Format) -> StreamCandidate {
    let url = format.url.unwrap_or_default();
    StreamCandidate {
        expires_at_unix: normalize::parse_url_expiry(&url),
        url,
        mime_type: format.ext.as_deref().map(ext_to_mime).unwrap_or_default(),
        bitrate_kbps: format.abr.filter(|a| *a > 0.0).map(|a| a.round() as u32),
        codec: format.acodec,
        quality_label: format.format_note,
    }
}

/// Container extension to MIME type.
fn ext_to_mime(ext: &str) -> String {
    match ext {
        "m4a" | "mp4" => "audio/mp4".to_string(),
        "webm" | "opus" => "audio/webm".to_string(),
        "mp3" => "audio/mpeg".to_string(),
        "ogg" | "oga" => "audio/ogg".to_string(),
        "" => String::new(),
        other => format!("audio/{other}"),
    }
}

/// Convert a flat playlist/search dump into tracks. Entries missing an
/// id or title (deleted or private videos) are dropped.
pub fn entries_to_tracks(dump: dto::PlaylistDump, limit: usize) -> Vec<Track> {
    dump.entries
        .into_iter()
        .filter_map(to_track)
        .take(limit)
        .collect()
}

fn to_track(entry: dto::Entry) -> Option<Track> {
    let id = entry.id.filter(|i| !i.trim().is_empty())?;
    let title = entry
        .title
        .filter(|t| !t.trim().is_empty() && t != "[Deleted video]" && t != "[Private video]")?;

    Some(Track {
        id,
        title,
        artist: entry
            .uploader
            .or(entry.channel)
            .filter(|u| !u.trim().is_empty()),
        thumbnail: entry
            .thumbnails
            .into_iter()
            .filter_map(|t| t.url)
            .next_back()
            .as_deref()
            .and_then(normalize::absolutize_thumbnail),
        duration_secs: entry.duration.filter(|d| *d >= 0.0).map(|d| d.round() as u32),
        source: ProviderTag::YtDlp,
    })
}
