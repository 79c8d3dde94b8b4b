//! Internal domain models for stream resolution.
//!
//! These types are OUR types - they don't change when external providers change.
//! All provider responses get converted into these types via adapters.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A logical track as supplied by the caller: either a free-text query
/// or an opaque video/track identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrackReference {
    /// Free-text query ("artist - title", "lofi beats", ...)
    Query(String),
    /// Provider-scoped video/track id
    Id(String),
}

/// Normalized track metadata produced by a provider adapter.
///
/// Built only by normalizers, never mutated afterwards. Lives for the
/// duration of one request unless the cache holds a copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Track {
    /// Video/track identifier in the shared id namespace
    pub id: String,
    /// Track title
    pub title: String,
    /// Artist or uploader name
    pub artist: Option<String>,
    /// Absolute thumbnail URL
    pub thumbnail: Option<String>,
    /// Duration in seconds, if the provider reported one
    pub duration_secs: Option<u32>,
    /// Which provider produced this entry
    pub source: ProviderTag,
}

/// One playable stream variant for a track.
///
/// A provider may return several of these per track; the selector picks
/// exactly one per request.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StreamCandidate {
    /// Playable URL (empty string if the provider omitted it)
    pub url: String,
    /// MIME type, e.g. "audio/mp4" (empty string if unknown)
    pub mime_type: String,
    /// Audio bitrate in kbps
    pub bitrate_kbps: Option<u32>,
    /// Codec, e.g. "opus" or "mp4a.40.2"
    pub codec: Option<String>,
    /// Provider-supplied quality label, e.g. "AUDIO_QUALITY_MEDIUM"
    pub quality_label: Option<String>,
    /// Unix timestamp after which the URL stops working, if the provider
    /// embeds one (stream URLs are typically time-limited tokens)
    pub expires_at_unix: Option<u64>,
}

/// What a provider's stream operation returns: the candidate list plus
/// whatever track metadata the stream endpoint carried along.
#[derive(Debug, Clone, Default)]
pub struct StreamPayload {
    pub title: Option<String>,
    pub duration_secs: Option<u32>,
    pub candidates: Vec<StreamCandidate>,
}

/// Identifies a backend provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderTag {
    /// First-party Data API (quota-limited, authoritative metadata)
    YouTube,
    /// Federated proxy network
    Piped,
    /// Web-client scraping extractor
    InnerTube,
    /// Command-line media extractor
    YtDlp,
}

impl std::fmt::Display for ProviderTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ProviderTag::YouTube => "youtube",
            ProviderTag::Piped => "piped",
            ProviderTag::InnerTube => "innertube",
            ProviderTag::YtDlp => "ytdlp",
        };
        f.write_str(name)
    }
}

// `ResolveError::NoUsableStream { source: ProviderTag }` names its field
// `source`, which thiserror treats as the error source and therefore requires
// to implement `std::error::Error`. The tag is a leaf value with no underlying
// cause, so the default `source()` (returns `None`) is correct.
impl std::error::Error for ProviderTag {}

/// Caller-requested audio quality preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QualityTier {
    Low,
    Medium,
    High,
    #[default]
    Auto,
}

impl std::fmt::Display for QualityTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            QualityTier::Low => "low",
            QualityTier::Medium => "medium",
            QualityTier::High => "high",
            QualityTier::Auto => "auto",
        };
        f.write_str(name)
    }
}

impl FromStr for QualityTier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(QualityTier::Low),
            "medium" => Ok(QualityTier::Medium),
            "high" => Ok(QualityTier::High),
            "auto" => Ok(QualityTier::Auto),
            other => Err(format!(
                "unknown quality tier '{other}' (expected low, medium, high or auto)"
            )),
        }
    }
}

/// Errors a single provider call can produce.
///
/// Adapters catch every transport, parse and upstream condition and map it
/// here - a provider call never panics and never leaks a raw reqwest or io
/// error. `NotFound` is the well-formed empty outcome: the resolver moves
/// on to the next provider without recording a failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProviderError {
    #[error("network error: {0}")]
    Transport(String),

    #[error("rate limited - provider quota exhausted")]
    RateLimited,

    #[error("no results")]
    NotFound,

    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

/// Resolver-level outcome when no provider produced a usable result.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    /// Every provider in the priority list returned empty or failed.
    /// `last_error` is None when everything was merely empty, so callers
    /// can distinguish "nothing found" from "providers unreachable".
    #[error("all providers exhausted{}", exhausted_detail(.last_error))]
    Exhausted { last_error: Option<ProviderError> },

    /// A provider returned candidates, but none survived validation.
    #[error("{source} returned stream candidates but none were playable")]
    NoUsableStream { source: ProviderTag },

    /// The caller-supplied reference is unusable (e.g. empty query).
    #[error("invalid track reference: {0}")]
    InvalidReference(String),
}

fn exhausted_detail(last_error: &Option<ProviderError>) -> String {
    match last_error {
        Some(e) => format!(" (last error: {e})"),
        None => String::new(),
    }
}

/// A successful track-list operation: the tracks plus which provider
/// ultimately served them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackList {
    pub tracks: Vec<Track>,
    pub source: ProviderTag,
}

/// A fully resolved stream, ready to hand to a player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedStream {
    pub url: String,
    pub mime_type: String,
    pub bitrate_kbps: Option<u32>,
    pub codec: Option<String>,
    pub title: Option<String>,
    pub duration_secs: Option<u32>,
    pub source: ProviderTag,
}

impl ResolvedStream {
    /// Combine a selected candidate with the metadata its payload carried.
    pub fn from_candidate(
        candidate: &StreamCandidate,
        payload: &StreamPayload,
        source: ProviderTag,
    ) -> Self {
        Self {
            url: candidate.url.clone(),
            mime_type: candidate.mime_type.clone(),
            bitrate_kbps: candidate.bitrate_kbps,
            codec: candidate.codec.clone(),
            title: payload.title.clone(),
            duration_secs: payload.duration_secs,
            source,
        }
    }
}
