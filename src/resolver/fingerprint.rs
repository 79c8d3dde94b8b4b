//! Request fingerprints - deterministic cache keys.
//!
//! A fingerprint is derived from the operation and its normalized
//! parameters, so two equivalent requests (same query modulo case and
//! whitespace, same limit) land on the same cache entry.

use crate::resolver::domain::QualityTier;

/// A deterministic cache key for one resolver operation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fingerprint(String);

impl Fingerprint {
    pub fn search(query: &str, limit: usize) -> Self {
        Self(format!("search:{}:{}", normalize_query(query), limit))
    }

    pub fn trending(limit: usize) -> Self {
        Self(format!("trending:{limit}"))
    }

    pub fn playlist(playlist_id: &str, limit: usize) -> Self {
        Self(format!("playlist:{}:{}", playlist_id.trim(), limit))
    }

    pub fn stream(track_id: &str, tier: QualityTier) -> Self {
        Self(format!("stream:{}:{}", track_id.trim(), tier))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Trim, lowercase and collapse internal whitespace so trivially different
/// spellings of a query share a cache entry.
fn normalize_query(query: &str) -> String {
    query
        .split_whitespace()
        .map(|w| w.to_lowercase())
        .collect::<Vec<_>>()
        .join(" ")
}
