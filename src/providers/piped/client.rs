//! Piped HTTP client
//!
//! Talks to the federated Piped proxy network. Any public instance
//! serves the same API, so the client holds a list of instances and
//! rotates across them: each call starts at a random instance and
//! advances to the next one on transport-level failures. Upstream
//! answers (found / not found / rate limited) are taken from whichever
//! instance responded and end the rotation.

use std::time::Duration;

use rand::Rng;

use super::{adapter, dto};
use crate::resolver::domain::{ProviderError, QualityTier, StreamPayload, Track};

/// Default public instances, used when the config lists none.
pub const DEFAULT_INSTANCES: &[&str] = &[
    "https://pipedapi.kavin.rocks",
    "https://pipedapi.leptons.xyz",
    "https://api.piped.private.coffee",
];

const USER_AGENT: &str = concat!("wavefinder/", env!("CARGO_PKG_VERSION"));

/// Piped API client with instance rotation.
pub struct PipedClient {
    http_client: reqwest::Client,
    instances: Vec<String>,
}

impl PipedClient {
    /// Create a client over the given instances (falls back to the
    /// built-in list when empty).
    pub fn new(instances: Vec<String>, timeout: Duration) -> Self {
        let http_client = reqwest::Client::builder()
            .gzip(true)
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .expect("Failed to build HTTP client");

        let instances = if instances.is_empty() {
            DEFAULT_INSTANCES.iter().map(|s| s.to_string()).collect()
        } else {
            instances
        };

        Self {
            http_client,
            instances,
        }
    }

    /// Search for music streams.
    pub async fn search(&self, query: &str, limit: usize) -> Result<Vec<Track>, ProviderError> {
        let path = format!(
            "/search?q={}&filter=music_songs",
            urlencoding::encode(query)
        );
        let response: dto::SearchResponse = self.get_json(&path).await?;
        Ok(adapter::to_tracks(response.items, limit))
    }

    /// Trending music for the default region.
    pub async fn trending(&self, limit: usize) -> Result<Vec<Track>, ProviderError> {
        let items: Vec<dto::StreamItem> = self.get_json("/trending?region=US").await?;
        Ok(adapter::to_tracks(items, limit))
    }

    /// Tracks of a playlist.
    pub async fn playlist(
        &self,
        playlist_id: &str,
        limit: usize,
    ) -> Result<Vec<Track>, ProviderError> {
        let path = format!("/playlists/{}", urlencoding::encode(playlist_id));
        let response: dto::PlaylistResponse = self.get_json(&path).await?;
        Ok(adapter::to_tracks(response.related_streams, limit))
    }

    /// Audio stream candidates for a video id.
    pub async fn streams(
        &self,
        track_id: &str,
        _hint: QualityTier,
    ) -> Result<StreamPayload, ProviderError> {
        let path = format!("/streams/{}", urlencoding::encode(track_id));
        let response: dto::StreamsResponse = self.get_json(&path).await?;
        Ok(adapter::to_stream_payload(response))
    }

    /// GET a path, rotating across instances on transport failures.
    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<T, ProviderError> {
        let count = self.instances.len();
        let start = if count > 1 {
            rand::rng().random_range(0..count)
        } else {
            0
        };

        let mut last_transport =
            ProviderError::Transport("no piped instances configured".to_string());

        for offset in 0..count {
            let instance = &self.instances[(start + offset) % count];
            match self.fetch_from(instance, path).await {
                Err(ProviderError::Transport(msg)) => {
                    tracing::debug!("piped instance {instance} unreachable: {msg}");
                    last_transport = ProviderError::Transport(msg);
                }
                // A real answer from any instance ends the rotation
                other => return other,
            }
        }

        Err(last_transport)
    }

    async fn fetch_from<T: serde::de::DeserializeOwned>(
        &self,
        instance: &str,
        path: &str,
    ) -> Result<T, ProviderError> {
        let url = format!("{instance}{path}");

        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(classify_reqwest_error)?;

        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND || status == reqwest::StatusCode::GONE {
            return Err(ProviderError::NotFound);
        }

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(ProviderError::RateLimited);
        }

        if !status.is_success() {
            // Piped wraps extractor failures in an error body
            if let Ok(error) = response.json::<dto::ApiError>().await {
                return Err(ProviderError::InvalidResponse(error.text()));
            }
            return Err(ProviderError::Transport(format!(
                "HTTP {}: {}",
                status,
                status.canonical_reason().unwrap_or("Unknown")
            )));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| ProviderError::InvalidResponse(e.to_string()))
    }
}

fn classify_reqwest_error(e: reqwest::Error) -> ProviderError {
    if e.is_timeout() {
        ProviderError::Transport("request timed out".to_string())
    } else {
        ProviderError::Transport(e.to_string())
    }
}
