//! Data API v3 HTTP client
//!
//! Handles communication with the first-party Data API.
//! See: https://developers.google.com/youtube/v3/docs
//!
//! IMPORTANT: the API is key-authenticated and quota-limited (search
//! costs 100 units against a 10k/day default quota). Quota exhaustion
//! comes back as a 403 with a `quotaExceeded` reason and is classified
//! `RateLimited`, distinctly from transport errors, so the resolver
//! applies the long cool-down.

use std::time::Duration;

use super::{adapter, dto};
use crate::resolver::domain::{ProviderError, QualityTier, StreamPayload, Track};

const USER_AGENT: &str = concat!("wavefinder/", env!("CARGO_PKG_VERSION"));

/// Music category id used for search and the trending chart.
const MUSIC_CATEGORY_ID: &str = "10";

/// Data API client.
pub struct YouTubeClient {
    api_key: String,
    http_client: reqwest::Client,
    base_url: String,
}

impl YouTubeClient {
    /// Create a new client with the given API key.
    pub fn new(api_key: impl Into<String>, timeout: Duration) -> Self {
        let http_client = reqwest::Client::builder()
            .gzip(true)
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .expect("Failed to build HTTP client");

        Self {
            api_key: api_key.into(),
            http_client,
            base_url: "https://www.googleapis.com/youtube/v3".to_string(),
        }
    }

    /// Create a client for testing with custom base URL
    #[cfg(test)]
    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            http_client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    /// Search music videos.
    pub async fn search(&self, query: &str, limit: usize) -> Result<Vec<Track>, ProviderError> {
        let url = format!(
            "{}/search?part=snippet&type=video&videoCategoryId={}&maxResults={}&q={}&key={}",
            self.base_url,
            MUSIC_CATEGORY_ID,
            limit.clamp(1, 50),
            urlencoding::encode(query),
            urlencoding::encode(&self.api_key)
        );
        let response: dto::SearchListResponse = self.get_json(&url).await?;
        Ok(adapter::search_to_tracks(response, limit))
    }

    /// Most popular music chart. Unlike search results, these carry an
    /// ISO 8601 duration in contentDetails.
    pub async fn trending(&self, limit: usize) -> Result<Vec<Track>, ProviderError> {
        let url = format!(
            "{}/videos?part=snippet,contentDetails&chart=mostPopular&videoCategoryId={}&maxResults={}&key={}",
            self.base_url,
            MUSIC_CATEGORY_ID,
            limit.clamp(1, 50),
            urlencoding::encode(&self.api_key)
        );
        let response: dto::VideoListResponse = self.get_json(&url).await?;
        Ok(adapter::videos_to_tracks(response, limit))
    }

    /// Items of a playlist.
    pub async fn playlist_items(
        &self,
        playlist_id: &str,
        limit: usize,
    ) -> Result<Vec<Track>, ProviderError> {
        let url = format!(
            "{}/playlistItems?part=snippet&playlistId={}&maxResults={}&key={}",
            self.base_url,
            urlencoding::encode(playlist_id),
            limit.clamp(1, 50),
            urlencoding::encode(&self.api_key)
        );
        let response: dto::PlaylistItemsResponse = self.get_json(&url).await?;
        Ok(adapter::playlist_items_to_tracks(response, limit))
    }

    /// The Data API never exposes direct media URLs, so this is the
    /// well-formed empty outcome: the resolver moves on to the
    /// extractor-backed providers without recording a failure.
    pub async fn streams(
        &self,
        _track_id: &str,
        _hint: QualityTier,
    ) -> Result<StreamPayload, ProviderError> {
        Err(ProviderError::NotFound)
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
    ) -> Result<T, ProviderError> {
        let response = self.http_client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                ProviderError::Transport("request timed out".to_string())
            } else {
                ProviderError::Transport(e.to_string())
            }
        })?;

        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(ProviderError::NotFound);
        }

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(ProviderError::RateLimited);
        }

        if !status.is_success() {
            // 403 carries the quota signal inside the error envelope
            if let Ok(error) = response.json::<dto::ErrorResponse>().await {
                if error.is_quota_error() {
                    return Err(ProviderError::RateLimited);
                }
                return Err(ProviderError::Transport(format!(
                    "HTTP {}: {}",
                    error.error.code,
                    error.error.message.unwrap_or_default()
                )));
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

#[cfg(test)]
mod tests {
    use super::*;

    // Note: Real integration tests would use wiremock or similar
    // to mock the HTTP server. These are unit tests for the client structure.

    #[test]
    fn test_client_creation() {
        let client = YouTubeClient::new("test-key", Duration::from_secs(8));
        assert_eq!(client.api_key, "test-key");
        assert_eq!(client.base_url, "https://www.googleapis.com/youtube/v3");
    }

    #[test]
    fn test_client_with_custom_url() {
        let client = YouTubeClient::with_base_url("key", "http://localhost:8080");
        assert_eq!(client.base_url, "http://localhost:8080");
    }

    #[tokio::test]
    async fn test_streams_is_well_formed_empty() {
        let client = YouTubeClient::with_base_url("key", "http://localhost:8080");
        let result = client.streams("abc", QualityTier::Auto).await;
        assert_eq!(result.unwrap_err(), ProviderError::NotFound);
    }
}
