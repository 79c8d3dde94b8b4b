//! InnerTube HTTP client
//!
//! Speaks the web client's internal JSON API directly, the way
//! browser-based extractors do.
//!
//! ## Client contexts
//!
//! Every InnerTube call carries a client context identifying which
//! frontend is supposedly making the request. Which context matters:
//!
//! - `/player` uses the ANDROID context: the Android client receives
//!   direct, unthrottled stream URLs without the signature-cipher dance
//!   the web player payloads require.
//! - `/search` uses the WEB context: its response carries the
//!   `twoColumnSearchResultsRenderer` tree our DTOs model.
//!
//! No API key or login is used; these are the public endpoints the
//! anonymous frontends hit.

use std::time::Duration;

use super::{adapter, dto};
use crate::resolver::domain::{ProviderError, QualityTier, StreamPayload, Track};

const ANDROID_CLIENT_NAME: &str = "ANDROID";
const ANDROID_CLIENT_VERSION: &str = "19.44.38";
const ANDROID_USER_AGENT: &str =
    "com.google.android.youtube/19.44.38 (Linux; U; Android 14) gzip";

const WEB_CLIENT_NAME: &str = "WEB";
const WEB_CLIENT_VERSION: &str = "2.20241126.01.00";
const WEB_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";

/// Web-client scraping extractor.
pub struct InnerTubeClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl InnerTubeClient {
    pub fn new(timeout: Duration) -> Self {
        let http_client = reqwest::Client::builder()
            .gzip(true)
            .timeout(timeout)
            .build()
            .expect("Failed to build HTTP client");

        Self {
            http_client,
            base_url: "https://www.youtube.com".to_string(),
        }
    }

    /// Create a client for testing with custom base URL
    #[cfg(test)]
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    /// Scrape search results from the web client's search endpoint.
    pub async fn search(&self, query: &str, limit: usize) -> Result<Vec<Track>, ProviderError> {
        let body = serde_json::json!({
            "context": client_context(WEB_CLIENT_NAME, WEB_CLIENT_VERSION),
            "query": query,
        });

        let response: dto::SearchResponse = self
            .post_json("/youtubei/v1/search", &body, WEB_USER_AGENT)
            .await?;
        Ok(adapter::search_to_tracks(response, limit))
    }

    /// Extract stream candidates via the player endpoint.
    pub async fn streams(
        &self,
        track_id: &str,
        _hint: QualityTier,
    ) -> Result<StreamPayload, ProviderError> {
        let body = serde_json::json!({
            "context": client_context(ANDROID_CLIENT_NAME, ANDROID_CLIENT_VERSION),
            "videoId": track_id,
            "contentCheckOk": true,
            "racyCheckOk": true,
        });

        let response: dto::PlayerResponse = self
            .post_json("/youtubei/v1/player", &body, ANDROID_USER_AGENT)
            .await?;

        if let Some(err) = adapter::playability_error(&response) {
            return Err(err);
        }

        Ok(adapter::to_stream_payload(response))
    }

    async fn post_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        body: &serde_json::Value,
        user_agent: &str,
    ) -> Result<T, ProviderError> {
        let url = format!("{}{}?prettyPrint=false", self.base_url, path);

        let response = self
            .http_client
            .post(&url)
            .header(reqwest::header::USER_AGENT, user_agent)
            .json(body)
            .send()
            .await
            .map_err(|e| {
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

/// Minimal client context; locale pinned so renderer shapes stay stable.
fn client_context(name: &str, version: &str) -> serde_json::Value {
    serde_json::json!({
        "client": {
            "clientName": name,
            "clientVersion": version,
            "hl": "en",
            "gl": "US",
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    // Note: Real integration tests would use wiremock or similar
    // to mock the HTTP server. These are unit tests for the client structure.

    #[test]
    fn test_client_creation() {
        let client = InnerTubeClient::new(Duration::from_secs(8));
        assert_eq!(client.base_url, "https://www.youtube.com");
    }

    #[test]
    fn test_client_with_custom_url() {
        let client = InnerTubeClient::with_base_url("http://localhost:8080");
        assert_eq!(client.base_url, "http://localhost:8080");
    }

    #[test]
    fn test_client_context_shape() {
        let ctx = client_context(WEB_CLIENT_NAME, WEB_CLIENT_VERSION);
        assert_eq!(ctx["client"]["clientName"], "WEB");
        assert_eq!(ctx["client"]["hl"], "en");
    }
}
