//! Backend providers.
//!
//! One module per backend, each in the same layout: `dto.rs` (exact
//! wire shapes), `adapter.rs` (DTO to domain conversion), `client.rs`
//! (HTTP or subprocess transport). Shared normalization helpers live
//! in `normalize.rs`. The resolver only sees these through the
//! `StreamProvider` trait.

pub mod innertube;
pub mod normalize;
pub mod piped;
pub mod youtube;
pub mod ytdlp;

use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;
use crate::resolver::traits::StreamProvider;

/// Build the provider set from the configuration. The first-party
/// provider only exists when an API key is configured; the rest are
/// always available.
pub fn build_providers(config: &Config) -> Vec<Arc<dyn StreamProvider>> {
    let http_timeout = Duration::from_secs(config.network.http_timeout_secs);
    let mut providers: Vec<Arc<dyn StreamProvider>> = Vec::new();

    match config.credentials.youtube_api_key.as_deref() {
        Some(key) if !key.is_empty() => {
            providers.push(Arc::new(youtube::YouTubeClient::new(key, http_timeout)));
        }
        _ => {
            tracing::info!("no Data API key configured - first-party provider disabled");
        }
    }

    providers.push(Arc::new(piped::PipedClient::new(
        config.providers.piped_instances.clone(),
        http_timeout,
    )));
    providers.push(Arc::new(innertube::InnerTubeClient::new(http_timeout)));
    providers.push(Arc::new(ytdlp::YtDlpClient::new(
        config.providers.ytdlp_binary.clone(),
        Duration::from_secs(config.network.ytdlp_timeout_secs),
    )));

    providers
}
