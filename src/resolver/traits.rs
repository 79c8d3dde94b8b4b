//! Trait definitions for stream providers.
//!
//! The resolver only ever talks to [`StreamProvider`]; each concrete
//! client implements it by delegating to its inherent methods. This
//! enables dependency injection and mocking for tests - production code
//! uses the real clients, tests substitute mock implementations with
//! scripted outcomes.

use async_trait::async_trait;

use crate::resolver::domain::{ProviderError, ProviderTag, QualityTier, StreamPayload, Track};

/// Uniform contract every backend provider implements.
///
/// Every call is total with respect to errors: any transport, parse or
/// upstream condition comes back as a [`ProviderError`], never a panic.
/// `Err(ProviderError::NotFound)` and `Ok` with an empty payload both
/// mean "nothing here" and carry no failure penalty in the resolver.
#[async_trait]
pub trait StreamProvider: Send + Sync {
    /// Which backend this is, for source tags, priorities and cool-down.
    fn tag(&self) -> ProviderTag;

    /// Free-text search.
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<Track>, ProviderError>;

    /// Currently popular tracks.
    async fn trending(&self, limit: usize) -> Result<Vec<Track>, ProviderError>;

    /// Tracks of a playlist.
    async fn playlist(&self, playlist_id: &str, limit: usize)
    -> Result<Vec<Track>, ProviderError>;

    /// Playable stream candidates for a track id. The hint lets backends
    /// that pre-select formats (e.g. the CLI extractor) narrow their work;
    /// most ignore it and return everything.
    async fn streams(
        &self,
        track_id: &str,
        hint: QualityTier,
    ) -> Result<StreamPayload, ProviderError>;
}

// Implement the trait for the real clients

#[async_trait]
impl StreamProvider for crate::providers::youtube::YouTubeClient {
    fn tag(&self) -> ProviderTag {
        ProviderTag::YouTube
    }

    async fn search(&self, query: &str, limit: usize) -> Result<Vec<Track>, ProviderError> {
        self.search(query, limit).await
    }

    async fn trending(&self, limit: usize) -> Result<Vec<Track>, ProviderError> {
        self.trending(limit).await
    }

    async fn playlist(
        &self,
        playlist_id: &str,
        limit: usize,
    ) -> Result<Vec<Track>, ProviderError> {
        self.playlist_items(playlist_id, limit).await
    }

    async fn streams(
        &self,
        track_id: &str,
        hint: QualityTier,
    ) -> Result<StreamPayload, ProviderError> {
        self.streams(track_id, hint).await
    }
}

#[async_trait]
impl StreamProvider for crate::providers::piped::PipedClient {
    fn tag(&self) -> ProviderTag {
        ProviderTag::Piped
    }

    async fn search(&self, query: &str, limit: usize) -> Result<Vec<Track>, ProviderError> {
        self.search(query, limit).await
    }

    async fn trending(&self, limit: usize) -> Result<Vec<Track>, ProviderError> {
        self.trending(limit).await
    }

    async fn playlist(
        &self,
        playlist_id: &str,
        limit: usize,
    ) -> Result<Vec<Track>, ProviderError> {
        self.playlist(playlist_id, limit).await
    }

    async fn streams(
        &self,
        track_id: &str,
        hint: QualityTier,
    ) -> Result<StreamPayload, ProviderError> {
        self.streams(track_id, hint).await
    }
}

#[async_trait]
impl StreamProvider for crate::providers::innertube::InnerTubeClient {
    fn tag(&self) -> ProviderTag {
        ProviderTag::InnerTube
    }

    async fn search(&self, query: &str, limit: usize) -> Result<Vec<Track>, ProviderError> {
        self.search(query, limit).await
    }

    async fn trending(&self, _limit: usize) -> Result<Vec<Track>, ProviderError> {
        // The web client's trending surface is not scraped
        Err(ProviderError::NotFound)
    }

    async fn playlist(
        &self,
        _playlist_id: &str,
        _limit: usize,
    ) -> Result<Vec<Track>, ProviderError> {
        Err(ProviderError::NotFound)
    }

    async fn streams(
        &self,
        track_id: &str,
        hint: QualityTier,
    ) -> Result<StreamPayload, ProviderError> {
        self.streams(track_id, hint).await
    }
}

#[async_trait]
impl StreamProvider for crate::providers::ytdlp::YtDlpClient {
    fn tag(&self) -> ProviderTag {
        ProviderTag::YtDlp
    }

    async fn search(&self, query: &str, limit: usize) -> Result<Vec<Track>, ProviderError> {
        self.search(query, limit).await
    }

    async fn trending(&self, _limit: usize) -> Result<Vec<Track>, ProviderError> {
        // yt-dlp has no trending surface
        Err(ProviderError::NotFound)
    }

    async fn playlist(
        &self,
        playlist_id: &str,
        limit: usize,
    ) -> Result<Vec<Track>, ProviderError> {
        self.playlist(playlist_id, limit).await
    }

    async fn streams(
        &self,
        track_id: &str,
        hint: QualityTier,
    ) -> Result<StreamPayload, ProviderError> {
        self.streams(track_id, hint).await
    }
}
