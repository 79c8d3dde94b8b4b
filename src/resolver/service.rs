//! Stream resolver - orchestrates cache, fallback and selection.
//!
//! This is the high-level API for resolving tracks and streams:
//! 1. Compute the request fingerprint and check the cache
//! 2. Walk the configured provider priority list, skipping providers in
//!    cool-down, until one returns a usable payload
//! 3. For stream requests, rank the candidates and pick one
//! 4. Store the result in the cache with the operation's TTL
//!
//! Providers within one request run sequentially by design (provider B
//! is only tried after A is confirmed empty or failed), which bounds
//! load on the backends. Stream resolution can optionally race the top
//! two providers and take the first success.

use std::sync::Arc;
use std::time::Duration;

use futures::future::{BoxFuture, Either, select};
use smallvec::{SmallVec, smallvec};

use crate::resolver::cache::{CachedPayload, ResponseCache};
use crate::resolver::clock::{Clock, SystemClock};
use crate::resolver::cooldown::{CooldownPolicy, CooldownTracker};
use crate::resolver::domain::{
    ProviderError, ProviderTag, QualityTier, ResolveError, ResolvedStream, StreamCandidate,
    StreamPayload, Track, TrackList, TrackReference,
};
use crate::resolver::fingerprint::Fingerprint;
use crate::resolver::selector::{self, SelectionError};
use crate::resolver::traits::StreamProvider;

/// Compact per-operation priority list (we never have more than a
/// handful of providers).
pub type Priority = SmallVec<[ProviderTag; 4]>;

/// Configuration for the resolver.
#[derive(Debug, Clone)]
pub struct ResolverConfig {
    /// Provider order per operation. First-party API first for metadata
    /// operations (quota-limited but authoritative); proxy network and
    /// extractors first for stream resolution, because the first-party
    /// API doesn't expose direct audio URLs.
    pub search_priority: Priority,
    pub trending_priority: Priority,
    pub playlist_priority: Priority,
    pub stream_priority: Priority,

    /// Upper bound on any single provider call
    pub call_timeout: Duration,

    /// TTL per operation type
    pub search_ttl: Duration,
    pub trending_ttl: Duration,
    pub playlist_ttl: Duration,
    /// Fallback TTL for resolved streams without an expiry hint
    pub stream_ttl: Duration,
    /// Ceiling applied to provider expiry hints
    pub stream_ttl_cap: Duration,

    pub cache_max_entries: usize,

    /// Low-tier selection ignores candidates below this bitrate
    pub low_bitrate_floor_kbps: u32,

    /// Race the top two stream providers and take the first success
    pub race_stream_providers: bool,

    pub cooldown: CooldownPolicy,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            search_priority: smallvec![
                ProviderTag::YouTube,
                ProviderTag::Piped,
                ProviderTag::InnerTube,
                ProviderTag::YtDlp,
            ],
            trending_priority: smallvec![ProviderTag::YouTube, ProviderTag::Piped],
            playlist_priority: smallvec![
                ProviderTag::YouTube,
                ProviderTag::Piped,
                ProviderTag::YtDlp,
            ],
            stream_priority: smallvec![
                ProviderTag::Piped,
                ProviderTag::InnerTube,
                ProviderTag::YtDlp,
            ],
            call_timeout: Duration::from_secs(8),
            search_ttl: Duration::from_secs(10 * 60),
            trending_ttl: Duration::from_secs(30 * 60),
            playlist_ttl: Duration::from_secs(10 * 60),
            stream_ttl: Duration::from_secs(10 * 60),
            stream_ttl_cap: Duration::from_secs(60 * 60),
            cache_max_entries: 256,
            low_bitrate_floor_kbps: 48,
            race_stream_providers: false,
            cooldown: CooldownPolicy::default(),
        }
    }
}

/// Remembers the most informative failure seen during a fallback walk,
/// so exhaustion can report it.
enum LastFailure {
    Provider(ProviderError),
    Selection(ProviderTag),
}

/// Multi-provider stream resolver.
///
/// Owns the provider set, the response cache and the per-provider
/// cool-down state. Safe to share across concurrent requests; nothing
/// here is request-scoped.
pub struct StreamResolver {
    config: ResolverConfig,
    providers: Vec<Arc<dyn StreamProvider>>,
    cache: ResponseCache,
    cooldown: CooldownTracker,
    clock: Arc<dyn Clock>,
}

impl StreamResolver {
    /// Create a resolver over the given providers.
    pub fn new(config: ResolverConfig, providers: Vec<Arc<dyn StreamProvider>>) -> Self {
        Self::with_clock(config, providers, Arc::new(SystemClock))
    }

    /// Create a resolver with an injected clock (fake time in tests).
    pub fn with_clock(
        config: ResolverConfig,
        providers: Vec<Arc<dyn StreamProvider>>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let cache = ResponseCache::new(config.cache_max_entries, clock.clone());
        let cooldown = CooldownTracker::new(config.cooldown.clone(), clock.clone());
        Self {
            config,
            providers,
            cache,
            cooldown,
            clock,
        }
    }

    /// Free-text search across providers in priority order.
    pub async fn search(&self, query: &str, limit: usize) -> Result<TrackList, ResolveError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(ResolveError::InvalidReference(
                "empty search query".to_string(),
            ));
        }

        let fingerprint = Fingerprint::search(query, limit);
        let q = query.to_string();
        self.run_track_op(
            "search",
            fingerprint,
            &self.config.search_priority,
            self.config.search_ttl,
            move |p| {
                let q = q.clone();
                Box::pin(async move { p.search(&q, limit).await })
            },
        )
        .await
    }

    /// Currently popular tracks.
    pub async fn trending(&self, limit: usize) -> Result<TrackList, ResolveError> {
        let fingerprint = Fingerprint::trending(limit);
        self.run_track_op(
            "trending",
            fingerprint,
            &self.config.trending_priority,
            self.config.trending_ttl,
            move |p| Box::pin(async move { p.trending(limit).await }),
        )
        .await
    }

    /// Tracks of a playlist.
    pub async fn playlist(
        &self,
        playlist_id: &str,
        limit: usize,
    ) -> Result<TrackList, ResolveError> {
        let playlist_id = playlist_id.trim();
        if playlist_id.is_empty() {
            return Err(ResolveError::InvalidReference(
                "empty playlist id".to_string(),
            ));
        }

        let fingerprint = Fingerprint::playlist(playlist_id, limit);
        let id = playlist_id.to_string();
        self.run_track_op(
            "playlist",
            fingerprint,
            &self.config.playlist_priority,
            self.config.playlist_ttl,
            move |p| {
                let id = id.clone();
                Box::pin(async move { p.playlist(&id, limit).await })
            },
        )
        .await
    }

    /// Resolve a track reference to one playable stream.
    ///
    /// A `Query` reference first runs the search fallback chain to obtain
    /// an id, then resolves that id through the stream chain.
    pub async fn resolve_stream(
        &self,
        reference: &TrackReference,
        tier: QualityTier,
    ) -> Result<ResolvedStream, ResolveError> {
        let track_id = match reference {
            TrackReference::Id(id) => {
                let id = id.trim();
                if id.is_empty() {
                    return Err(ResolveError::InvalidReference(
                        "empty track id".to_string(),
                    ));
                }
                id.to_string()
            }
            TrackReference::Query(query) => {
                let found = self.search(query, 1).await?;
                match found.tracks.first() {
                    Some(track) => track.id.clone(),
                    None => return Err(ResolveError::Exhausted { last_error: None }),
                }
            }
        };

        self.resolve_stream_by_id(&track_id, tier).await
    }

    async fn resolve_stream_by_id(
        &self,
        track_id: &str,
        tier: QualityTier,
    ) -> Result<ResolvedStream, ResolveError> {
        let fingerprint = Fingerprint::stream(track_id, tier);
        if let Some(CachedPayload::Stream(resolved)) = self.cache.get(&fingerprint) {
            tracing::debug!("cache hit for {fingerprint}");
            return Ok(resolved);
        }

        let available: Vec<Arc<dyn StreamProvider>> = self
            .config
            .stream_priority
            .iter()
            .filter_map(|tag| self.provider(*tag))
            .filter(|p| {
                let blocked = self.cooldown.is_blocked(p.tag());
                if blocked {
                    tracing::debug!("skipping {} - in cool-down", p.tag());
                }
                !blocked
            })
            .collect();

        let mut last_failure: Option<LastFailure> = None;

        let sequential_start = if self.config.race_stream_providers && available.len() >= 2 {
            let (a, b) = (available[0].clone(), available[1].clone());
            let (tag_a, tag_b) = (a.tag(), b.tag());
            let fut_a = Box::pin(self.attempt_stream(a, track_id, tier));
            let fut_b = Box::pin(self.attempt_stream(b, track_id, tier));

            // First success wins; the loser future is dropped, which
            // cancels its outbound call.
            match select(fut_a, fut_b).await {
                Either::Left((outcome_a, rest_b)) => {
                    if let Some(win) =
                        self.settle_stream(tag_a, outcome_a, &fingerprint, tier, &mut last_failure)
                    {
                        return Ok(win);
                    }
                    let outcome_b = rest_b.await;
                    if let Some(win) =
                        self.settle_stream(tag_b, outcome_b, &fingerprint, tier, &mut last_failure)
                    {
                        return Ok(win);
                    }
                }
                Either::Right((outcome_b, rest_a)) => {
                    if let Some(win) =
                        self.settle_stream(tag_b, outcome_b, &fingerprint, tier, &mut last_failure)
                    {
                        return Ok(win);
                    }
                    let outcome_a = rest_a.await;
                    if let Some(win) =
                        self.settle_stream(tag_a, outcome_a, &fingerprint, tier, &mut last_failure)
                    {
                        return Ok(win);
                    }
                }
            }
            2
        } else {
            0
        };

        for provider in &available[sequential_start..] {
            let tag = provider.tag();
            let outcome = self.attempt_stream(provider.clone(), track_id, tier).await;
            if let Some(win) = self.settle_stream(tag, outcome, &fingerprint, tier, &mut last_failure)
            {
                return Ok(win);
            }
        }

        Err(match last_failure {
            Some(LastFailure::Selection(source)) => ResolveError::NoUsableStream { source },
            Some(LastFailure::Provider(e)) => ResolveError::Exhausted {
                last_error: Some(e),
            },
            None => ResolveError::Exhausted { last_error: None },
        })
    }

    /// One provider's stream call, timeout-bounded.
    async fn attempt_stream(
        &self,
        provider: Arc<dyn StreamProvider>,
        track_id: &str,
        tier: QualityTier,
    ) -> Result<StreamPayload, ProviderError> {
        match tokio::time::timeout(self.config.call_timeout, provider.streams(track_id, tier)).await
        {
            Ok(result) => result,
            Err(_) => Err(ProviderError::Transport(format!(
                "timed out after {:?}",
                self.config.call_timeout
            ))),
        }
    }

    /// Classify one stream outcome. Returns the resolved stream on
    /// success; otherwise updates cool-down bookkeeping and the
    /// last-failure record and returns None so the walk continues.
    fn settle_stream(
        &self,
        tag: ProviderTag,
        outcome: Result<StreamPayload, ProviderError>,
        fingerprint: &Fingerprint,
        tier: QualityTier,
        last_failure: &mut Option<LastFailure>,
    ) -> Option<ResolvedStream> {
        let payload = match outcome {
            Err(ProviderError::NotFound) => return None,
            Err(ProviderError::RateLimited) => {
                self.cooldown.record_rate_limit(tag);
                *last_failure = Some(LastFailure::Provider(ProviderError::RateLimited));
                return None;
            }
            Err(e) => {
                tracing::warn!("stream lookup on {tag} failed: {e}");
                self.cooldown.record_failure(tag);
                *last_failure = Some(LastFailure::Provider(e));
                return None;
            }
            Ok(payload) if payload.candidates.is_empty() => return None,
            Ok(payload) => payload,
        };

        match selector::select(
            &payload.candidates,
            tier,
            self.config.low_bitrate_floor_kbps,
        ) {
            Ok(candidate) => {
                self.cooldown.record_success(tag);
                let resolved = ResolvedStream::from_candidate(candidate, &payload, tag);
                let ttl = self.ttl_for_candidate(candidate);
                self.cache
                    .insert(fingerprint, CachedPayload::Stream(resolved.clone()), ttl);
                tracing::info!(
                    "resolved stream via {tag} ({} kbps, ttl {:?})",
                    resolved
                        .bitrate_kbps
                        .map(|b| b.to_string())
                        .unwrap_or_else(|| "?".to_string()),
                    ttl
                );
                Some(resolved)
            }
            Err(SelectionError::NoCandidates) => None,
            Err(SelectionError::NoneValid) => {
                // Data-quality problem, not a transport one: no cool-down
                // penalty, but remember it for the exhaustion report
                tracing::warn!("{tag} returned candidates but none were playable");
                *last_failure = Some(LastFailure::Selection(tag));
                None
            }
        }
    }

    /// TTL for a resolved stream: the provider's expiry hint when
    /// present (clamped to a sane range), else the configured default.
    fn ttl_for_candidate(&self, candidate: &StreamCandidate) -> Duration {
        match candidate.expires_at_unix {
            Some(expires_at) => {
                let remaining = expires_at.saturating_sub(self.clock.unix_time());
                let capped = remaining.clamp(30, self.config.stream_ttl_cap.as_secs());
                Duration::from_secs(capped)
            }
            None => self.config.stream_ttl,
        }
    }

    /// Shared fallback walk for the track-list operations.
    async fn run_track_op<F>(
        &self,
        op: &'static str,
        fingerprint: Fingerprint,
        priority: &[ProviderTag],
        ttl: Duration,
        call: F,
    ) -> Result<TrackList, ResolveError>
    where
        F: Fn(Arc<dyn StreamProvider>) -> BoxFuture<'static, Result<Vec<Track>, ProviderError>>,
    {
        if let Some(CachedPayload::Tracks(list)) = self.cache.get(&fingerprint) {
            tracing::debug!("cache hit for {fingerprint}");
            return Ok(list);
        }

        let mut last_error: Option<ProviderError> = None;

        for tag in priority {
            let Some(provider) = self.provider(*tag) else {
                tracing::debug!("{op}: provider {tag} not configured, skipping");
                continue;
            };
            if self.cooldown.is_blocked(*tag) {
                tracing::debug!("{op}: skipping {tag} - in cool-down");
                continue;
            }

            let outcome = tokio::time::timeout(self.config.call_timeout, call(provider)).await;
            match outcome {
                Err(_) => {
                    tracing::warn!(
                        "{op} on {tag} timed out after {:?}",
                        self.config.call_timeout
                    );
                    self.cooldown.record_failure(*tag);
                    last_error = Some(ProviderError::Transport(format!(
                        "timed out after {:?}",
                        self.config.call_timeout
                    )));
                }
                Ok(Err(ProviderError::NotFound)) => {
                    // Well-formed empty: try the next provider, no penalty
                }
                Ok(Err(ProviderError::RateLimited)) => {
                    self.cooldown.record_rate_limit(*tag);
                    last_error = Some(ProviderError::RateLimited);
                }
                Ok(Err(e)) => {
                    tracing::warn!("{op} on {tag} failed: {e}");
                    self.cooldown.record_failure(*tag);
                    last_error = Some(e);
                }
                Ok(Ok(tracks)) if tracks.is_empty() => {}
                Ok(Ok(tracks)) => {
                    self.cooldown.record_success(*tag);
                    let list = TrackList {
                        tracks,
                        source: *tag,
                    };
                    self.cache
                        .insert(&fingerprint, CachedPayload::Tracks(list.clone()), ttl);
                    tracing::info!("{op}: {} tracks via {tag}", list.tracks.len());
                    return Ok(list);
                }
            }
        }

        Err(ResolveError::Exhausted { last_error })
    }

    fn provider(&self, tag: ProviderTag) -> Option<Arc<dyn StreamProvider>> {
        self.providers.iter().find(|p| p.tag() == tag).cloned()
    }

    #[cfg(test)]
    pub(crate) fn cooldown_tracker(&self) -> &CooldownTracker {
        &self.cooldown
    }

    #[cfg(test)]
    pub(crate) fn cache(&self) -> &ResponseCache {
        &self.cache
    }
}
