//! Stream resolution - multi-provider fallback with caching and selection.
//!
//! # Architecture
//!
//! This module follows a clean separation between:
//! - **Domain models** (`domain.rs`) - Internal types that represent our data model
//! - **Fingerprints** (`fingerprint.rs`) - Deterministic cache keys per request
//! - **Cache** (`cache.rs`) - TTL-bounded store for results and resolved streams
//! - **Cool-down** (`cooldown.rs`) - Per-provider failure tracking and backoff
//! - **Selector** (`selector.rs`) - Quality-tier ranking of stream candidates
//! - **Traits** (`traits.rs`) - The uniform provider contract + test mocks
//! - **Service** (`service.rs`) - The fallback orchestrator tying it together
//!
//! Provider-specific code (DTOs, normalization, HTTP/process clients)
//! lives under `crate::providers` - nothing in here knows any backend's
//! wire format.
//!
//! # Usage
//!
//! ```ignore
//! use wavefinder::resolver::{StreamResolver, ResolverConfig, TrackReference, QualityTier};
//!
//! let resolver = StreamResolver::new(ResolverConfig::default(), providers);
//! let found = resolver.search("lofi beats", 5).await?;
//! let stream = resolver
//!     .resolve_stream(&TrackReference::Id(found.tracks[0].id.clone()), QualityTier::High)
//!     .await?;
//! println!("{} ({})", stream.url, stream.mime_type);
//! ```

pub mod cache;
pub mod clock;
pub mod cooldown;
pub mod domain;
pub mod fingerprint;
pub mod selector;
pub mod service;
pub mod traits;

pub use domain::{
    ProviderError, ProviderTag, QualityTier, ResolveError, ResolvedStream, StreamCandidate,
    StreamPayload, Track, TrackList, TrackReference,
};
pub use fingerprint::Fingerprint;
pub use service::{Priority, ResolverConfig, StreamResolver};
pub use traits::StreamProvider;
