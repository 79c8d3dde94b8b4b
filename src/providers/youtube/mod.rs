//! First-party Data API provider.
//!
//! Authoritative for search, trending and playlists, but quota-limited
//! and without direct media URLs - stream resolution always falls
//! through to the proxy-network and extractor providers.

pub mod adapter;
pub mod client;
pub mod dto;

pub use client::YouTubeClient;
