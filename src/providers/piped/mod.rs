//! Piped - federated proxy-network provider.
//!
//! Full surface: search, trending, playlists and stream extraction with
//! a rich audio-candidate list. Preferred for stream resolution since
//! the first-party API doesn't hand out media URLs.

pub mod adapter;
pub mod client;
pub mod dto;

pub use client::{DEFAULT_INSTANCES, PipedClient};
