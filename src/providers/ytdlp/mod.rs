//! yt-dlp - command-line extractor provider.
//!
//! Search, playlists and stream extraction via `yt-dlp -J` dumps. The
//! slowest provider (it spawns a Python process per call), so it sits
//! last in every priority list.

pub mod adapter;
pub mod client;
pub mod dto;

pub use client::YtDlpClient;
