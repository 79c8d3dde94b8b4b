//! InnerTube - web-client scraping extractor.
//!
//! Search and stream extraction via the streaming site's internal JSON
//! API. No trending or playlist surface - the resolver treats those as
//! well-formed empty and moves on.

pub mod adapter;
pub mod client;
pub mod dto;

pub use client::InnerTubeClient;
