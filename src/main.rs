//! Wavefinder - a multi-provider stream resolution service.
//!
//! Given a track (free-text query or video id), produce a playable
//! audio URL and normalized metadata by querying one of several
//! independent backend providers, with caching, per-provider response
//! normalization, audio-quality ranking and graceful fallback.

pub mod cli;
pub mod config;
pub mod providers;
pub mod resolver;

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn main() -> anyhow::Result<()> {
    let args = cli::Cli::parse();

    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true))
        .with(EnvFilter::from_default_env().add_directive("wavefinder=info".parse().unwrap()))
        .init();

    cli::run_command(&args)
}
