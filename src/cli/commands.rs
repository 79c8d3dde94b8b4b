//! CLI command definitions and handlers.
//!
//! Each subcommand is implemented as a function that takes the parsed
//! arguments and returns an `anyhow::Result<()>`. Commands build the
//! resolver from the config file and run against a tokio runtime.

use clap::{Parser, Subcommand};
use tokio::runtime::Runtime;
use tracing::debug;

use crate::config;
use crate::providers::build_providers;
use crate::resolver::domain::{QualityTier, TrackList, TrackReference};
use crate::resolver::service::StreamResolver;

/// Wavefinder CLI - multi-provider stream resolution
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand)]
pub enum Commands {
    /// Search tracks across providers
    Search {
        /// Free-text query
        query: String,
        /// Maximum number of results
        #[arg(short, long, default_value_t = 10)]
        limit: usize,
    },
    /// Show currently popular tracks
    Trending {
        /// Maximum number of results
        #[arg(short, long, default_value_t = 20)]
        limit: usize,
    },
    /// List the tracks of a playlist
    Playlist {
        /// Playlist identifier
        id: String,
        /// Maximum number of results
        #[arg(short, long, default_value_t = 50)]
        limit: usize,
    },
    /// Resolve a track to a playable audio URL
    Resolve {
        /// Track id, or a free-text query with --search
        track: String,
        /// Treat the argument as a search query instead of an id
        #[arg(short, long)]
        search: bool,
        /// Audio quality tier: low, medium, high or auto
        #[arg(short, long, default_value = "auto")]
        quality: QualityTier,
    },
    /// Print the config file location and the active configuration
    Config,
}

/// Run the specified CLI command.
pub fn run_command(cli: &Cli) -> anyhow::Result<()> {
    let rt = Runtime::new()?;

    match &cli.command {
        Commands::Search { query, limit } => cmd_search(&rt, query, *limit),
        Commands::Trending { limit } => cmd_trending(&rt, *limit),
        Commands::Playlist { id, limit } => cmd_playlist(&rt, id, *limit),
        Commands::Resolve {
            track,
            search,
            quality,
        } => cmd_resolve(&rt, track, *search, *quality),
        Commands::Config => cmd_config(),
    }
}

/// Build the resolver from the on-disk config.
fn build_resolver() -> StreamResolver {
    let config = config::load();
    let providers = build_providers(&config);
    debug!("resolver built with {} providers", providers.len());
    StreamResolver::new(config.resolver_config(), providers)
}

fn cmd_search(rt: &Runtime, query: &str, limit: usize) -> anyhow::Result<()> {
    let resolver = build_resolver();
    let result = rt.block_on(resolver.search(query, limit))?;
    print_track_list(&result);
    Ok(())
}

fn cmd_trending(rt: &Runtime, limit: usize) -> anyhow::Result<()> {
    let resolver = build_resolver();
    let result = rt.block_on(resolver.trending(limit))?;
    print_track_list(&result);
    Ok(())
}

fn cmd_playlist(rt: &Runtime, id: &str, limit: usize) -> anyhow::Result<()> {
    let resolver = build_resolver();
    let result = rt.block_on(resolver.playlist(id, limit))?;
    print_track_list(&result);
    Ok(())
}

fn cmd_resolve(rt: &Runtime, track: &str, search: bool, quality: QualityTier) -> anyhow::Result<()> {
    let resolver = build_resolver();
    let reference = if search {
        TrackReference::Query(track.to_string())
    } else {
        TrackReference::Id(track.to_string())
    };

    let stream = rt.block_on(resolver.resolve_stream(&reference, quality))?;

    if let Some(ref title) = stream.title {
        println!("Title:    {title}");
    }
    if let Some(duration) = stream.duration_secs {
        println!("Duration: {}", format_duration(duration));
    }
    println!("Type:     {}", stream.mime_type);
    if let Some(bitrate) = stream.bitrate_kbps {
        println!(
            "Audio:    {} kbps{}",
            bitrate,
            stream
                .codec
                .as_deref()
                .map(|c| format!(" ({c})"))
                .unwrap_or_default()
        );
    }
    println!("Source:   {}", stream.source);
    println!("{}", stream.url);
    Ok(())
}

fn cmd_config() -> anyhow::Result<()> {
    match config::config_path() {
        Some(path) => println!(
            "Config file: {} {}",
            path.display(),
            if path.exists() { "" } else { "(not created yet)" }
        ),
        None => println!("Config file: <no config directory available>"),
    }

    let config = config::load();
    println!();
    print!("{}", toml::to_string_pretty(&config)?);
    Ok(())
}

fn print_track_list(list: &TrackList) {
    println!("{} track(s) via {}", list.tracks.len(), list.source);
    for track in &list.tracks {
        let duration = track
            .duration_secs
            .map(format_duration)
            .unwrap_or_else(|| "-:--".to_string());
        let artist = track.artist.as_deref().unwrap_or("unknown artist");
        println!("  {:<12} {:>8}  {} - {}", track.id, duration, artist, track.title);
    }
}

/// Seconds to m:ss / h:mm:ss display form.
fn format_duration(secs: u32) -> String {
    let (h, m, s) = (secs / 3600, (secs / 60) % 60, secs % 60);
    if h > 0 {
        format!("{h}:{m:02}:{s:02}")
    } else {
        format!("{m}:{s:02}")
    }
}
