//! Configuration system using TOML files.
//!
//! Config is stored in the OS-standard config directory:
//! - Windows: %APPDATA%\wavefinder\config.toml
//! - macOS: ~/Library/Application Support/wavefinder/config.toml
//! - Linux: ~/.config/wavefinder/config.toml
//!
//! The config file is human-readable and editable. Settings are loaded
//! at startup; every section and field has a default, so a partial (or
//! absent) file always yields a usable config.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::resolver::domain::ProviderTag;
use crate::resolver::service::ResolverConfig;

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// API credentials (keep separate for potential future encryption)
    pub credentials: Credentials,

    /// Provider priorities and backend endpoints
    pub providers: ProvidersConfig,

    /// Timeouts and concurrency knobs
    pub network: NetworkConfig,

    /// Failure backoff behavior
    pub cooldown: CooldownSettings,

    /// Response cache sizing and TTLs
    pub cache: CacheSettings,
}

/// API credentials
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Credentials {
    /// Data API v3 key; without it the first-party provider is disabled
    pub youtube_api_key: Option<String>,
}

/// Provider priorities per operation, plus backend endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProvidersConfig {
    /// Priority order for search (first-party first: authoritative)
    pub search: Vec<ProviderTag>,

    /// Priority order for trending
    pub trending: Vec<ProviderTag>,

    /// Priority order for playlists
    pub playlist: Vec<ProviderTag>,

    /// Priority order for stream resolution (extractors first: the
    /// first-party API has no media URLs)
    pub stream: Vec<ProviderTag>,

    /// Piped instances to rotate across (empty = built-in defaults)
    pub piped_instances: Vec<String>,

    /// Explicit yt-dlp binary path (empty = probe common locations)
    pub ytdlp_binary: Option<String>,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        Self {
            search: vec![
                ProviderTag::YouTube,
                ProviderTag::Piped,
                ProviderTag::InnerTube,
                ProviderTag::YtDlp,
            ],
            trending: vec![ProviderTag::YouTube, ProviderTag::Piped],
            playlist: vec![
                ProviderTag::YouTube,
                ProviderTag::Piped,
                ProviderTag::YtDlp,
            ],
            stream: vec![
                ProviderTag::Piped,
                ProviderTag::InnerTube,
                ProviderTag::YtDlp,
            ],
            piped_instances: Vec::new(),
            ytdlp_binary: None,
        }
    }
}

/// Timeouts and concurrency knobs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// Timeout for each outbound HTTP request
    pub http_timeout_secs: u64,

    /// Timeout for one yt-dlp invocation (slower: spawns a process)
    pub ytdlp_timeout_secs: u64,

    /// Outer bound on a whole provider attempt, including instance
    /// rotation inside an adapter
    pub provider_call_timeout_secs: u64,

    /// Race the top two stream providers and take the first success
    pub race_stream_providers: bool,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            http_timeout_secs: 8,
            ytdlp_timeout_secs: 25,
            provider_call_timeout_secs: 30,
            race_stream_providers: false,
        }
    }
}

/// Failure backoff behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CooldownSettings {
    /// Consecutive failures that suspend a provider
    pub failure_threshold: u32,

    /// Window (seconds) over which failures count as consecutive
    pub failure_window_secs: u64,

    /// Suspension length (seconds) after tripping the threshold
    pub backoff_secs: u64,

    /// Suspension length (seconds) after a rate-limit signal
    pub rate_limit_backoff_secs: u64,
}

impl Default for CooldownSettings {
    fn default() -> Self {
        Self {
            failure_threshold: 3,
            failure_window_secs: 60,
            backoff_secs: 60,
            rate_limit_backoff_secs: 300,
        }
    }
}

/// Response cache sizing and TTLs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    pub search_ttl_secs: u64,
    pub trending_ttl_secs: u64,
    pub playlist_ttl_secs: u64,

    /// Fallback TTL for resolved streams without an expiry hint
    pub stream_ttl_secs: u64,

    /// Ceiling applied to provider expiry hints
    pub stream_ttl_cap_secs: u64,

    /// Oldest entries are evicted past this count
    pub max_entries: usize,

    /// Low-tier selection ignores candidates below this bitrate
    pub low_bitrate_floor_kbps: u32,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            search_ttl_secs: 10 * 60,
            trending_ttl_secs: 30 * 60,
            playlist_ttl_secs: 10 * 60,
            stream_ttl_secs: 10 * 60,
            stream_ttl_cap_secs: 60 * 60,
            max_entries: 256,
            low_bitrate_floor_kbps: 48,
        }
    }
}

impl Config {
    /// Project the file config onto the resolver's runtime config.
    pub fn resolver_config(&self) -> ResolverConfig {
        ResolverConfig {
            search_priority: self.providers.search.iter().copied().collect(),
            trending_priority: self.providers.trending.iter().copied().collect(),
            playlist_priority: self.providers.playlist.iter().copied().collect(),
            stream_priority: self.providers.stream.iter().copied().collect(),
            call_timeout: Duration::from_secs(self.network.provider_call_timeout_secs),
            search_ttl: Duration::from_secs(self.cache.search_ttl_secs),
            trending_ttl: Duration::from_secs(self.cache.trending_ttl_secs),
            playlist_ttl: Duration::from_secs(self.cache.playlist_ttl_secs),
            stream_ttl: Duration::from_secs(self.cache.stream_ttl_secs),
            stream_ttl_cap: Duration::from_secs(self.cache.stream_ttl_cap_secs),
            cache_max_entries: self.cache.max_entries,
            low_bitrate_floor_kbps: self.cache.low_bitrate_floor_kbps,
            race_stream_providers: self.network.race_stream_providers,
            cooldown: crate::resolver::cooldown::CooldownPolicy {
                failure_threshold: self.cooldown.failure_threshold,
                failure_window: Duration::from_secs(self.cooldown.failure_window_secs),
                backoff: Duration::from_secs(self.cooldown.backoff_secs),
                rate_limit_backoff: Duration::from_secs(self.cooldown.rate_limit_backoff_secs),
            },
        }
    }
}

// ============================================================================
// Config File Operations
// ============================================================================

/// Get the config directory path
pub fn config_dir() -> Option<std::path::PathBuf> {
    dirs::config_dir().map(|d| d.join("wavefinder"))
}

/// Get the full path to the config file
pub fn config_path() -> Option<std::path::PathBuf> {
    config_dir().map(|d| d.join("config.toml"))
}

/// Load configuration from disk
///
/// Returns default config if file doesn't exist or can't be parsed.
/// Logs warnings but doesn't fail - we always return a usable config.
pub fn load() -> Config {
    let Some(path) = config_path() else {
        tracing::warn!("Could not determine config directory, using defaults");
        return Config::default();
    };
    load_from(&path)
}

/// Load configuration from an explicit path.
pub fn load_from(path: &std::path::Path) -> Config {
    if !path.exists() {
        tracing::debug!("No config file found at {:?}, using defaults", path);
        return Config::default();
    }

    match std::fs::read_to_string(path) {
        Ok(contents) => match toml::from_str(&contents) {
            Ok(config) => {
                tracing::info!("Loaded config from {:?}", path);
                config
            }
            Err(e) => {
                tracing::error!("Failed to parse config file {:?}: {}", path, e);
                tracing::warn!("Using default configuration");
                Config::default()
            }
        },
        Err(e) => {
            tracing::error!("Failed to read config file {:?}: {}", path, e);
            Config::default()
        }
    }
}

/// Save configuration to disk
///
/// Creates the config directory if it doesn't exist.
pub fn save(config: &Config) -> Result<(), ConfigError> {
    let dir = config_dir().ok_or(ConfigError::NoConfigDir)?;
    save_to(config, &dir.join("config.toml"))
}

/// Save configuration to an explicit path.
pub fn save_to(config: &Config, path: &std::path::Path) -> Result<(), ConfigError> {
    // Ensure directory exists
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(|e| ConfigError::CreateDir(dir.to_path_buf(), e))?;
    }

    // Serialize to pretty TOML
    let contents = toml::to_string_pretty(config).map_err(ConfigError::Serialize)?;

    // Write atomically (write to temp, then rename)
    let temp_path = path.with_extension("toml.tmp");
    std::fs::write(&temp_path, &contents).map_err(|e| ConfigError::Write(temp_path.clone(), e))?;
    std::fs::rename(&temp_path, path)
        .map_err(|e| ConfigError::Rename(temp_path, path.to_path_buf(), e))?;

    tracing::info!("Saved config to {:?}", path);
    Ok(())
}

// ============================================================================
// Error Types
// ============================================================================

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Failed to create config directory {0}: {1}")]
    CreateDir(std::path::PathBuf, std::io::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(toml::ser::Error),

    #[error("Failed to write config to {0}: {1}")]
    Write(std::path::PathBuf, std::io::Error),

    #[error("Failed to rename temp file {0} to {1}: {2}")]
    Rename(std::path::PathBuf, std::path::PathBuf, std::io::Error),
}

// ============================================================================
// Tests
// ============================================================================
