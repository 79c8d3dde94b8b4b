//! yt-dlp subprocess client
//!
//! Shells out to the `yt-dlp` command-line extractor in JSON dump mode.
//! This approach rides the extractor ecosystem's update cadence instead
//! of chasing site changes ourselves.
//!
//! Install yt-dlp:
//! - pipx: `pipx install yt-dlp`
//! - macOS: `brew install yt-dlp`
//! - Linux: `apt install yt-dlp` or equivalent
//!
//! Every invocation is timeout-bounded; on expiry the child is killed
//! and the call resolves to a transport error. stderr text is mapped
//! into the provider error taxonomy - unavailable videos are the empty
//! outcome, HTTP 429 from the extractor is a rate-limit signal.

use std::process::Stdio;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::process::Command;

use super::{adapter, dto};
use crate::resolver::domain::{ProviderError, QualityTier, StreamPayload, Track};

/// Common installation paths, checked when no binary is configured.
const YTDLP_PATHS: &[&str] = &[
    "yt-dlp", // In PATH
    "/usr/local/bin/yt-dlp",
    "/usr/bin/yt-dlp",
    "/opt/homebrew/bin/yt-dlp",
];

/// CLI extractor client.
pub struct YtDlpClient {
    /// Configured binary path; when None the common paths are probed
    binary_override: Option<String>,
    /// Probe result, cached after the first call
    resolved_binary: Mutex<Option<String>>,
    timeout: Duration,
}

impl YtDlpClient {
    pub fn new(binary_override: Option<String>, timeout: Duration) -> Self {
        Self {
            binary_override,
            resolved_binary: Mutex::new(None),
            timeout,
        }
    }

    /// Search via the extractor's `ytsearchN:` pseudo-URL.
    pub async fn search(&self, query: &str, limit: usize) -> Result<Vec<Track>, ProviderError> {
        let target = format!("ytsearch{}:{}", limit.clamp(1, 50), query);
        let dump: dto::PlaylistDump = self
            .run_dump(&["-J", "--flat-playlist", "--no-warnings", &target])
            .await?;
        Ok(adapter::entries_to_tracks(dump, limit))
    }

    /// Flat dump of a playlist.
    pub async fn playlist(
        &self,
        playlist_id: &str,
        limit: usize,
    ) -> Result<Vec<Track>, ProviderError> {
        let url = format!(
            "https://www.youtube.com/playlist?list={}",
            urlencoding::encode(playlist_id)
        );
        let dump: dto::PlaylistDump = self
            .run_dump(&["-J", "--flat-playlist", "--no-warnings", &url])
            .await?;
        Ok(adapter::entries_to_tracks(dump, limit))
    }

    /// Full dump of one video; the formats list becomes the candidates.
    /// The quality hint is ignored - the dump always carries every
    /// format and selection happens in the resolver.
    pub async fn streams(
        &self,
        track_id: &str,
        _hint: QualityTier,
    ) -> Result<StreamPayload, ProviderError> {
        let dump: dto::VideoDump = self
            .run_dump(&["-J", "--no-playlist", "--no-warnings", "--", track_id])
            .await?;
        Ok(adapter::to_stream_payload(dump))
    }

    /// Run the binary with the given args and parse its stdout dump.
    async fn run_dump<T: serde::de::DeserializeOwned>(
        &self,
        args: &[&str],
    ) -> Result<T, ProviderError> {
        let binary = self.find_binary().await.ok_or_else(|| {
            ProviderError::Transport(
                "yt-dlp not found - install it or set the binary path in the config".to_string(),
            )
        })?;

        let child = Command::new(&binary)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| ProviderError::Transport(format!("failed to run yt-dlp: {e}")))?;

        let output = match tokio::time::timeout(self.timeout, child.wait_with_output()).await {
            Ok(result) => {
                result.map_err(|e| ProviderError::Transport(format!("yt-dlp io error: {e}")))?
            }
            Err(_) => {
                // kill_on_drop reaps the child once the future is dropped
                tracing::warn!("yt-dlp timed out after {:?}, killing", self.timeout);
                return Err(ProviderError::Transport(format!(
                    "yt-dlp timed out after {:?}",
                    self.timeout
                )));
            }
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(classify_stderr(stderr.trim()));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        serde_json::from_str(&stdout)
            .map_err(|e| ProviderError::InvalidResponse(format!("bad yt-dlp dump: {e}")))
    }

    /// Locate the binary: the configured override wins, otherwise the
    /// common paths are probed with `--version`. The result is cached.
    async fn find_binary(&self) -> Option<String> {
        if let Some(ref binary) = self.binary_override {
            return Some(binary.clone());
        }

        if let Some(cached) = self.resolved_binary.lock().clone() {
            return Some(cached);
        }

        for path in YTDLP_PATHS {
            let works = Command::new(path)
                .arg("--version")
                .stdin(Stdio::null())
                .stdout(Stdio::null())
                .stderr(Stdio::null())
                .status()
                .await
                .map(|s| s.success())
                .unwrap_or(false);
            if works {
                *self.resolved_binary.lock() = Some(path.to_string());
                return Some(path.to_string());
            }
        }

        None
    }
}

/// Map extractor stderr onto the error taxonomy.
fn classify_stderr(stderr: &str) -> ProviderError {
    let lower = stderr.to_lowercase();

    if lower.contains("video unavailable")
        || lower.contains("does not exist")
        || lower.contains("no video results")
        || lower.contains("this video is not available")
    {
        return ProviderError::NotFound;
    }

    if lower.contains("429") || lower.contains("too many requests") || lower.contains("rate-limit")
    {
        return ProviderError::RateLimited;
    }

    if lower.contains("unable to extract") || lower.contains("unsupported url") {
        return ProviderError::InvalidResponse(last_line(stderr));
    }

    ProviderError::Transport(last_line(stderr))
}

/// yt-dlp prints its decisive ERROR line last.
fn last_line(text: &str) -> String {
    text.lines()
        .rev()
        .find(|l| !l.trim().is_empty())
        .unwrap_or("yt-dlp failed")
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_unavailable_as_not_found() {
        let err = classify_stderr("ERROR: [youtube] abc: Video unavailable");
        assert_eq!(err, ProviderError::NotFound);
    }

    #[test]
    fn test_classify_rate_limit() {
        let err = classify_stderr("ERROR: unable to download: HTTP Error 429: Too Many Requests");
        assert_eq!(err, ProviderError::RateLimited);
    }

    #[test]
    fn test_classify_extraction_failure() {
        let err = classify_stderr("ERROR: unable to extract player response");
        assert!(matches!(err, ProviderError::InvalidResponse(_)));
    }

    #[test]
    fn test_classify_other_as_transport() {
        let err = classify_stderr("ERROR: Unable to download webpage: timed out");
        assert!(matches!(err, ProviderError::Transport(_)));
    }

    #[test]
    fn test_last_line_skips_trailing_blanks() {
        let stderr = "WARNING: something\nERROR: the real problem\n\n";
        assert_eq!(last_line(stderr), "ERROR: the real problem");
    }

    #[test]
    fn test_configured_binary_wins() {
        let client = YtDlpClient::new(Some("/custom/yt-dlp".to_string()), Duration::from_secs(30));
        let binary = tokio::runtime::Runtime::new()
            .unwrap()
            .block_on(client.find_binary());
        assert_eq!(binary.as_deref(), Some("/custom/yt-dlp"));
    }
}
