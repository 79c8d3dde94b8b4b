//! Shared normalization helpers used by every provider adapter.
//!
//! All functions here are total: malformed input yields None/unchanged
//! output, never a panic. Provider payloads are hostile territory -
//! textual durations, protocol-relative thumbnail URLs, bitrates in
//! bits or kilobits depending on the backend.

/// Parse a clock-style duration ("3:45", "1:02:03") into seconds.
///
/// Scraped payloads carry durations as display text. Returns None for
/// anything that isn't a well-formed h:mm:ss / m:ss / plain-seconds
/// string.
pub fn parse_clock_duration(text: &str) -> Option<u32> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    let parts: Vec<&str> = text.split(':').collect();
    if parts.len() > 3 {
        return None;
    }

    let mut seconds: u64 = 0;
    for (i, part) in parts.iter().enumerate() {
        let value: u64 = part.trim().parse().ok()?;
        // Minute/second fields of a multi-part duration are capped at 59
        if i > 0 && value > 59 {
            return None;
        }
        seconds = seconds * 60 + value;
    }

    u32::try_from(seconds).ok()
}

/// Parse an ISO 8601 duration as the Data API emits them ("PT3M45S",
/// "PT1H2M3S", "PT52S") into seconds.
pub fn parse_iso8601_duration(text: &str) -> Option<u32> {
    let rest = text.trim().strip_prefix("PT")?;
    if rest.is_empty() {
        return None;
    }

    let mut seconds: u64 = 0;
    let mut number = String::new();
    for ch in rest.chars() {
        if ch.is_ascii_digit() {
            number.push(ch);
            continue;
        }
        let value: u64 = number.parse().ok()?;
        number.clear();
        match ch {
            'H' => seconds += value * 3600,
            'M' => seconds += value * 60,
            'S' => seconds += value,
            _ => return None,
        }
    }
    // Trailing digits without a unit designator
    if !number.is_empty() {
        return None;
    }

    u32::try_from(seconds).ok()
}

/// Make a thumbnail URL absolute. Providers frequently emit
/// protocol-relative URLs ("//i.ytimg.com/...").
pub fn absolutize_thumbnail(url: &str) -> Option<String> {
    let url = url.trim();
    if url.is_empty() {
        return None;
    }
    if let Some(rest) = url.strip_prefix("//") {
        return Some(format!("https://{rest}"));
    }
    if url.starts_with("http://") || url.starts_with("https://") {
        return Some(url.to_string());
    }
    // Bare paths aren't resolvable without a base; drop them
    None
}

/// Extract the `expire=` unix timestamp stream URLs carry as part of
/// their signed token, if present. Used as the cache TTL hint.
pub fn parse_url_expiry(url: &str) -> Option<u64> {
    let query = url.split_once('?')?.1;
    for pair in query.split('&') {
        if let Some(value) = pair.strip_prefix("expire=") {
            return value.parse().ok();
        }
    }
    None
}

/// Bits-per-second to kbps, rounding to the nearest kilobit. Backends
/// disagree on units; anything that already looks like kbps (< 10000)
/// is passed through.
pub fn bits_to_kbps(bitrate: u64) -> Option<u32> {
    if bitrate == 0 {
        return None;
    }
    let kbps = if bitrate < 10_000 {
        bitrate
    } else {
        (bitrate + 500) / 1000
    };
    u32::try_from(kbps).ok()
}
