//! Stream selection - rank candidate audio streams and pick one.
//!
//! Given the candidates a provider returned and the caller's quality
//! tier, choose the single stream the player gets. Candidates with no
//! URL or no MIME type are discarded first; if that empties the list the
//! caller sees a distinct failure mode ("candidates present but none
//! valid"), separate from "provider returned nothing".

use crate::resolver::domain::{QualityTier, StreamCandidate};

/// Widely-supported audio codecs, most preferred first. Used to break
/// bitrate ties in favor of codecs every player handles.
const PREFERRED_CODECS: &[&str] = &["opus", "mp4a", "aac", "mp3", "vorbis"];

/// Medium tier targets the best stream at or below this bitrate.
const MEDIUM_CEILING_KBPS: u32 = 160;

/// Selection failure modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SelectionError {
    #[error("no stream candidates")]
    NoCandidates,

    #[error("candidates present but none were valid")]
    NoneValid,
}

/// Pick the best candidate for the requested tier.
///
/// `low_floor_kbps` guards the Low tier against degenerate near-zero
/// bitrate entries; when every candidate is below the floor the overall
/// minimum is used instead.
pub fn select(
    candidates: &[StreamCandidate],
    tier: QualityTier,
    low_floor_kbps: u32,
) -> Result<&StreamCandidate, SelectionError> {
    if candidates.is_empty() {
        return Err(SelectionError::NoCandidates);
    }

    let valid: Vec<&StreamCandidate> = candidates
        .iter()
        .filter(|c| !c.url.is_empty() && !c.mime_type.is_empty())
        .collect();

    if valid.is_empty() {
        return Err(SelectionError::NoneValid);
    }

    let pick = match tier {
        QualityTier::High | QualityTier::Auto => pick_max(&valid),
        QualityTier::Low => pick_min_above_floor(&valid, low_floor_kbps),
        QualityTier::Medium => pick_medium(&valid),
    };

    Ok(pick)
}

/// Highest bitrate wins; ties (and unknown bitrates) fall back to codec
/// preference.
fn pick_max<'a>(valid: &[&'a StreamCandidate]) -> &'a StreamCandidate {
    best_by(valid, |c| (bitrate_of(c), codec_rank(c)))
}

/// Smallest bitrate at or above the floor; if nothing clears the floor,
/// the overall smallest.
fn pick_min_above_floor<'a>(valid: &[&'a StreamCandidate], floor: u32) -> &'a StreamCandidate {
    let above: Vec<&StreamCandidate> = valid
        .iter()
        .copied()
        .filter(|c| bitrate_of(c) >= floor as i64)
        .collect();

    let pool: &[&StreamCandidate] = if above.is_empty() { valid } else { &above };
    best_by(pool, |c| (-bitrate_of(c), codec_rank(c)))
}

/// Best candidate at or below the medium ceiling, else the lowest above it.
fn pick_medium<'a>(valid: &[&'a StreamCandidate]) -> &'a StreamCandidate {
    let below: Vec<&StreamCandidate> = valid
        .iter()
        .copied()
        .filter(|c| {
            let b = bitrate_of(c);
            b >= 0 && b <= MEDIUM_CEILING_KBPS as i64
        })
        .collect();

    if below.is_empty() {
        pick_min_above_floor(valid, 0)
    } else {
        best_by(&below, |c| (bitrate_of(c), codec_rank(c)))
    }
}

/// Max by a (primary, secondary) score; first element wins a full tie.
fn best_by<'a, F>(pool: &[&'a StreamCandidate], score: F) -> &'a StreamCandidate
where
    F: Fn(&StreamCandidate) -> (i64, i64),
{
    let mut best = pool[0];
    let mut best_score = score(best);
    for c in &pool[1..] {
        let s = score(c);
        if s > best_score {
            best = c;
            best_score = s;
        }
    }
    best
}

/// Bitrate as a sortable value; unknown ranks below every known bitrate.
fn bitrate_of(c: &StreamCandidate) -> i64 {
    c.bitrate_kbps.map(i64::from).unwrap_or(-1)
}

/// Higher is better: position in the allow-list, -1 for niche/unknown codecs.
fn codec_rank(c: &StreamCandidate) -> i64 {
    let Some(codec) = c.codec.as_deref() else {
        return -1;
    };
    let codec = codec.to_ascii_lowercase();
    PREFERRED_CODECS
        .iter()
        .position(|p| codec.starts_with(p))
        .map(|pos| (PREFERRED_CODECS.len() - pos) as i64)
        .unwrap_or(-1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(bitrate: Option<u32>, codec: Option<&str>) -> StreamCandidate {
        StreamCandidate {
            url: format!("https://cdn.example/{}", bitrate.unwrap_or(0)),
            mime_type: "audio/webm".to_string(),
            bitrate_kbps: bitrate,
            codec: codec.map(String::from),
            quality_label: None,
            expires_at_unix: None,
        }
    }

    fn candidates(bitrates: &[u32]) -> Vec<StreamCandidate> {
        bitrates.iter().map(|b| candidate(Some(*b), None)).collect()
    }

    #[test]
    fn test_high_picks_maximum_bitrate() {
        let cands = candidates(&[64, 128, 320, 192]);
        let pick = select(&cands, QualityTier::High, 48).unwrap();
        assert_eq!(pick.bitrate_kbps, Some(320));
    }

    #[test]
    fn test_auto_behaves_like_high() {
        let cands = candidates(&[64, 128, 320, 192]);
        let pick = select(&cands, QualityTier::Auto, 48).unwrap();
        assert_eq!(pick.bitrate_kbps, Some(320));
    }

    #[test]
    fn test_low_picks_minimum_above_floor() {
        // 16 kbps is a degenerate entry below the 48 kbps floor
        let cands = candidates(&[16, 64, 128, 320]);
        let pick = select(&cands, QualityTier::Low, 48).unwrap();
        assert_eq!(pick.bitrate_kbps, Some(64));
    }

    #[test]
    fn test_low_falls_back_when_everything_is_below_floor() {
        let cands = candidates(&[16, 24]);
        let pick = select(&cands, QualityTier::Low, 48).unwrap();
        assert_eq!(pick.bitrate_kbps, Some(16));
    }

    #[test]
    fn test_medium_prefers_best_under_ceiling() {
        let cands = candidates(&[64, 128, 320]);
        let pick = select(&cands, QualityTier::Medium, 48).unwrap();
        assert_eq!(pick.bitrate_kbps, Some(128));
    }

    #[test]
    fn test_medium_takes_lowest_when_all_above_ceiling() {
        let cands = candidates(&[192, 320]);
        let pick = select(&cands, QualityTier::Medium, 48).unwrap();
        assert_eq!(pick.bitrate_kbps, Some(192));
    }

    #[test]
    fn test_codec_breaks_bitrate_ties() {
        let cands = vec![
            candidate(Some(128), Some("ec-3")),
            candidate(Some(128), Some("opus")),
        ];
        let pick = select(&cands, QualityTier::High, 48).unwrap();
        assert_eq!(pick.codec.as_deref(), Some("opus"));
    }

    #[test]
    fn test_codec_prefix_matches_mp4a_variant() {
        let cands = vec![
            candidate(Some(128), None),
            candidate(Some(128), Some("mp4a.40.2")),
        ];
        let pick = select(&cands, QualityTier::Auto, 48).unwrap();
        assert_eq!(pick.codec.as_deref(), Some("mp4a.40.2"));
    }

    #[test]
    fn test_unknown_bitrate_ranks_last_for_high() {
        let cands = vec![candidate(None, Some("opus")), candidate(Some(64), None)];
        let pick = select(&cands, QualityTier::High, 48).unwrap();
        assert_eq!(pick.bitrate_kbps, Some(64));
    }

    #[test]
    fn test_empty_input_is_no_candidates() {
        assert_eq!(
            select(&[], QualityTier::Auto, 48).unwrap_err(),
            SelectionError::NoCandidates
        );
    }

    #[test]
    fn test_all_invalid_is_distinct_failure() {
        let mut missing_url = candidate(Some(128), None);
        missing_url.url = String::new();
        let mut missing_mime = candidate(Some(64), None);
        missing_mime.mime_type = String::new();

        assert_eq!(
            select(&[missing_url, missing_mime], QualityTier::Auto, 48).unwrap_err(),
            SelectionError::NoneValid
        );
    }
}
