//! Stream path canonicalization.

use crate::error::{Result, SecureTokenError};

/// First-segment markers for manifest and redirect URLs. The media server
/// does not sign that segment.
const UNSIGNED_FIRST_SEGMENT_MARKERS: [&str; 2] = ["m3u8", "redirect"];

/// Reduce a URL path to the form that is signed.
///
/// Leading slashes are stripped and the path must still hold an application
/// and a stream segment. A first segment containing `m3u8` or `redirect` is
/// dropped, then trailing slashes are stripped.
pub fn canonical_path(url_path: &str) -> Result<String> {
    let trimmed = url_path.trim_start_matches('/');
    let segments: Vec<&str> = trimmed.split('/').collect();
    if segments.len() < 2 {
        return Err(SecureTokenError::InvalidPath(url_path.to_string()));
    }

    let skip_first = UNSIGNED_FIRST_SEGMENT_MARKERS
        .iter()
        .any(|marker| segments[0].contains(*marker));
    let kept = if skip_first { &segments[1..] } else { &segments[..] };

    Ok(kept.join("/").trim_end_matches('/').to_string())
}
