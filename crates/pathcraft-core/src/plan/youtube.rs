//! YouTube URL canonicalization.
//!
//! Models emit YouTube links in several equivalent shapes (`watch?v=`,
//! `youtu.be` short links, `/embed/`, `/v/`). Trust matching and
//! downstream consumers expect the standard `watch?v=<id>` form, so every
//! recognized variant is rewritten to it before validation. URLs that are
//! not recognizably YouTube pass through unchanged.

use url::Url;

/// Extract the video id from any recognized YouTube URL form.
///
/// Lookup order: the `v` query parameter, then `/embed/<id>` or `/v/<id>`
/// path segments, then the first path segment of a `youtu.be` link.
/// Returns `None` for malformed URLs and non-YouTube hosts.
pub fn extract_video_id(raw: &str) -> Option<String> {
    let parsed = Url::parse(raw).ok()?;
    let host = parsed.host_str()?.to_ascii_lowercase();

    if host == "youtu.be" {
        return parsed
            .path_segments()?
            .next()
            .filter(|s| !s.is_empty())
            .map(str::to_string);
    }

    if host.contains("youtube.com") {
        if let Some((_, v)) = parsed.query_pairs().find(|(k, _)| k == "v") {
            if !v.is_empty() {
                return Some(v.into_owned());
            }
        }
        let mut segments = parsed.path_segments()?;
        if matches!(segments.next(), Some("embed" | "v")) {
            return segments
                .next()
                .filter(|s| !s.is_empty())
                .map(str::to_string);
        }
    }

    None
}

/// Rewrite a YouTube URL variant to the canonical `watch?v=<id>` form.
///
/// Idempotent; non-YouTube URLs are returned unchanged.
pub fn canonicalize(raw: &str) -> String {
    match extract_video_id(raw) {
        Some(id) => format!("https://www.youtube.com/watch?v={id}"),
        None => raw.to_string(),
    }
}
