//! Source URL classification and submission validation.
//!
//! Short video links are recognised by domain pattern; everything else
//! that looks like an http(s) URL is treated as a recipe website and
//! handed to the scraper.

use std::sync::OnceLock;

use regex::Regex;

use crate::error::CoreError;

/// Kind of source a submitted URL points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    TikTok,
    Instagram,
    Website,
}

fn tiktok_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^https?://((vm|vt|www)\.)?tiktok\.com/").unwrap())
}

fn instagram_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^https?://(www\.)?instagram\.com/(p|reel|reels|tv)/").unwrap())
}

/// Classify a URL by its domain.
pub fn detect_source_kind(url: &str) -> SourceKind {
    if tiktok_re().is_match(url) {
        SourceKind::TikTok
    } else if instagram_re().is_match(url) {
        SourceKind::Instagram
    } else {
        SourceKind::Website
    }
}

/// Validate a URL at submission time.
///
/// Rules:
/// - Must not be empty (after trimming).
/// - Must start with `http://` or `https://`.
pub fn validate_submit_url(url: &str) -> Result<(), CoreError> {
    let trimmed = url.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation("URL must not be empty".to_string()));
    }
    if !trimmed.starts_with("http://") && !trimmed.starts_with("https://") {
        return Err(CoreError::Validation(format!(
            "URL must start with http:// or https://, got: '{trimmed}'"
        )));
    }
    Ok(())
}
