//! Slug and URL format predicates
//!
//! Shared by listing validation and by every route that accepts a slug, so
//! both paths reject exactly the same inputs.

use lazy_static::lazy_static;
use regex::Regex;

/// Maximum slug length in characters
pub const SLUG_MAX_LEN: usize = 50;

lazy_static! {
    /// Lowercase alphanumeric groups joined by single hyphens
    static ref SLUG_RE: Regex = Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").unwrap();
    static ref URL_RE: Regex = Regex::new(r"^https?://\S+$").unwrap();
}

/// Whether `value` matches the slug pattern (length is checked separately)
pub fn matches_slug_pattern(value: &str) -> bool {
    SLUG_RE.is_match(value)
}

/// Whether `value` is a usable slug: pattern match and within length bounds
pub fn is_valid_slug(value: &str) -> bool {
    !value.is_empty() && value.chars().count() <= SLUG_MAX_LEN && matches_slug_pattern(value)
}

/// Whether `value` looks like an absolute http(s) URL
pub fn is_valid_url(value: &str) -> bool {
    URL_RE.is_match(value)
}
