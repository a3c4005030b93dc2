//! Tag normalization
//!
//! Tags are free text supplied by submitters. Comparing them case-sensitively
//! lets "GitHub", "github" and "GITHUB" pile up as separate tags, so every tag
//! is normalized before it is compared or stored.

/// Maximum number of tags kept on a listing
pub const MAX_TAGS: usize = 10;

/// Normalize a single tag: lowercase, then trim surrounding whitespace.
///
/// Internal whitespace is preserved (`"MCP Server"` becomes `"mcp server"`).
/// Idempotent and total; whitespace-only input yields an empty string.
pub fn normalize_tag(input: &str) -> String {
    input.to_lowercase().trim().to_string()
}

/// Strict predicate: a tag is valid when it is non-empty after normalization.
pub fn is_valid_tag(input: &str) -> bool {
    !normalize_tag(input).is_empty()
}

/// Normalize a batch of tags.
///
/// Empty results are dropped silently, duplicates are removed keeping the
/// first occurrence, and the result is cut to [`MAX_TAGS`]. Truncation runs
/// after deduplication, so the first ten *distinct* tags survive.
pub fn normalize_tags<I, S>(tags: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out: Vec<String> = Vec::new();
    for tag in tags {
        let normalized = normalize_tag(tag.as_ref());
        if normalized.is_empty() || out.contains(&normalized) {
            continue;
        }
        out.push(normalized);
    }
    out.truncate(MAX_TAGS);
    out
}
