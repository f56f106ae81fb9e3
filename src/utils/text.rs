//! Text cleaning helpers for scraped markup.

use std::sync::LazyLock;

use regex::Regex;
use unicode_segmentation::UnicodeSegmentation;

static COMMENT_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<!--.*?-->").expect("valid comment regex"));

static TAG_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]*>").expect("valid tag regex"));

const ENTITIES: [(&str, &str); 6] = [
    ("&nbsp;", " "),
    ("&lt;", "<"),
    ("&gt;", ">"),
    ("&quot;", "\""),
    ("&#39;", "'"),
    ("&amp;", "&"),
];

/// Collapse runs of whitespace into single spaces and trim.
pub fn normalize_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Recover rendered text from an HTML fragment.
///
/// Templating markers (`<!-- -->`) are dropped and tags replaced by a
/// space before whitespace is collapsed, so "Public in <!-- -->4.1<!-- -->
/// hours" becomes "Public in 4.1 hours".
pub fn strip_markup(fragment: &str) -> String {
    let without_markers = COMMENT_PATTERN.replace_all(fragment, "");
    let without_tags = TAG_PATTERN.replace_all(&without_markers, " ");
    let decoded = ENTITIES
        .iter()
        .fold(without_tags.into_owned(), |acc, (from, to)| acc.replace(from, to));
    normalize_whitespace(&decoded)
}

/// Keep at most `max` user-perceived characters.
pub fn truncate_graphemes(s: &str, max: usize) -> String {
    s.graphemes(true).take(max).collect()
}

/// Slice of `haystack` around byte offset `at`, widened by `context` bytes
/// on each side and snapped to char boundaries.
pub fn excerpt_around(haystack: &str, at: usize, len: usize, context: usize) -> &str {
    let mut start = at.saturating_sub(context);
    while !haystack.is_char_boundary(start) {
        start -= 1;
    }
    let mut end = (at + len + context).min(haystack.len());
    while !haystack.is_char_boundary(end) {
        end += 1;
    }
    &haystack[start..end]
}
