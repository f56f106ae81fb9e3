//! Latest-chapter entry data structure.

use serde::{Deserialize, Serialize};

/// Prefix of the time text for chapters that are announced but not yet public.
const UPCOMING_PREFIX: &str = "public in";

/// The latest chapter of one series, as scraped from an update card.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    /// Series display name
    pub title: String,

    /// Path-derived series identifier, used for prefix matching
    pub slug: String,

    /// Latest chapter label (e.g. "Chapter 182")
    pub chapter: String,

    /// Normalized recency text (e.g. "14 hours ago", "Public in 4.1 hours")
    pub time: String,

    /// Whether the chapter is announced but not yet released
    pub is_upcoming: bool,
}

impl Entry {
    /// Build an entry, deriving `is_upcoming` from the time text.
    pub fn new(
        title: impl Into<String>,
        slug: impl Into<String>,
        chapter: impl Into<String>,
        time: impl Into<String>,
    ) -> Self {
        let time = time.into();
        let is_upcoming = is_upcoming_text(&time);
        Self {
            title: title.into(),
            slug: slug.into(),
            chapter: chapter.into(),
            time,
            is_upcoming,
        }
    }
}

/// Case-insensitive check for the "Public in ..." phrasing.
pub fn is_upcoming_text(time: &str) -> bool {
    let time = time.trim_start();
    time.get(..UPCOMING_PREFIX.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(UPCOMING_PREFIX))
}
