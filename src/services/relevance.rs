// src/services/relevance.rs

//! Relevance filtering of extracted entries.

use crate::models::{Entry, FilterMode, WatchSet};
use crate::utils::time::hours_ago;

/// Decides which entries a request surfaces.
#[derive(Debug, Clone)]
pub struct RelevanceFilter {
    max_age_hours: f64,
}

impl RelevanceFilter {
    pub fn new(max_age_hours: f64) -> Self {
        Self { max_age_hours }
    }

    /// Slug must match the watch-set; then upcoming entries always pass and
    /// released ones pass only while younger than the age limit.
    pub fn is_relevant(&self, entry: &Entry, watch: &WatchSet) -> bool {
        watch.matches(&entry.slug) && self.is_recent_or_upcoming(entry)
    }

    /// Whether the entry is upcoming or was released within the age limit.
    pub fn is_recent_or_upcoming(&self, entry: &Entry) -> bool {
        entry.is_upcoming || self.is_recently_released(entry)
    }

    /// Released (not upcoming) within the age limit.
    pub fn is_recently_released(&self, entry: &Entry) -> bool {
        !entry.is_upcoming && hours_ago(&entry.time) <= self.max_age_hours
    }

    /// Apply a filter mode to a batch, preserving order.
    ///
    /// `watch=all` disables both the slug and the recency gate.
    pub fn apply<'a>(
        &self,
        entries: &'a [Entry],
        watch: &WatchSet,
        mode: FilterMode,
    ) -> Vec<&'a Entry> {
        entries
            .iter()
            .filter(|entry| match (watch, mode) {
                (WatchSet::All, _) => true,
                (_, FilterMode::Recent) => self.is_relevant(entry, watch),
                (_, FilterMode::Watchlist) => watch.matches(&entry.slug),
            })
            .collect()
    }
}

impl Default for RelevanceFilter {
    fn default() -> Self {
        Self::new(24.0)
    }
}
