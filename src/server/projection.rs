// src/server/projection.rs

//! Public JSON shapes built from a filtered entry list.

use chrono::SecondsFormat;
use serde::Serialize;

use crate::models::{CodeScheme, Entry};
use crate::services::{RelevanceFilter, Snapshot};
use crate::utils::text::truncate_graphemes;

/// Full entry fields plus fetch metadata.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerboseResponse {
    pub ok: bool,
    pub fetched_at: String,
    pub count: usize,
    pub entries: Vec<Entry>,
}

impl VerboseResponse {
    pub fn new(snapshot: &Snapshot, entries: &[&Entry]) -> Self {
        Self {
            ok: true,
            fetched_at: snapshot
                .fetched_at
                .to_rfc3339_opts(SecondsFormat::Millis, true),
            count: entries.len(),
            entries: entries.iter().map(|&entry| entry.clone()).collect(),
        }
    }
}

/// One entry in the size-constrained shape.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct CompactItem {
    /// Title, truncated
    pub t: String,
    /// Chapter label, truncated
    pub c: String,
    /// Time text
    pub tm: String,
    /// Upcoming code, per [`CodeScheme`]
    pub u: u8,
}

/// Abbreviated response for constrained clients.
#[derive(Debug, Serialize)]
pub struct CompactResponse {
    pub ok: u8,
    pub n: usize,
    pub d: Vec<CompactItem>,
}

/// Projection parameters for the compact shape.
#[derive(Debug, Clone)]
pub struct CompactOptions {
    pub limit: usize,
    pub title_len: usize,
    pub chapter_len: usize,
    pub scheme: CodeScheme,
}

impl CompactResponse {
    pub fn new(entries: &[&Entry], options: &CompactOptions, filter: &RelevanceFilter) -> Self {
        let d: Vec<_> = entries
            .iter()
            .take(options.limit)
            .map(|entry| CompactItem {
                t: truncate_graphemes(&entry.title, options.title_len),
                c: truncate_graphemes(&entry.chapter, options.chapter_len),
                tm: entry.time.clone(),
                u: upcoming_code(entry, options.scheme, filter),
            })
            .collect();

        Self {
            ok: 1,
            n: d.len(),
            d,
        }
    }
}

/// Encode the upcoming flag under the given scheme.
pub fn upcoming_code(entry: &Entry, scheme: CodeScheme, filter: &RelevanceFilter) -> u8 {
    match scheme {
        CodeScheme::Binary => u8::from(entry.is_upcoming),
        CodeScheme::Tristate if entry.is_upcoming => 1,
        CodeScheme::Tristate if filter.is_recently_released(entry) => 2,
        CodeScheme::Tristate => 0,
    }
}
