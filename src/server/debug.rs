// src/server/debug.rs

//! Plain-text report of raw markup around known markers.
//!
//! Used to re-tune the selectors when the source page changes shape.

use crate::models::DebugConfig;
use crate::services::CardExtractor;
use crate::utils::text::excerpt_around;

/// Render the diagnostics report for one fetched page.
pub fn render_report(
    source: &str,
    html: &str,
    extractor: &CardExtractor,
    config: &DebugConfig,
) -> String {
    let mut out = String::new();
    out.push_str(&format!("source: {source}\n"));
    out.push_str(&format!("bytes: {}\n", html.len()));
    out.push_str(&format!("cards matched: {}\n", extractor.count_cards(html)));
    out.push_str(&format!("entries extracted: {}\n", extractor.extract(html).len()));

    for marker in config.markers.iter().filter(|m| !m.is_empty()) {
        let hits: Vec<usize> = html.match_indices(marker.as_str()).map(|(at, _)| at).collect();
        out.push_str(&format!(
            "\n== marker {:?}: {} hit(s), showing {}\n",
            marker,
            hits.len(),
            hits.len().min(config.max_hits_per_marker)
        ));

        for (n, at) in hits.iter().take(config.max_hits_per_marker).enumerate() {
            out.push_str(&format!("--- hit {} @ byte {}\n", n + 1, at));
            out.push_str(excerpt_around(html, *at, marker.len(), config.context_chars));
            out.push('\n');
        }
    }
    out
}
