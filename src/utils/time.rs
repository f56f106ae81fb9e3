// src/utils/time.rs

//! Relative-time parsing ("3 hours ago", "90 minutes ago").

use std::sync::LazyLock;

use regex::Regex;

static AGO_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*(\d+(?:\.\d+)?)\s*(minute|hour|day)").expect("valid relative-time regex")
});

/// Age in hours described by a relative-time text.
///
/// Returns `f64::INFINITY` for anything that is not a leading number
/// followed by a minute/hour/day unit, including "Public in ..." texts.
/// Callers must check `is_upcoming` before treating the result as an age.
pub fn hours_ago(text: &str) -> f64 {
    let Some(caps) = AGO_PATTERN.captures(text) else {
        return f64::INFINITY;
    };
    let Ok(value) = caps[1].parse::<f64>() else {
        return f64::INFINITY;
    };

    match caps[2].to_ascii_lowercase().as_str() {
        "minute" => value / 60.0,
        "hour" => value,
        "day" => value * 24.0,
        _ => f64::INFINITY,
    }
}
