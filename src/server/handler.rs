// src/server/handler.rs

//! HTTP handlers: cache lookup, relevance filter, projection.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Query, State};
use chrono::SecondsFormat;
use serde::Deserialize;
use serde_json::{Value, json};

use crate::models::{CodeScheme, FilterMode, WatchSet};
use crate::server::AppState;
use crate::server::debug::render_report;
use crate::server::error::ApiError;
use crate::server::projection::{CompactOptions, CompactResponse, VerboseResponse};

/// Query parameters shared by the feed endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct FeedQuery {
    /// `all`, or comma-separated slug prefixes
    pub watch: Option<String>,
    /// `recent` or `watchlist`
    pub mode: Option<String>,
    /// `binary` or `tristate` (compact only)
    pub code: Option<String>,
    /// Lower cap on compact items
    pub limit: Option<String>,
}

impl FeedQuery {
    fn watch_set(&self, state: &AppState) -> WatchSet {
        WatchSet::from_query(self.watch.as_deref(), &state.default_watch)
    }

    fn filter_mode(&self, state: &AppState) -> FilterMode {
        self.mode
            .as_deref()
            .and_then(|m| m.parse().ok())
            .unwrap_or(state.default_mode)
    }

    fn code_scheme(&self, state: &AppState) -> CodeScheme {
        self.code
            .as_deref()
            .and_then(|c| c.parse().ok())
            .unwrap_or(state.compact.default_code)
    }

    fn compact_limit(&self, state: &AppState) -> usize {
        let cap = state.compact.limit;
        self.limit
            .as_deref()
            .and_then(|l| l.trim().parse::<usize>().ok())
            .filter(|&l| l > 0)
            .map_or(cap, |l| l.min(cap))
    }
}

/// `GET /`
pub async fn liveness(State(state): State<Arc<AppState>>) -> Json<Value> {
    let snapshot = state.cache.peek().await;
    Json(json!({
        "ok": true,
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "cached": snapshot.is_some(),
        "fetchedAt": snapshot.map(|s| s.fetched_at.to_rfc3339_opts(SecondsFormat::Millis, true)),
    }))
}

/// `GET /updates`
pub async fn updates(
    State(state): State<Arc<AppState>>,
    Query(query): Query<FeedQuery>,
) -> Result<Json<VerboseResponse>, ApiError> {
    let snapshot = state.cache.get_entries().await.map_err(ApiError::verbose)?;
    let watch = query.watch_set(&state);
    let mode = query.filter_mode(&state);

    let selected = state.filter.apply(&snapshot.entries, &watch, mode);
    log::debug!(
        "/updates watch={:?} mode={:?}: {} of {} entries",
        watch,
        mode,
        selected.len(),
        snapshot.entries.len()
    );
    Ok(Json(VerboseResponse::new(&snapshot, &selected)))
}

/// `GET /updates/esp32`
pub async fn updates_compact(
    State(state): State<Arc<AppState>>,
    Query(query): Query<FeedQuery>,
) -> Result<Json<CompactResponse>, ApiError> {
    let snapshot = state.cache.get_entries().await.map_err(ApiError::compact)?;
    let watch = query.watch_set(&state);
    let mode = query.filter_mode(&state);

    let selected = state.filter.apply(&snapshot.entries, &watch, mode);
    let options = CompactOptions {
        limit: query.compact_limit(&state),
        title_len: state.compact.title_len,
        chapter_len: state.compact.chapter_len,
        scheme: query.code_scheme(&state),
    };
    Ok(Json(CompactResponse::new(&selected, &options, &state.filter)))
}

/// `GET /debug`
pub async fn debug(State(state): State<Arc<AppState>>) -> Result<String, ApiError> {
    let html = state.cache.fetch_raw().await.map_err(ApiError::verbose)?;
    Ok(render_report(
        &state.source_name,
        &html,
        state.cache.extractor(),
        &state.debug,
    ))
}
