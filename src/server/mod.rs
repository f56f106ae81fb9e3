// src/server/mod.rs

//! HTTP surface of the feed.
//!
//! Request flow: fetch cache → relevance filter → projection → JSON.
//!
//! ```rust,ignore
//! let state = Arc::new(AppState::from_config(&config)?);
//! let app = chapter_radar::server::routes(state);
//! ```

mod debug;
mod error;
mod handler;
mod projection;
mod routes;

use std::sync::Arc;
use std::time::Duration;

pub use error::{ApiError, Shape};
pub use projection::{CompactItem, CompactOptions, CompactResponse, VerboseResponse};
pub use routes::routes;

use crate::error::Result;
use crate::models::{CompactConfig, Config, DebugConfig, FilterMode, WatchSet};
use crate::services::{CardExtractor, FeedCache, HttpSource, PageSource, RelevanceFilter};

/// Shared state behind every handler.
pub struct AppState {
    pub cache: FeedCache,
    pub filter: RelevanceFilter,
    pub default_watch: WatchSet,
    pub default_mode: FilterMode,
    pub compact: CompactConfig,
    pub debug: DebugConfig,
    pub debug_enabled: bool,
    pub source_name: String,
}

impl AppState {
    /// Build state around an arbitrary page source.
    pub fn new(config: &Config, source: Arc<dyn PageSource>) -> Result<Self> {
        let extractor = CardExtractor::new(&config.selectors, &config.source.url)?;
        let source_name = source.describe();
        Ok(Self {
            cache: FeedCache::new(
                source,
                extractor,
                Duration::from_secs(config.cache.ttl_secs),
            ),
            filter: RelevanceFilter::new(config.filter.max_age_hours),
            default_watch: config.default_watch(),
            default_mode: config.filter.default_mode,
            compact: config.compact.clone(),
            debug: config.debug.clone(),
            debug_enabled: config.server.debug_enabled,
            source_name,
        })
    }

    /// Build state that fetches the configured origin over HTTP.
    pub fn from_config(config: &Config) -> Result<Self> {
        let source = Arc::new(HttpSource::new(&config.source)?);
        Self::new(config, source)
    }
}

/// Bind the configured address and serve until Ctrl-C.
pub async fn serve(config: &Config) -> Result<()> {
    let state = Arc::new(AppState::from_config(config)?);
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    log::info!("Listening on http://{addr}");
    axum::serve(listener, routes(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    log::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Failed to listen for shutdown signal: {e}");
    }
}
