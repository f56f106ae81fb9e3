// src/models/mod.rs

//! Domain models for the feed service.
//!
//! This module contains all data structures used throughout the application,
//! organized by their primary purpose.

mod config;
mod entry;
mod selectors;
mod watch;

// Re-export all public types
pub use config::{
    CacheConfig, CompactConfig, Config, DebugConfig, FilterConfig, ServerConfig, SourceConfig,
};
pub use entry::Entry;
pub use selectors::CardSelectors;
pub use watch::{CodeScheme, FilterMode, WatchSet};
