//! Service layer for the feed application.
//!
//! This module contains the business logic for:
//! - Card extraction from the latest-updates page (`CardExtractor`)
//! - Origin fetching with retries (`PageSource`, `HttpSource`)
//! - The single-slot fetch cache (`FeedCache`)
//! - Relevance filtering (`RelevanceFilter`)

mod cache;
mod extractor;
mod fetcher;
mod relevance;

pub use cache::{FeedCache, Snapshot};
pub use extractor::CardExtractor;
pub use fetcher::{HttpSource, PageSource};
pub use relevance::RelevanceFilter;
