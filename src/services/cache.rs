// src/services/cache.rs

//! Single-slot, time-bounded cache around fetch + extraction.
//!
//! The slot is empty at startup, filled by the first successful refresh and
//! replaced wholesale by later ones. A failed refresh leaves the slot as it
//! was. Concurrent callers that find the slot stale wait for one shared
//! refresh instead of each hitting the origin, and share its error if it fails.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::{Mutex, RwLock};
use tokio::time::Instant;

use crate::error::{AppError, Result};
use crate::models::Entry;
use crate::services::{CardExtractor, PageSource};

/// One extracted batch together with when it was fetched.
#[derive(Debug)]
pub struct Snapshot {
    pub entries: Vec<Entry>,
    pub fetched_at: DateTime<Utc>,
    refreshed: Instant,
}

impl Snapshot {
    fn is_fresh(&self, ttl: Duration) -> bool {
        self.refreshed.elapsed() < ttl
    }
}

/// Cache over a [`PageSource`] and a [`CardExtractor`].
pub struct FeedCache {
    source: Arc<dyn PageSource>,
    extractor: CardExtractor,
    ttl: Duration,
    slot: RwLock<Option<Arc<Snapshot>>>,
    /// Held for the duration of a refresh; holds the last refresh's error.
    refresh_gate: Mutex<Option<Arc<AppError>>>,
    /// Completed refresh attempts, successful or not.
    attempts: AtomicU64,
}

impl FeedCache {
    pub fn new(source: Arc<dyn PageSource>, extractor: CardExtractor, ttl: Duration) -> Self {
        Self {
            source,
            extractor,
            ttl,
            slot: RwLock::new(None),
            refresh_gate: Mutex::new(None),
            attempts: AtomicU64::new(0),
        }
    }

    /// Current batch, refreshing it first if empty or older than the TTL.
    pub async fn get_entries(&self) -> Result<Arc<Snapshot>> {
        if let Some(snapshot) = self.fresh_snapshot().await {
            log::debug!("Cache hit ({} entries)", snapshot.entries.len());
            return Ok(snapshot);
        }

        let seen = self.attempts.load(Ordering::Acquire);
        let mut last_error = self.refresh_gate.lock().await;
        // Another caller may have refreshed while we waited on the gate.
        if let Some(snapshot) = self.fresh_snapshot().await {
            log::debug!("Cache filled by concurrent refresh");
            return Ok(snapshot);
        }
        if self.attempts.load(Ordering::Acquire) != seen {
            if let Some(error) = last_error.as_ref() {
                log::debug!("Concurrent refresh failed, sharing its error");
                return Err(AppError::Shared(Arc::clone(error)));
            }
        }

        let outcome = self.refresh().await.map_err(Arc::new);
        *last_error = outcome.as_ref().err().map(Arc::clone);
        self.attempts.fetch_add(1, Ordering::Release);
        outcome.map_err(AppError::Shared)
    }

    /// Current batch without any I/O, fresh or not.
    pub async fn peek(&self) -> Option<Arc<Snapshot>> {
        self.slot.read().await.clone()
    }

    /// Raw page body straight from the source; the slot is not touched.
    pub async fn fetch_raw(&self) -> Result<String> {
        self.source.fetch_page().await
    }

    pub fn extractor(&self) -> &CardExtractor {
        &self.extractor
    }

    async fn fresh_snapshot(&self) -> Option<Arc<Snapshot>> {
        self.slot
            .read()
            .await
            .as_ref()
            .filter(|snapshot| snapshot.is_fresh(self.ttl))
            .cloned()
    }

    async fn refresh(&self) -> Result<Arc<Snapshot>> {
        let started = Instant::now();
        log::info!("Cache miss, fetching {}", self.source.describe());

        let html = self.source.fetch_page().await.inspect_err(|e| {
            log::error!("Refresh failed, keeping previous batch: {e}");
        })?;
        let entries = self.extractor.extract(&html);
        if entries.is_empty() {
            log::warn!("Extraction found no entries; the page markup may have changed");
        }

        let snapshot = Arc::new(Snapshot {
            entries,
            fetched_at: Utc::now(),
            refreshed: Instant::now(),
        });
        *self.slot.write().await = Some(Arc::clone(&snapshot));

        log::info!(
            "Cache refreshed with {} entries in {:?}",
            snapshot.entries.len(),
            started.elapsed()
        );
        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    use async_trait::async_trait;

    use super::*;
    use crate::error::AppError;
    use crate::models::CardSelectors;

    const TTL: Duration = Duration::from_secs(300);

    const PAGE: &str = r#"<div class="grid grid-rows-1 grid-cols-12">
        <div class="col-span-9">
          <a href="/series/nano-machine-abc123">Nano Machine</a>
          <div class="flex flex-row justify-between">
            <a href="/series/nano-machine-abc123/chapter/201"><p class="chapter-label">Chapter 201</p></a>
            <p class="flex-end">3 hours ago</p>
          </div>
        </div>
      </div>"#;

    /// Serves `PAGE`, counting calls; fails while `failing` is set.
    struct FakeSource {
        calls: AtomicUsize,
        failing: AtomicBool,
        delay: Duration,
    }

    impl FakeSource {
        fn new() -> Arc<Self> {
            Self::with_delay(Duration::ZERO)
        }

        fn with_delay(delay: Duration) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                failing: AtomicBool::new(false),
                delay,
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl PageSource for FakeSource {
        async fn fetch_page(&self) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            if self.failing.load(Ordering::SeqCst) {
                return Err(AppError::Status {
                    status: 502,
                    url: "fake://origin".into(),
                });
            }
            Ok(PAGE.to_string())
        }

        fn describe(&self) -> String {
            "fake://origin".into()
        }
    }

    fn cache_over(source: Arc<FakeSource>) -> FeedCache {
        let extractor = CardExtractor::new(&CardSelectors::default(), "https://example.com/").unwrap();
        FeedCache::new(source, extractor, TTL)
    }

    #[tokio::test(start_paused = true)]
    async fn test_hits_origin_once_within_ttl() {
        let source = FakeSource::new();
        let cache = cache_over(Arc::clone(&source));

        let first = cache.get_entries().await.unwrap();
        tokio::time::advance(Duration::from_secs(299)).await;
        let second = cache.get_entries().await.unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(source.calls(), 1);
        assert_eq!(first.entries[0].slug, "nano-machine-abc123");
    }

    #[tokio::test(start_paused = true)]
    async fn test_refreshes_after_ttl() {
        let source = FakeSource::new();
        let cache = cache_over(Arc::clone(&source));

        let first = cache.get_entries().await.unwrap();
        tokio::time::advance(TTL).await;
        let second = cache.get_entries().await.unwrap();

        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(source.calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_refresh_keeps_previous_batch() {
        let source = FakeSource::new();
        let cache = cache_over(Arc::clone(&source));

        let before = cache.get_entries().await.unwrap();
        tokio::time::advance(TTL).await;

        source.failing.store(true, Ordering::SeqCst);
        assert!(cache.get_entries().await.is_err());

        let kept = cache.peek().await.unwrap();
        assert!(Arc::ptr_eq(&before, &kept));
        assert_eq!(kept.fetched_at, before.fetched_at);
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_cache_failure_stores_nothing() {
        let source = FakeSource::new();
        source.failing.store(true, Ordering::SeqCst);
        let cache = cache_over(Arc::clone(&source));

        assert!(cache.get_entries().await.is_err());
        assert!(cache.peek().await.is_none());

        source.failing.store(false, Ordering::SeqCst);
        assert_eq!(cache.get_entries().await.unwrap().entries.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_misses_share_one_refresh() {
        let source = FakeSource::with_delay(Duration::from_millis(50));
        let cache = Arc::new(cache_over(Arc::clone(&source)));

        let tasks: Vec<_> = (0..8)
            .map(|_| {
                let cache = Arc::clone(&cache);
                tokio::spawn(async move { cache.get_entries().await })
            })
            .collect();

        for task in tasks {
            assert!(task.await.unwrap().is_ok());
        }
        assert_eq!(source.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_failing_misses_share_one_fetch() {
        let source = FakeSource::with_delay(Duration::from_millis(50));
        source.failing.store(true, Ordering::SeqCst);
        let cache = Arc::new(cache_over(Arc::clone(&source)));

        let tasks: Vec<_> = (0..8)
            .map(|_| {
                let cache = Arc::clone(&cache);
                tokio::spawn(async move { cache.get_entries().await })
            })
            .collect();

        for task in tasks {
            let err = task.await.unwrap().unwrap_err();
            assert!(err.is_transient());
            assert!(err.to_string().contains("502"));
        }
        assert_eq!(source.calls(), 1);
        assert!(cache.peek().await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_later_miss_retries_after_shared_failure() {
        let source = FakeSource::new();
        source.failing.store(true, Ordering::SeqCst);
        let cache = cache_over(Arc::clone(&source));

        assert!(cache.get_entries().await.is_err());
        assert!(cache.get_entries().await.is_err());
        assert_eq!(source.calls(), 2);
    }

    #[tokio::test]
    async fn test_fetch_raw_does_not_touch_slot() {
        let source = FakeSource::new();
        let cache = cache_over(Arc::clone(&source));

        let raw = cache.fetch_raw().await.unwrap();
        assert!(raw.contains("Chapter 201"));
        assert!(cache.peek().await.is_none());
    }
}
