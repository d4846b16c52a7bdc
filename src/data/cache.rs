//! Time-boxed universe cache.
//!
//! The exchange registries change at most once per trading day, so the
//! universe is fetched once and reused until the (UTC) date rolls over.
//! The core only ever sees "the current universe" through the
//! `UniverseProvider` trait; the refresh policy lives entirely here.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use tokio::sync::RwLock;
use tracing::debug;

use super::provider::{ProviderError, UniverseProvider};
use super::MarketSegment;

/// Cache entry for one market segment.
#[derive(Debug, Clone)]
struct CacheEntry {
    fetched_on: NaiveDate,
    symbols: Vec<String>,
}

/// Daily-refreshing cache around any universe provider.
pub struct CachedUniverse<U> {
    inner: U,
    entries: RwLock<HashMap<MarketSegment, CacheEntry>>,
}

impl<U: UniverseProvider> CachedUniverse<U> {
    pub fn new(inner: U) -> Self {
        Self {
            inner,
            entries: RwLock::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl<U: UniverseProvider> UniverseProvider for CachedUniverse<U> {
    fn name(&self) -> &'static str {
        self.inner.name()
    }

    async fn universe(&self, segment: MarketSegment) -> Result<Vec<String>, ProviderError> {
        let today = Utc::now().date_naive();

        {
            let entries = self.entries.read().await;
            if let Some(entry) = entries.get(&segment) {
                if entry.fetched_on == today {
                    debug!(segment = %segment, count = entry.symbols.len(), "universe cache hit");
                    return Ok(entry.symbols.clone());
                }
            }
        }

        let symbols = self.inner.universe(segment).await?;

        let mut entries = self.entries.write().await;
        entries.insert(
            segment,
            CacheEntry {
                fetched_on: today,
                symbols: symbols.clone(),
            },
        );
        Ok(symbols)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingUniverse {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl UniverseProvider for CountingUniverse {
        fn name(&self) -> &'static str {
            "counting"
        }

        async fn universe(&self, _segment: MarketSegment) -> Result<Vec<String>, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(vec!["2330.TW".to_string(), "2317.TW".to_string()])
        }
    }

    #[tokio::test]
    async fn test_second_fetch_hits_cache() {
        let cached = CachedUniverse::new(CountingUniverse {
            calls: AtomicUsize::new(0),
        });

        let first = cached.universe(MarketSegment::Listed).await.unwrap();
        let second = cached.universe(MarketSegment::Listed).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(cached.inner.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_segments_cached_independently() {
        let cached = CachedUniverse::new(CountingUniverse {
            calls: AtomicUsize::new(0),
        });

        cached.universe(MarketSegment::Listed).await.unwrap();
        cached.universe(MarketSegment::Otc).await.unwrap();

        assert_eq!(cached.inner.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_provider_errors_pass_through() {
        struct FailingUniverse;

        #[async_trait]
        impl UniverseProvider for FailingUniverse {
            fn name(&self) -> &'static str {
                "failing"
            }

            async fn universe(
                &self,
                _segment: MarketSegment,
            ) -> Result<Vec<String>, ProviderError> {
                Err(ProviderError::Unavailable("maintenance".to_string()))
            }
        }

        let cached = CachedUniverse::new(FailingUniverse);
        let err = cached.universe(MarketSegment::Listed).await.unwrap_err();
        assert!(matches!(err, ProviderError::Unavailable(_)));
    }
}
