//! Provider abstractions for market data.
//!
//! Two narrow seams separate the screening core from the outside world: the
//! universe provider (which instruments exist) and the bar data gateway
//! (their daily OHLCV history). Both are async traits so concrete adapters,
//! caches, and test mocks are interchangeable.

use std::collections::HashMap;

use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use thiserror::Error;
use tracing::warn;

use super::{DailyBar, MarketSegment};

/// Bounded fan-out for batched per-symbol fetches.
const MAX_CONCURRENT_FETCHES: usize = 8;

// ============================================================================
// Provider Error
// ============================================================================

/// Errors surfaced by data providers.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Network error (connection failed, timeout)
    #[error("network error: {0}")]
    Network(String),

    /// Response arrived but could not be decoded
    #[error("malformed response: {0}")]
    Decode(String),

    /// Provider has no data for the requested symbol
    #[error("no data for {0}")]
    DataNotAvailable(String),

    /// Provider is temporarily unavailable (5xx, maintenance)
    #[error("provider unavailable: {0}")]
    Unavailable(String),
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode(err.to_string())
        } else if err.status().is_some_and(|s| s.is_server_error()) {
            Self::Unavailable(err.to_string())
        } else {
            Self::Network(err.to_string())
        }
    }
}

// ============================================================================
// Bar Data Gateway
// ============================================================================

/// Gateway to per-instrument daily OHLCV history.
///
/// The screening engine only ever consumes completed series through
/// [`daily_bars_batch`](Self::daily_bars_batch); how an implementation
/// parallelizes or paces the underlying requests is invisible to the core.
#[async_trait]
pub trait BarDataProvider: Send + Sync {
    /// Provider name for logs (e.g., "yahoo")
    fn name(&self) -> &'static str;

    /// Fetch the trailing `lookback` daily bars for one symbol,
    /// chronological, most recent last.
    async fn daily_bars(&self, symbol: &str, lookback: usize)
        -> Result<Vec<DailyBar>, ProviderError>;

    /// Fetch daily bars for many symbols at once.
    ///
    /// Tolerates partial failure: symbols that error or return nothing are
    /// simply absent from the result map (logged at warn). Never fails the
    /// whole batch.
    async fn daily_bars_batch(
        &self,
        symbols: &[String],
        lookback: usize,
    ) -> HashMap<String, Vec<DailyBar>> {
        let fetched: Vec<(String, Result<Vec<DailyBar>, ProviderError>)> =
            stream::iter(symbols.iter().cloned())
                .map(|symbol| async move {
                    let bars = self.daily_bars(&symbol, lookback).await;
                    (symbol, bars)
                })
                .buffer_unordered(MAX_CONCURRENT_FETCHES)
                .collect()
                .await;

        let mut series = HashMap::with_capacity(fetched.len());
        for (symbol, result) in fetched {
            match result {
                Ok(bars) if !bars.is_empty() => {
                    series.insert(symbol, bars);
                }
                Ok(_) => {
                    warn!(symbol = %symbol, provider = self.name(), "empty series, excluding");
                }
                Err(e) => {
                    warn!(symbol = %symbol, provider = self.name(), error = %e, "fetch failed, excluding");
                }
            }
        }
        series
    }
}

// ============================================================================
// Universe Provider
// ============================================================================

/// Source of the instrument universe for a market segment.
#[async_trait]
pub trait UniverseProvider: Send + Sync {
    /// Provider name for logs (e.g., "twse-registry")
    fn name(&self) -> &'static str;

    /// Return all instrument identifiers for the segment.
    async fn universe(&self, segment: MarketSegment) -> Result<Vec<String>, ProviderError>;
}

/// Universe fixed to an explicit symbol list.
///
/// Backs the `--symbols` CLI override and keeps integration tests off the
/// network. The requested segment is ignored.
pub struct FixedUniverse {
    symbols: Vec<String>,
}

impl FixedUniverse {
    pub fn new(symbols: Vec<String>) -> Self {
        Self { symbols }
    }
}

#[async_trait]
impl UniverseProvider for FixedUniverse {
    fn name(&self) -> &'static str {
        "fixed"
    }

    async fn universe(&self, _segment: MarketSegment) -> Result<Vec<String>, ProviderError> {
        Ok(self.symbols.clone())
    }
}

// ============================================================================
// Tests
// ============================================================================
