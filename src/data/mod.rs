//! Market data module for Taiwan equities.
//!
//! Provides the bar/universe provider abstractions plus concrete adapters:
//!
//! # Data Sources
//! - **Yahoo Finance** (bars): v8 chart API, daily OHLCV, no token required
//! - **Exchange open data** (universe): TWSE / TPEx company registries
//!
//! All per-symbol fetch failures are tolerated; a batch fetch simply omits
//! the symbols it could not retrieve.

mod cache;
mod provider;
mod twse;
mod yahoo;

pub use cache::CachedUniverse;
pub use provider::{BarDataProvider, FixedUniverse, ProviderError, UniverseProvider};
pub use twse::TwseRegistry;
pub use yahoo::YahooGateway;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ============================================================================
// Core Data Types
// ============================================================================

/// One trading session's bar for one instrument.
///
/// Series are chronological with the most recent session last, no duplicate
/// dates. Gaps (halted sessions) degrade moving-average quality but are not
/// treated as errors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyBar {
    /// Session date (exchange local)
    pub date: NaiveDate,
    /// Open price
    pub open: f64,
    /// High price
    pub high: f64,
    /// Low price
    pub low: f64,
    /// Close price
    pub close: f64,
    /// Volume in shares
    pub volume: f64,
}

impl DailyBar {
    /// Check if the session closed above its open
    pub fn is_bullish(&self) -> bool {
        self.close > self.open
    }

    /// Check if the session closed below its open
    pub fn is_bearish(&self) -> bool {
        self.close < self.open
    }

    /// Fractional change of this session's close from a reference close.
    ///
    /// Returns `None` when the reference is zero or either value is not
    /// finite, so callers never divide by a degenerate baseline.
    pub fn change_from(&self, prev_close: f64) -> Option<f64> {
        if prev_close == 0.0 || !prev_close.is_finite() || !self.close.is_finite() {
            return None;
        }
        Some((self.close - prev_close) / prev_close)
    }
}

// ============================================================================
// Market Segment
// ============================================================================

/// Market segment whose universe is being scanned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarketSegment {
    /// TWSE primary listed board (symbols suffixed `.TW`)
    Listed,
    /// TPEx over-the-counter board (symbols suffixed `.TWO`)
    Otc,
}

impl MarketSegment {
    /// Yahoo-style symbol suffix for this segment
    pub fn symbol_suffix(&self) -> &'static str {
        match self {
            Self::Listed => "TW",
            Self::Otc => "TWO",
        }
    }
}

impl std::fmt::Display for MarketSegment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Listed => write!(f, "listed"),
            Self::Otc => write!(f, "otc"),
        }
    }
}

impl std::str::FromStr for MarketSegment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "listed" | "twse" => Ok(Self::Listed),
            "otc" | "tpex" => Ok(Self::Otc),
            _ => Err(format!("unknown market segment: {} (expected listed|otc)", s)),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
