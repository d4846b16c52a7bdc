//! Liquidity/price pre-filter.
//!
//! Cheap first pass over a short lookback that rejects instruments not worth
//! the longer history fetch: too thin, too cheap, or (short mode) already
//! locked limit-up. Malformed or missing data never raises - it just fails
//! the filter.

use serde::{Deserialize, Serialize};

use crate::config::{ScanConfig, ScanMode};
use crate::data::DailyBar;

/// Single-session change at or beyond which a stock is considered limit-up.
///
/// The TWSE daily limit is 10%; rounding of the reference price means locked
/// stocks often print 9.8-10%, so the guard triggers slightly early.
const LIMIT_UP_THRESHOLD: f64 = 0.098;

// ============================================================================
// Filter Funnel Tracking
// ============================================================================

/// Pipeline stage identifier for funnel reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterStage {
    /// Liquidity/price pre-filter
    Liquidity,
    /// History fetch + signal scoring (structural preconditions)
    Scoring,
    /// Min-score threshold and top-N truncation
    Threshold,
}

impl std::fmt::Display for FilterStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Liquidity => write!(f, "liquidity"),
            Self::Scoring => write!(f, "scoring"),
            Self::Threshold => write!(f, "threshold"),
        }
    }
}

/// How many instruments survived one stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterResult {
    /// Stage name
    pub stage: FilterStage,
    /// Instruments that passed this stage
    pub passed: usize,
    /// Instruments eliminated at this stage
    pub eliminated: usize,
    /// Elimination rate (%)
    pub elimination_rate: f64,
}

impl FilterResult {
    pub fn new(stage: FilterStage, input_count: usize, passed_count: usize) -> Self {
        let eliminated = input_count.saturating_sub(passed_count);
        let elimination_rate = if input_count > 0 {
            (eliminated as f64 / input_count as f64) * 100.0
        } else {
            0.0
        };

        Self {
            stage,
            passed: passed_count,
            eliminated,
            elimination_rate,
        }
    }
}

// ============================================================================
// Pre-Filter
// ============================================================================

/// Decide whether an instrument deserves the expensive scoring pass.
///
/// Needs at least the latest and previous session. Rejects when:
/// - the series is shorter than two sessions or the latest bar is malformed,
/// - latest volume is under `config.min_volume`,
/// - latest close is under `config.min_price`,
/// - (short mode only) the latest session gained >= 9.8% over the previous
///   close - a locked limit-up stock offers no executable short entry.
///
/// Pure and side-effect free; any data-shape inconsistency means "does not
/// qualify", never an error.
pub fn passes_prefilter(series: &[DailyBar], config: &ScanConfig) -> bool {
    let [.., prev, last] = series else {
        return false;
    };

    if !last.close.is_finite() || last.close <= 0.0 {
        return false;
    }
    if !last.volume.is_finite() || last.volume <= 0.0 {
        return false;
    }

    if last.volume < config.min_volume {
        return false;
    }
    if last.close < config.min_price {
        return false;
    }

    if config.mode == ScanMode::Short {
        // A degenerate previous close also disqualifies: without it the
        // limit-up check cannot be evaluated.
        match last.change_from(prev.close) {
            Some(change) if change < LIMIT_UP_THRESHOLD => {}
            _ => return false,
        }
    }

    true
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn bar(day: u32, close: f64, volume: f64) -> DailyBar {
        let date = NaiveDate::from_ymd_opt(2025, 3, 3).unwrap() + chrono::Days::new(day as u64);
        DailyBar {
            date,
            open: close,
            high: close * 1.01,
            low: close * 0.99,
            close,
            volume,
        }
    }

    fn two_sessions(prev_close: f64, close: f64, volume: f64) -> Vec<DailyBar> {
        vec![bar(0, prev_close, volume), bar(1, close, volume)]
    }

    #[test]
    fn test_accepts_liquid_stock() {
        let config = ScanConfig::default();
        let series = two_sessions(100.0, 98.0, 5_000_000.0);
        assert!(passes_prefilter(&series, &config));
    }

    #[test]
    fn test_rejects_short_series() {
        let config = ScanConfig::default();
        assert!(!passes_prefilter(&[], &config));
        assert!(!passes_prefilter(&[bar(0, 100.0, 5_000_000.0)], &config));
    }

    #[test]
    fn test_rejects_thin_volume() {
        let config = ScanConfig::default();
        let series = two_sessions(100.0, 98.0, 400_000.0);
        assert!(!passes_prefilter(&series, &config));
    }

    #[test]
    fn test_rejects_cheap_stock() {
        let config = ScanConfig::default();
        let series = two_sessions(8.1, 8.0, 5_000_000.0);
        assert!(!passes_prefilter(&series, &config));
    }

    #[test]
    fn test_rejects_malformed_latest_bar() {
        let config = ScanConfig::default();
        assert!(!passes_prefilter(
            &two_sessions(100.0, f64::NAN, 5_000_000.0),
            &config
        ));
        assert!(!passes_prefilter(
            &two_sessions(100.0, 98.0, 0.0),
            &config
        ));
        assert!(!passes_prefilter(
            &two_sessions(100.0, -3.0, 5_000_000.0),
            &config
        ));
    }

    #[test]
    fn test_limit_up_excluded_only_in_short_mode() {
        // +10% day: at the limit, no short entry executes
        let series = two_sessions(100.0, 110.0, 5_000_000.0);

        let short = ScanConfig {
            mode: ScanMode::Short,
            ..ScanConfig::default()
        };
        let long = ScanConfig {
            mode: ScanMode::Long,
            ..ScanConfig::default()
        };

        assert!(!passes_prefilter(&series, &short));
        assert!(passes_prefilter(&series, &long));
    }

    #[test]
    fn test_limit_up_threshold_boundary() {
        let config = ScanConfig::default(); // short mode

        // +9.7%: still shortable
        assert!(passes_prefilter(
            &two_sessions(1000.0, 1097.0, 5_000_000.0),
            &config
        ));
        // exactly +9.8%: treated as locked
        assert!(!passes_prefilter(
            &two_sessions(1000.0, 1098.0, 5_000_000.0),
            &config
        ));
    }

    #[test]
    fn test_short_mode_rejects_zero_prev_close() {
        let config = ScanConfig::default();
        let series = two_sessions(0.0, 98.0, 5_000_000.0);
        assert!(!passes_prefilter(&series, &config));
    }

    #[test]
    fn test_filter_result_counts() {
        let result = FilterResult::new(FilterStage::Liquidity, 100, 80);
        assert_eq!(result.passed, 80);
        assert_eq!(result.eliminated, 20);
        assert!((result.elimination_rate - 20.0).abs() < 0.001);

        let empty = FilterResult::new(FilterStage::Scoring, 0, 0);
        assert!((empty.elimination_rate - 0.0).abs() < f64::EPSILON);
    }
}
