//! Scan engine.
//!
//! Orchestrates one scan: universe -> pre-filter -> detail fetch -> score ->
//! rank. Per-instrument failures are counted, never propagated; only
//! scan-wide failures (no universe, no market data at all) surface as
//! errors.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::config::{ScanConfig, ScanMode};
use crate::data::{BarDataProvider, MarketSegment, ProviderError, UniverseProvider};

use super::prefilter::{passes_prefilter, FilterResult, FilterStage};
use super::rank::rank;
use super::signals::{score, Candidate, ScreenOutcome, SkipReason};

// ============================================================================
// Scan Error
// ============================================================================

/// Scan-wide failures. Distinct from "zero qualifying candidates", which is
/// a successful scan with an empty table.
#[derive(Debug, Error)]
pub enum ScanError {
    /// The universe provider failed; no scan is possible
    #[error("universe unavailable: {0}")]
    UniverseUnavailable(#[source] ProviderError),

    /// The universe came back empty for the requested segment
    #[error("empty universe for segment {segment}")]
    EmptyUniverse { segment: MarketSegment },

    /// The gateway returned no series for any instrument in the universe
    #[error("market data unavailable: gateway returned no series at all")]
    MarketDataUnavailable,
}

// ============================================================================
// Scan Report
// ============================================================================

/// Instruments dropped at the instrument boundary, by cause.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SkipCounts {
    /// Gateway returned no series for the instrument
    pub unavailable: usize,
    /// Fewer than 20 sessions of history
    pub insufficient_history: usize,
    /// Zero/non-finite baseline made a ratio undefined
    pub degenerate: usize,
}

impl SkipCounts {
    pub fn total(&self) -> usize {
        self.unavailable + self.insufficient_history + self.degenerate
    }
}

/// Result of one scan invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanReport {
    /// Scan ID (timestamp-based)
    pub id: String,
    /// Scan direction
    pub mode: ScanMode,
    /// Market segment scanned
    pub segment: MarketSegment,
    /// Ranked candidates (score descending, ties in discovery order)
    pub candidates: Vec<Candidate>,
    /// Per-stage funnel counters
    pub funnel: Vec<FilterResult>,
    /// Universe size before any filtering
    pub total_universe: usize,
    /// Instruments surviving the liquidity pre-filter
    pub prefilter_survivors: usize,
    /// Instruments that produced a score (including score 0)
    pub scored: usize,
    /// Instruments dropped at the instrument boundary
    pub skipped: SkipCounts,
    /// Start time
    pub started_at: DateTime<Utc>,
    /// End time
    pub completed_at: DateTime<Utc>,
    /// Duration in seconds
    pub duration_secs: f64,
}

impl ScanReport {
    /// Summary string for logging.
    pub fn summary(&self) -> String {
        format!(
            "Scanned {} instruments in {:.1}s: {} past pre-filter, {} scored, {} ranked",
            self.total_universe,
            self.duration_secs,
            self.prefilter_survivors,
            self.scored,
            self.candidates.len(),
        )
    }
}

// ============================================================================
// Scan Engine
// ============================================================================

/// The screening engine.
///
/// Generic over its two external collaborators so the pipeline runs the same
/// against live adapters, caches, or test mocks.
pub struct ScanEngine<B, U> {
    config: ScanConfig,
    bars: Arc<B>,
    universe: Arc<U>,
}

impl<B: BarDataProvider, U: UniverseProvider> ScanEngine<B, U> {
    pub fn new(config: ScanConfig, bars: Arc<B>, universe: Arc<U>) -> Self {
        Self {
            config,
            bars,
            universe,
        }
    }

    /// Run one complete scan over the given market segment.
    ///
    /// Pre-filtering and scoring iterate the universe in provider order, so
    /// equal-score candidates rank deterministically no matter how the
    /// gateway parallelizes its fetches.
    pub async fn run_scan(&self, segment: MarketSegment) -> Result<ScanReport, ScanError> {
        let started_at = Utc::now();
        let id = format!("scan_{}", started_at.format("%Y%m%d_%H%M%S"));

        info!(
            scan_id = %id,
            mode = %self.config.mode,
            segment = %segment,
            "starting scan"
        );

        // Phase 0: universe
        let universe = self
            .universe
            .universe(segment)
            .await
            .map_err(ScanError::UniverseUnavailable)?;
        if universe.is_empty() {
            return Err(ScanError::EmptyUniverse { segment });
        }
        info!(instruments = universe.len(), "universe loaded");

        let mut skipped = SkipCounts::default();

        // Phase 1: cheap pre-filter over a short window
        let short_series = self
            .bars
            .daily_bars_batch(&universe, self.config.prefilter_lookback)
            .await;
        if short_series.is_empty() {
            return Err(ScanError::MarketDataUnavailable);
        }

        let mut survivors = Vec::new();
        for symbol in &universe {
            match short_series.get(symbol) {
                Some(series) if passes_prefilter(series, &self.config) => {
                    survivors.push(symbol.clone());
                }
                Some(_) => {}
                None => skipped.unavailable += 1,
            }
        }
        let liquidity = FilterResult::new(FilterStage::Liquidity, universe.len(), survivors.len());
        info!(
            passed = liquidity.passed,
            eliminated = liquidity.eliminated,
            "pre-filter complete"
        );

        // Phase 2: detail fetch + scoring, sequential in universe order
        let detail_series = self
            .bars
            .daily_bars_batch(&survivors, self.config.scoring_lookback)
            .await;

        let mut candidates = Vec::new();
        for symbol in &survivors {
            let Some(series) = detail_series.get(symbol) else {
                skipped.unavailable += 1;
                continue;
            };
            match score(symbol, series, self.config.mode) {
                ScreenOutcome::Candidate(c) => {
                    debug!(symbol = %symbol, score = c.score, "scored");
                    candidates.push(c);
                }
                ScreenOutcome::Skipped(SkipReason::InsufficientHistory) => {
                    debug!(symbol = %symbol, "insufficient history, skipping");
                    skipped.insufficient_history += 1;
                }
                ScreenOutcome::Skipped(SkipReason::DegenerateSeries) => {
                    debug!(symbol = %symbol, "degenerate series, skipping");
                    skipped.degenerate += 1;
                }
            }
        }
        let scored = candidates.len();
        let scoring = FilterResult::new(FilterStage::Scoring, survivors.len(), scored);

        // Phase 3: rank and truncate
        let ranked = rank(candidates, self.config.min_score, Some(self.config.top_n));
        let threshold = FilterResult::new(FilterStage::Threshold, scored, ranked.len());

        let completed_at = Utc::now();
        let duration_secs = (completed_at - started_at).num_milliseconds() as f64 / 1000.0;

        let report = ScanReport {
            id,
            mode: self.config.mode,
            segment,
            candidates: ranked,
            funnel: vec![liquidity, scoring, threshold],
            total_universe: universe.len(),
            prefilter_survivors: survivors.len(),
            scored,
            skipped,
            started_at,
            completed_at,
            duration_secs,
        };

        info!(
            scan_id = %report.id,
            candidates = report.candidates.len(),
            skipped = report.skipped.total(),
            "{}",
            report.summary()
        );
        Ok(report)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skip_counts_total() {
        let skipped = SkipCounts {
            unavailable: 3,
            insufficient_history: 2,
            degenerate: 1,
        };
        assert_eq!(skipped.total(), 6);
        assert_eq!(SkipCounts::default().total(), 0);
    }

    #[test]
    fn test_report_summary() {
        let report = ScanReport {
            id: "scan_test".to_string(),
            mode: ScanMode::Short,
            segment: MarketSegment::Listed,
            candidates: Vec::new(),
            funnel: Vec::new(),
            total_universe: 900,
            prefilter_survivors: 120,
            scored: 115,
            skipped: SkipCounts::default(),
            started_at: Utc::now(),
            completed_at: Utc::now(),
            duration_secs: 12.5,
        };
        let summary = report.summary();
        assert!(summary.contains("900"));
        assert!(summary.contains("120"));
        assert!(summary.contains("115"));
    }

    #[test]
    fn test_scan_error_display() {
        let err = ScanError::EmptyUniverse {
            segment: MarketSegment::Otc,
        };
        assert!(err.to_string().contains("otc"));

        let err = ScanError::UniverseUnavailable(ProviderError::Network("timeout".to_string()));
        assert!(err.to_string().contains("universe unavailable"));
    }
}
