//! Signal scoring over a single instrument series.
//!
//! Computes trailing moving averages and a deviation ratio, then fires a
//! small fixed rule set whose weights sum into the composite score. Short
//! and long mode use mirrored rules; evaluation order is fixed so reason
//! tags always appear in the same sequence.

use serde::{Deserialize, Serialize};

use crate::config::ScanMode;
use crate::data::DailyBar;

// ============================================================================
// Constants
// ============================================================================

/// Minimum sessions needed to score (MA20 must be fully formed).
pub const MIN_SESSIONS: usize = 20;

/// Deviation from MA20 beyond which the overextension rule fires.
const DEVIATION_THRESHOLD: f64 = 0.05;

/// TWSE/TPEx round lot, in shares.
const ROUND_LOT: f64 = 1000.0;

// ============================================================================
// Signals
// ============================================================================

/// A triggered scoring rule. Each variant carries a fixed weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Signal {
    // Short-mode rules, in evaluation order
    /// Latest close below the 5-session MA (short-term weakness)
    BelowShortMa,
    /// Latest session closed below its open
    BearishClose,
    /// Close extended more than +5% above MA20 (overheated, reversal-prone)
    OverextendedPullback,
    /// Down day on above-average volume (distribution)
    Distribution,

    // Long-mode rules, mirror image
    /// Latest close above the 5-session MA
    AboveShortMa,
    /// Latest session closed above its open
    BullishClose,
    /// Close extended more than -5% below MA20 (oversold, rebound-prone)
    OversoldRebound,
    /// Up day on above-average volume (accumulation)
    Accumulation,
}

impl Signal {
    /// Score contribution of this rule.
    pub fn weight(&self) -> u32 {
        match self {
            Self::OverextendedPullback | Self::OversoldRebound => 2,
            _ => 1,
        }
    }

    /// Human-readable reason tag for reports.
    pub fn label(&self) -> &'static str {
        match self {
            Self::BelowShortMa => "below MA5",
            Self::BearishClose => "bearish close",
            Self::OverextendedPullback => "extended above MA20",
            Self::Distribution => "down day on heavy volume",
            Self::AboveShortMa => "above MA5",
            Self::BullishClose => "bullish close",
            Self::OversoldRebound => "extended below MA20",
            Self::Accumulation => "up day on heavy volume",
        }
    }
}

impl std::fmt::Display for Signal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

// ============================================================================
// Candidate
// ============================================================================

/// A scored instrument. Built once per qualifying instrument per scan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Candidate {
    /// Instrument identifier (e.g., "2330.TW")
    pub symbol: String,
    /// Latest close
    pub close: f64,
    /// Day-over-day change of the latest close, in percent
    pub change_percent: f64,
    /// Composite score (sum of fired rule weights, 0..=5)
    pub score: u32,
    /// Fired rules, in evaluation order
    pub signals: Vec<Signal>,
    /// Signed fractional deviation of the latest close from MA20
    pub deviation: f64,
    /// Latest-session volume in board lots (shares / 1000)
    pub lots: u64,
}

// ============================================================================
// Screen Outcome
// ============================================================================

/// Why an instrument was skipped without being scored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// Fewer than [`MIN_SESSIONS`] sessions of history
    InsufficientHistory,
    /// Zero/non-finite MA20 or previous close; ratios undefined
    DegenerateSeries,
}

/// Per-instrument scoring outcome.
///
/// Every structurally valid series yields a `Candidate`, including ones that
/// fired no rules (score 0) - the min-score cutoff is the ranking stage's
/// job. Skips stay inspectable instead of vanishing into a catch-all.
#[derive(Debug, Clone)]
pub enum ScreenOutcome {
    Candidate(Candidate),
    Skipped(SkipReason),
}

// ============================================================================
// Scoring
// ============================================================================

/// Arithmetic mean of the trailing `n` values of `series` projected by `f`.
fn trailing_mean(series: &[DailyBar], n: usize, f: impl Fn(&DailyBar) -> f64) -> f64 {
    let tail = &series[series.len() - n..];
    tail.iter().map(f).sum::<f64>() / n as f64
}

/// Score one instrument series.
///
/// The series must be chronological with the most recent session last.
/// Returns a typed skip for short or degenerate series; never panics and
/// never divides by zero.
pub fn score(symbol: &str, series: &[DailyBar], mode: ScanMode) -> ScreenOutcome {
    if series.len() < MIN_SESSIONS {
        return ScreenOutcome::Skipped(SkipReason::InsufficientHistory);
    }

    let last = &series[series.len() - 1];
    let prev = &series[series.len() - 2];

    let ma5 = trailing_mean(series, 5, |b| b.close);
    let ma20 = trailing_mean(series, 20, |b| b.close);
    let vol_ma5 = trailing_mean(series, 5, |b| b.volume);

    if ma20 == 0.0 || !ma20.is_finite() {
        return ScreenOutcome::Skipped(SkipReason::DegenerateSeries);
    }
    let Some(change) = last.change_from(prev.close) else {
        return ScreenOutcome::Skipped(SkipReason::DegenerateSeries);
    };

    let deviation = (last.close - ma20) / ma20;

    let mut signals = Vec::new();
    match mode {
        ScanMode::Short => {
            if last.close < ma5 {
                signals.push(Signal::BelowShortMa);
            }
            if last.is_bearish() {
                signals.push(Signal::BearishClose);
            }
            if deviation > DEVIATION_THRESHOLD {
                signals.push(Signal::OverextendedPullback);
            }
            if last.close < prev.close && last.volume > vol_ma5 {
                signals.push(Signal::Distribution);
            }
        }
        ScanMode::Long => {
            if last.close > ma5 {
                signals.push(Signal::AboveShortMa);
            }
            if last.is_bullish() {
                signals.push(Signal::BullishClose);
            }
            if deviation < -DEVIATION_THRESHOLD {
                signals.push(Signal::OversoldRebound);
            }
            if last.close > prev.close && last.volume > vol_ma5 {
                signals.push(Signal::Accumulation);
            }
        }
    }

    let total = signals.iter().map(Signal::weight).sum();

    ScreenOutcome::Candidate(Candidate {
        symbol: symbol.to_string(),
        close: last.close,
        change_percent: change * 100.0,
        score: total,
        signals,
        deviation,
        lots: (last.volume / ROUND_LOT) as u64,
    })
}

// ============================================================================
// Tests
// ============================================================================
