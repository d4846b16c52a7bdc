//! Screening pipeline.
//!
//! Turns a list of instrument identifiers into a ranked candidate table:
//!
//! ```text
//! universe ──▶ pre-filter ──▶ detail fetch ──▶ score ──▶ rank ──▶ top-N
//!  (cheap, 5 sessions)       (60 sessions)   (MA rules)
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use twse_screener::config::ScanConfig;
//! use twse_screener::data::{CachedUniverse, MarketSegment, TwseRegistry, YahooGateway};
//! use twse_screener::screener::ScanEngine;
//!
//! let engine = ScanEngine::new(
//!     ScanConfig::default(),
//!     Arc::new(YahooGateway::new()),
//!     Arc::new(CachedUniverse::new(TwseRegistry::new())),
//! );
//! let report = engine.run_scan(MarketSegment::Listed).await?;
//! ```
//!
//! Threshold policy: the scorer reports every structurally valid instrument
//! (even score 0); the single min-score cutoff lives in [`rank`].

pub mod engine;
pub mod prefilter;
pub mod rank;
pub mod report;
pub mod signals;

pub use engine::{ScanEngine, ScanError, ScanReport, SkipCounts};
pub use prefilter::{passes_prefilter, FilterResult, FilterStage};
pub use rank::rank;
pub use report::{Report, ReportFormat};
pub use signals::{score, Candidate, ScreenOutcome, Signal, SkipReason, MIN_SESSIONS};
