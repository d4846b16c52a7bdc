//! TWSE Screener Library
//!
//! Screens Taiwan-listed equities for next-day short-sell (or long-entry)
//! candidates from end-of-day OHLCV data.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                         twse-screener                               │
//! ├─────────────────────────────────────────────────────────────────────┤
//! │                                                                     │
//! │  ┌─────────────┐     ┌──────────────┐     ┌──────────────┐         │
//! │  │  Universe   │────▶│  Pre-Filter  │────▶│ Signal Score │         │
//! │  │  (registry) │     │  (liquidity) │     │  (MA/volume) │         │
//! │  └─────────────┘     └──────┬───────┘     └──────┬───────┘         │
//! │                             │                    │                  │
//! │                      ┌──────┴────────────────────┴──────┐          │
//! │                      │        Bar Data Gateway          │          │
//! │                      │   (batched daily OHLCV fetch)    │          │
//! │                      └───────────────────────────────────┘          │
//! │                                                  │                  │
//! │                                          ┌───────┴───────┐         │
//! │                                          │ Rank / Top-N  │         │
//! │                                          └───────────────┘         │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Pipeline
//!
//! 1. The universe provider yields identifiers for one market segment
//!    (TWSE listed board or TPEx OTC), cached once per day.
//! 2. A cheap liquidity/price pre-filter over the last few sessions narrows
//!    the set before any expensive work.
//! 3. Survivors get a longer history window and are scored against a small
//!    fixed set of technical rules (MA5/MA20 position, candle color,
//!    deviation from MA20, volume versus its 5-session mean).
//! 4. Candidates are ranked by score, cut at a minimum score, and truncated
//!    to a top-N table.
//!
//! Per-instrument failures (missing data, short history, degenerate ratios)
//! never abort a scan; they are counted and reported in the scan metadata.

#![warn(clippy::all)]
#![allow(clippy::pedantic)]

pub mod config;
pub mod data;
pub mod logging;
pub mod screener;
