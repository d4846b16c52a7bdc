//! Ranking and threshold filtering.
//!
//! The one and only place the min-score cutoff is applied. The sort is
//! stable: candidates with equal scores keep their discovery order, which is
//! the universe order because scoring runs sequentially.

use super::signals::Candidate;

/// Retain candidates scoring at least `min_score`, sort by score descending
/// (stable), and truncate to `top_n` when bounded.
///
/// An empty result means "no qualifying candidates", never an error.
pub fn rank(candidates: Vec<Candidate>, min_score: u32, top_n: Option<usize>) -> Vec<Candidate> {
    let mut ranked: Vec<Candidate> = candidates
        .into_iter()
        .filter(|c| c.score >= min_score)
        .collect();

    // sort_by_key is stable; descending via Reverse keeps ties in
    // discovery order.
    ranked.sort_by_key(|c| std::cmp::Reverse(c.score));

    if let Some(n) = top_n {
        ranked.truncate(n);
    }
    ranked
}

// ============================================================================
// Tests
// ============================================================================
