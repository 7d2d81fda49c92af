use serde::Serialize;

use super::MovieMetrics;

/// A scored, explained suggestion. Built once per request and never mutated.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub movie: MovieMetrics,
    pub match_score: f64,
    pub reason: String,
}

impl Recommendation {
    /// # Panics
    ///
    /// Panics when `match_score` is outside [0.0, 1.0]. Scores are produced by
    /// the engine's own clamped math, so this only fires on a scoring bug.
    pub fn new(movie: MovieMetrics, match_score: f64, reason: impl Into<String>) -> Self {
        assert!(
            (0.0..=1.0).contains(&match_score),
            "match score {} for movie {} is outside [0, 1]",
            match_score,
            movie.id
        );
        Self {
            movie,
            match_score,
            reason: reason.into(),
        }
    }
}
