//! Hybrid movie recommendations
//!
//! Blends a content score (genre preferences derived from the user's ratings,
//! plus quality, reliability and recency) with a popularity score, and falls
//! back to popularity alone when the rating history is too short.

use serde::Serialize;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::instrument;

use crate::{
    error::{AppError, AppResult},
    models::{MovieId, MovieMetrics, Recommendation, UserRating},
    services::{
        clock::{Clock, SystemClock},
        providers::{CandidateFeed, CandidateSource, MovieLookup, RatingSource},
    },
};

pub mod preferences;
pub mod reasons;
pub mod scoring;

pub use preferences::{compute_preferences, GenrePreferenceMap, NEUTRAL_GENRE_SCORE};
pub use scoring::CandidateScorer;

/// Tunable parameters of the engine
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Share of the content score in the hybrid score
    pub content_weight: f64,
    /// Share of the popularity score in the hybrid score
    pub popularity_weight: f64,
    /// Ratings at or above this count as "liked"
    pub min_rating_threshold: f64,
    /// Histories shorter than this get cold-start recommendations
    pub cold_start_min_ratings: usize,
    /// Pages of the popular feed in the personalized candidate pool
    pub popular_pages: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            content_weight: 0.65,
            popularity_weight: 0.35,
            min_rating_threshold: 3.5,
            cold_start_min_ratings: 3,
            popular_pages: 3,
        }
    }
}

impl EngineConfig {
    /// Rejects weights outside [0, 1] or not summing to 1.0, and thresholds
    /// outside the rating scale
    pub fn validate(self) -> AppResult<Self> {
        let weights = [self.content_weight, self.popularity_weight];
        if weights.iter().any(|w| !(0.0..=1.0).contains(w)) {
            return Err(AppError::InvalidInput(format!(
                "Hybrid weights must be within [0, 1], got content={} popularity={}",
                self.content_weight, self.popularity_weight
            )));
        }
        if (self.content_weight + self.popularity_weight - 1.0).abs() > 1e-6 {
            return Err(AppError::InvalidInput(format!(
                "Hybrid weights must sum to 1.0, got {}",
                self.content_weight + self.popularity_weight
            )));
        }
        if !(0.0..=5.0).contains(&self.min_rating_threshold) {
            return Err(AppError::InvalidInput(format!(
                "Liked threshold must be within [0, 5], got {}",
                self.min_rating_threshold
            )));
        }
        if self.popular_pages == 0 {
            return Err(AppError::InvalidInput(
                "At least one popular page is required".to_string(),
            ));
        }
        Ok(self)
    }
}

/// Which path produced a recommendation set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationMode {
    /// Too little history; ranked by popularity only
    ColdStart,
    /// Ranked by the hybrid score
    Personalized,
}

/// A collaborator call that failed and was skipped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchFailure {
    Ratings,
    Feed(CandidateFeed),
    /// A rated movie whose metadata could not be fetched
    MovieLookup(MovieId),
}

/// Ranked recommendations plus how they were produced.
///
/// `failures` is empty when every collaborator answered, which tells a
/// genuinely empty result apart from one built on partial data.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecommendationSet {
    pub mode: RecommendationMode,
    pub recommendations: Vec<Recommendation>,
    pub failures: Vec<FetchFailure>,
}

impl RecommendationSet {
    pub fn is_partial(&self) -> bool {
        !self.failures.is_empty()
    }
}

/// Produces ranked, explained recommendations from the user's rating history.
///
/// Holds nothing mutable between calls, so concurrent requests are
/// independent and repeated calls over unchanged data agree.
pub struct RecommendationEngine {
    ratings: Arc<dyn RatingSource>,
    movies: Arc<dyn MovieLookup>,
    candidates: Arc<dyn CandidateSource>,
    clock: Arc<dyn Clock>,
    config: EngineConfig,
}

impl RecommendationEngine {
    pub fn new(
        ratings: Arc<dyn RatingSource>,
        movies: Arc<dyn MovieLookup>,
        candidates: Arc<dyn CandidateSource>,
        config: EngineConfig,
    ) -> Self {
        Self {
            ratings,
            movies,
            candidates,
            clock: Arc::new(SystemClock),
            config,
        }
    }

    /// Replaces the wall clock used for recency scoring
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Up to `limit` recommendations, best first
    pub async fn generate_recommendations(&self, limit: usize) -> Vec<Recommendation> {
        self.generate(limit).await.recommendations
    }

    /// Up to `limit` recommendations, best first, with the path taken and any
    /// collaborator failures that were skipped
    #[instrument(skip(self))]
    pub async fn generate(&self, limit: usize) -> RecommendationSet {
        let mut failures = Vec::new();

        let ratings = match self.ratings.fetch_all_ratings().await {
            Ok(ratings) => ratings,
            Err(e) => {
                tracing::warn!(error = %e, "Rating history unavailable, treating as empty");
                failures.push(FetchFailure::Ratings);
                Vec::new()
            }
        };

        let set = if ratings.len() < self.config.cold_start_min_ratings {
            self.cold_start(limit, failures).await
        } else {
            self.personalized(&ratings, limit, failures).await
        };

        tracing::info!(
            mode = ?set.mode,
            ratings = ratings.len(),
            returned = set.recommendations.len(),
            failed_fetches = set.failures.len(),
            "Recommendations generated"
        );

        set
    }

    async fn cold_start(&self, limit: usize, mut failures: Vec<FetchFailure>) -> RecommendationSet {
        let feeds = [CandidateFeed::Popular { page: 1 }, CandidateFeed::Trending];
        let pool = self.fetch_pool(&feeds, &mut failures).await;
        let scorer = CandidateScorer::new(&self.config, self.clock.current_year());

        let scored = pool
            .into_iter()
            .map(|movie| {
                let score = scorer.score_popularity(&movie);
                let reason = reasons::popularity_reason(&movie);
                Recommendation::new(movie, score, reason)
            })
            .collect();

        RecommendationSet {
            mode: RecommendationMode::ColdStart,
            recommendations: rank(scored, limit),
            failures,
        }
    }

    async fn personalized(
        &self,
        ratings: &[UserRating],
        limit: usize,
        mut failures: Vec<FetchFailure>,
    ) -> RecommendationSet {
        let preferences =
            compute_preferences(ratings, self.movies.as_ref(), &mut failures).await;

        let liked = ratings
            .iter()
            .filter(|r| r.rating() >= self.config.min_rating_threshold)
            .count();

        let watched: HashSet<MovieId> = ratings.iter().map(UserRating::movie_id).collect();

        let feeds: Vec<CandidateFeed> = (1..=self.config.popular_pages)
            .map(|page| CandidateFeed::Popular { page })
            .chain(std::iter::once(CandidateFeed::Trending))
            .collect();
        let pool = self.fetch_pool(&feeds, &mut failures).await;
        let scorer = CandidateScorer::new(&self.config, self.clock.current_year());

        tracing::debug!(
            genres = preferences.len(),
            liked = liked,
            watched = watched.len(),
            candidates = pool.len(),
            "Scoring personalized candidates"
        );

        let scored = pool
            .into_iter()
            .filter(|movie| !watched.contains(&movie.id))
            .map(|movie| {
                let score = scorer.score_hybrid(&movie, &preferences);
                let reason = reasons::personalized_reason(&movie, &preferences, score);
                Recommendation::new(movie, score, reason)
            })
            .collect();

        RecommendationSet {
            mode: RecommendationMode::Personalized,
            recommendations: rank(scored, limit),
            failures,
        }
    }

    /// Fetches every feed in order, skipping failed ones, and removes
    /// duplicate movies (first occurrence wins)
    async fn fetch_pool(
        &self,
        feeds: &[CandidateFeed],
        failures: &mut Vec<FetchFailure>,
    ) -> Vec<MovieMetrics> {
        let mut pool = Vec::new();

        for feed in feeds {
            match self.candidates.fetch_candidates(*feed).await {
                Ok(movies) => pool.extend(movies),
                Err(e) => {
                    tracing::warn!(feed = %feed, error = %e, "Candidate feed failed, skipping");
                    failures.push(FetchFailure::Feed(*feed));
                }
            }
        }

        dedupe_by_id(pool)
    }
}

fn dedupe_by_id(movies: Vec<MovieMetrics>) -> Vec<MovieMetrics> {
    let mut seen = HashSet::new();
    movies
        .into_iter()
        .filter(|movie| seen.insert(movie.id))
        .collect()
}

/// Best first; ties keep pool order
fn rank(mut recommendations: Vec<Recommendation>, limit: usize) -> Vec<Recommendation> {
    recommendations.sort_by(|a, b| b.match_score.total_cmp(&a.match_score));
    recommendations.truncate(limit);
    recommendations
}
