use crate::models::MovieMetrics;

use super::preferences::{GenrePreferenceMap, NEUTRAL_GENRE_SCORE};
use super::EngineConfig;

// Content score weights; they sum to 1.0
pub const GENRE_WEIGHT: f64 = 0.45;
pub const QUALITY_WEIGHT: f64 = 0.30;
pub const RELIABILITY_WEIGHT: f64 = 0.15;
pub const RECENCY_WEIGHT: f64 = 0.10;

// Genre alignment blends the best matching genre with the average
const BEST_GENRE_SHARE: f64 = 0.6;
const AVERAGE_GENRE_SHARE: f64 = 0.4;

// Popularity score weights; they sum to 1.0
pub const POPULARITY_SHARE: f64 = 0.40;
pub const VOTE_AVERAGE_SHARE: f64 = 0.50;
pub const VOTE_COUNT_SHARE: f64 = 0.10;

/// Popularity at which the log-compressed popularity component saturates
pub const POPULARITY_CAP: f64 = 1000.0;
/// Vote count at which the log-compressed vote-count component saturates
pub const VOTE_COUNT_CAP: f64 = 10_000.0;

// Substitutes for absent (or non-finite) metadata
pub const DEFAULT_VOTE_AVERAGE: f64 = 5.0;
pub const DEFAULT_VOTE_COUNT: u32 = 0;
pub const DEFAULT_POPULARITY: f64 = 1.0;
pub const DEFAULT_RELEASE_YEAR: i32 = 2000;

/// Scores candidates against a user's preferences and against crowd metrics.
///
/// Every score is clamped to [0.0, 1.0]; absent fields fall back to the
/// `DEFAULT_*` constants, so no input produces NaN.
#[derive(Debug, Clone, Copy)]
pub struct CandidateScorer {
    content_weight: f64,
    popularity_weight: f64,
    current_year: i32,
}

impl CandidateScorer {
    pub fn new(config: &EngineConfig, current_year: i32) -> Self {
        Self {
            content_weight: config.content_weight,
            popularity_weight: config.popularity_weight,
            current_year,
        }
    }

    /// Preference alignment plus intrinsic quality, reliability and recency
    pub fn score_content(&self, movie: &MovieMetrics, preferences: &GenrePreferenceMap) -> f64 {
        let genre = genre_alignment(movie, preferences);
        let quality = quality_tier(vote_average(movie));
        let reliability = reliability_tier(movie.vote_count.unwrap_or(DEFAULT_VOTE_COUNT));
        let release_year = movie.release_year().unwrap_or(DEFAULT_RELEASE_YEAR);
        let recency = recency_tier(self.current_year - release_year);

        (genre * GENRE_WEIGHT
            + quality * QUALITY_WEIGHT
            + reliability * RELIABILITY_WEIGHT
            + recency * RECENCY_WEIGHT)
            .clamp(0.0, 1.0)
    }

    /// Crowd signal independent of any one user
    pub fn score_popularity(&self, movie: &MovieMetrics) -> f64 {
        let popularity = movie
            .popularity
            .filter(|p| p.is_finite())
            .unwrap_or(DEFAULT_POPULARITY);
        let votes = movie.vote_count.unwrap_or(DEFAULT_VOTE_COUNT) as f64;

        let popularity_score = log_normalize(popularity, POPULARITY_CAP);
        let vote_average_score = (vote_average(movie) / 10.0).clamp(0.0, 1.0);
        let vote_count_score = log_normalize(votes, VOTE_COUNT_CAP);

        (popularity_score * POPULARITY_SHARE
            + vote_average_score * VOTE_AVERAGE_SHARE
            + vote_count_score * VOTE_COUNT_SHARE)
            .clamp(0.0, 1.0)
    }

    /// `clamp(content * content_weight + popularity * popularity_weight)`
    pub fn score_hybrid(&self, movie: &MovieMetrics, preferences: &GenrePreferenceMap) -> f64 {
        let content = self.score_content(movie, preferences);
        let popularity = self.score_popularity(movie);
        (content * self.content_weight + popularity * self.popularity_weight).clamp(0.0, 1.0)
    }
}

/// Blend of the best and the average preference over the movie's genres;
/// unrated genres count as neutral, and so does a movie without genres
fn genre_alignment(movie: &MovieMetrics, preferences: &GenrePreferenceMap) -> f64 {
    if movie.genre_ids.is_empty() {
        return NEUTRAL_GENRE_SCORE;
    }

    let scores: Vec<f64> = movie
        .genre_ids
        .iter()
        .map(|genre| preferences.score_or_neutral(*genre))
        .collect();
    let best = scores.iter().copied().fold(0.0, f64::max);
    let average = scores.iter().sum::<f64>() / scores.len() as f64;

    best * BEST_GENRE_SHARE + average * AVERAGE_GENRE_SHARE
}

fn vote_average(movie: &MovieMetrics) -> f64 {
    movie
        .vote_average
        .filter(|v| v.is_finite())
        .unwrap_or(DEFAULT_VOTE_AVERAGE)
}

/// `ln(x + 1) / ln(cap + 1)`, clamped to [0, 1]
fn log_normalize(value: f64, cap: f64) -> f64 {
    if value <= 0.0 {
        return 0.0;
    }
    ((value + 1.0).ln() / (cap + 1.0).ln()).clamp(0.0, 1.0)
}

pub fn quality_tier(vote_average: f64) -> f64 {
    match vote_average {
        v if v >= 7.5 => 1.0,
        v if v >= 6.5 => 0.8,
        v if v >= 5.5 => 0.6,
        v if v >= 4.5 => 0.4,
        _ => 0.2,
    }
}

pub fn reliability_tier(vote_count: u32) -> f64 {
    match vote_count {
        c if c >= 1000 => 1.0,
        c if c >= 500 => 0.9,
        c if c >= 100 => 0.8,
        _ => 0.6,
    }
}

/// Releases dated in the future count as brand new
pub fn recency_tier(years_since_release: i32) -> f64 {
    match years_since_release {
        y if y <= 2 => 1.0,
        y if y <= 5 => 0.8,
        y if y <= 10 => 0.6,
        _ => 0.4,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{GenreId, MovieId};

    const ACTION: GenreId = 28;
    const ROMANCE: GenreId = 10749;
    const YEAR: i32 = 2025;

    fn scorer() -> CandidateScorer {
        CandidateScorer::new(&EngineConfig::default(), YEAR)
    }

    fn action_prefs(score: f64) -> GenrePreferenceMap {
        [(ACTION, score)].into_iter().collect()
    }

    fn full_movie() -> MovieMetrics {
        MovieMetrics {
            id: MovieId(1),
            title: "Mad Max: Fury Road".to_string(),
            genre_ids: vec![ACTION],
            vote_average: Some(8.0),
            vote_count: Some(2000),
            popularity: Some(50.0),
            release_date: Some("2024-05-01".to_string()),
            poster_path: None,
        }
    }

    fn bare_movie() -> MovieMetrics {
        MovieMetrics::new(MovieId(2), "Unknown")
    }

    #[test]
    fn test_tiers() {
        assert_eq!(quality_tier(7.5), 1.0);
        assert_eq!(quality_tier(7.4), 0.8);
        assert_eq!(quality_tier(5.5), 0.6);
        assert_eq!(quality_tier(4.5), 0.4);
        assert_eq!(quality_tier(0.0), 0.2);

        assert_eq!(reliability_tier(1000), 1.0);
        assert_eq!(reliability_tier(999), 0.9);
        assert_eq!(reliability_tier(100), 0.8);
        assert_eq!(reliability_tier(99), 0.6);

        assert_eq!(recency_tier(-1), 1.0);
        assert_eq!(recency_tier(2), 1.0);
        assert_eq!(recency_tier(5), 0.8);
        assert_eq!(recency_tier(10), 0.6);
        assert_eq!(recency_tier(11), 0.4);
    }

    #[test]
    fn test_weights_sum_to_one() {
        let content = GENRE_WEIGHT + QUALITY_WEIGHT + RELIABILITY_WEIGHT + RECENCY_WEIGHT;
        let popularity = POPULARITY_SHARE + VOTE_AVERAGE_SHARE + VOTE_COUNT_SHARE;
        assert!((content - 1.0).abs() < 1e-12);
        assert!((popularity - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_content_score_for_perfect_match() {
        let score = scorer().score_content(&full_movie(), &action_prefs(1.0));
        assert!((score - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_bare_movie_scores_are_finite_and_neutral() {
        let s = scorer();
        let content = s.score_content(&bare_movie(), &GenrePreferenceMap::default());
        // 0.3*0.45 + 0.4*0.30 + 0.6*0.15 + 0.4*0.10
        assert!((content - 0.385).abs() < 1e-9);

        let popularity = s.score_popularity(&bare_movie());
        // ln(2)/ln(1001)*0.40 + 0.5*0.50 + 0
        let expected = 2f64.ln() / 1001f64.ln() * 0.40 + 0.25;
        assert!((popularity - expected).abs() < 1e-9);

        let hybrid = s.score_hybrid(&bare_movie(), &GenrePreferenceMap::default());
        assert!(hybrid.is_finite());
        assert!((0.2..=0.5).contains(&hybrid));
    }

    #[test]
    fn test_no_genre_overlap_gets_neutral_not_zero() {
        let mut movie = full_movie();
        movie.genre_ids = vec![ROMANCE];
        let s = scorer();

        let unrelated = s.score_content(&movie, &action_prefs(1.0));
        let no_genres = s.score_content(&bare_movie(), &action_prefs(1.0));
        assert!(unrelated > 0.0);
        assert!((genre_alignment(&movie, &action_prefs(1.0)) - NEUTRAL_GENRE_SCORE).abs() < 1e-9);
        assert!(no_genres > 0.0);
    }

    #[test]
    fn test_genre_alignment_blends_best_and_average() {
        let mut movie = full_movie();
        movie.genre_ids = vec![ACTION, ROMANCE];
        // best 1.0, average (1.0 + 0.3) / 2
        let expected = 1.0 * 0.6 + 0.65 * 0.4;
        assert!((genre_alignment(&movie, &action_prefs(1.0)) - expected).abs() < 1e-9);
    }

    #[test]
    fn test_modest_but_consistent_history_still_favours_its_genre() {
        // Three Action ratings of 3.0 out of three: 0.6 + 0.3
        let prefs = action_prefs(0.9);
        let action = full_movie();
        let mut drama = full_movie();
        drama.genre_ids = vec![18];

        let s = scorer();
        let gap = s.score_content(&action, &prefs) - s.score_content(&drama, &prefs);
        assert!((gap - (0.9 - NEUTRAL_GENRE_SCORE) * GENRE_WEIGHT).abs() < 1e-9);
    }

    #[test]
    fn test_recency_uses_injected_year() {
        let movie = full_movie();
        let prefs = action_prefs(1.0);
        let now = CandidateScorer::new(&EngineConfig::default(), 2025)
            .score_content(&movie, &prefs);
        let later = CandidateScorer::new(&EngineConfig::default(), 2040)
            .score_content(&movie, &prefs);
        assert!((now - later - 0.6 * RECENCY_WEIGHT).abs() < 1e-9);
    }

    #[test]
    fn test_hybrid_is_weighted_blend() {
        let s = scorer();
        let prefs = action_prefs(0.7);
        for movie in [full_movie(), bare_movie()] {
            let expected = (s.score_content(&movie, &prefs) * 0.65
                + s.score_popularity(&movie) * 0.35)
                .clamp(0.0, 1.0);
            assert!((s.score_hybrid(&movie, &prefs) - expected).abs() < 1e-12);
        }
    }

    #[test]
    fn test_hostile_metadata_stays_in_range() {
        let s = scorer();
        let movies = [
            MovieMetrics {
                vote_average: Some(f64::NAN),
                popularity: Some(f64::INFINITY),
                ..full_movie()
            },
            MovieMetrics {
                vote_average: Some(-3.0),
                popularity: Some(-5.0),
                vote_count: Some(u32::MAX),
                release_date: Some("3000-01-01".to_string()),
                ..full_movie()
            },
            MovieMetrics {
                vote_average: Some(42.0),
                popularity: Some(1e12),
                release_date: Some("n/a".to_string()),
                ..bare_movie()
            },
        ];

        for movie in &movies {
            for score in [
                s.score_content(movie, &action_prefs(1.0)),
                s.score_popularity(movie),
                s.score_hybrid(movie, &action_prefs(1.0)),
            ] {
                assert!(score.is_finite(), "{:?} produced {}", movie, score);
                assert!((0.0..=1.0).contains(&score), "{:?} produced {}", movie, score);
            }
        }
    }
}
