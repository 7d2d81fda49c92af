use crate::models::MovieMetrics;

use super::preferences::GenrePreferenceMap;

/// A genre preference above this counts as a strong genre match
pub const STRONG_GENRE_PREFERENCE: f64 = 0.6;
/// Vote average at which a movie counts as critically acclaimed
pub const ACCLAIMED_VOTE_AVERAGE: f64 = 7.5;
/// Vote count at which a movie counts as popular
pub const POPULAR_VOTE_COUNT: u32 = 1000;

pub const PERFECT_MATCH: &str = "Perfect match for your taste in highly-rated films";
pub const ACCLAIMED_MATCH: &str = "Critically acclaimed film matching your preferences";
pub const STRONG_GENRE_MATCH: &str = "Strong match based on genres you love";
pub const POPULAR_MATCH: &str = "Popular film that aligns with your tastes";
pub const GOOD_MATCH: &str = "Good match for what you typically enjoy";
pub const WORTH_EXPLORING: &str = "Worth exploring based on your viewing history";
pub const HIGHLY_RATED_DISCOVERY: &str = "Highly-rated film you might discover";
pub const BROADEN_HORIZONS: &str = "Trending choice to broaden your horizons";

/// Every reason a personalized recommendation can carry
pub const PERSONALIZED_REASONS: [&str; 8] = [
    PERFECT_MATCH,
    ACCLAIMED_MATCH,
    STRONG_GENRE_MATCH,
    POPULAR_MATCH,
    GOOD_MATCH,
    WORTH_EXPLORING,
    HIGHLY_RATED_DISCOVERY,
    BROADEN_HORIZONS,
];

pub const ACCLAIMED_AND_POPULAR: &str = "Critically acclaimed and highly popular";
pub const HIGHLY_RATED_WORLDWIDE: &str = "Highly rated by viewers worldwide";
pub const ENTHUSIAST_CHOICE: &str = "Popular choice among movie enthusiasts";
pub const TRENDING_DISCOVERY: &str = "Trending movie worth discovering";

/// Every reason a cold-start recommendation can carry
pub const POPULARITY_REASONS: [&str; 4] = [
    ACCLAIMED_AND_POPULAR,
    HIGHLY_RATED_WORLDWIDE,
    ENTHUSIAST_CHOICE,
    TRENDING_DISCOVERY,
];

/// Explains a personalized score. The most specific template whose
/// conditions hold wins; the last one accepts everything.
pub fn personalized_reason(
    movie: &MovieMetrics,
    preferences: &GenrePreferenceMap,
    score: f64,
) -> &'static str {
    let percentage = (score * 100.0).floor();

    let strong_genre = movie
        .genre_ids
        .iter()
        .filter_map(|genre| preferences.get(*genre))
        .any(|preference| preference > STRONG_GENRE_PREFERENCE);
    let acclaimed = movie.vote_average.unwrap_or(0.0) >= ACCLAIMED_VOTE_AVERAGE;
    let popular = movie.vote_count.unwrap_or(0) >= POPULAR_VOTE_COUNT;

    match percentage {
        p if p >= 90.0 && strong_genre => PERFECT_MATCH,
        p if p >= 85.0 && acclaimed => ACCLAIMED_MATCH,
        p if p >= 80.0 && strong_genre => STRONG_GENRE_MATCH,
        p if p >= 75.0 && popular => POPULAR_MATCH,
        p if p >= 70.0 => GOOD_MATCH,
        p if p >= 60.0 => WORTH_EXPLORING,
        p if p >= 50.0 && acclaimed => HIGHLY_RATED_DISCOVERY,
        _ => BROADEN_HORIZONS,
    }
}

/// Explains a cold-start pick from the movie's crowd metrics alone
pub fn popularity_reason(movie: &MovieMetrics) -> &'static str {
    let vote_average = movie.vote_average.unwrap_or(0.0);
    let vote_count = movie.vote_count.unwrap_or(0);

    if vote_average >= 8.0 {
        ACCLAIMED_AND_POPULAR
    } else if vote_average >= 7.0 {
        HIGHLY_RATED_WORLDWIDE
    } else if vote_count >= 5000 {
        ENTHUSIAST_CHOICE
    } else {
        TRENDING_DISCOVERY
    }
}
