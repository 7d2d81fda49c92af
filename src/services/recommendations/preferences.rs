use std::collections::{BTreeSet, HashMap};

use super::FetchFailure;
use crate::{
    models::{GenreId, UserRating},
    services::providers::MovieLookup,
};

/// Score assumed for a genre the user has never rated.
///
/// Missing genres are "no signal", not dislike, so they sit between the
/// lowest and the typical derived preference.
pub const NEUTRAL_GENRE_SCORE: f64 = 0.3;

/// Upper bound on the bonus a genre earns for making up a large share of the
/// rating history
pub const MAX_FREQUENCY_BONUS: f64 = 0.3;

const MAX_RATING: f64 = 5.0;

/// Genre id → preference in [0.0, 1.0], derived fresh for every request.
///
/// Genres with no observations are absent rather than stored as 0.0.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenrePreferenceMap(HashMap<GenreId, f64>);

impl GenrePreferenceMap {
    pub fn get(&self, genre: GenreId) -> Option<f64> {
        self.0.get(&genre).copied()
    }

    /// Preference for `genre`, or [`NEUTRAL_GENRE_SCORE`] if it was never rated
    pub fn score_or_neutral(&self, genre: GenreId) -> f64 {
        self.get(genre).unwrap_or(NEUTRAL_GENRE_SCORE)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

}

impl FromIterator<(GenreId, f64)> for GenrePreferenceMap {
    fn from_iter<I: IntoIterator<Item = (GenreId, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Derives genre preferences from a rating history.
///
/// Each rated movie is resolved through `movies`; ratings whose movie cannot
/// be resolved contribute nothing but still count toward the history size
/// used for the frequency bonus. Failed lookups are recorded in `failures`;
/// movies the lookup does not know are not.
pub async fn compute_preferences(
    ratings: &[UserRating],
    movies: &dyn MovieLookup,
    failures: &mut Vec<FetchFailure>,
) -> GenrePreferenceMap {
    let mut observations = Vec::with_capacity(ratings.len());

    for rating in ratings {
        match movies.fetch_movie_by_id(rating.movie_id()).await {
            Ok(Some(movie)) => observations.push((movie.genre_ids, rating.rating())),
            Ok(None) => {
                tracing::debug!(movie_id = %rating.movie_id(), "Rated movie not found, skipping");
            }
            Err(e) => {
                tracing::warn!(
                    movie_id = %rating.movie_id(),
                    error = %e,
                    "Rated movie lookup failed, skipping"
                );
                failures.push(FetchFailure::MovieLookup(rating.movie_id()));
            }
        }
    }

    let preferences = preferences_from_observations(&observations, ratings.len());

    tracing::debug!(
        ratings = ratings.len(),
        resolved = observations.len(),
        genres = preferences.len(),
        "Genre preferences computed"
    );

    preferences
}

/// `preference(g) = clamp01(avg(g) / 5 + clamp(count(g) / total_ratings, 0, 0.3))`
pub fn preferences_from_observations(
    observations: &[(Vec<GenreId>, f64)],
    total_ratings: usize,
) -> GenrePreferenceMap {
    if total_ratings == 0 {
        return GenrePreferenceMap::default();
    }

    // genre -> (sum of ratings, count)
    let mut tallies: HashMap<GenreId, (f64, usize)> = HashMap::new();
    for (genres, rating) in observations {
        let unique: BTreeSet<GenreId> = genres.iter().copied().collect();
        for genre in unique {
            let tally = tallies.entry(genre).or_insert((0.0, 0));
            tally.0 += rating;
            tally.1 += 1;
        }
    }

    tallies
        .into_iter()
        .map(|(genre, (sum, count))| {
            let average = sum / count as f64;
            let frequency_bonus =
                (count as f64 / total_ratings as f64).clamp(0.0, MAX_FREQUENCY_BONUS);
            let score = (average / MAX_RATING + frequency_bonus).clamp(0.0, 1.0);
            (genre, score)
        })
        .collect()
}
