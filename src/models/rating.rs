use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::MovieId;

pub const MIN_RATING: f64 = 0.0;
pub const MAX_RATING: f64 = 5.0;
pub const RATING_INCREMENT: f64 = 0.5;

/// Reasons a rating value is rejected
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum RatingError {
    #[error("rating {0} is below {MIN_RATING}")]
    TooLow(f64),
    #[error("rating {0} is above {MAX_RATING}")]
    TooHigh(f64),
    #[error("rating {0} is not a multiple of {RATING_INCREMENT}")]
    InvalidIncrement(f64),
}

/// A user's rating of a watched movie.
///
/// The value is always within [0.0, 5.0] and a multiple of 0.5; both
/// [`UserRating::new`] and deserialization enforce it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawUserRating")]
pub struct UserRating {
    movie_id: MovieId,
    rating: f64,
    watched_at: DateTime<Utc>,
}

impl UserRating {
    pub fn new(
        movie_id: MovieId,
        rating: f64,
        watched_at: DateTime<Utc>,
    ) -> Result<Self, RatingError> {
        validate_rating_value(rating)?;
        Ok(Self {
            movie_id,
            rating,
            watched_at,
        })
    }

    pub fn movie_id(&self) -> MovieId {
        self.movie_id
    }

    pub fn rating(&self) -> f64 {
        self.rating
    }

    pub fn watched_at(&self) -> DateTime<Utc> {
        self.watched_at
    }
}

/// Checks the range and the half-star step of a rating value
pub fn validate_rating_value(rating: f64) -> Result<(), RatingError> {
    if rating.is_nan() {
        return Err(RatingError::InvalidIncrement(rating));
    }
    if rating < MIN_RATING {
        return Err(RatingError::TooLow(rating));
    }
    if rating > MAX_RATING {
        return Err(RatingError::TooHigh(rating));
    }
    if (rating / RATING_INCREMENT).fract() != 0.0 {
        return Err(RatingError::InvalidIncrement(rating));
    }
    Ok(())
}

#[derive(Deserialize)]
struct RawUserRating {
    movie_id: MovieId,
    rating: f64,
    watched_at: DateTime<Utc>,
}

impl TryFrom<RawUserRating> for UserRating {
    type Error = RatingError;

    fn try_from(raw: RawUserRating) -> Result<Self, Self::Error> {
        UserRating::new(raw.movie_id, raw.rating, raw.watched_at)
    }
}
