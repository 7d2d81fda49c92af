use serde::{Deserialize, Serialize};
use std::fmt::Display;

mod rating;
mod recommendation;

pub use rating::{validate_rating_value, RatingError, UserRating};
pub use recommendation::Recommendation;

/// Genre identifier as issued by TMDB (e.g. 28 = Action)
pub type GenreId = u32;

/// Canonical movie identity (the TMDB movie id).
///
/// Collaborators that key movies any other way convert to this at their
/// boundary; scoring and the already-watched filter only compare `MovieId`s.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MovieId(pub u32);

impl Display for MovieId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The metadata the engine scores a movie on
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieMetrics {
    pub id: MovieId,
    pub title: String,
    #[serde(default)]
    pub genre_ids: Vec<GenreId>,
    /// Average rating on TMDB's 0-10 scale
    #[serde(default)]
    pub vote_average: Option<f64>,
    #[serde(default)]
    pub vote_count: Option<u32>,
    #[serde(default)]
    pub popularity: Option<f64>,
    /// `YYYY-MM-DD`, as TMDB returns it
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
}

impl MovieMetrics {
    /// Creates a movie with every optional field absent
    pub fn new(id: MovieId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            genre_ids: Vec::new(),
            vote_average: None,
            vote_count: None,
            popularity: None,
            release_date: None,
            poster_path: None,
        }
    }

    /// Year parsed from the first four characters of the release date
    pub fn release_year(&self) -> Option<i32> {
        self.release_date
            .as_deref()
            .and_then(|date| date.get(..4))
            .and_then(|year| year.parse().ok())
    }
}

// ============================================================================
// TMDB API Types
// ============================================================================

/// One page of a TMDB list endpoint (`/movie/popular`, `/trending/movie/week`)
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbPage {
    pub page: u32,
    pub results: Vec<TmdbMovie>,
    #[serde(default)]
    pub total_pages: u32,
}

/// Movie entry in a TMDB list response
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbMovie {
    pub id: u32,
    pub title: String,
    #[serde(default)]
    pub genre_ids: Vec<GenreId>,
    #[serde(default)]
    pub vote_average: Option<f64>,
    #[serde(default)]
    pub vote_count: Option<u32>,
    #[serde(default)]
    pub popularity: Option<f64>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
}

/// Response of TMDB `/movie/{id}`; genres come as objects, not ids
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbMovieDetails {
    pub id: u32,
    pub title: String,
    #[serde(default)]
    pub genres: Vec<TmdbGenre>,
    #[serde(default)]
    pub vote_average: Option<f64>,
    #[serde(default)]
    pub vote_count: Option<u32>,
    #[serde(default)]
    pub popularity: Option<f64>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TmdbGenre {
    pub id: GenreId,
    pub name: String,
}

/// TMDB sends `""` for unknown release dates
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

impl From<TmdbMovie> for MovieMetrics {
    fn from(movie: TmdbMovie) -> Self {
        MovieMetrics {
            id: MovieId(movie.id),
            title: movie.title,
            genre_ids: movie.genre_ids,
            vote_average: movie.vote_average,
            vote_count: movie.vote_count,
            popularity: movie.popularity,
            release_date: non_empty(movie.release_date),
            poster_path: movie.poster_path,
        }
    }
}

impl From<TmdbMovieDetails> for MovieMetrics {
    fn from(details: TmdbMovieDetails) -> Self {
        MovieMetrics {
            id: MovieId(details.id),
            title: details.title,
            genre_ids: details.genres.into_iter().map(|g| g.id).collect(),
            vote_average: details.vote_average,
            vote_count: details.vote_count,
            popularity: details.popularity,
            release_date: non_empty(details.release_date),
            poster_path: details.poster_path,
        }
    }
}
