//! Collaborators the recommendation engine pulls its data from
//!
//! Each trait is one capability: rating history, single-movie lookup, or
//! candidate feeds. Implementations own the conversion from whatever ids their
//! backing store uses to the canonical `MovieId`.

use serde::Serialize;
use std::fmt::Display;

use crate::{
    error::AppResult,
    models::{MovieId, MovieMetrics, UserRating},
};

pub mod catalog;
pub mod ratings;
pub mod tmdb;

pub use catalog::StaticCatalog;
pub use ratings::InMemoryRatingStore;
pub use tmdb::TmdbProvider;

/// A list the candidate pool is drawn from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CandidateFeed {
    /// One page of the "popular" list, 1-based
    Popular { page: u32 },
    /// This week's trending movies
    Trending,
}

impl Display for CandidateFeed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CandidateFeed::Popular { page } => write!(f, "popular:{}", page),
            CandidateFeed::Trending => write!(f, "trending"),
        }
    }
}

/// The user's rating history
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait RatingSource: Send + Sync {
    async fn fetch_all_ratings(&self) -> AppResult<Vec<UserRating>>;
}

/// Movie metadata by canonical id
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait MovieLookup: Send + Sync {
    /// Returns `Ok(None)` when the id is unknown to the provider
    async fn fetch_movie_by_id(&self, id: MovieId) -> AppResult<Option<MovieMetrics>>;
}

/// Lists of movies to recommend from
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait CandidateSource: Send + Sync {
    async fn fetch_candidates(&self, feed: CandidateFeed) -> AppResult<Vec<MovieMetrics>>;
}
