use serde::Serialize;
use std::path::Path;
use tokio::sync::RwLock;

use crate::{
    error::{AppError, AppResult},
    models::UserRating,
    services::providers::RatingSource,
};

/// A rating as held by the store, keyed by its own row id
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoredRating {
    /// Storage row id; unrelated to the movie's id
    pub id: i64,
    #[serde(flatten)]
    pub rating: UserRating,
}

/// Rating history kept in memory
///
/// Rows get sequential storage ids starting at 1. Only the rating itself,
/// keyed by `MovieId`, crosses the [`RatingSource`] boundary.
#[derive(Debug, Default)]
pub struct InMemoryRatingStore {
    rows: RwLock<Vec<StoredRating>>,
}

impl InMemoryRatingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ratings(ratings: Vec<UserRating>) -> Self {
        let rows = ratings
            .into_iter()
            .enumerate()
            .map(|(i, rating)| StoredRating {
                id: i as i64 + 1,
                rating,
            })
            .collect();
        Self {
            rows: RwLock::new(rows),
        }
    }

    /// Loads a JSON array of ratings; every entry is validated
    pub fn from_file(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            AppError::Internal(format!("Failed to read ratings {}: {}", path.display(), e))
        })?;
        let ratings: Vec<UserRating> = serde_json::from_str(&json).map_err(|e| {
            AppError::InvalidInput(format!("Failed to parse ratings {}: {}", path.display(), e))
        })?;

        tracing::info!(count = ratings.len(), "Loaded rating history");

        Ok(Self::with_ratings(ratings))
    }

    /// Appends a rating and returns the stored row
    pub async fn add(&self, rating: UserRating) -> StoredRating {
        let mut rows = self.rows.write().await;
        let id = rows.last().map_or(1, |row| row.id + 1);
        let stored = StoredRating { id, rating };
        rows.push(stored.clone());

        tracing::debug!(
            rating_id = id,
            movie_id = %stored.rating.movie_id(),
            value = stored.rating.rating(),
            "Rating stored"
        );

        stored
    }

    pub async fn list(&self) -> Vec<StoredRating> {
        self.rows.read().await.clone()
    }
}

#[async_trait::async_trait]
impl RatingSource for InMemoryRatingStore {
    async fn fetch_all_ratings(&self) -> AppResult<Vec<UserRating>> {
        Ok(self
            .rows
            .read()
            .await
            .iter()
            .map(|row| row.rating.clone())
            .collect())
    }
}
