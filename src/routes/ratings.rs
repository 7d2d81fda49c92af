use axum::{extract::State, http::StatusCode, Json};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::sync::Arc;

use crate::{
    error::AppResult,
    models::{MovieId, UserRating},
    routes::AppState,
    services::providers::ratings::StoredRating,
};

#[derive(Debug, Deserialize)]
pub struct CreateRatingRequest {
    pub movie_id: MovieId,
    pub rating: f64,
    /// Defaults to now
    pub watched_at: Option<DateTime<Utc>>,
}

/// Records a rating; the value must be 0.0-5.0 in half steps
pub async fn create(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CreateRatingRequest>,
) -> AppResult<(StatusCode, Json<StoredRating>)> {
    let rating = UserRating::new(
        request.movie_id,
        request.rating,
        request.watched_at.unwrap_or_else(Utc::now),
    )?;

    let stored = state.ratings.add(rating).await;
    Ok((StatusCode::CREATED, Json(stored)))
}

/// Lists the rating history in insertion order
pub async fn list(State(state): State<Arc<AppState>>) -> Json<Vec<StoredRating>> {
    Json(state.ratings.list().await)
}
