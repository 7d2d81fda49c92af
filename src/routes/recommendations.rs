use axum::{
    extract::{Query, State},
    Extension, Json,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    middleware::request_id::RequestId,
    routes::AppState,
    services::recommendations::RecommendationSet,
};

#[derive(Debug, Deserialize)]
pub struct RecommendationQuery {
    pub limit: Option<usize>,
}

/// Handler for recommendations endpoint
pub async fn recommend(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    Query(query): Query<RecommendationQuery>,
) -> AppResult<Json<RecommendationSet>> {
    let limit = query.limit.unwrap_or(state.default_limit);
    if limit == 0 || limit > state.max_limit {
        return Err(AppError::InvalidInput(format!(
            "limit must be between 1 and {}",
            state.max_limit
        )));
    }

    tracing::info!(
        request_id = %request_id,
        limit = limit,
        "Processing recommendation request"
    );

    let set = state.engine.generate(limit).await;

    if set.is_partial() {
        tracing::warn!(
            request_id = %request_id,
            failures = ?set.failures,
            "Recommendations built from partial data"
        );
    }

    Ok(Json(set))
}
