use serde::Deserialize;
use std::path::Path;

use crate::{
    error::{AppError, AppResult},
    models::{MovieId, MovieMetrics},
    services::providers::{CandidateFeed, CandidateSource, MovieLookup},
};

/// Movies per "popular" page, matching TMDB's page size
pub const PAGE_SIZE: usize = 20;

/// Fixed, in-memory movie catalog
///
/// Used for offline runs and tests. The popular list is served in pages of
/// [`PAGE_SIZE`]; lookups search both lists.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StaticCatalog {
    #[serde(default)]
    popular: Vec<MovieMetrics>,
    #[serde(default)]
    trending: Vec<MovieMetrics>,
}

impl StaticCatalog {
    pub fn new(popular: Vec<MovieMetrics>, trending: Vec<MovieMetrics>) -> Self {
        Self { popular, trending }
    }

    /// Loads `{"popular": [...], "trending": [...]}` from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            AppError::Internal(format!("Failed to read catalog {}: {}", path.display(), e))
        })?;
        let catalog: StaticCatalog = serde_json::from_str(&json).map_err(|e| {
            AppError::Internal(format!("Failed to parse catalog {}: {}", path.display(), e))
        })?;

        tracing::info!(
            popular = catalog.popular.len(),
            trending = catalog.trending.len(),
            "Loaded static catalog"
        );

        Ok(catalog)
    }

    fn popular_page(&self, page: u32) -> Vec<MovieMetrics> {
        if page == 0 {
            return Vec::new();
        }
        self.popular
            .chunks(PAGE_SIZE)
            .nth(page as usize - 1)
            .map(<[MovieMetrics]>::to_vec)
            .unwrap_or_default()
    }
}

#[async_trait::async_trait]
impl MovieLookup for StaticCatalog {
    async fn fetch_movie_by_id(&self, id: MovieId) -> AppResult<Option<MovieMetrics>> {
        Ok(self
            .popular
            .iter()
            .chain(self.trending.iter())
            .find(|movie| movie.id == id)
            .cloned())
    }
}

#[async_trait::async_trait]
impl CandidateSource for StaticCatalog {
    async fn fetch_candidates(&self, feed: CandidateFeed) -> AppResult<Vec<MovieMetrics>> {
        Ok(match feed {
            CandidateFeed::Popular { page } => self.popular_page(page),
            CandidateFeed::Trending => self.trending.clone(),
        })
    }
}
