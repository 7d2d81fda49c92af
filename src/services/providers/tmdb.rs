//! TMDB (The Movie Database) provider
//!
//! Serves single-movie lookups and the popular/trending candidate feeds from
//! TMDB's v3 REST API. TMDB movie ids are the canonical `MovieId`, so no id
//! translation happens here.
//!
//! API Flow:
//! 1. Candidates: /movie/popular?page=N and /trending/movie/week
//! 2. Lookup: /movie/{id} (genres arrive as objects and are flattened to ids)

use reqwest::{Client as HttpClient, StatusCode};
use serde::de::DeserializeOwned;

use crate::{
    error::{AppError, AppResult},
    models::{MovieId, MovieMetrics, TmdbMovieDetails, TmdbPage},
    services::providers::{CandidateFeed, CandidateSource, MovieLookup},
};

const TRENDING_WINDOW: &str = "week";

#[derive(Clone)]
pub struct TmdbProvider {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
}

impl TmdbProvider {
    pub fn new(api_key: String, api_url: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_key,
            api_url: api_url.trim_end_matches('/').to_string(),
        }
    }

    /// Path and page parameter for a candidate feed
    fn feed_request(feed: CandidateFeed) -> (String, Option<u32>) {
        match feed {
            CandidateFeed::Popular { page } => ("/movie/popular".to_string(), Some(page)),
            CandidateFeed::Trending => (format!("/trending/movie/{}", TRENDING_WINDOW), None),
        }
    }

    /// Issues a GET and decodes the body; `Ok(None)` on 404
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        page: Option<u32>,
    ) -> AppResult<Option<T>> {
        let url = format!("{}{}", self.api_url, path);

        let mut request = self
            .http_client
            .get(&url)
            .query(&[("api_key", self.api_key.as_str())]);
        if let Some(page) = page {
            request = request.query(&[("page", page)]);
        }

        let response = request.send().await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!(
                path = %path,
                status = %status,
                body = %body,
                "TMDB request failed"
            );
            return Err(AppError::ExternalApi(format!(
                "TMDB API returned status {}: {}",
                status, body
            )));
        }

        let body = response.text().await?;
        let parsed = serde_json::from_str(&body).map_err(|e| {
            tracing::error!(error = %e, path = %path, "Failed to deserialize TMDB response");
            AppError::ExternalApi(format!("Failed to parse TMDB response: {}", e))
        })?;

        Ok(Some(parsed))
    }
}

#[async_trait::async_trait]
impl MovieLookup for TmdbProvider {
    async fn fetch_movie_by_id(&self, id: MovieId) -> AppResult<Option<MovieMetrics>> {
        let details: Option<TmdbMovieDetails> =
            self.get_json(&format!("/movie/{}", id), None).await?;

        if details.is_none() {
            tracing::debug!(movie_id = %id, "Movie not found on TMDB");
        }

        Ok(details.map(MovieMetrics::from))
    }
}

#[async_trait::async_trait]
impl CandidateSource for TmdbProvider {
    async fn fetch_candidates(&self, feed: CandidateFeed) -> AppResult<Vec<MovieMetrics>> {
        let (path, page) = Self::feed_request(feed);

        let movies: Vec<MovieMetrics> = self
            .get_json::<TmdbPage>(&path, page)
            .await?
            .map(|page| page.results.into_iter().map(MovieMetrics::from).collect())
            .unwrap_or_default();

        tracing::info!(
            feed = %feed,
            results = movies.len(),
            provider = "tmdb",
            "Candidate feed fetched"
        );

        Ok(movies)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_trims_trailing_slash() {
        let provider = TmdbProvider::new("key".to_string(), "https://api.example/3/".to_string());
        assert_eq!(provider.api_url, "https://api.example/3");
    }

    #[test]
    fn test_popular_feed_request() {
        let (path, page) = TmdbProvider::feed_request(CandidateFeed::Popular { page: 2 });
        assert_eq!(path, "/movie/popular");
        assert_eq!(page, Some(2));
    }

    #[test]
    fn test_trending_feed_request() {
        let (path, page) = TmdbProvider::feed_request(CandidateFeed::Trending);
        assert_eq!(path, "/trending/movie/week");
        assert_eq!(page, None);
    }

    #[test]
    fn test_page_deserialization() {
        let json = r#"{
            "page": 1,
            "results": [
                {"id": 693134, "title": "Dune: Part Two", "genre_ids": [878, 12], "vote_average": 8.2, "vote_count": 5200, "popularity": 410.3, "release_date": "2024-02-27"},
                {"id": 1011985, "title": "Kung Fu Panda 4", "genre_ids": [16, 28]}
            ],
            "total_pages": 500,
            "total_results": 10000
        }"#;

        let page: TmdbPage = serde_json::from_str(json).unwrap();
        assert_eq!(page.page, 1);
        assert_eq!(page.total_pages, 500);

        let movies: Vec<MovieMetrics> = page.results.into_iter().map(MovieMetrics::from).collect();
        assert_eq!(movies.len(), 2);
        assert_eq!(movies[0].id, MovieId(693134));
        assert_eq!(movies[1].vote_average, None);
    }
}
