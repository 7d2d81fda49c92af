use std::sync::Arc;

use cinerank::{
    routes::{create_router, AppState},
    services::{
        providers::{
            CandidateSource, InMemoryRatingStore, MovieLookup, RatingSource, StaticCatalog,
            TmdbProvider,
        },
        recommendations::RecommendationEngine,
    },
    Config,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cinerank=info,tower_http=info".into()),
        )
        .init();

    let config = Config::from_env()?;
    let engine_config = config.engine()?;

    // Movie metadata: TMDB when a key is configured, otherwise a local catalog
    let (movies, candidates): (Arc<dyn MovieLookup>, Arc<dyn CandidateSource>) =
        match (&config.tmdb_api_key, &config.catalog_file) {
            (Some(api_key), _) => {
                tracing::info!(api_url = %config.tmdb_api_url, "Using TMDB provider");
                let tmdb = Arc::new(TmdbProvider::new(
                    api_key.clone(),
                    config.tmdb_api_url.clone(),
                ));
                let movies: Arc<dyn MovieLookup> = tmdb.clone();
                let candidates: Arc<dyn CandidateSource> = tmdb;
                (movies, candidates)
            }
            (None, Some(path)) => {
                tracing::info!(path = %path, "Using static catalog");
                let catalog = Arc::new(StaticCatalog::from_file(path)?);
                let movies: Arc<dyn MovieLookup> = catalog.clone();
                let candidates: Arc<dyn CandidateSource> = catalog;
                (movies, candidates)
            }
            (None, None) => {
                anyhow::bail!("Set TMDB_API_KEY or CATALOG_FILE to provide movie metadata")
            }
        };

    let ratings = Arc::new(match &config.ratings_file {
        Some(path) => InMemoryRatingStore::from_file(path)?,
        None => InMemoryRatingStore::new(),
    });
    let rating_source: Arc<dyn RatingSource> = ratings.clone();

    let engine = RecommendationEngine::new(rating_source, movies, candidates, engine_config);

    let state = Arc::new(AppState {
        engine: Arc::new(engine),
        ratings,
        default_limit: config.default_limit,
        max_limit: config.max_limit,
    });

    let app = create_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server running");
    axum::serve(listener, app).await?;

    Ok(())
}
