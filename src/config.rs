use serde::Deserialize;

use crate::{error::AppResult, services::recommendations::EngineConfig};

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// TMDB v3 API key; without it the service runs from `catalog_file`
    #[serde(default)]
    pub tmdb_api_key: Option<String>,

    /// TMDB API base URL
    #[serde(default = "default_tmdb_api_url")]
    pub tmdb_api_url: String,

    /// JSON movie catalog used when no TMDB key is configured
    #[serde(default)]
    pub catalog_file: Option<String>,

    /// JSON array of ratings to seed the rating history with
    #[serde(default)]
    pub ratings_file: Option<String>,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Share of the content score in the hybrid score
    #[serde(default = "default_content_weight")]
    pub content_weight: f64,

    /// Share of the popularity score in the hybrid score
    #[serde(default = "default_popularity_weight")]
    pub popularity_weight: f64,

    /// Minimum rating that counts a movie as liked
    #[serde(default = "default_min_rating_threshold")]
    pub min_rating_threshold: f64,

    /// Recommendations returned when the request gives no limit
    #[serde(default = "default_limit")]
    pub default_limit: usize,

    /// Largest limit a request may ask for
    #[serde(default = "default_max_limit")]
    pub max_limit: usize,
}

fn default_tmdb_api_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_content_weight() -> f64 {
    0.65
}

fn default_popularity_weight() -> f64 {
    0.35
}

fn default_min_rating_threshold() -> f64 {
    3.5
}

fn default_limit() -> usize {
    20
}

fn default_max_limit() -> usize {
    100
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    /// Validated engine parameters
    pub fn engine(&self) -> AppResult<EngineConfig> {
        EngineConfig {
            content_weight: self.content_weight,
            popularity_weight: self.popularity_weight,
            min_rating_threshold: self.min_rating_threshold,
            ..EngineConfig::default()
        }
        .validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn from_pairs(pairs: &[(&str, &str)]) -> Config {
        envy::from_iter::<_, Config>(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string())),
        )
        .unwrap()
    }

    #[test]
    fn test_defaults() {
        let config = from_pairs(&[]);
        assert_eq!(config.port, 3000);
        assert_eq!(config.tmdb_api_key, None);
        assert_eq!(config.default_limit, 20);
        assert_eq!(config.engine().unwrap(), EngineConfig::default());
    }

    #[test]
    fn test_weight_overrides() {
        let config = from_pairs(&[
            ("CONTENT_WEIGHT", "0.8"),
            ("POPULARITY_WEIGHT", "0.2"),
            ("MIN_RATING_THRESHOLD", "4.0"),
        ]);
        let engine = config.engine().unwrap();
        assert_eq!(engine.content_weight, 0.8);
        assert_eq!(engine.popularity_weight, 0.2);
        assert_eq!(engine.min_rating_threshold, 4.0);
    }

    #[test]
    fn test_unbalanced_weights_are_rejected() {
        let config = from_pairs(&[("CONTENT_WEIGHT", "0.9")]);
        assert!(config.engine().is_err());
    }
}
