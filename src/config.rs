use serde::Deserialize;
use std::path::PathBuf;

use crate::services::{matcher::MAX_RECOMMENDATIONS, similarity::VectorAlignment};

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// CSV file holding the cheese catalog
    #[serde(default = "default_catalog_path")]
    pub catalog_path: PathBuf,

    /// JSON file backing the user store
    #[serde(default = "default_users_path")]
    pub users_path: PathBuf,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// How query and cheese term vectors are aligned for cosine similarity
    #[serde(default)]
    pub similarity_alignment: VectorAlignment,

    /// Recommendations per request, between 1 and [`MAX_RECOMMENDATIONS`]
    #[serde(default = "default_max_results")]
    pub max_results: usize,

    /// Fixed seed for the presentation shuffle; OS entropy when unset
    #[serde(default)]
    pub shuffle_seed: Option<u64>,
}

fn default_catalog_path() -> PathBuf {
    PathBuf::from("data/cheeses.csv")
}

fn default_users_path() -> PathBuf {
    PathBuf::from("data/users.json")
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_max_results() -> usize {
    MAX_RECOMMENDATIONS
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let config = envy::from_env::<Config>()
            .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects settings that would break request-level guarantees
    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            (1..=MAX_RECOMMENDATIONS).contains(&self.max_results),
            "MAX_RESULTS must be between 1 and {}, got {}",
            MAX_RECOMMENDATIONS,
            self.max_results
        );
        Ok(())
    }

    /// Socket address the server binds to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
