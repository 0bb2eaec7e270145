use std::sync::Arc;

use anyhow::Context;
use rand::{rngs::StdRng, SeedableRng};
use tracing_subscriber::EnvFilter;

use cheese_api::{
    api::{create_router, AppState},
    catalog::{load_catalog, CsvCatalogSource},
    config::Config,
    services::{FileUserStore, UserStore},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("cheese_api=info,tower_http=info")),
        )
        .init();

    let config = Config::from_env()?;

    // The catalog must be fully loaded before any request is served
    let source = CsvCatalogSource::new(&config.catalog_path);
    let catalog = load_catalog(&source, config.similarity_alignment)
        .await
        .with_context(|| format!("Failed to load catalog from {}", source.path().display()))?;

    let users = FileUserStore::open(&config.users_path)
        .await
        .with_context(|| format!("Failed to open user store at {}", config.users_path.display()))?;
    tracing::info!(store = users.name(), path = %users.path().display(), "User store ready");

    let rng = match config.shuffle_seed {
        Some(seed) => {
            tracing::info!(seed, "Using seeded shuffle");
            StdRng::seed_from_u64(seed)
        }
        None => StdRng::from_os_rng(),
    };

    let state = AppState::with_rng(catalog, Arc::new(users), rng)
        .with_max_results(config.max_results);

    let app = create_router(state);

    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {}", address))?;
    tracing::info!(address = %address, "Server running");
    axum::serve(listener, app).await?;

    Ok(())
}
