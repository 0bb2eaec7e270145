use std::sync::Arc;

use rand::{rngs::StdRng, SeedableRng};
use tokio::sync::Mutex;

use crate::{
    catalog::Catalog,
    services::{matcher::MAX_RECOMMENDATIONS, InMemoryUserStore, UserStore},
};

/// Shared application state
///
/// The catalog is read-only once loaded; only the shuffle source and the
/// user store hold mutable state.
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<Catalog>,
    pub users: Arc<dyn UserStore>,
    pub rng: Arc<Mutex<StdRng>>,
    pub max_results: usize,
}

impl AppState {
    /// Creates state with an explicit shuffle source
    pub fn with_rng(catalog: Catalog, users: Arc<dyn UserStore>, rng: StdRng) -> Self {
        Self {
            catalog: Arc::new(catalog),
            users,
            rng: Arc::new(Mutex::new(rng)),
            max_results: MAX_RECOMMENDATIONS,
        }
    }

    /// State backed by an in-memory user store and a seeded shuffle
    pub fn in_memory(catalog: Catalog, seed: u64) -> Self {
        Self::with_rng(
            catalog,
            Arc::new(InMemoryUserStore::new()),
            StdRng::seed_from_u64(seed),
        )
    }

    /// Lowers the per-request result count, capped at [`MAX_RECOMMENDATIONS`]
    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results.min(MAX_RECOMMENDATIONS);
        self
    }

    /// Forks a generator for one request from the shared shuffle source
    ///
    /// The shared lock is released before this returns, so concurrent
    /// requests only contend for the seeding step.
    pub async fn request_rng(&self) -> StdRng {
        StdRng::from_rng(&mut *self.rng.lock().await)
    }
}
