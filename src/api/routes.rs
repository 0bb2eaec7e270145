use axum::{
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::request_id::{make_span_with_request_id, request_id_middleware};

use super::handlers;
use super::AppState;

/// Creates the main API router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        // Recommendation and grouping
        .route("/recommend", post(handlers::recommend))
        .route("/group", post(handlers::group))
        // Cheese detail links
        .route("/cheese/:slug", get(handlers::get_cheese))
        .route("/generate-cheese-url", post(handlers::generate_cheese_url))
        // Accounts
        .route("/register", post(handlers::register))
        .route("/login", post(handlers::login))
        .layer(
            ServiceBuilder::new()
                .layer(axum::middleware::from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
