use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    error::{AppError, AppResult},
    middleware::request_id::RequestId,
    models::{
        cheese::cheese_url, CheeseRecord, Credentials, PreferenceQuery, RecommendationResponse,
    },
    services::{group_by_attribute, GroupIndex, PreferenceMatcher},
};

use super::AppState;

// Request/Response types

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub cheeses: usize,
    pub loaded_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct GroupRequest {
    #[serde(default)]
    pub attribute: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupResponse {
    pub attribute: String,
    pub grouped_cheeses: GroupIndex,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheeseUrlRequest {
    #[serde(default)]
    pub cheese_name: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheeseUrlResponse {
    pub cheese_name: String,
    pub url: String,
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: String,
}

// Handlers

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        cheeses: state.catalog.len(),
        loaded_at: state.catalog.loaded_at(),
    })
}

/// Recommend cheeses for a set of attribute preferences
pub async fn recommend(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Json(preferences): Json<PreferenceQuery>,
) -> Json<RecommendationResponse> {
    tracing::info!(
        request_id = %request_id,
        query = %preferences.query_text(),
        "Processing recommendation request"
    );

    let matcher = PreferenceMatcher::new(&state.catalog).with_limit(state.max_results);
    let mut rng = state.request_rng().await;
    let recommendations = matcher.recommend(&preferences, &mut rng);

    tracing::info!(
        request_id = %request_id,
        results = recommendations.len(),
        "Recommendation completed"
    );

    Json(RecommendationResponse {
        preferences,
        recommendations,
    })
}

/// Group the catalog by one attribute
pub async fn group(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Json(request): Json<GroupRequest>,
) -> AppResult<Json<GroupResponse>> {
    let attribute = request
        .attribute
        .map(|attribute| attribute.trim().to_string())
        .filter(|attribute| !attribute.is_empty())
        .ok_or_else(|| AppError::InvalidInput("Attribute is required".to_string()))?;

    tracing::info!(request_id = %request_id, attribute = %attribute, "Processing group request");

    let grouped_cheeses = group_by_attribute(&state.catalog, &attribute)?;

    Ok(Json(GroupResponse {
        attribute,
        grouped_cheeses,
    }))
}

/// Look up a single cheese by its URL slug
pub async fn get_cheese(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<Json<CheeseRecord>> {
    state
        .catalog
        .find_by_slug(&slug)
        .cloned()
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Cheese '{}' not found", slug)))
}

/// Build the detail URL for a cheese name
pub async fn generate_cheese_url(
    Json(request): Json<CheeseUrlRequest>,
) -> AppResult<Json<CheeseUrlResponse>> {
    let cheese_name = request
        .cheese_name
        .filter(|name| !name.trim().is_empty())
        .ok_or_else(|| AppError::InvalidInput("Cheese name is required".to_string()))?;

    let url = cheese_url(&cheese_name);
    tracing::debug!(cheese = %cheese_name, url = %url, "Generated cheese URL");

    Ok(Json(CheeseUrlResponse { cheese_name, url }))
}

/// Create an account
pub async fn register(
    State(state): State<AppState>,
    Json(credentials): Json<Credentials>,
) -> AppResult<(StatusCode, Json<StatusResponse>)> {
    if let Err(e) = state.users.register(&credentials).await {
        tracing::warn!(username = %credentials.username, error = %e, "Registration rejected");
        return Err(e);
    }

    tracing::info!(username = %credentials.username, store = state.users.name(), "User registered");

    Ok((
        StatusCode::CREATED,
        Json(StatusResponse {
            status: "User registered successfully.".to_string(),
        }),
    ))
}

/// Check a username/password pair
pub async fn login(
    State(state): State<AppState>,
    Json(credentials): Json<Credentials>,
) -> AppResult<Json<StatusResponse>> {
    if !state.users.authenticate(&credentials).await? {
        tracing::warn!(username = %credentials.username, "Login failed");
        return Err(AppError::Unauthorized(
            "Invalid username or password.".to_string(),
        ));
    }

    tracing::info!(username = %credentials.username, "Login successful");

    Ok(Json(StatusResponse {
        status: "Login successful.".to_string(),
    }))
}
