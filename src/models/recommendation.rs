use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::PreferenceQuery;

/// A single ranked recommendation returned to the client
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationResult {
    pub cheese_name: String,
    /// Relative URL of the cheese detail route
    pub url: String,
    /// Full normalized attribute snapshot of the recommended cheese
    pub attributes: BTreeMap<String, String>,
    /// `"attribute: value"` for every declared preference the cheese shares
    pub shared_attributes: Vec<String>,
    /// Cosine similarity between the query and the cheese's feature text
    pub similarity: f64,
}

/// Response body of the recommendation endpoint
#[derive(Debug, Serialize)]
pub struct RecommendationResponse {
    pub preferences: PreferenceQuery,
    pub recommendations: Vec<RecommendationResult>,
}
