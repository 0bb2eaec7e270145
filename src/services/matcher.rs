use rand::{seq::SliceRandom, Rng};
use tracing::instrument;

use crate::{
    catalog::Catalog,
    models::{cheese::CRITICAL_ATTRIBUTES, CheeseRecord, PreferenceQuery, RecommendationResult},
};

/// Upper bound on recommendations returned per request
pub const MAX_RECOMMENDATIONS: usize = 5;

/// Preferences matched by substring containment
const CONTAINMENT_FILTERS: [&str; 2] = ["milk", "type"];

/// Preferences matched against the split parts of a multi-valued attribute
const MEMBERSHIP_FILTERS: [&str; 2] = ["texture", "flavor"];

/// Recommends cheeses from a catalog according to attribute preferences
pub struct PreferenceMatcher<'a> {
    catalog: &'a Catalog,
    limit: usize,
}

impl<'a> PreferenceMatcher<'a> {
    /// Creates a matcher returning at most [`MAX_RECOMMENDATIONS`] results
    pub fn new(catalog: &'a Catalog) -> Self {
        Self {
            catalog,
            limit: MAX_RECOMMENDATIONS,
        }
    }

    /// Lowers the number of results returned; never raises it above [`MAX_RECOMMENDATIONS`]
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit.min(MAX_RECOMMENDATIONS);
        self
    }

    /// Filters, scores and orders the catalog for the given preferences
    ///
    /// Records failing the hard filter are dropped, survivors are scored by
    /// cosine similarity against the query text and sorted by that score.
    /// The whole sorted list is then shuffled with `rng` before truncation,
    /// so presentation order is random across similarity tiers.
    #[instrument(skip_all, fields(catalog_size = self.catalog.len(), limit = self.limit))]
    pub fn recommend<R: Rng + ?Sized>(
        &self,
        preferences: &PreferenceQuery,
        rng: &mut R,
    ) -> Vec<RecommendationResult> {
        let unrecognized = preferences.unrecognized_keys();
        if !unrecognized.is_empty() {
            tracing::debug!(keys = ?unrecognized, "Ignoring unrecognized preference keys");
        }

        let query = preferences.query_text();
        let model = self.catalog.model();
        let query_vector = model.query_vector(&query);

        let mut candidates: Vec<RecommendationResult> = self
            .catalog
            .records()
            .iter()
            .enumerate()
            .filter(|(_, record)| passes_hard_filter(record, preferences))
            .map(|(idx, record)| to_result(record, preferences, model.score(&query_vector, idx)))
            .collect();

        tracing::debug!(
            query = %query,
            candidates = candidates.len(),
            "Hard filter applied"
        );

        candidates.sort_by(|a, b| b.similarity.total_cmp(&a.similarity));
        candidates.shuffle(rng);
        candidates.truncate(self.limit);

        candidates
    }
}

/// Whether a record survives the pre-ranking elimination pass
///
/// Records with an unknown milk, type, texture or flavor never pass. Declared
/// milk/type preferences must be contained in the record's value; declared
/// texture/flavor preferences must equal one of its parts. All comparisons
/// ignore case.
pub fn passes_hard_filter(record: &CheeseRecord, preferences: &PreferenceQuery) -> bool {
    if CRITICAL_ATTRIBUTES
        .iter()
        .any(|attribute| record.is_unknown(attribute))
    {
        return false;
    }

    let contains = CONTAINMENT_FILTERS.iter().all(|attribute| {
        match preferences.get(attribute) {
            Some(wanted) => record
                .get(attribute)
                .is_some_and(|value| value.to_lowercase().contains(&wanted.to_lowercase())),
            None => true,
        }
    });

    let member = MEMBERSHIP_FILTERS.iter().all(|attribute| {
        match preferences.get(attribute) {
            Some(wanted) => record
                .values(attribute)
                .any(|part| part.to_lowercase() == wanted.to_lowercase()),
            None => true,
        }
    });

    contains && member
}

fn to_result(
    record: &CheeseRecord,
    preferences: &PreferenceQuery,
    similarity: f64,
) -> RecommendationResult {
    let shared_attributes = preferences
        .declared()
        .filter_map(|(attribute, wanted)| {
            let value = record.get(attribute)?;
            value
                .to_lowercase()
                .contains(&wanted.to_lowercase())
                .then(|| format!("{attribute}: {value}"))
        })
        .collect();

    RecommendationResult {
        cheese_name: record.name.clone(),
        url: record.url(),
        attributes: record.attributes.clone(),
        shared_attributes,
        similarity,
    }
}
