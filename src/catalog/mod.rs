//! Catalog store
//!
//! A [`Catalog`] is the ready state of the cheese data: records have been
//! loaded by a [`CatalogSource`], normalized exactly once and indexed by the
//! similarity model. Nothing mutates the records afterwards, so a catalog can
//! be shared freely between concurrent requests.

use chrono::{DateTime, Utc};
use std::collections::BTreeSet;

use crate::{
    error::AppResult,
    models::{cheese::NAME_COLUMN, CheeseRecord},
    services::similarity::{SimilarityModel, VectorAlignment},
};

pub mod csv_source;
pub mod normalize;

pub use csv_source::CsvCatalogSource;
pub use normalize::normalize;

/// Source of raw catalog records
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait CatalogSource: Send + Sync {
    /// Reads every record from the underlying source
    async fn load(&self) -> AppResult<Vec<CheeseRecord>>;

    /// Source name for logging
    fn name(&self) -> &'static str;
}

/// Normalized, read-only cheese catalog
#[derive(Debug, Clone)]
pub struct Catalog {
    records: Vec<CheeseRecord>,
    schema: BTreeSet<String>,
    model: SimilarityModel,
    loaded_at: DateTime<Utc>,
}

impl Catalog {
    /// Normalizes the records and builds the similarity model over their feature text
    pub fn new(mut records: Vec<CheeseRecord>, alignment: VectorAlignment) -> Self {
        normalize(&mut records);

        let mut schema: BTreeSet<String> = BTreeSet::new();
        if !records.is_empty() {
            schema.insert(NAME_COLUMN.to_string());
        }
        for record in &records {
            schema.extend(record.attributes.keys().cloned());
        }

        let model = SimilarityModel::build(
            records.iter().map(|record| record.features.as_str()),
            alignment,
        );

        Self {
            records,
            schema,
            model,
            loaded_at: Utc::now(),
        }
    }

    pub fn records(&self) -> &[CheeseRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Whether any record carries the attribute (the name column included)
    pub fn has_attribute(&self, attribute: &str) -> bool {
        self.schema.contains(attribute)
    }

    pub fn model(&self) -> &SimilarityModel {
        &self.model
    }

    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }

    /// Finds the first record whose slug matches
    pub fn find_by_slug(&self, slug: &str) -> Option<&CheeseRecord> {
        let slug = slug.to_lowercase();
        self.records.iter().find(|record| record.slug() == slug)
    }
}

/// Loads records from the source and brings the catalog to its ready state
pub async fn load_catalog(
    source: &dyn CatalogSource,
    alignment: VectorAlignment,
) -> AppResult<Catalog> {
    tracing::info!(source = source.name(), "Loading cheese catalog");

    let records = source.load().await?;
    let catalog = Catalog::new(records, alignment);

    tracing::info!(
        source = source.name(),
        cheeses = catalog.len(),
        vocabulary = catalog.model().vocabulary_size(),
        alignment = ?alignment,
        "Catalog ready"
    );

    Ok(catalog)
}
