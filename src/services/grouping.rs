use std::collections::{BTreeMap, BTreeSet};

use thiserror::Error;
use tracing::instrument;

use crate::{catalog::Catalog, models::SENTINEL};

/// Attribute value to the sorted names of the cheeses carrying it
pub type GroupIndex = BTreeMap<String, Vec<String>>;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GroupingError {
    #[error("Attribute '{0}' not found in the dataset.")]
    AttributeNotFound(String),
}

/// Groups cheese names by the values of one attribute
///
/// Multi-valued attributes put a cheese in every bucket it names. Sentinel
/// values never form a bucket and each bucket's names are sorted. A value
/// repeated within one record counts once; separate rows sharing a name are
/// each listed.
#[instrument(skip(catalog), fields(catalog_size = catalog.len()))]
pub fn group_by_attribute(catalog: &Catalog, attribute: &str) -> Result<GroupIndex, GroupingError> {
    if !catalog.has_attribute(attribute) {
        return Err(GroupingError::AttributeNotFound(attribute.to_string()));
    }

    let mut groups = GroupIndex::new();
    for record in catalog.records() {
        let values: BTreeSet<&str> = record
            .values(attribute)
            .filter(|value| *value != SENTINEL)
            .collect();
        for value in values {
            groups
                .entry(value.to_string())
                .or_default()
                .push(record.name.clone());
        }
    }

    for names in groups.values_mut() {
        names.sort();
    }

    tracing::debug!(attribute, groups = groups.len(), "Grouped catalog");

    Ok(groups)
}
