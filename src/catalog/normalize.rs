use crate::models::cheese::{
    CheeseRecord, DIETARY_FLAGS, PLACEHOLDER, PROCESSED_ATTRIBUTES, SENTINEL,
};

/// Fills missing attributes with the sentinel and derives each record's feature text
///
/// For every processed attribute, a value that is absent, blank or the `"NA"`
/// placeholder becomes `"Unknown"`. The feature text is the processed values
/// joined by spaces in declared order, followed by the dietary flags the
/// record carries.
pub fn normalize(records: &mut [CheeseRecord]) {
    for record in records.iter_mut() {
        for attribute in PROCESSED_ATTRIBUTES {
            let value = record
                .attributes
                .entry(attribute.to_string())
                .or_default();
            if is_placeholder(value) {
                *value = SENTINEL.to_string();
            }
        }

        record.features = feature_text(record);
    }
}

fn is_placeholder(value: &str) -> bool {
    let trimmed = value.trim();
    trimmed.is_empty() || trimmed == PLACEHOLDER
}

fn feature_text(record: &CheeseRecord) -> String {
    PROCESSED_ATTRIBUTES
        .iter()
        .chain(DIETARY_FLAGS.iter())
        .filter_map(|attribute| record.get(attribute))
        .collect::<Vec<_>>()
        .join(" ")
}
