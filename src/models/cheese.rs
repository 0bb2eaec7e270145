use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Column holding the cheese name in the catalog source
pub const NAME_COLUMN: &str = "cheese";

/// Substituted for missing or placeholder attribute values during normalization
pub const SENTINEL: &str = "Unknown";

/// Literal placeholder the catalog uses for "not available"
pub const PLACEHOLDER: &str = "NA";

/// Separator between the parts of a multi-valued attribute (e.g. "creamy, smooth")
pub const MULTI_VALUE_DELIMITER: &str = ", ";

/// Attributes filled by the normalizer, in feature-text order
pub const PROCESSED_ATTRIBUTES: [&str; 10] = [
    "milk", "country", "region", "family", "type", "texture", "rind", "color", "flavor", "aroma",
];

/// Dietary flags appended to the feature text after the processed attributes
pub const DIETARY_FLAGS: [&str; 2] = ["vegetarian", "vegan"];

/// A record holding the sentinel in any of these is never recommended
pub const CRITICAL_ATTRIBUTES: [&str; 4] = ["milk", "type", "texture", "flavor"];

/// A single cheese from the catalog
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CheeseRecord {
    /// Display name, taken from the `cheese` column
    pub name: String,
    /// Attribute name to raw (or normalized) value
    pub attributes: BTreeMap<String, String>,
    /// Derived text used for similarity scoring; empty until normalized
    #[serde(default)]
    pub features: String,
}

impl CheeseRecord {
    /// Creates a record with no attributes
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: BTreeMap::new(),
            features: String::new(),
        }
    }

    /// Builder-style attribute setter
    pub fn with(mut self, attribute: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(attribute.into(), value.into());
        self
    }

    /// Looks up an attribute value; the name column resolves to the record name
    pub fn get(&self, attribute: &str) -> Option<&str> {
        if attribute == NAME_COLUMN {
            return Some(&self.name);
        }
        self.attributes.get(attribute).map(String::as_str)
    }

    /// Splits a multi-valued attribute into trimmed, non-empty parts
    pub fn values<'a>(&'a self, attribute: &str) -> impl Iterator<Item = &'a str> + 'a {
        self.get(attribute)
            .unwrap_or_default()
            .split(MULTI_VALUE_DELIMITER)
            .map(str::trim)
            .filter(|part| !part.is_empty())
    }

    /// True when the attribute is absent or holds the sentinel
    pub fn is_unknown(&self, attribute: &str) -> bool {
        matches!(self.get(attribute), None | Some(SENTINEL))
    }

    /// URL-friendly identifier: lowercase name with whitespace runs replaced by `-`
    pub fn slug(&self) -> String {
        slugify(&self.name)
    }

    /// Relative URL of the cheese detail route
    pub fn url(&self) -> String {
        cheese_url(&self.name)
    }
}

pub fn slugify(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
        .to_lowercase()
}

pub fn cheese_url(name: &str) -> String {
    format!("/cheese/{}", slugify(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_resolves_name_column() {
        let record = CheeseRecord::new("Brie de Meaux").with("milk", "cow");
        assert_eq!(record.get("cheese"), Some("Brie de Meaux"));
        assert_eq!(record.get("milk"), Some("cow"));
        assert_eq!(record.get("rind"), None);
    }

    #[test]
    fn test_values_splits_multi_valued_attribute() {
        let record = CheeseRecord::new("Stilton").with("texture", "creamy, crumbly, ");
        let parts: Vec<&str> = record.values("texture").collect();
        assert_eq!(parts, vec!["creamy", "crumbly"]);
    }

    #[test]
    fn test_values_of_missing_attribute_is_empty() {
        let record = CheeseRecord::new("Feta");
        assert_eq!(record.values("texture").count(), 0);
    }

    #[test]
    fn test_is_unknown() {
        let record = CheeseRecord::new("Feta")
            .with("milk", SENTINEL)
            .with("type", "soft");
        assert!(record.is_unknown("milk"));
        assert!(record.is_unknown("flavor"));
        assert!(!record.is_unknown("type"));
    }

    #[test]
    fn test_slug_and_url() {
        let record = CheeseRecord::new("Tomme  de Savoie");
        assert_eq!(record.slug(), "tomme-de-savoie");
        assert_eq!(record.url(), "/cheese/tomme-de-savoie");
    }
}
