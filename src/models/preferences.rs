use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Literal a client sends to say "no preference" for an attribute
pub const NO_PREFERENCE: &str = "N/A";

/// Recognized preference keys, in the order their values enter the query text
pub const PREFERENCE_KEYS: [&str; 12] = [
    "milk",
    "country",
    "region",
    "family",
    "type",
    "texture",
    "rind",
    "color",
    "flavor",
    "aroma",
    "vegetarian",
    "vegan",
];

/// Attribute preferences for a single recommendation request
///
/// Serialized as a flat JSON object, e.g. `{"milk": "cow", "rind": "N/A"}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct PreferenceQuery {
    values: BTreeMap<String, String>,
}

impl PreferenceQuery {
    /// Creates an empty query (no preferences declared)
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    /// Sets or replaces a preference
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    /// Returns the declared value for a key, or `None` when it is omitted,
    /// blank or set to `"N/A"`
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values
            .get(key)
            .map(|value| value.trim())
            .filter(|value| !value.is_empty() && *value != NO_PREFERENCE)
    }

    /// Declared preferences over the recognized keys, in canonical order
    pub fn declared(&self) -> impl Iterator<Item = (&'static str, &str)> + '_ {
        PREFERENCE_KEYS
            .iter()
            .filter_map(move |key| self.get(key).map(|value| (*key, value)))
    }

    /// Keys present in the query that are not part of the preference schema
    pub fn unrecognized_keys(&self) -> Vec<&str> {
        self.values
            .keys()
            .map(String::as_str)
            .filter(|key| !PREFERENCE_KEYS.contains(key))
            .collect()
    }

    /// Space-joined, lower-cased declared values used as the similarity query
    pub fn query_text(&self) -> String {
        self.declared()
            .map(|(_, value)| value)
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase()
    }
}
