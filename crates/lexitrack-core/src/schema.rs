//! Feature schema registry.
//!
//! Holds, per language and word class, the legal grammatical features and
//! their legal values. The registry is an ordinary value: build it once at
//! startup and pass `&FeatureSchemaRegistry` to whatever needs lookups.
//! Registering needs `&mut`, so a registry shared across threads must sit
//! behind a lock the caller owns.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::forms::FeatureAssignment;

/// Legal features of one (language, word class) pair: feature name →
/// ordered legal values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureSchema(BTreeMap<String, Vec<String>>);

impl FeatureSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a feature, replacing any earlier declaration of it.
    pub fn with_feature<V: ToString>(mut self, name: &str, values: impl IntoIterator<Item = V>) -> Self {
        self.0
            .insert(name.to_string(), values.into_iter().map(|v| v.to_string()).collect());
        self
    }

    pub fn values(&self, feature: &str) -> &[String] {
        self.0.get(feature).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn declares(&self, feature: &str) -> bool {
        self.0.contains_key(feature)
    }

    /// Feature names in name order.
    pub fn feature_names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<V: ToString> FromIterator<(String, Vec<V>)> for FeatureSchema {
    fn from_iter<I: IntoIterator<Item = (String, Vec<V>)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, vs)| (k, vs.into_iter().map(|v| v.to_string()).collect()))
                .collect(),
        )
    }
}

/// Why a feature assignment is not valid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeatureViolation {
    /// No schema is registered for the language and word class.
    NoSchema,
    /// The feature is not declared for this word class.
    UnknownFeature { feature: String },
    /// The value is not one of the feature's legal values.
    IllegalValue { feature: String, value: String },
}

impl fmt::Display for FeatureViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeatureViolation::NoSchema => write!(f, "no schema registered"),
            FeatureViolation::UnknownFeature { feature } => {
                write!(f, "unknown feature '{feature}'")
            }
            FeatureViolation::IllegalValue { feature, value } => {
                write!(f, "'{value}' is not a legal value of '{feature}'")
            }
        }
    }
}

static EMPTY_SCHEMA: FeatureSchema = FeatureSchema(BTreeMap::new());

/// Schemas keyed by language code, then word class.
#[derive(Debug, Clone, Default)]
pub struct FeatureSchemaRegistry {
    schemas: HashMap<String, HashMap<String, FeatureSchema>>,
}

impl FeatureSchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `schema`, replacing any earlier schema for the pair
    /// wholesale. Returns the replaced schema.
    pub fn register(
        &mut self,
        language_code: &str,
        word_class: &str,
        schema: FeatureSchema,
    ) -> Option<FeatureSchema> {
        tracing::debug!(
            language = language_code,
            word_class,
            features = schema.len(),
            "registering feature schema"
        );
        self.schemas
            .entry(language_code.to_string())
            .or_default()
            .insert(word_class.to_string(), schema)
    }

    /// The registered schema, or `None` for an unknown pair.
    pub fn get(&self, language_code: &str, word_class: &str) -> Option<&FeatureSchema> {
        self.schemas.get(language_code)?.get(word_class)
    }

    /// The schema for the pair; an unknown pair yields an empty schema.
    pub fn features_for(&self, language_code: &str, word_class: &str) -> &FeatureSchema {
        self.get(language_code, word_class).unwrap_or(&EMPTY_SCHEMA)
    }

    /// Legal values of one feature; empty when anything is unknown.
    pub fn values_for_feature(&self, language_code: &str, word_class: &str, feature: &str) -> &[String] {
        self.features_for(language_code, word_class).values(feature)
    }

    /// Registered word classes of a language, sorted.
    pub fn word_classes_for(&self, language_code: &str) -> Vec<&str> {
        let mut classes: Vec<&str> = self
            .schemas
            .get(language_code)
            .map(|by_class| by_class.keys().map(String::as_str).collect())
            .unwrap_or_default();
        classes.sort_unstable();
        classes
    }

    /// Languages with at least one schema, sorted.
    pub fn languages(&self) -> Vec<&str> {
        let mut languages: Vec<&str> = self.schemas.keys().map(String::as_str).collect();
        languages.sort_unstable();
        languages
    }

    /// Every reason `assignment` is invalid; empty when it is valid.
    ///
    /// Features absent from the assignment are not checked, so a partial
    /// assignment naming a subtree is valid.
    pub fn violations(
        &self,
        language_code: &str,
        word_class: &str,
        assignment: &FeatureAssignment,
    ) -> Vec<FeatureViolation> {
        let Some(schema) = self.get(language_code, word_class) else {
            return vec![FeatureViolation::NoSchema];
        };

        assignment
            .iter()
            .filter_map(|(feature, value)| {
                if !schema.declares(feature) {
                    Some(FeatureViolation::UnknownFeature {
                        feature: feature.to_string(),
                    })
                } else if !schema.values(feature).iter().any(|v| v == value) {
                    Some(FeatureViolation::IllegalValue {
                        feature: feature.to_string(),
                        value: value.to_string(),
                    })
                } else {
                    None
                }
            })
            .collect()
    }

    pub fn is_valid(&self, language_code: &str, word_class: &str, assignment: &FeatureAssignment) -> bool {
        self.violations(language_code, word_class, assignment).is_empty()
    }
}
