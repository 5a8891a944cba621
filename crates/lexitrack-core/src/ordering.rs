//! Per-word-class feature ordering.
//!
//! The ordering decides how deep each grammatical feature nests in a form
//! tree: the primary feature's value is the first key, then each secondary
//! feature's value in the listed order. It is plain data so new word classes
//! only need a table entry.

use std::collections::HashMap;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

/// Primary feature for word classes the table does not know.
pub const FALLBACK_PRIMARY: &str = "form";

/// Built-in orderings: word classes, primary feature, secondary features.
const STANDARD_ORDERINGS: &[(&[&str], &str, &[&str])] = &[
    (&["verb"], "mood", &["tense", "person", "number"]),
    (&["noun", "pronoun"], "case", &["number"]),
    (&["adjective", "participle"], "case", &["gender", "number"]),
    (&["gerund"], "case", &["number"]),
];

/// Nesting order of the features of one word class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureOrdering {
    pub primary: String,
    #[serde(default)]
    pub secondary: Vec<String>,
}

impl FeatureOrdering {
    pub fn new(primary: &str, secondary: &[&str]) -> Self {
        Self {
            primary: primary.to_string(),
            secondary: secondary.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Primary feature followed by the secondary features.
    pub fn features(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.primary.as_str()).chain(self.secondary.iter().map(String::as_str))
    }

    pub fn contains(&self, feature: &str) -> bool {
        self.features().any(|f| f == feature)
    }

    /// Nesting depth of `feature`: 0 for the primary feature, `n` for the
    /// n-th secondary one. `None` for features keyed in the composite leaf.
    pub fn position(&self, feature: &str) -> Option<usize> {
        self.features().position(|f| f == feature)
    }
}

/// Lookup table from word class to [`FeatureOrdering`].
#[derive(Debug, Clone)]
pub struct OrderingTable {
    by_class: HashMap<String, FeatureOrdering>,
    fallback: FeatureOrdering,
}

impl OrderingTable {
    /// A table with no entries; every word class gets the fallback.
    pub fn empty() -> Self {
        Self {
            by_class: HashMap::new(),
            fallback: FeatureOrdering::new(FALLBACK_PRIMARY, &[]),
        }
    }

    /// The shared built-in table.
    pub fn standard() -> &'static OrderingTable {
        static STANDARD: OnceLock<OrderingTable> = OnceLock::new();
        STANDARD.get_or_init(|| {
            let mut table = OrderingTable::empty();
            for (classes, primary, secondary) in STANDARD_ORDERINGS {
                for class in *classes {
                    table.insert(class, FeatureOrdering::new(primary, secondary));
                }
            }
            table
        })
    }

    /// Add or replace the ordering for a word class.
    pub fn insert(&mut self, word_class: &str, ordering: FeatureOrdering) -> Option<FeatureOrdering> {
        self.by_class.insert(word_class.to_string(), ordering)
    }

    pub fn get(&self, word_class: &str) -> Option<&FeatureOrdering> {
        self.by_class.get(word_class)
    }

    /// The ordering for `word_class`, or the fallback if it has none.
    pub fn for_word_class(&self, word_class: &str) -> &FeatureOrdering {
        self.get(word_class).unwrap_or(&self.fallback)
    }

    pub fn word_classes(&self) -> Vec<&str> {
        let mut classes: Vec<&str> = self.by_class.keys().map(String::as_str).collect();
        classes.sort_unstable();
        classes
    }
}

impl Default for OrderingTable {
    fn default() -> Self {
        Self::standard().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_table_entries() {
        let table = OrderingTable::standard();
        let verb = table.for_word_class("verb");
        assert_eq!(verb.primary, "mood");
        assert_eq!(verb.secondary, vec!["tense", "person", "number"]);

        assert_eq!(table.for_word_class("noun").primary, "case");
        assert_eq!(table.for_word_class("pronoun").secondary, vec!["number"]);
        assert_eq!(
            table.for_word_class("participle").secondary,
            vec!["gender", "number"]
        );
        assert_eq!(table.word_classes().len(), 7);
    }

    #[test]
    fn unknown_class_uses_fallback() {
        let table = OrderingTable::standard();
        let adverb = table.for_word_class("adverb");
        assert_eq!(adverb.primary, FALLBACK_PRIMARY);
        assert!(adverb.secondary.is_empty());
        assert!(table.get("adverb").is_none());
    }

    #[test]
    fn extending_a_copy_leaves_standard_untouched() {
        let mut table = OrderingTable::default();
        table.insert("article", FeatureOrdering::new("case", &["gender", "number"]));
        assert_eq!(table.for_word_class("article").primary, "case");
        assert!(OrderingTable::standard().get("article").is_none());
    }

    #[test]
    fn features_lists_primary_first() {
        let ordering = FeatureOrdering::new("mood", &["tense", "person"]);
        let features: Vec<&str> = ordering.features().collect();
        assert_eq!(features, vec!["mood", "tense", "person"]);
        assert!(ordering.contains("person"));
        assert!(!ordering.contains("number"));
    }

    #[test]
    fn position_counts_from_the_primary_feature() {
        let noun = OrderingTable::standard().for_word_class("noun");
        assert_eq!(noun.position("case"), Some(0));
        assert_eq!(noun.position("number"), Some(1));
        assert_eq!(noun.position("gender"), None);
    }
}
