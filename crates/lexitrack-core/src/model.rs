//! Core data model types for lexitrack.
//!
//! These are the records the scheduler, the form tree, and the import
//! coordinator operate on. Every type serializes to plain JSON-compatible
//! nesting so existing stored data keeps loading.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{CoreError, Result};
use crate::forms::{FormAddress, FormTree};
use crate::history::ReviewHistory;
use crate::ordering::OrderingTable;

/// Result of a single practice attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Correct,
    Hard,
    Incorrect,
}

impl Outcome {
    pub const ALL: [Outcome; 3] = [Outcome::Correct, Outcome::Hard, Outcome::Incorrect];

    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Correct => "correct",
            Outcome::Hard => "hard",
            Outcome::Incorrect => "incorrect",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Outcome {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "correct" => Ok(Outcome::Correct),
            "hard" => Ok(Outcome::Hard),
            "incorrect" => Ok(Outcome::Incorrect),
            other => Err(CoreError::InvalidOutcome(other.to_string())),
        }
    }
}

/// A learner's mastery of one item, from 0 (Unknown) to 5 (Mastered).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct ProficiencyLevel(u8);

impl ProficiencyLevel {
    pub const UNKNOWN: ProficiencyLevel = ProficiencyLevel(0);
    pub const SEEN: ProficiencyLevel = ProficiencyLevel(1);
    pub const MASTERED: ProficiencyLevel = ProficiencyLevel(5);

    /// Every level in ascending order.
    pub const ALL: [ProficiencyLevel; 6] = [
        ProficiencyLevel(0),
        ProficiencyLevel(1),
        ProficiencyLevel(2),
        ProficiencyLevel(3),
        ProficiencyLevel(4),
        ProficiencyLevel(5),
    ];

    pub fn new(value: i64) -> Result<Self> {
        if (0..=5).contains(&value) {
            Ok(Self(value as u8))
        } else {
            Err(CoreError::InvalidLevel(value))
        }
    }

    pub fn value(self) -> u8 {
        self.0
    }

    pub fn label(self) -> &'static str {
        match self.0 {
            0 => "Unknown",
            1 => "Seen",
            2 => "Learning",
            3 => "Familiar",
            4 => "Known",
            _ => "Mastered",
        }
    }
}

impl Default for ProficiencyLevel {
    fn default() -> Self {
        Self::UNKNOWN
    }
}

impl TryFrom<i64> for ProficiencyLevel {
    type Error = CoreError;

    fn try_from(value: i64) -> Result<Self> {
        Self::new(value)
    }
}

impl From<ProficiencyLevel> for u8 {
    fn from(level: ProficiencyLevel) -> u8 {
        level.0
    }
}

impl fmt::Display for ProficiencyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.0, self.label())
    }
}

/// One entry in a tracked item's review history. Never edited once written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewRecord {
    pub date: NaiveDate,
    #[serde(rename = "result", alias = "outcome")]
    pub outcome: Outcome,
    #[serde(rename = "time_ms", alias = "elapsed_time_ms", default)]
    pub elapsed_time_ms: Option<u64>,
}

/// A vocabulary item in one learner's collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackedItem {
    pub id: Uuid,
    pub learner_id: Uuid,
    pub word_id: Uuid,
    #[serde(default)]
    pub proficiency_level: ProficiencyLevel,
    pub last_reviewed_at: DateTime<Utc>,
    pub next_review_at: DateTime<Utc>,
    #[serde(default)]
    pub review_history: ReviewHistory,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub user_tags: BTreeSet<String>,
    pub created_at: DateTime<Utc>,
}

impl TrackedItem {
    /// A fresh item: level 0, due immediately.
    pub fn new(learner_id: Uuid, word_id: Uuid, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            learner_id,
            word_id,
            proficiency_level: ProficiencyLevel::UNKNOWN,
            last_reviewed_at: now,
            next_review_at: now,
            review_history: ReviewHistory::default(),
            notes: None,
            user_tags: BTreeSet::new(),
            created_at: now,
        }
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.user_tags.contains(tag)
    }
}

/// A language vocabulary can be imported into.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Language {
    pub id: Uuid,
    pub code: String,
    pub name: String,
    pub display_name: String,
    #[serde(default = "default_true")]
    pub is_available: bool,
}

fn default_true() -> bool {
    true
}

impl Language {
    /// Build a language with a stable id derived from its code.
    pub fn new(code: &str, name: &str, display_name: &str) -> Self {
        Self {
            id: Uuid::new_v5(&Uuid::NAMESPACE_OID, code.as_bytes()),
            code: code.to_string(),
            name: name.to_string(),
            display_name: display_name.to_string(),
            is_available: true,
        }
    }
}

/// Deduplication identity of a [`Word`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WordKey {
    pub language_code: String,
    pub text: String,
    pub word_class: String,
}

impl fmt::Display for WordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{} ({})", self.language_code, self.text, self.word_class)
    }
}

/// One lexical entry in one language.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Word {
    pub id: Uuid,
    pub language_id: Uuid,
    pub language_code: String,
    pub text: String,
    /// noun, verb, adjective, ...
    pub word_class: String,
    /// Target language code → translations, in insertion order.
    #[serde(default)]
    pub translations: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub ipa_transcriptions: Vec<String>,
    #[serde(default)]
    pub definitions: Vec<String>,
    #[serde(default)]
    pub examples: Vec<String>,
    #[serde(default)]
    pub synonyms: Vec<String>,
    #[serde(default)]
    pub antonyms: Vec<String>,
    #[serde(default)]
    pub etymology: Option<String>,
    #[serde(default)]
    pub related_words: Vec<String>,
    /// Frequency rank; lower is more common.
    #[serde(default)]
    pub frequency: Option<u32>,
    /// Learning difficulty, 1-5.
    #[serde(default)]
    pub difficulty: Option<u8>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub word_forms: FormTree,
}

impl Word {
    pub fn new(language_id: Uuid, language_code: &str, text: &str, word_class: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            language_id,
            language_code: language_code.to_string(),
            text: text.to_string(),
            word_class: word_class.to_string(),
            translations: BTreeMap::new(),
            ipa_transcriptions: Vec::new(),
            definitions: Vec::new(),
            examples: Vec::new(),
            synonyms: Vec::new(),
            antonyms: Vec::new(),
            etymology: None,
            related_words: Vec::new(),
            frequency: None,
            difficulty: None,
            tags: Vec::new(),
            word_forms: FormTree::default(),
        }
    }

    pub fn key(&self) -> WordKey {
        WordKey {
            language_code: self.language_code.clone(),
            text: self.text.clone(),
            word_class: self.word_class.clone(),
        }
    }

    /// Check the fields the record store relies on.
    pub fn validate(&self) -> Result<()> {
        if self.text.trim().is_empty() {
            return Err(CoreError::InvalidWord("text is empty".into()));
        }
        if self.word_class.trim().is_empty() {
            return Err(CoreError::InvalidWord(format!(
                "word class is empty for {:?}",
                self.text
            )));
        }
        if let Some(d) = self.difficulty {
            if !(1..=5).contains(&d) {
                return Err(CoreError::InvalidDifficulty(d as i64));
            }
        }
        Ok(())
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// Add a translation unless it is already listed for that language.
    pub fn add_translation(&mut self, language_code: &str, translation: &str) {
        let list = self
            .translations
            .entry(language_code.to_string())
            .or_default();
        if !list.iter().any(|t| t == translation) {
            list.push(translation.to_string());
        }
    }

    /// Add an example sentence unless it is already listed.
    pub fn add_example(&mut self, example: &str) {
        if !self.examples.iter().any(|e| e == example) {
            self.examples.push(example.to_string());
        }
    }

    /// Store a surface form using the standard feature ordering for this
    /// word's class.
    ///
    /// ```
    /// # use lexitrack_core::model::Word;
    /// # use lexitrack_core::forms::FeatureAssignment;
    /// let mut word = Word::new(uuid::Uuid::nil(), "la", "rosa", "noun");
    /// let genitive_plural: FeatureAssignment =
    ///     [("case", "genitive"), ("number", "plural")].into_iter().collect();
    /// word.add_form(genitive_plural, "rosarum").unwrap();
    /// assert_eq!(word.get_form("genitive.plural"), Some("rosarum"));
    /// ```
    pub fn add_form(&mut self, address: impl Into<FormAddress>, text: &str) -> Result<()> {
        self.add_form_with(OrderingTable::standard(), address, text)
    }

    /// Like [`Word::add_form`], with a caller-supplied ordering table.
    pub fn add_form_with(
        &mut self,
        table: &OrderingTable,
        address: impl Into<FormAddress>,
        text: &str,
    ) -> Result<()> {
        let path = address.into().resolve(table.for_word_class(&self.word_class));
        self.word_forms.insert(&path, text)
    }

    pub fn get_form(&self, address: impl Into<FormAddress>) -> Option<&str> {
        self.get_form_with(OrderingTable::standard(), address)
    }

    pub fn get_form_with(
        &self,
        table: &OrderingTable,
        address: impl Into<FormAddress>,
    ) -> Option<&str> {
        let path = address.into().resolve(table.for_word_class(&self.word_class));
        self.word_forms.get(&path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forms::FeatureAssignment;

    #[test]
    fn outcome_parse_and_display() {
        assert_eq!("correct".parse::<Outcome>().unwrap(), Outcome::Correct);
        assert_eq!("hard".parse::<Outcome>().unwrap(), Outcome::Hard);
        assert_eq!("incorrect".parse::<Outcome>().unwrap(), Outcome::Incorrect);
        assert_eq!(Outcome::Hard.to_string(), "hard");
        assert!(matches!(
            "Correct".parse::<Outcome>(),
            Err(CoreError::InvalidOutcome(_))
        ));
        assert!("easy".parse::<Outcome>().is_err());
    }

    #[test]
    fn proficiency_level_bounds() {
        assert!(ProficiencyLevel::new(0).is_ok());
        assert!(ProficiencyLevel::new(5).is_ok());
        assert!(matches!(
            ProficiencyLevel::new(6),
            Err(CoreError::InvalidLevel(6))
        ));
        assert!(ProficiencyLevel::new(-1).is_err());
        assert_eq!(ProficiencyLevel::new(3).unwrap().label(), "Familiar");
    }

    #[test]
    fn proficiency_level_rejects_out_of_range_json() {
        let ok: ProficiencyLevel = serde_json::from_str("4").unwrap();
        assert_eq!(ok.value(), 4);
        assert!(serde_json::from_str::<ProficiencyLevel>("9").is_err());
        assert_eq!(serde_json::to_string(&ok).unwrap(), "4");
    }

    #[test]
    fn review_record_uses_stored_json_shape() {
        let record = ReviewRecord {
            date: NaiveDate::from_ymd_opt(2025, 4, 9).unwrap(),
            outcome: Outcome::Correct,
            elapsed_time_ms: Some(1200),
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"date": "2025-04-09", "result": "correct", "time_ms": 1200})
        );

        let legacy: ReviewRecord =
            serde_json::from_str(r#"{"date": "2025-04-12", "result": "incorrect", "time_ms": null}"#)
                .unwrap();
        assert_eq!(legacy.outcome, Outcome::Incorrect);
        assert_eq!(legacy.elapsed_time_ms, None);
    }

    #[test]
    fn new_tracked_item_is_due_at_creation() {
        let now = Utc::now();
        let item = TrackedItem::new(Uuid::new_v4(), Uuid::new_v4(), now);
        assert_eq!(item.proficiency_level, ProficiencyLevel::UNKNOWN);
        assert_eq!(item.last_reviewed_at, now);
        assert_eq!(item.next_review_at, now);
        assert!(item.review_history.is_empty());
    }

    #[test]
    fn language_ids_are_stable_per_code() {
        let a = Language::new("es", "Spanish", "Español");
        let b = Language::new("es", "Spanish", "Español");
        let c = Language::new("la", "Latin", "Latina");
        assert_eq!(a.id, b.id);
        assert_ne!(a.id, c.id);
    }

    #[test]
    fn translations_and_examples_suppress_duplicates() {
        let mut word = Word::new(Uuid::nil(), "es", "perro", "noun");
        word.add_translation("en", "dog");
        word.add_translation("en", "hound");
        word.add_translation("en", "dog");
        word.add_example("El perro ladra.");
        word.add_example("El perro ladra.");
        assert_eq!(word.translations["en"], vec!["dog", "hound"]);
        assert_eq!(word.examples.len(), 1);
    }

    #[test]
    fn word_validation() {
        let mut word = Word::new(Uuid::nil(), "es", "perro", "noun");
        assert!(word.validate().is_ok());
        word.difficulty = Some(6);
        assert!(matches!(
            word.validate(),
            Err(CoreError::InvalidDifficulty(6))
        ));
        word.difficulty = Some(2);
        word.word_class = " ".into();
        assert!(matches!(word.validate(), Err(CoreError::InvalidWord(_))));
    }

    #[test]
    fn verb_forms_via_both_addressing_modes() {
        let mut word = Word::new(Uuid::nil(), "es", "hablar", "verb");
        let features: FeatureAssignment = [
            ("mood", "indicative"),
            ("tense", "present"),
            ("person", "1"),
            ("number", "singular"),
        ]
        .into_iter()
        .collect();
        word.add_form(features.clone(), "hablo").unwrap();
        assert_eq!(word.get_form(features), Some("hablo"));
        assert_eq!(
            word.get_form("indicative.present.1.singular"),
            Some("hablo")
        );
        assert_eq!(word.get_form("indicative.past"), None);
    }

    #[test]
    fn word_serde_roundtrip_keeps_forms() {
        let mut word = Word::new(Uuid::nil(), "la", "rosa", "noun");
        word.add_form("nominative.singular", "rosa").unwrap();
        word.difficulty = Some(1);
        let json = serde_json::to_string(&word).unwrap();
        let back: Word = serde_json::from_str(&json).unwrap();
        assert_eq!(back, word);
        assert_eq!(back.get_form("nominative.singular"), Some("rosa"));
    }
}
