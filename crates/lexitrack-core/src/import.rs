//! Vocabulary import coordinator.
//!
//! Turns raw scraped records into [`Word`]s and upserts them into the
//! vocabulary repository. Deduplication identity is (language code, text,
//! word class); a match has all of its fields replaced by the incoming
//! record. Records whose language cannot be resolved are skipped and
//! counted, never failing the batch.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::error::{CoreError, Result};
use crate::forms::FormTree;
use crate::model::Word;
use crate::traits::{LanguageResolver, ScrapingSource, VocabularyRepository};

/// A lexical record as produced by a scraper.
///
/// Exporters write `null` for fields they have nothing for; those read as
/// empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    #[serde(default, deserialize_with = "null_as_default")]
    pub text: String,
    #[serde(default)]
    pub language_code: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub word_class: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub translations: BTreeMap<String, Vec<String>>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub ipa_transcriptions: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub definitions: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub examples: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub synonyms: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub antonyms: Vec<String>,
    #[serde(default)]
    pub etymology: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub word_forms: FormTree,
    #[serde(default, deserialize_with = "null_as_default")]
    pub related_words: Vec<String>,
    #[serde(default)]
    pub frequency: Option<u32>,
    #[serde(default)]
    pub difficulty: Option<i64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: Vec<String>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl RawRecord {
    /// Build the word this record describes, for the given language.
    pub fn into_word(self, language_id: Uuid, language_code: &str) -> Result<Word> {
        let difficulty = self
            .difficulty
            .map(|d| {
                u8::try_from(d)
                    .ok()
                    .filter(|d| (1..=5).contains(d))
                    .ok_or(CoreError::InvalidDifficulty(d))
            })
            .transpose()?;

        let mut word = Word::new(language_id, language_code, &self.text, &self.word_class);
        for (target, translations) in &self.translations {
            for translation in translations {
                word.add_translation(target, translation);
            }
        }
        for example in &self.examples {
            word.add_example(example);
        }
        word.ipa_transcriptions = self.ipa_transcriptions;
        word.definitions = self.definitions;
        word.synonyms = self.synonyms;
        word.antonyms = self.antonyms;
        word.etymology = self.etymology;
        word.word_forms = self.word_forms;
        word.related_words = self.related_words;
        word.frequency = self.frequency;
        word.difficulty = difficulty;
        word.tags = self.tags;

        word.validate()?;
        Ok(word)
    }
}

/// A record a source could read but not decode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MalformedRecord {
    /// The record's headword or text, or its position when it has neither.
    pub text: String,
    pub message: String,
}

/// One record from a [`ScrapingSource`]. Malformed records are skipped at
/// import time instead of failing the whole source.
pub type RecordEntry = std::result::Result<RawRecord, MalformedRecord>;

/// Why a record was not imported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SkipReason {
    /// No explicit language id and the record's code (if any) is unknown.
    UnresolvedLanguage { code: Option<String> },
    /// The record does not describe a valid word.
    Invalid { message: String },
}

/// Result of importing one record.
#[derive(Debug, Clone)]
pub enum ImportOutcome {
    Created(Word),
    Updated(Word),
    Skipped(SkipReason),
}

/// A skipped record and the reason.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkippedRecord {
    pub text: String,
    pub reason: SkipReason,
}

/// Counts for a batch import.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImportSummary {
    pub created: usize,
    pub updated: usize,
    pub skipped: usize,
    #[serde(default)]
    pub skips: Vec<SkippedRecord>,
}

impl ImportSummary {
    pub fn imported(&self) -> usize {
        self.created + self.updated
    }

    pub fn total(&self) -> usize {
        self.imported() + self.skipped
    }

    fn record(&mut self, text: String, outcome: &ImportOutcome) {
        match outcome {
            ImportOutcome::Created(_) => self.created += 1,
            ImportOutcome::Updated(_) => self.updated += 1,
            ImportOutcome::Skipped(reason) => {
                self.skipped += 1;
                self.skips.push(SkippedRecord {
                    text,
                    reason: reason.clone(),
                });
            }
        }
    }
}

/// Imports raw records into a vocabulary repository.
pub struct ImportCoordinator<'a> {
    repository: &'a dyn VocabularyRepository,
    languages: &'a dyn LanguageResolver,
}

impl<'a> ImportCoordinator<'a> {
    pub fn new(repository: &'a dyn VocabularyRepository, languages: &'a dyn LanguageResolver) -> Self {
        Self {
            repository,
            languages,
        }
    }

    /// Import one record. An explicit `language_id` takes precedence over
    /// the record's own language code.
    pub fn import_record(&self, record: RawRecord, language_id: Option<Uuid>) -> Result<ImportOutcome> {
        let Some((language_id, language_code)) = self.resolve_language(&record, language_id) else {
            tracing::warn!(
                text = %record.text,
                code = ?record.language_code,
                "skipping record: language could not be resolved"
            );
            return Ok(ImportOutcome::Skipped(SkipReason::UnresolvedLanguage {
                code: record.language_code,
            }));
        };

        let text = record.text.clone();
        let mut word = match record.into_word(language_id, &language_code) {
            Ok(word) => word,
            Err(e) if e.is_rejected_input() => {
                tracing::warn!(%text, "skipping record: {e}");
                return Ok(ImportOutcome::Skipped(SkipReason::Invalid {
                    message: e.to_string(),
                }));
            }
            Err(e) => return Err(e),
        };

        match self.repository.find_word(&word.key())? {
            Some(existing) => {
                word.id = existing.id;
                self.repository.update_word(&word)?;
                tracing::debug!(key = %word.key(), "replaced existing word");
                Ok(ImportOutcome::Updated(word))
            }
            None => {
                self.repository.create_word(&word)?;
                tracing::debug!(key = %word.key(), "created word");
                Ok(ImportOutcome::Created(word))
            }
        }
    }

    /// Import every record, counting skips instead of stopping on them.
    /// Repository failures abort the batch.
    pub fn import_batch(
        &self,
        records: impl IntoIterator<Item = RawRecord>,
        language_id: Option<Uuid>,
    ) -> Result<ImportSummary> {
        self.import_entries(records.into_iter().map(Ok), language_id)
    }

    /// Like [`ImportCoordinator::import_batch`], with malformed entries
    /// counted as [`SkipReason::Invalid`].
    pub fn import_entries(
        &self,
        entries: impl IntoIterator<Item = RecordEntry>,
        language_id: Option<Uuid>,
    ) -> Result<ImportSummary> {
        let mut summary = ImportSummary::default();
        for entry in entries {
            match entry {
                Ok(record) => {
                    let text = record.text.clone();
                    let outcome = self.import_record(record, language_id)?;
                    summary.record(text, &outcome);
                }
                Err(malformed) => {
                    tracing::warn!(text = %malformed.text, "skipping record: {}", malformed.message);
                    let reason = SkipReason::Invalid {
                        message: malformed.message,
                    };
                    summary.record(malformed.text, &ImportOutcome::Skipped(reason));
                }
            }
        }
        tracing::info!(
            created = summary.created,
            updated = summary.updated,
            skipped = summary.skipped,
            "import finished"
        );
        Ok(summary)
    }

    /// Pull every record from `source` and import them.
    pub fn import_from(
        &self,
        source: &dyn ScrapingSource,
        language_id: Option<Uuid>,
    ) -> anyhow::Result<ImportSummary> {
        let entries = source.records()?;
        tracing::info!(source = source.name(), records = entries.len(), "importing");
        Ok(self.import_entries(entries, language_id)?)
    }

    fn resolve_language(&self, record: &RawRecord, language_id: Option<Uuid>) -> Option<(Uuid, String)> {
        if let Some(id) = language_id {
            let code = self
                .languages
                .language(id)
                .map(|l| l.code)
                .or_else(|| record.language_code.clone())?;
            return Some((id, code));
        }
        let code = record.language_code.as_deref()?;
        self.languages
            .language_by_code(code)
            .map(|l| (l.id, l.code))
    }
}
