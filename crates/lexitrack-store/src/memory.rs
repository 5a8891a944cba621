//! In-memory record store.
//!
//! Implements both [`TrackedItemStore`] and [`VocabularyRepository`] over
//! one set of tables behind a single mutex, so `modify_item` holds the item
//! exclusively for the duration of the change.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use uuid::Uuid;

use lexitrack_core::model::{TrackedItem, Word, WordKey};
use lexitrack_core::traits::{ItemInsert, TrackedItemStore, VocabularyRepository};

use crate::error::StoreError;

#[derive(Debug, Default)]
struct Tables {
    items: HashMap<Uuid, TrackedItem>,
    words: HashMap<Uuid, Word>,
    word_keys: HashMap<WordKey, Uuid>,
}

impl Tables {
    fn learner_items(&self, learner_id: Uuid) -> impl Iterator<Item = &TrackedItem> {
        self.items.values().filter(move |i| i.learner_id == learner_id)
    }
}

/// Reference store for tests and the CLI. Nothing is persisted.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn item_count(&self) -> usize {
        self.lock().map(|t| t.items.len()).unwrap_or(0)
    }

    pub fn word_count(&self) -> usize {
        self.lock().map(|t| t.words.len()).unwrap_or(0)
    }

    /// Every stored word, ordered by language, text, then word class.
    pub fn all_words(&self) -> anyhow::Result<Vec<Word>> {
        let tables = self.lock()?;
        let mut words: Vec<Word> = tables.words.values().cloned().collect();
        words.sort_by_key(Word::key);
        Ok(words)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Tables>, StoreError> {
        self.tables.lock().map_err(|_| StoreError::LockPoisoned)
    }
}

fn sorted(mut items: Vec<TrackedItem>) -> Vec<TrackedItem> {
    items.sort_by_key(|i| (i.created_at, i.id));
    items
}

impl TrackedItemStore for MemoryStore {
    fn create_item(&self, item: &TrackedItem) -> anyhow::Result<ItemInsert> {
        let mut tables = self.lock()?;
        if tables.items.contains_key(&item.id) {
            return Err(StoreError::DuplicateItem(item.id).into());
        }
        if !tables.words.contains_key(&item.word_id) {
            return Err(StoreError::DanglingWord {
                item: item.id,
                word: item.word_id,
            }
            .into());
        }
        if let Some(existing) = tables
            .learner_items(item.learner_id)
            .find(|i| i.word_id == item.word_id)
        {
            return Ok(ItemInsert::AlreadyTracked(existing.id));
        }
        tables.items.insert(item.id, item.clone());
        Ok(ItemInsert::Created)
    }

    fn find_item(&self, id: Uuid) -> anyhow::Result<Option<TrackedItem>> {
        Ok(self.lock()?.items.get(&id).cloned())
    }

    fn find_item_for(&self, learner_id: Uuid, word_id: Uuid) -> anyhow::Result<Option<TrackedItem>> {
        Ok(self
            .lock()?
            .learner_items(learner_id)
            .find(|i| i.word_id == word_id)
            .cloned())
    }

    fn update_item(&self, item: &TrackedItem) -> anyhow::Result<()> {
        let mut tables = self.lock()?;
        match tables.items.get_mut(&item.id) {
            Some(stored) => {
                *stored = item.clone();
                Ok(())
            }
            None => Err(StoreError::ItemNotFound(item.id).into()),
        }
    }

    fn modify_item(
        &self,
        id: Uuid,
        change: &mut dyn FnMut(&mut TrackedItem),
    ) -> anyhow::Result<Option<TrackedItem>> {
        let mut tables = self.lock()?;
        Ok(tables.items.get_mut(&id).map(|item| {
            change(item);
            item.clone()
        }))
    }

    fn delete_item(&self, id: Uuid) -> anyhow::Result<bool> {
        Ok(self.lock()?.items.remove(&id).is_some())
    }

    fn items_for_learner(&self, learner_id: Uuid) -> anyhow::Result<Vec<TrackedItem>> {
        let tables = self.lock()?;
        Ok(sorted(tables.learner_items(learner_id).cloned().collect()))
    }

    fn items_with_tag(&self, learner_id: Uuid, tag: &str) -> anyhow::Result<Vec<TrackedItem>> {
        let tables = self.lock()?;
        Ok(sorted(
            tables
                .learner_items(learner_id)
                .filter(|i| i.has_tag(tag))
                .cloned()
                .collect(),
        ))
    }

    fn due_before(&self, learner_id: Uuid, as_of: DateTime<Utc>) -> anyhow::Result<Vec<TrackedItem>> {
        let tables = self.lock()?;
        Ok(sorted(
            tables
                .learner_items(learner_id)
                .filter(|i| i.next_review_at <= as_of)
                .cloned()
                .collect(),
        ))
    }
}

impl VocabularyRepository for MemoryStore {
    fn create_word(&self, word: &Word) -> anyhow::Result<()> {
        let mut tables = self.lock()?;
        let key = word.key();
        if tables.word_keys.contains_key(&key) {
            return Err(StoreError::DuplicateWord(key.to_string()).into());
        }
        tables.word_keys.insert(key, word.id);
        tables.words.insert(word.id, word.clone());
        tracing::debug!(id = %word.id, text = %word.text, "stored word");
        Ok(())
    }

    fn get_word(&self, id: Uuid) -> anyhow::Result<Option<Word>> {
        Ok(self.lock()?.words.get(&id).cloned())
    }

    fn find_word(&self, key: &WordKey) -> anyhow::Result<Option<Word>> {
        let tables = self.lock()?;
        Ok(tables
            .word_keys
            .get(key)
            .and_then(|id| tables.words.get(id))
            .cloned())
    }

    fn update_word(&self, word: &Word) -> anyhow::Result<()> {
        let mut tables = self.lock()?;
        let Some(old_key) = tables.words.get(&word.id).map(Word::key) else {
            return Err(StoreError::WordNotFound(word.id).into());
        };
        let new_key = word.key();
        if new_key != old_key {
            if tables.word_keys.contains_key(&new_key) {
                return Err(StoreError::DuplicateWord(new_key.to_string()).into());
            }
            tables.word_keys.remove(&old_key);
            tables.word_keys.insert(new_key, word.id);
        }
        tables.words.insert(word.id, word.clone());
        Ok(())
    }

    fn delete_word(&self, id: Uuid) -> anyhow::Result<bool> {
        let mut tables = self.lock()?;
        let Some(word) = tables.words.remove(&id) else {
            return Ok(false);
        };
        tables.word_keys.remove(&word.key());

        let before = tables.items.len();
        tables.items.retain(|_, item| item.word_id != id);
        let removed = before - tables.items.len();
        if removed > 0 {
            tracing::debug!(word = %id, removed, "removed tracked items of deleted word");
        }
        Ok(true)
    }

    fn words_with_tag(&self, tag: &str) -> anyhow::Result<Vec<Word>> {
        let tables = self.lock()?;
        let mut words: Vec<Word> = tables.words.values().filter(|w| w.has_tag(tag)).cloned().collect();
        words.sort_by_key(Word::key);
        Ok(words)
    }

    fn words_for_language(&self, language_code: &str) -> anyhow::Result<Vec<Word>> {
        let tables = self.lock()?;
        let mut words: Vec<Word> = tables
            .words
            .values()
            .filter(|w| w.language_code == language_code)
            .cloned()
            .collect();
        words.sort_by_key(Word::key);
        Ok(words)
    }
}
