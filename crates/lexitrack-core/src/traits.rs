//! Collaborator trait definitions.
//!
//! The record store, the language table, and the scraping source live
//! outside the core. `lexitrack-store` provides reference implementations.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::import::RecordEntry;
use crate::model::{Language, TrackedItem, Word, WordKey};

// ---------------------------------------------------------------------------
// Record store
// ---------------------------------------------------------------------------

/// Result of [`TrackedItemStore::create_item`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemInsert {
    Created,
    /// The learner already tracks the word; nothing was stored.
    AlreadyTracked(Uuid),
}

/// Storage for tracked items.
///
/// Reviews of one item must not interleave; [`TrackedItemStore::modify_item`]
/// is the single-writer boundary the review service goes through.
pub trait TrackedItemStore: Send + Sync {
    /// Insert a new item unless its learner already tracks its word.
    ///
    /// The (learner, word) check and the insert must be one atomic step.
    fn create_item(&self, item: &TrackedItem) -> anyhow::Result<ItemInsert>;

    fn find_item(&self, id: Uuid) -> anyhow::Result<Option<TrackedItem>>;

    /// The item a learner holds for a word, if any.
    fn find_item_for(&self, learner_id: Uuid, word_id: Uuid) -> anyhow::Result<Option<TrackedItem>>;

    /// Replace a stored item.
    fn update_item(&self, item: &TrackedItem) -> anyhow::Result<()>;

    /// Apply `change` to the stored item while holding it exclusively and
    /// persist the result. Returns `None` if the item does not exist.
    fn modify_item(
        &self,
        id: Uuid,
        change: &mut dyn FnMut(&mut TrackedItem),
    ) -> anyhow::Result<Option<TrackedItem>>;

    /// Remove an item. Returns `false` if it did not exist.
    fn delete_item(&self, id: Uuid) -> anyhow::Result<bool>;

    fn items_for_learner(&self, learner_id: Uuid) -> anyhow::Result<Vec<TrackedItem>>;

    /// A learner's items carrying `tag` in their user tags.
    fn items_with_tag(&self, learner_id: Uuid, tag: &str) -> anyhow::Result<Vec<TrackedItem>>;

    /// A learner's items with `next_review_at <= as_of`.
    fn due_before(&self, learner_id: Uuid, as_of: DateTime<Utc>) -> anyhow::Result<Vec<TrackedItem>>;
}

/// Storage for words.
pub trait VocabularyRepository: Send + Sync {
    fn create_word(&self, word: &Word) -> anyhow::Result<()>;

    fn get_word(&self, id: Uuid) -> anyhow::Result<Option<Word>>;

    /// Look up by deduplication identity.
    fn find_word(&self, key: &WordKey) -> anyhow::Result<Option<Word>>;

    /// Replace every field of a stored word.
    fn update_word(&self, word: &Word) -> anyhow::Result<()>;

    /// Remove a word and every tracked item referencing it. Returns `false`
    /// if the word did not exist.
    fn delete_word(&self, id: Uuid) -> anyhow::Result<bool>;

    fn words_with_tag(&self, tag: &str) -> anyhow::Result<Vec<Word>>;

    fn words_for_language(&self, language_code: &str) -> anyhow::Result<Vec<Word>>;
}

// ---------------------------------------------------------------------------
// Languages
// ---------------------------------------------------------------------------

/// Resolves language identities during import.
pub trait LanguageResolver: Send + Sync {
    fn language(&self, id: Uuid) -> Option<Language>;

    fn language_by_code(&self, code: &str) -> Option<Language>;
}

// ---------------------------------------------------------------------------
// Scraping source
// ---------------------------------------------------------------------------

/// Produces raw lexical records, each importable on its own.
pub trait ScrapingSource {
    /// Human-readable source name (e.g. a file path).
    fn name(&self) -> &str;

    /// Every record the source holds. Records that cannot be decoded come
    /// back as `Err` entries rather than failing the whole read.
    fn records(&self) -> anyhow::Result<Vec<RecordEntry>>;
}
