//! Store error types.

use thiserror::Error;
use uuid::Uuid;

/// Errors raised by the in-memory record store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// An item with this id is already stored.
    #[error("tracked item already stored: {0}")]
    DuplicateItem(Uuid),

    /// A word with the same (language, text, word class) is already stored.
    #[error("word already stored: {0}")]
    DuplicateWord(String),

    /// Update of an item that is not stored.
    #[error("tracked item not stored: {0}")]
    ItemNotFound(Uuid),

    /// Update of a word that is not stored.
    #[error("word not stored: {0}")]
    WordNotFound(Uuid),

    /// A tracked item references a word that is not stored.
    #[error("tracked item {item} references unknown word {word}")]
    DanglingWord { item: Uuid, word: Uuid },

    /// A thread panicked while holding the store lock.
    #[error("store lock poisoned")]
    LockPoisoned,
}
