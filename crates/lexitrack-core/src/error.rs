//! Core error types.
//!
//! Only genuine failures live here. Lookups that simply find nothing (an
//! unregistered schema, a missing form, a skipped import record) are
//! expressed as empty values, `None`, or counters instead.

use thiserror::Error;
use uuid::Uuid;

/// Errors raised by the review scheduler, the form tree, and the services
/// built on top of the record store.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A review outcome outside `correct`, `hard`, `incorrect`.
    #[error("invalid review outcome: {0:?} (expected correct, hard, or incorrect)")]
    InvalidOutcome(String),

    /// A proficiency level outside 0..=5.
    #[error("proficiency level out of range: {0} (expected 0-5)")]
    InvalidLevel(i64),

    /// A word difficulty rating outside 1..=5.
    #[error("difficulty out of range: {0} (expected 1-5)")]
    InvalidDifficulty(i64),

    /// A word is missing one of its identity fields.
    #[error("invalid word: {0}")]
    InvalidWord(String),

    /// A form path with no segments.
    #[error("form path is empty")]
    EmptyFormPath,

    /// The learner already tracks this word.
    #[error("word is already in this learner's collection (item {existing})")]
    DuplicateTrackedItem { existing: Uuid },

    /// No tracked item with this id.
    #[error("tracked item not found: {0}")]
    TrackedItemNotFound(Uuid),

    /// No word with this id.
    #[error("word not found: {0}")]
    WordNotFound(Uuid),

    /// The record store failed.
    #[error("record store error: {0:#}")]
    Store(#[from] anyhow::Error),
}

impl CoreError {
    /// Returns `true` for "already exists" signals that callers should
    /// surface as-is rather than treat as failures.
    pub fn is_already_exists(&self) -> bool {
        matches!(self, CoreError::DuplicateTrackedItem { .. })
    }

    /// Returns `true` if the error was caused by caller input, so nothing
    /// was mutated and repeating the same call cannot succeed.
    pub fn is_rejected_input(&self) -> bool {
        matches!(
            self,
            CoreError::InvalidOutcome(_)
                | CoreError::InvalidLevel(_)
                | CoreError::InvalidDifficulty(_)
                | CoreError::InvalidWord(_)
                | CoreError::EmptyFormPath
        )
    }
}

pub type Result<T> = std::result::Result<T, CoreError>;
