//! Review service.
//!
//! Couples the scheduler to the record store. Every write to an existing
//! item goes through [`TrackedItemStore::modify_item`], so two reviews of
//! the same item never interleave while different items proceed freely.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::{CoreError, Result};
use crate::model::{Outcome, ProficiencyLevel, TrackedItem};
use crate::scheduler::record_review;
use crate::statistics::CollectionStats;
use crate::traits::{ItemInsert, TrackedItemStore, VocabularyRepository};

/// Tracks words for learners and records their reviews.
pub struct ReviewService {
    items: Arc<dyn TrackedItemStore>,
    words: Arc<dyn VocabularyRepository>,
}

impl ReviewService {
    pub fn new(items: Arc<dyn TrackedItemStore>, words: Arc<dyn VocabularyRepository>) -> Self {
        Self { items, words }
    }

    /// Add a word to a learner's collection at level 0, due immediately.
    pub fn track(&self, learner_id: Uuid, word_id: Uuid, now: DateTime<Utc>) -> Result<TrackedItem> {
        if self.words.get_word(word_id)?.is_none() {
            return Err(CoreError::WordNotFound(word_id));
        }

        let item = TrackedItem::new(learner_id, word_id, now);
        if let ItemInsert::AlreadyTracked(existing) = self.items.create_item(&item)? {
            return Err(CoreError::DuplicateTrackedItem { existing });
        }
        tracing::debug!(item = %item.id, learner = %learner_id, word = %word_id, "tracking word");
        Ok(item)
    }

    /// Record one review from a raw outcome string.
    ///
    /// The outcome is parsed before the store is touched, so an invalid
    /// outcome changes nothing.
    pub fn submit_review(
        &self,
        item_id: Uuid,
        outcome: &str,
        elapsed_time_ms: Option<u64>,
        now: DateTime<Utc>,
    ) -> Result<TrackedItem> {
        let outcome: Outcome = outcome.parse()?;
        self.review(item_id, outcome, elapsed_time_ms, now)
    }

    /// Record one review.
    pub fn review(
        &self,
        item_id: Uuid,
        outcome: Outcome,
        elapsed_time_ms: Option<u64>,
        now: DateTime<Utc>,
    ) -> Result<TrackedItem> {
        self.modify(item_id, |item| {
            record_review(item, outcome, elapsed_time_ms, now);
        })
    }

    /// A learner's due items, oldest due date first.
    pub fn due_items(&self, learner_id: Uuid, as_of: DateTime<Utc>) -> Result<Vec<TrackedItem>> {
        let mut due = self.items.due_before(learner_id, as_of)?;
        due.sort_by_key(|item| item.next_review_at);
        Ok(due)
    }

    pub fn items_with_tag(&self, learner_id: Uuid, tag: &str) -> Result<Vec<TrackedItem>> {
        Ok(self.items.items_with_tag(learner_id, tag)?)
    }

    pub fn items_at_level(&self, learner_id: Uuid, level: ProficiencyLevel) -> Result<Vec<TrackedItem>> {
        Ok(self
            .items
            .items_for_learner(learner_id)?
            .into_iter()
            .filter(|item| item.proficiency_level == level)
            .collect())
    }

    /// Replace an item's notes. `None` clears them.
    pub fn set_notes(&self, item_id: Uuid, notes: Option<String>) -> Result<TrackedItem> {
        self.modify(item_id, |item| item.notes = notes.clone())
    }

    pub fn add_user_tag(&self, item_id: Uuid, tag: &str) -> Result<TrackedItem> {
        self.modify(item_id, |item| {
            item.user_tags.insert(tag.to_string());
        })
    }

    pub fn remove_user_tag(&self, item_id: Uuid, tag: &str) -> Result<TrackedItem> {
        self.modify(item_id, |item| {
            item.user_tags.remove(tag);
        })
    }

    /// Remove an item from its learner's collection.
    pub fn untrack(&self, item_id: Uuid) -> Result<()> {
        if self.items.delete_item(item_id)? {
            Ok(())
        } else {
            Err(CoreError::TrackedItemNotFound(item_id))
        }
    }

    pub fn stats(&self, learner_id: Uuid, now: DateTime<Utc>) -> Result<CollectionStats> {
        let items = self.items.items_for_learner(learner_id)?;
        Ok(CollectionStats::compute(&items, now))
    }

    fn modify(&self, item_id: Uuid, mut change: impl FnMut(&mut TrackedItem)) -> Result<TrackedItem> {
        self.items
            .modify_item(item_id, &mut change)?
            .ok_or(CoreError::TrackedItemNotFound(item_id))
    }
}
