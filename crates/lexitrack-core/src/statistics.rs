//! Collection statistics over a learner's tracked items.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{Outcome, ProficiencyLevel, TrackedItem};
use crate::scheduler::is_due;

/// Snapshot of one learner's collection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionStats {
    /// Number of tracked items.
    pub total: usize,
    /// Item count per proficiency level, indexed by level.
    pub by_level: [usize; 6],
    /// Items due as of the snapshot time.
    pub due: usize,
    pub mastered: usize,
    /// Reviews dated on the snapshot day.
    pub reviews_today: usize,
    pub correct_today: usize,
}

impl CollectionStats {
    /// Compute stats for `items` as of `now`.
    pub fn compute<'a>(items: impl IntoIterator<Item = &'a TrackedItem>, now: DateTime<Utc>) -> Self {
        let today = now.date_naive();
        let mut stats = Self::default();

        for item in items {
            stats.total += 1;
            stats.by_level[item.proficiency_level.value() as usize] += 1;
            if is_due(item, now) {
                stats.due += 1;
            }
            if item.proficiency_level == ProficiencyLevel::MASTERED {
                stats.mastered += 1;
            }
            for record in item.review_history.iter().filter(|r| r.date == today) {
                stats.reviews_today += 1;
                if record.outcome == Outcome::Correct {
                    stats.correct_today += 1;
                }
            }
        }
        stats
    }

    /// Items at `level`.
    pub fn at_level(&self, level: ProficiencyLevel) -> usize {
        self.by_level[level.value() as usize]
    }

    /// Share of today's reviews answered correctly, 0.0 with no reviews.
    pub fn accuracy_today(&self) -> f64 {
        if self.reviews_today == 0 {
            0.0
        } else {
            self.correct_today as f64 / self.reviews_today as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::record_review;
    use chrono::{Duration, TimeZone};
    use uuid::Uuid;

    #[test]
    fn counts_levels_due_and_today() {
        let now = Utc.with_ymd_and_hms(2025, 6, 2, 9, 0, 0).unwrap();
        let yesterday = now - Duration::days(1);
        let learner = Uuid::new_v4();

        let fresh = TrackedItem::new(learner, Uuid::new_v4(), yesterday);

        let mut reviewed = TrackedItem::new(learner, Uuid::new_v4(), yesterday);
        record_review(&mut reviewed, Outcome::Correct, None, yesterday);
        record_review(&mut reviewed, Outcome::Correct, None, now);
        record_review(&mut reviewed, Outcome::Incorrect, None, now);

        let mut mastered = TrackedItem::new(learner, Uuid::new_v4(), yesterday);
        mastered.proficiency_level = ProficiencyLevel::MASTERED;
        mastered.next_review_at = now + Duration::days(20);

        let stats = CollectionStats::compute([&fresh, &reviewed, &mastered], now);
        assert_eq!(stats.total, 3);
        assert_eq!(stats.at_level(ProficiencyLevel::UNKNOWN), 1);
        assert_eq!(stats.at_level(ProficiencyLevel::SEEN), 1);
        assert_eq!(stats.mastered, 1);
        // Only the fresh item is due; the reviewed one moved to tomorrow.
        assert_eq!(stats.due, 1);
        assert_eq!(stats.reviews_today, 2);
        assert_eq!(stats.correct_today, 1);
        assert!((stats.accuracy_today() - 0.5).abs() < 1e-9);
    }

    #[test]
    fn empty_collection() {
        let stats = CollectionStats::compute(std::iter::empty(), Utc::now());
        assert_eq!(stats, CollectionStats::default());
        assert_eq!(stats.accuracy_today(), 0.0);
    }
}
