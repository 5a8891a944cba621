//! Proficiency state machine and review intervals.
//!
//! Levels run from 0 (Unknown) to 5 (Mastered):
//!
//! | outcome   | next level          |
//! |-----------|---------------------|
//! | correct   | `min(level + 1, 5)` |
//! | hard      | unchanged           |
//! | incorrect | `max(level - 1, 1)` |
//!
//! An incorrect answer never drops an item below level 1, so a level-0
//! item answered incorrectly moves up to 1.
//!
//! After the transition the item is due again at the start of today (UTC)
//! plus the interval for its new level.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::model::{Outcome, ProficiencyLevel, ReviewRecord, TrackedItem};

/// Lowest level an incorrect answer can leave an item at.
const INCORRECT_FLOOR: u8 = 1;

/// The level after one review.
pub fn next_level(level: ProficiencyLevel, outcome: Outcome) -> ProficiencyLevel {
    let value = level.value();
    let next = match outcome {
        Outcome::Correct => (value + 1).min(ProficiencyLevel::MASTERED.value()),
        Outcome::Hard => value,
        Outcome::Incorrect => value.saturating_sub(1).max(INCORRECT_FLOOR),
    };
    ProficiencyLevel::ALL[next as usize]
}

/// Days until the next review for an item at `level`.
pub fn interval_days(level: ProficiencyLevel) -> i64 {
    match level.value() {
        0 | 1 => 1,
        2 => 3,
        3 => 7,
        4 => 14,
        _ => 30,
    }
}

/// Midnight UTC of the day containing `now`.
pub fn start_of_day(now: DateTime<Utc>) -> DateTime<Utc> {
    now.date_naive().and_time(NaiveTime::MIN).and_utc()
}

/// When an item that reached `level` at `now` is next due.
pub fn next_review_at(level: ProficiencyLevel, now: DateTime<Utc>) -> DateTime<Utc> {
    start_of_day(now) + Duration::days(interval_days(level))
}

/// Apply one review to `item`.
///
/// Every new value is computed before anything is written, and the writes
/// are exactly: one history append, the level, the due date, and the
/// last-reviewed timestamp.
pub fn record_review(
    item: &mut TrackedItem,
    outcome: Outcome,
    elapsed_time_ms: Option<u64>,
    now: DateTime<Utc>,
) -> &TrackedItem {
    let level = next_level(item.proficiency_level, outcome);
    let due = next_review_at(level, now);
    let record = ReviewRecord {
        date: now.date_naive(),
        outcome,
        elapsed_time_ms,
    };

    item.review_history.append(record);
    item.proficiency_level = level;
    item.next_review_at = due;
    item.last_reviewed_at = now;

    tracing::debug!(
        item = %item.id,
        %outcome,
        level = level.value(),
        due = %due,
        "review recorded"
    );
    item
}

/// Parse a raw outcome and apply it. An unknown outcome fails with
/// [`CoreError::InvalidOutcome`](crate::error::CoreError::InvalidOutcome)
/// and leaves `item` untouched.
pub fn submit_review<'a>(
    item: &'a mut TrackedItem,
    outcome: &str,
    elapsed_time_ms: Option<u64>,
    now: DateTime<Utc>,
) -> Result<&'a TrackedItem> {
    let outcome: Outcome = outcome.parse()?;
    Ok(record_review(item, outcome, elapsed_time_ms, now))
}

/// Whether `item` should be shown again as of `as_of`.
pub fn is_due(item: &TrackedItem, as_of: DateTime<Utc>) -> bool {
    as_of >= item.next_review_at
}

/// Whole days from `today` until the item is due, never negative.
pub fn days_until_review(item: &TrackedItem, today: NaiveDate) -> i64 {
    (item.next_review_at.date_naive() - today).num_days().max(0)
}

/// What one outcome would do to an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewPreview {
    pub outcome: Outcome,
    pub level: ProficiencyLevel,
    pub interval_days: i64,
}

/// The result of each outcome from `level`, in `correct, hard, incorrect`
/// order.
pub fn preview(level: ProficiencyLevel) -> [ReviewPreview; 3] {
    Outcome::ALL.map(|outcome| {
        let level = next_level(level, outcome);
        ReviewPreview {
            outcome,
            level,
            interval_days: interval_days(level),
        }
    })
}

/// Format an interval in days as a short label.
pub fn format_interval(days: i64) -> String {
    if days <= 0 {
        "now".to_string()
    } else if days < 7 {
        format!("{days}d")
    } else if days < 30 {
        format!("{}w", days / 7)
    } else if days < 365 {
        format!("{}mo", days / 30)
    } else {
        format!("{}y", days / 365)
    }
}
