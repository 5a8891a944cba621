//! Append-only review history of a tracked item.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::model::{Outcome, ReviewRecord};

/// Ordered review records, oldest first.
///
/// Records can be read but not edited or removed; only the scheduler
/// appends.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReviewHistory(Vec<ReviewRecord>);

impl ReviewHistory {
    pub(crate) fn append(&mut self, record: ReviewRecord) {
        self.0.push(record);
    }

    pub fn records(&self) -> &[ReviewRecord] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = &ReviewRecord> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn last(&self) -> Option<&ReviewRecord> {
        self.0.last()
    }

    /// Records dated on or after `date`.
    pub fn since(&self, date: NaiveDate) -> impl Iterator<Item = &ReviewRecord> {
        self.0.iter().filter(move |r| r.date >= date)
    }

    pub fn count(&self, outcome: Outcome) -> usize {
        self.0.iter().filter(|r| r.outcome == outcome).count()
    }

    /// Consecutive `correct` outcomes at the end of the history.
    pub fn current_streak(&self) -> usize {
        self.0
            .iter()
            .rev()
            .take_while(|r| r.outcome == Outcome::Correct)
            .count()
    }

    pub fn summary(&self) -> HistorySummary {
        let timed: Vec<u64> = self.0.iter().filter_map(|r| r.elapsed_time_ms).collect();
        let average_elapsed_ms = if timed.is_empty() {
            None
        } else {
            Some(timed.iter().sum::<u64>() / timed.len() as u64)
        };

        HistorySummary {
            total: self.len(),
            correct: self.count(Outcome::Correct),
            hard: self.count(Outcome::Hard),
            incorrect: self.count(Outcome::Incorrect),
            current_streak: self.current_streak(),
            average_elapsed_ms,
            last_reviewed_on: self.last().map(|r| r.date),
        }
    }
}

/// Aggregate view over a [`ReviewHistory`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistorySummary {
    pub total: usize,
    pub correct: usize,
    pub hard: usize,
    pub incorrect: usize,
    pub current_streak: usize,
    /// Mean over the records that carry a time.
    pub average_elapsed_ms: Option<u64>,
    pub last_reviewed_on: Option<NaiveDate>,
}

impl HistorySummary {
    /// Share of reviews answered `correct`, 0.0 when there are none.
    pub fn accuracy(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.correct as f64 / self.total as f64
        }
    }
}
