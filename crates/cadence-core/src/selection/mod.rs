//! Selection Module
//!
//! Builds a learner's study queue from two candidate pools:
//! - **Due** items: scheduled, next practice before the end of today
//! - **Unscheduled** items: saved, fit for study, never practised
//!
//! The pools are merged, deduplicated by word, and ranked by one of two
//! orderings. Both orderings are stable sorts, so ties keep their pool order.

use std::cmp::Reverse;
use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::VocabularyItem;

/// Interval used for items that have no schedule yet
pub const UNSCHEDULED_INTERVAL: i64 = -1;

// ============================================================================
// CANDIDATE
// ============================================================================

/// An item offered for study, with its schedule state when it has one
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudyCandidate {
    pub item: VocabularyItem,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cooling_interval: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_practice_time: Option<DateTime<Utc>>,
}

impl StudyCandidate {
    /// Candidate backed by a schedule record
    pub fn scheduled(item: VocabularyItem, cooling_interval: u32, next_practice_time: DateTime<Utc>) -> Self {
        Self {
            item,
            cooling_interval: Some(cooling_interval),
            next_practice_time: Some(next_practice_time),
        }
    }

    /// Candidate that has never been practised
    pub fn unscheduled(item: VocabularyItem) -> Self {
        Self {
            item,
            cooling_interval: None,
            next_practice_time: None,
        }
    }

    pub fn is_scheduled(&self) -> bool {
        self.cooling_interval.is_some()
    }

    /// Interval used for ranking; unscheduled items rank below interval 0
    pub fn interval_key(&self) -> i64 {
        self.cooling_interval
            .map(i64::from)
            .unwrap_or(UNSCHEDULED_INTERVAL)
    }

    pub fn rank_key(&self) -> u32 {
        self.item.effective_rank()
    }
}

// ============================================================================
// ORDERING
// ============================================================================

/// How the study queue is prioritised
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum OrderingStrategy {
    /// Most common words first; among equal rank, closest to mastery first
    #[default]
    RankFirst,
    /// Closest to mastery first; among equal intervals, most common first
    IntervalFirst,
}

impl OrderingStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderingStrategy::RankFirst => "rank-first",
            OrderingStrategy::IntervalFirst => "interval-first",
        }
    }
}

impl std::fmt::Display for OrderingStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for OrderingStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "rank-first" | "rank" => Ok(OrderingStrategy::RankFirst),
            "interval-first" | "interval" => Ok(OrderingStrategy::IntervalFirst),
            _ => Err(format!("Unknown ordering strategy: {}", s)),
        }
    }
}

// ============================================================================
// OPERATIONS
// ============================================================================

/// Keep the first candidate for each word (case-insensitive), drop the rest.
///
/// The same word is often saved several times from different texts; a
/// session should show it once.
pub fn deduplicate(candidates: Vec<StudyCandidate>) -> Vec<StudyCandidate> {
    let mut seen = HashSet::with_capacity(candidates.len());
    candidates
        .into_iter()
        .filter(|c| seen.insert(c.item.dedup_key()))
        .collect()
}

/// Stable sort of the candidates by the chosen ordering
pub fn rank(mut candidates: Vec<StudyCandidate>, strategy: OrderingStrategy) -> Vec<StudyCandidate> {
    match strategy {
        OrderingStrategy::RankFirst => {
            candidates.sort_by_key(|c| (c.rank_key(), Reverse(c.interval_key())));
        }
        OrderingStrategy::IntervalFirst => {
            candidates.sort_by_key(|c| (Reverse(c.interval_key()), c.rank_key()));
        }
    }
    candidates
}

/// Merge due and unscheduled pools into a ranked queue of at most `limit`
pub fn build_queue(
    due: Vec<StudyCandidate>,
    unscheduled: Vec<StudyCandidate>,
    strategy: OrderingStrategy,
    limit: Option<usize>,
) -> Vec<StudyCandidate> {
    let merged: Vec<StudyCandidate> = due.into_iter().chain(unscheduled).collect();
    let mut queue = rank(deduplicate(merged), strategy);
    if let Some(limit) = limit {
        queue.truncate(limit);
    }
    queue
}
