//! Schedule Record - per-item scheduling state
//!
//! One record exists per scheduled item. It holds the cooling interval, when
//! the item is next due, and the streak of correct answers. The progress
//! marker (learning cycle or level) lives on the item and is carried here so
//! that a policy sees and mutates everything it needs in one value.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::item::LearningCycle;

/// Mutable scheduling state of one item
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleRecord {
    /// Unique identifier (UUID v4)
    pub id: String,
    /// Item this record schedules (unique)
    pub item_id: String,
    /// Item is due once this moment falls before the end of the current day
    pub next_practice_time: DateTime<Utc>,
    /// Correct answers in a row
    pub consecutive_correct: u32,
    /// Minutes to wait after the last applied answer
    pub cooling_interval: u32,
    /// Item's baseline progress
    pub learning_cycle: LearningCycle,
    /// Item's leveled progress (0 = never migrated)
    pub level: u8,
}

impl ScheduleRecord {
    /// Fresh record: interval 0, due immediately
    pub fn new(id: impl Into<String>, item_id: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            item_id: item_id.into(),
            next_practice_time: now,
            consecutive_correct: 0,
            cooling_interval: 0,
            learning_cycle: LearningCycle::NotSet,
            level: 0,
        }
    }
}

/// Progress marker as seen by a particular policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "kind", content = "value")]
pub enum Progress {
    Cycle(LearningCycle),
    Level(u8),
}

impl std::fmt::Display for Progress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Progress::Cycle(cycle) => write!(f, "{}", cycle),
            Progress::Level(level) => write!(f, "level {}", level),
        }
    }
}

/// Diagnostic view of one scheduled item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleSnapshotEntry {
    pub item_id: String,
    pub word: String,
    pub next_practice_time: DateTime<Utc>,
    pub cooling_interval: u32,
    pub consecutive_correct: u32,
    pub learning_cycle: LearningCycle,
    pub level: u8,
}
