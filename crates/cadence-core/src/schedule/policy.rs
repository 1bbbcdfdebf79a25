//! Scheduling policy contract
//!
//! A policy turns one practice outcome into a new schedule state. Both
//! policies share the same flow:
//!
//! 1. Explicit feedback drops the item, whatever its state.
//! 2. Answers on items that are not due yet are ignored.
//! 3. A correct answer climbs the interval ladder; at the top rung the
//!    policy either promotes the item (new cycle or level, interval back to 0)
//!    or retires it as learned.
//! 4. An incorrect answer drops one rung and breaks the streak.
//!
//! Policies differ only in their ladder, how a fresh record is initialised,
//! and what happens at the top rung.

use chrono::{DateTime, Duration, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use super::intervals::IntervalTable;
use super::{BaselinePolicy, LeveledPolicy};
use crate::model::{LearnerContext, Outcome, Progress, ScheduleRecord};

// ============================================================================
// TRANSITION
// ============================================================================

/// Effect of applying one outcome to a schedule record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "type")]
pub enum Transition {
    /// Item was not due yet; nothing changed
    Ignored,
    /// Learner asked never to see the item again; record must be deleted
    Dropped,
    /// Correct answer below the top rung
    Advanced {
        cooling_interval: u32,
        next_practice_time: DateTime<Utc>,
    },
    /// Incorrect answer
    Regressed {
        cooling_interval: u32,
        next_practice_time: DateTime<Utc>,
    },
    /// Top rung reached; progress moved on and interval reset to 0
    Promoted { progress: Progress },
    /// Item mastered; record must be deleted and item flagged learned
    Learned,
}

impl Transition {
    /// False only for stale submissions
    pub fn is_applied(&self) -> bool {
        !matches!(self, Transition::Ignored)
    }

    /// Whether the schedule record stops existing after this transition
    pub fn removes_record(&self) -> bool {
        matches!(self, Transition::Dropped | Transition::Learned)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Transition::Ignored => "ignored",
            Transition::Dropped => "dropped",
            Transition::Advanced { .. } => "advanced",
            Transition::Regressed { .. } => "regressed",
            Transition::Promoted { .. } => "promoted",
            Transition::Learned => "learned",
        }
    }
}

// ============================================================================
// POLICY KIND
// ============================================================================

/// Which scheduling policy a deployment runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PolicyKind {
    /// Five-rung ladder with a receptive then productive cycle
    #[default]
    Baseline,
    /// Three-rung ladder repeated over four levels
    Leveled,
}

impl PolicyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PolicyKind::Baseline => "baseline",
            PolicyKind::Leveled => "leveled",
        }
    }

    /// Instantiate the policy
    pub fn build(&self) -> Box<dyn SchedulingPolicy> {
        match self {
            PolicyKind::Baseline => Box::new(BaselinePolicy),
            PolicyKind::Leveled => Box::new(LeveledPolicy),
        }
    }
}

impl std::fmt::Display for PolicyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for PolicyKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "baseline" | "basic" => Ok(PolicyKind::Baseline),
            "leveled" | "levels" => Ok(PolicyKind::Leveled),
            _ => Err(format!("Unknown scheduling policy: {}", s)),
        }
    }
}

// ============================================================================
// DAY BOUNDARY
// ============================================================================

/// Midnight (UTC) at the start of the day after `now`.
///
/// Everything scheduled before this moment counts as due today.
pub fn end_of_day(now: DateTime<Utc>) -> DateTime<Utc> {
    let tomorrow = now.date_naive() + Duration::days(1);
    tomorrow.and_time(NaiveTime::MIN).and_utc()
}

/// Whether an answer on this record arrives ahead of schedule
pub fn is_stale(record: &ScheduleRecord, now: DateTime<Utc>) -> bool {
    record.next_practice_time > end_of_day(now)
}

// ============================================================================
// POLICY TRAIT
// ============================================================================

/// A cooling-interval scheduling policy
pub trait SchedulingPolicy: Send + Sync + std::fmt::Debug {
    fn kind(&self) -> PolicyKind;

    /// Ladder this policy walks
    fn intervals(&self) -> &'static IntervalTable;

    /// Set the progress marker of a record that was just created
    fn initialize(&self, record: &mut ScheduleRecord);

    /// Progress marker as this policy reads it
    fn progress(&self, record: &ScheduleRecord) -> Progress;

    /// Runs before every graded answer. Returns true when this answer
    /// migrated the record from an older scheme.
    fn prepare(&self, _record: &mut ScheduleRecord) -> bool {
        false
    }

    /// Correct answer at the top rung: promote or retire the item
    fn promote(
        &self,
        record: &mut ScheduleRecord,
        learner: LearnerContext,
        migrated: bool,
    ) -> Transition;

    /// Apply one outcome. Mutates `record` in place unless the result is
    /// `Ignored` or `Dropped`.
    fn apply(
        &self,
        record: &mut ScheduleRecord,
        outcome: Outcome,
        learner: LearnerContext,
        now: DateTime<Utc>,
    ) -> Transition {
        if outcome == Outcome::OtherFeedback {
            return Transition::Dropped;
        }
        if is_stale(record, now) {
            return Transition::Ignored;
        }

        let migrated = self.prepare(record);
        let table = self.intervals();

        if outcome.is_correct() {
            if table.is_at_max(record.cooling_interval) {
                return self.promote(record, learner, migrated);
            }
            record.cooling_interval = table.next(record.cooling_interval);
            record.consecutive_correct = record.consecutive_correct.saturating_add(1);
            record.next_practice_time = now + Duration::minutes(i64::from(record.cooling_interval));
            Transition::Advanced {
                cooling_interval: record.cooling_interval,
                next_practice_time: record.next_practice_time,
            }
        } else {
            record.cooling_interval = table.previous(record.cooling_interval);
            record.consecutive_correct = 0;
            record.next_practice_time = now + Duration::minutes(i64::from(record.cooling_interval));
            Transition::Regressed {
                cooling_interval: record.cooling_interval,
                next_practice_time: record.next_practice_time,
            }
        }
    }
}
