//! Leveled policy
//!
//! Walks a short ladder (0, 1d, 2d) once per level. A correct answer at
//! 2 days moves the item up a level and restarts the ladder; a correct answer
//! at 2 days on level 4 means the item is learned.
//!
//! Items scheduled under the baseline policy have no level (0). The first
//! graded answer on such an item derives a level from its old interval, so
//! progress made on the long ladder is not lost. On that one answer a
//! promotion keeps the derived level instead of incrementing it.

use super::intervals::{legacy_level_for_interval, IntervalTable, LEVELED_INTERVALS, MAX_LEVEL};
use super::policy::{PolicyKind, SchedulingPolicy, Transition};
use crate::model::{LearnerContext, Progress, ScheduleRecord};

/// Level-based policy over the 2-day ladder
#[derive(Debug, Clone, Copy, Default)]
pub struct LeveledPolicy;

impl SchedulingPolicy for LeveledPolicy {
    fn kind(&self) -> PolicyKind {
        PolicyKind::Leveled
    }

    fn intervals(&self) -> &'static IntervalTable {
        &LEVELED_INTERVALS
    }

    fn initialize(&self, record: &mut ScheduleRecord) {
        record.level = 1;
    }

    fn progress(&self, record: &ScheduleRecord) -> Progress {
        Progress::Level(record.level)
    }

    fn prepare(&self, record: &mut ScheduleRecord) -> bool {
        if record.level != 0 {
            return false;
        }
        record.level = legacy_level_for_interval(record.cooling_interval);
        tracing::info!(
            item_id = %record.item_id,
            cooling_interval = record.cooling_interval,
            level = record.level,
            "Migrated legacy schedule to leveled policy"
        );
        true
    }

    fn promote(
        &self,
        record: &mut ScheduleRecord,
        _learner: LearnerContext,
        migrated: bool,
    ) -> Transition {
        if record.level < MAX_LEVEL || (record.level == MAX_LEVEL && migrated) {
            if !migrated {
                record.level += 1;
            }
            record.cooling_interval = 0;
            tracing::debug!(item_id = %record.item_id, level = record.level, "Item moved up a level");
            return Transition::Promoted {
                progress: self.progress(record),
            };
        }
        Transition::Learned
    }
}
