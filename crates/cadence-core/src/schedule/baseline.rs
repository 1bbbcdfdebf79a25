//! Baseline cycle-based policy
//!
//! Walks the five-rung ladder (0, 1d, 2d, 4d, 8d) once in the receptive cycle.
//! A correct answer at 8 days moves the item to the productive cycle and walks
//! the ladder again, provided the learner does productive exercises. A correct
//! answer at 8 days in the productive cycle, or in the receptive cycle when
//! productive exercises are off, means the item is learned.

use super::intervals::{IntervalTable, BASELINE_INTERVALS};
use super::policy::{PolicyKind, SchedulingPolicy, Transition};
use crate::model::{LearnerContext, LearningCycle, Progress, ScheduleRecord};

/// Cycle-based policy over the 8-day ladder
#[derive(Debug, Clone, Copy, Default)]
pub struct BaselinePolicy;

impl SchedulingPolicy for BaselinePolicy {
    fn kind(&self) -> PolicyKind {
        PolicyKind::Baseline
    }

    fn intervals(&self) -> &'static IntervalTable {
        &BASELINE_INTERVALS
    }

    fn initialize(&self, record: &mut ScheduleRecord) {
        record.learning_cycle = LearningCycle::Receptive;
    }

    fn progress(&self, record: &ScheduleRecord) -> Progress {
        Progress::Cycle(record.learning_cycle)
    }

    fn promote(
        &self,
        record: &mut ScheduleRecord,
        learner: LearnerContext,
        _migrated: bool,
    ) -> Transition {
        if record.learning_cycle == LearningCycle::Receptive && learner.productive_exercises_enabled {
            record.learning_cycle = LearningCycle::Productive;
            record.cooling_interval = 0;
            tracing::debug!(item_id = %record.item_id, "Item moved to productive cycle");
            return Transition::Promoted {
                progress: self.progress(record),
            };
        }
        Transition::Learned
    }
}
