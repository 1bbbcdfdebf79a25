//! # Cadence Core
//!
//! Spaced-repetition scheduling engine for vocabulary learning.
//!
//! - **Cooling intervals**: each practised item waits a fixed number of
//!   minutes before it is due again; correct answers climb the ladder,
//!   incorrect ones step down a rung
//! - **Two policies**: a baseline receptive/productive cycle and a leveled
//!   scheme with four short ladders
//! - **Study queue**: due and never-practised items, one per word, ranked by
//!   word frequency or by closeness to mastery
//! - **SQLite persistence**: one schedule record per item, every outcome
//!   applied in a single transaction
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use cadence_core::prelude::*;
//!
//! let storage = Storage::new(None, PolicyKind::Baseline)?;
//! let learner = storage.add_learner(NewLearner::new("Ana", "da"))?;
//! let item = storage.add_item(NewItem::new(&learner.id, "hus", "da").with_rank(312))?;
//!
//! let transition = storage.submit_outcome(&learner.id, &item.id, Outcome::Correct)?;
//! let queue = storage.study_queue(&learner.id, Some(10), OrderingStrategy::RankFirst, chrono::Utc::now())?;
//! ```

#![warn(rustdoc::missing_crate_level_docs)]

// ============================================================================
// MODULES
// ============================================================================

pub mod config;
pub mod model;
pub mod schedule;
pub mod selection;
pub mod storage;

// ============================================================================
// PUBLIC API RE-EXPORTS
// ============================================================================

pub use config::EngineConfig;

pub use model::{
    ExercisePreference, Learner, LearnerContext, LearningCycle, NewItem, NewLearner, Outcome,
    Progress, ScheduleRecord, ScheduleSnapshotEntry, VocabularyItem, IMPOSSIBLE_RANK,
};

pub use schedule::{
    BaselinePolicy, IntervalTable, LeveledPolicy, PolicyKind, SchedulingPolicy, Transition,
    BASELINE_INTERVALS, LEVELED_INTERVALS, MAX_LEVEL, ONE_DAY,
};

pub use selection::{OrderingStrategy, StudyCandidate};

pub use storage::{PipelineStats, Result, Storage, StorageError};

// ============================================================================
// VERSION INFO
// ============================================================================

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================================================
// PRELUDE
// ============================================================================

/// Convenient imports for common usage
pub mod prelude {
    pub use crate::{
        EngineConfig, Learner, NewItem, NewLearner, OrderingStrategy, Outcome, PolicyKind,
        Result, ScheduleRecord, Storage, StorageError, StudyCandidate, Transition,
        VocabularyItem,
    };
}
