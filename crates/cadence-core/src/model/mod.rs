//! Model module - Core types and data structures
//!
//! - Learners and their study preferences
//! - Vocabulary items with frequency rank and study flags
//! - Schedule records holding cooling-interval state
//! - Practice outcomes

mod item;
mod learner;
mod record;

pub use item::{ExercisePreference, LearningCycle, NewItem, VocabularyItem, IMPOSSIBLE_RANK};
pub use learner::{Learner, LearnerContext, NewLearner};
pub use record::{Progress, ScheduleRecord, ScheduleSnapshotEntry};

use serde::{Deserialize, Serialize};

// ============================================================================
// OUTCOME
// ============================================================================

/// Result of a practice attempt, or feedback asking to stop scheduling an item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Correct,
    Incorrect,
    /// "Never show me this again"; not a graded attempt
    OtherFeedback,
}

impl Outcome {
    /// Whether the attempt counts as a success
    pub fn is_correct(&self) -> bool {
        matches!(self, Outcome::Correct)
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::Correct => write!(f, "correct"),
            Outcome::Incorrect => write!(f, "incorrect"),
            Outcome::OtherFeedback => write!(f, "other_feedback"),
        }
    }
}

impl std::str::FromStr for Outcome {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "correct" | "c" => Ok(Outcome::Correct),
            "incorrect" | "wrong" | "w" => Ok(Outcome::Incorrect),
            "other_feedback" | "feedback" | "f" => Ok(Outcome::OtherFeedback),
            _ => Err(format!("Unknown outcome: {}", s)),
        }
    }
}
