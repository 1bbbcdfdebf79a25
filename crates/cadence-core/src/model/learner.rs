//! Learner - owner of vocabulary items and study preferences

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A person studying a language
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Learner {
    /// Unique identifier (UUID v4)
    pub id: String,
    pub name: String,
    /// Language being learned; only items in this language are studied
    pub learned_language: String,
    /// Whether active-recall exercises are offered
    pub productive_exercises_enabled: bool,
    pub created_at: DateTime<Utc>,
}

impl Learner {
    /// Per-learner facts the scheduling policies need
    pub fn context(&self) -> LearnerContext {
        LearnerContext {
            productive_exercises_enabled: self.productive_exercises_enabled,
        }
    }
}

/// Input for registering a learner
#[non_exhaustive]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewLearner {
    pub name: String,
    pub learned_language: String,
    pub productive_exercises_enabled: bool,
}

impl NewLearner {
    pub fn new(name: impl Into<String>, learned_language: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            learned_language: learned_language.into(),
            productive_exercises_enabled: true,
        }
    }

    pub fn with_productive_exercises(mut self, enabled: bool) -> Self {
        self.productive_exercises_enabled = enabled;
        self
    }
}

/// Learner preferences consulted while applying an outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LearnerContext {
    pub productive_exercises_enabled: bool,
}

impl Default for LearnerContext {
    fn default() -> Self {
        Self {
            productive_exercises_enabled: true,
        }
    }
}
