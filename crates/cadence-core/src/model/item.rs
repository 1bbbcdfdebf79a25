//! Vocabulary Item - The unit of study
//!
//! Each item (a saved word with its translation) carries:
//! - The word and its language
//! - A frequency rank used to prioritise common words
//! - Study flags (learned, fit for study, learner preference)
//! - The progress marker mutated by the scheduling policies

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Rank used for words whose frequency is unknown; sorts after every real rank
pub const IMPOSSIBLE_RANK: u32 = 1_000_000;

// ============================================================================
// LEARNING CYCLE
// ============================================================================

/// Kind of knowledge being practised under the baseline policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LearningCycle {
    /// Not scheduled yet
    #[default]
    NotSet,
    /// Recognition: learner sees the word and recalls its meaning
    Receptive,
    /// Active recall: learner produces the word from its meaning
    Productive,
}

impl LearningCycle {
    /// Convert to string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            LearningCycle::NotSet => "not_set",
            LearningCycle::Receptive => "receptive",
            LearningCycle::Productive => "productive",
        }
    }

    /// Parse from string name, falling back to `NotSet`
    pub fn parse_name(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "receptive" => LearningCycle::Receptive,
            "productive" => LearningCycle::Productive,
            _ => LearningCycle::NotSet,
        }
    }
}

impl std::fmt::Display for LearningCycle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// EXERCISE PREFERENCE
// ============================================================================

/// Explicit learner preference about using an item in exercises
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ExercisePreference {
    #[default]
    NoPreference,
    UseInExercises,
    DontUseInExercises,
}

impl ExercisePreference {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExercisePreference::NoPreference => "no_preference",
            ExercisePreference::UseInExercises => "use_in_exercises",
            ExercisePreference::DontUseInExercises => "dont_use_in_exercises",
        }
    }

    pub fn parse_name(s: &str) -> Self {
        match s {
            "use_in_exercises" => ExercisePreference::UseInExercises,
            "dont_use_in_exercises" => ExercisePreference::DontUseInExercises,
            _ => ExercisePreference::NoPreference,
        }
    }
}

// ============================================================================
// VOCABULARY ITEM
// ============================================================================

/// A word saved by a learner for study
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VocabularyItem {
    /// Unique identifier (UUID v4)
    pub id: String,
    /// Learner who saved the word
    pub learner_id: String,
    /// The word as it appeared in the text
    pub word: String,
    /// Translation shown to the learner
    #[serde(skip_serializing_if = "Option::is_none")]
    pub translation: Option<String>,
    /// Language code of the word (e.g. "da")
    pub language: String,
    /// Frequency rank in the language (lower = more common)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frequency_rank: Option<u32>,

    // ========== Study Flags ==========
    /// Whether the learner has mastered the word
    pub learned: bool,
    /// When the word was marked learned
    #[serde(skip_serializing_if = "Option::is_none")]
    pub learned_at: Option<DateTime<Utc>>,
    /// Whether the word may be offered for study at all
    pub fit_for_study: bool,
    /// Explicit learner preference
    pub preference: ExercisePreference,

    // ========== Scheduling Progress ==========
    /// Baseline policy progress
    pub learning_cycle: LearningCycle,
    /// Leveled policy progress (0 = unset)
    pub level: u8,

    /// When the word was saved
    pub created_at: DateTime<Utc>,
}

impl VocabularyItem {
    /// Text used to detect the same word saved more than once
    pub fn dedup_key(&self) -> String {
        self.word.to_lowercase()
    }

    /// Frequency rank with unknown ranks pushed to the back
    pub fn effective_rank(&self) -> u32 {
        self.frequency_rank.unwrap_or(IMPOSSIBLE_RANK)
    }
}

impl Default for VocabularyItem {
    fn default() -> Self {
        Self {
            id: String::new(),
            learner_id: String::new(),
            word: String::new(),
            translation: None,
            language: String::new(),
            frequency_rank: None,
            learned: false,
            learned_at: None,
            fit_for_study: true,
            preference: ExercisePreference::NoPreference,
            learning_cycle: LearningCycle::NotSet,
            level: 0,
            created_at: Utc::now(),
        }
    }
}

/// Input for saving a new item
#[non_exhaustive]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewItem {
    pub learner_id: String,
    pub word: String,
    pub translation: Option<String>,
    pub language: String,
    pub frequency_rank: Option<u32>,
}

impl NewItem {
    pub fn new(learner_id: impl Into<String>, word: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            learner_id: learner_id.into(),
            word: word.into(),
            language: language.into(),
            ..Default::default()
        }
    }

    pub fn with_translation(mut self, translation: impl Into<String>) -> Self {
        self.translation = Some(translation.into());
        self
    }

    pub fn with_rank(mut self, rank: u32) -> Self {
        self.frequency_rank = Some(rank);
        self
    }
}
