//! Test Data Factory
//!
//! Provides utilities for generating realistic test data:
//! - Learners with or without productive exercises
//! - Ranked vocabularies
//! - A clock that follows an item's schedule

use chrono::{DateTime, Duration, TimeZone, Utc};
use cadence_core::{Learner, NewItem, NewLearner, Outcome, Storage, Transition, VocabularyItem};

/// A small Danish vocabulary with frequency ranks
pub const DANISH_WORDS: &[(&str, &str, u32)] = &[
    ("og", "and", 1),
    ("hus", "house", 312),
    ("bog", "book", 640),
    ("vindue", "window", 1820),
    ("sommerfugl", "butterfly", 9500),
];

/// Factory for creating test data
///
/// # Example
///
/// ```rust,ignore
/// let learner = TestDataFactory::create_learner(&storage, true);
/// let words = TestDataFactory::create_vocabulary(&storage, &learner);
/// ```
pub struct TestDataFactory;

impl TestDataFactory {
    /// Learner studying Danish
    pub fn create_learner(storage: &Storage, productive: bool) -> Learner {
        storage
            .add_learner(NewLearner::new("Test Learner", "da").with_productive_exercises(productive))
            .expect("Failed to create learner")
    }

    /// One ranked Danish word
    pub fn create_word(storage: &Storage, learner: &Learner, word: &str, rank: Option<u32>) -> VocabularyItem {
        let mut input = NewItem::new(&learner.id, word, "da");
        if let Some(rank) = rank {
            input = input.with_rank(rank);
        }
        storage.add_item(input).expect("Failed to create item")
    }

    /// Every word of [`DANISH_WORDS`], in table order
    pub fn create_vocabulary(storage: &Storage, learner: &Learner) -> Vec<VocabularyItem> {
        DANISH_WORDS
            .iter()
            .map(|(word, translation, rank)| {
                storage
                    .add_item(
                        NewItem::new(&learner.id, *word, "da")
                            .with_translation(*translation)
                            .with_rank(*rank),
                    )
                    .expect("Failed to create item")
            })
            .collect()
    }

    /// Word saved in a language the learner is not studying
    pub fn create_foreign_word(storage: &Storage, learner: &Learner, word: &str) -> VocabularyItem {
        storage
            .add_item(NewItem::new(&learner.id, word, "de"))
            .expect("Failed to create item")
    }
}

/// Simulated time for driving items along their schedule
#[derive(Debug, Clone, Copy)]
pub struct StudyClock {
    now: DateTime<Utc>,
}

impl Default for StudyClock {
    fn default() -> Self {
        Self {
            now: Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap(),
        }
    }
}

impl StudyClock {
    pub fn now(&self) -> DateTime<Utc> {
        self.now
    }

    pub fn advance(&mut self, by: Duration) {
        self.now += by;
    }

    pub fn advance_days(&mut self, days: i64) {
        self.advance(Duration::days(days));
    }

    /// Move to the item's next practice time (never backwards)
    pub fn jump_to_due(&mut self, storage: &Storage, item_id: &str) {
        if let Some(record) = storage.get_schedule(item_id).expect("Failed to read schedule") {
            if record.next_practice_time > self.now {
                self.now = record.next_practice_time;
            }
        }
    }

    /// Answer once the item is due, returning the transition
    pub fn answer_when_due(
        &mut self,
        storage: &Storage,
        learner: &Learner,
        item_id: &str,
        outcome: Outcome,
    ) -> Transition {
        self.jump_to_due(storage, item_id);
        storage
            .submit_outcome_at(&learner.id, item_id, outcome, self.now)
            .expect("Failed to submit outcome")
    }
}
