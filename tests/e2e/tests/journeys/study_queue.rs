//! Study queue: due plus never-practised items, one per word

use cadence_core::{OrderingStrategy, Outcome, PolicyKind, Transition};
use cadence_e2e_tests::{StudyClock, TestDataFactory, TestDatabaseManager};

fn words(queue: &[cadence_core::StudyCandidate]) -> Vec<String> {
    queue.iter().map(|c| c.item.word.clone()).collect()
}

#[test]
fn test_new_learner_queue_is_ranked_by_frequency() {
    let db = TestDatabaseManager::new_temp(PolicyKind::Baseline);
    let learner = TestDataFactory::create_learner(&db.storage, true);
    TestDataFactory::create_word(&db.storage, &learner, "ukendt", None);
    TestDataFactory::create_vocabulary(&db.storage, &learner);
    TestDataFactory::create_foreign_word(&db.storage, &learner, "Haus");

    let queue = db
        .storage
        .study_queue(&learner.id, None, OrderingStrategy::RankFirst, StudyClock::default().now())
        .unwrap();

    assert_eq!(
        words(&queue),
        vec!["og", "hus", "bog", "vindue", "sommerfugl", "ukendt"]
    );
    assert!(queue.iter().all(|c| !c.is_scheduled()));
}

#[test]
fn test_interval_first_puts_advanced_words_first() {
    let db = TestDatabaseManager::new_temp(PolicyKind::Baseline);
    let learner = TestDataFactory::create_learner(&db.storage, true);
    let vocab = TestDataFactory::create_vocabulary(&db.storage, &learner);
    let mut clock = StudyClock::default();

    // "vindue" to 2 days, "bog" to 1 day
    let t1 = clock.answer_when_due(&db.storage, &learner, &vocab[3].id, Outcome::Correct);
    let t2 = clock.answer_when_due(&db.storage, &learner, &vocab[2].id, Outcome::Correct);
    assert!(t1.is_applied() && t2.is_applied());
    clock.answer_when_due(&db.storage, &learner, &vocab[3].id, Outcome::Correct);
    clock.advance_days(2);

    let queue = db
        .storage
        .study_queue(&learner.id, None, OrderingStrategy::IntervalFirst, clock.now())
        .unwrap();
    assert_eq!(
        words(&queue),
        vec!["vindue", "bog", "og", "hus", "sommerfugl"]
    );
    assert_eq!(queue[0].interval_key(), 2 * cadence_core::ONE_DAY as i64);

    let limited = db
        .storage
        .study_queue(&learner.id, Some(2), OrderingStrategy::IntervalFirst, clock.now())
        .unwrap();
    assert_eq!(limited.len(), 2);
}

#[test]
fn test_words_not_yet_due_are_left_out() {
    let db = TestDatabaseManager::new_temp(PolicyKind::Baseline);
    let learner = TestDataFactory::create_learner(&db.storage, true);
    let vocab = TestDataFactory::create_vocabulary(&db.storage, &learner);
    let mut clock = StudyClock::default();

    clock.answer_when_due(&db.storage, &learner, &vocab[0].id, Outcome::Correct);

    let today = db
        .storage
        .study_queue(&learner.id, None, OrderingStrategy::RankFirst, clock.now())
        .unwrap();
    assert!(!words(&today).contains(&"og".to_string()));

    clock.advance_days(1);
    let tomorrow = db
        .storage
        .study_queue(&learner.id, None, OrderingStrategy::RankFirst, clock.now())
        .unwrap();
    assert_eq!(tomorrow[0].item.word, "og");
    assert!(tomorrow[0].is_scheduled());
}

#[test]
fn test_duplicate_saves_show_once() {
    let db = TestDatabaseManager::new_temp(PolicyKind::Baseline);
    let learner = TestDataFactory::create_learner(&db.storage, true);
    TestDataFactory::create_word(&db.storage, &learner, "Hus", Some(312));
    TestDataFactory::create_word(&db.storage, &learner, "hus", Some(312));
    TestDataFactory::create_word(&db.storage, &learner, "HUS", Some(312));

    let queue = db
        .storage
        .study_queue(&learner.id, None, OrderingStrategy::RankFirst, StudyClock::default().now())
        .unwrap();
    assert_eq!(words(&queue), vec!["Hus"]);
    assert_eq!(db.item_count(&learner.id), 3);
}

#[test]
fn test_productive_words_wait_while_productive_is_off() {
    let db = TestDatabaseManager::new_temp(PolicyKind::Baseline);
    let learner = TestDataFactory::create_learner(&db.storage, true);
    let item = TestDataFactory::create_word(&db.storage, &learner, "hus", Some(312));
    let mut clock = StudyClock::default();

    for _ in 0..5 {
        clock.answer_when_due(&db.storage, &learner, &item.id, Outcome::Correct);
    }
    assert_eq!(
        db.storage.get_item(&item.id).unwrap().unwrap().learning_cycle,
        cadence_core::LearningCycle::Productive
    );

    db.storage.set_productive_exercises(&learner.id, false).unwrap();
    let queue = db
        .storage
        .study_queue(&learner.id, None, OrderingStrategy::RankFirst, clock.now())
        .unwrap();
    assert!(queue.is_empty());

    db.storage.set_productive_exercises(&learner.id, true).unwrap();
    let queue = db
        .storage
        .study_queue(&learner.id, None, OrderingStrategy::RankFirst, clock.now())
        .unwrap();
    assert_eq!(words(&queue), vec!["hus"]);
}

#[test]
fn test_cleared_word_starts_over() {
    let db = TestDatabaseManager::new_temp(PolicyKind::Baseline);
    let learner = TestDataFactory::create_learner(&db.storage, true);
    let item = TestDataFactory::create_word(&db.storage, &learner, "hus", Some(312));
    let mut clock = StudyClock::default();

    clock.answer_when_due(&db.storage, &learner, &item.id, Outcome::Correct);
    clock.answer_when_due(&db.storage, &learner, &item.id, Outcome::Correct);
    assert!(db.storage.clear_schedule(&item.id).unwrap());

    let stats = db.storage.pipeline_stats(&learner.id, clock.now()).unwrap();
    assert_eq!(stats.in_pipeline, 0);
    assert_eq!(stats.unscheduled, 1);

    let t = db
        .storage
        .submit_outcome_at(&learner.id, &item.id, Outcome::Correct, clock.now())
        .unwrap();
    assert!(matches!(t, Transition::Advanced { cooling_interval, .. } if cooling_interval == cadence_core::ONE_DAY));
}

#[test]
fn test_short_session_offers_most_common_word() {
    let db = TestDatabaseManager::new_temp(PolicyKind::Baseline);
    let learner = TestDataFactory::create_learner(&db.storage, true);
    TestDataFactory::create_word(&db.storage, &learner, "sjaelden", Some(900));
    TestDataFactory::create_word(&db.storage, &learner, "vindue", Some(800));
    TestDataFactory::create_word(&db.storage, &learner, "og", Some(1));
    let now = StudyClock::default().now();

    let full = db
        .storage
        .study_queue(&learner.id, None, OrderingStrategy::RankFirst, now)
        .unwrap();
    let limited = db
        .storage
        .study_queue(&learner.id, Some(1), OrderingStrategy::RankFirst, now)
        .unwrap();

    assert_eq!(words(&full)[0], "og");
    assert_eq!(words(&limited), vec!["og"]);
}

#[test]
fn test_short_session_offers_most_advanced_word() {
    let db = TestDatabaseManager::new_temp(PolicyKind::Baseline);
    let learner = TestDataFactory::create_learner(&db.storage, true);
    let old = TestDataFactory::create_word(&db.storage, &learner, "bog", Some(640));
    let newer = TestDataFactory::create_word(&db.storage, &learner, "vindue", Some(1820));
    let mut clock = StudyClock::default();

    // "bog" answered wrong stays at 0; "vindue" climbs to 2 days
    clock.answer_when_due(&db.storage, &learner, &old.id, Outcome::Incorrect);
    clock.answer_when_due(&db.storage, &learner, &newer.id, Outcome::Correct);
    clock.answer_when_due(&db.storage, &learner, &newer.id, Outcome::Correct);
    clock.advance_days(2);

    let limited = db
        .storage
        .study_queue(&learner.id, Some(1), OrderingStrategy::IntervalFirst, clock.now())
        .unwrap();
    assert_eq!(words(&limited), vec!["vindue"]);
}
