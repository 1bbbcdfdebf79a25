//! Persistence and concurrent submission

use std::sync::Arc;
use std::thread;

use cadence_core::{Outcome, PolicyKind, StorageError, Transition};
use cadence_e2e_tests::{StudyClock, TestDataFactory, TestDatabaseManager};

#[test]
fn test_schedule_survives_reopen() {
    let mut db = TestDatabaseManager::new_temp(PolicyKind::Baseline);
    let learner = TestDataFactory::create_learner(&db.storage, true);
    let item = TestDataFactory::create_word(&db.storage, &learner, "hus", Some(312));
    let mut clock = StudyClock::default();

    clock.answer_when_due(&db.storage, &learner, &item.id, Outcome::Correct);
    let before = db.storage.schedule_snapshot(&learner.id).unwrap();

    db.reopen(PolicyKind::Baseline);
    let after = db.storage.schedule_snapshot(&learner.id).unwrap();
    assert_eq!(before, after);

    let json = serde_json::to_value(&after).unwrap();
    assert_eq!(json[0]["word"], "hus");
    assert_eq!(json[0]["coolingInterval"], 1440);
}

#[test]
fn test_concurrent_first_answers_create_one_record() {
    let db = TestDatabaseManager::new_temp(PolicyKind::Baseline);
    let learner = TestDataFactory::create_learner(&db.storage, true);
    let item = TestDataFactory::create_word(&db.storage, &learner, "hus", Some(312));
    let now = StudyClock::default().now();

    let first = Arc::new(db.open_another(PolicyKind::Baseline));
    let second = Arc::new(db.open_another(PolicyKind::Baseline));

    let mut handles = Vec::new();
    for storage in [first, second] {
        for _ in 0..4 {
            let storage = Arc::clone(&storage);
            let learner_id = learner.id.clone();
            let item_id = item.id.clone();
            handles.push(thread::spawn(move || {
                storage
                    .submit_outcome_at(&learner_id, &item_id, Outcome::Correct, now)
                    .unwrap()
            }));
        }
    }

    let transitions: Vec<Transition> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    // the first answer schedules the word for tomorrow; the rest are early
    let applied = transitions.iter().filter(|t| t.is_applied()).count();
    assert_eq!(applied, 1);
    assert_eq!(db.scheduled_count(&learner.id), 1);
}

#[test]
fn test_submit_rejects_foreign_items() {
    let db = TestDatabaseManager::new_temp(PolicyKind::Baseline);
    let ana = TestDataFactory::create_learner(&db.storage, true);
    let bo = TestDataFactory::create_learner(&db.storage, true);
    let item = TestDataFactory::create_word(&db.storage, &ana, "hus", Some(312));

    let result = db.storage.submit_outcome(&bo.id, &item.id, Outcome::Correct);
    assert!(matches!(result, Err(StorageError::NotFound(_))));
    assert_eq!(db.scheduled_count(&ana.id), 0);
}

#[test]
fn test_database_file_outlives_its_manager() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("shared").join("cadence.db");
    let mut clock = StudyClock::default();

    let (learner_id, item_id) = {
        let db = TestDatabaseManager::new_at_path(path.clone(), PolicyKind::Leveled);
        let learner = TestDataFactory::create_learner(&db.storage, true);
        let item = TestDataFactory::create_word(&db.storage, &learner, "hus", Some(312));
        clock.answer_when_due(&db.storage, &learner, &item.id, Outcome::Correct);
        (learner.id, item.id)
    };
    assert!(path.exists());

    let db = TestDatabaseManager::new_at_path(path.clone(), PolicyKind::Leveled);
    assert_eq!(db.path(), &path);
    assert_eq!(db.item_count(&learner_id), 1);

    let record = db.storage.get_schedule(&item_id).unwrap().unwrap();
    assert_eq!(record.level, 1);
    assert_eq!(record.cooling_interval, cadence_core::ONE_DAY);
}
