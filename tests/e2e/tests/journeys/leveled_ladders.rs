//! Leveled policy: four short ladders, 0 → 1d → 2d per level

use cadence_core::{Outcome, PolicyKind, Progress, Transition, ONE_DAY};
use cadence_e2e_tests::{StudyClock, TestDataFactory, TestDatabaseManager};

#[test]
fn test_word_climbs_four_levels() {
    let db = TestDatabaseManager::new_temp(PolicyKind::Leveled);
    let learner = TestDataFactory::create_learner(&db.storage, true);
    let item = TestDataFactory::create_word(&db.storage, &learner, "hus", Some(312));
    let mut clock = StudyClock::default();

    let mut promotions = Vec::new();
    let mut answers = 0;
    loop {
        answers += 1;
        match clock.answer_when_due(&db.storage, &learner, &item.id, Outcome::Correct) {
            Transition::Promoted { progress } => promotions.push(progress),
            Transition::Learned => break,
            Transition::Advanced { .. } => {}
            other => panic!("unexpected transition {:?}", other),
        }
        assert!(answers < 20, "word never learned");
    }

    assert_eq!(
        promotions,
        vec![Progress::Level(2), Progress::Level(3), Progress::Level(4)]
    );
    assert_eq!(answers, 12);
    assert!(db.storage.get_item(&item.id).unwrap().unwrap().learned);
}

#[test]
fn test_promotion_resets_interval_but_keeps_due_time() {
    let db = TestDatabaseManager::new_temp(PolicyKind::Leveled);
    let learner = TestDataFactory::create_learner(&db.storage, true);
    let item = TestDataFactory::create_word(&db.storage, &learner, "bog", Some(640));
    let mut clock = StudyClock::default();

    clock.answer_when_due(&db.storage, &learner, &item.id, Outcome::Correct);
    clock.answer_when_due(&db.storage, &learner, &item.id, Outcome::Correct);
    let before = db.storage.get_schedule(&item.id).unwrap().unwrap();
    assert_eq!(before.cooling_interval, 2 * ONE_DAY);

    let t = clock.answer_when_due(&db.storage, &learner, &item.id, Outcome::Correct);
    assert_eq!(t, Transition::Promoted { progress: Progress::Level(2) });

    let after = db.storage.get_schedule(&item.id).unwrap().unwrap();
    assert_eq!(after.cooling_interval, 0);
    assert_eq!(after.level, 2);
    assert_eq!(after.next_practice_time, before.next_practice_time);
    assert_eq!(after.consecutive_correct, before.consecutive_correct);
}

#[test]
fn test_legacy_schedule_migrates_on_next_answer() {
    let mut db = TestDatabaseManager::new_temp(PolicyKind::Baseline);
    let learner = TestDataFactory::create_learner(&db.storage, true);
    let item = TestDataFactory::create_word(&db.storage, &learner, "vindue", Some(1820));
    let mut clock = StudyClock::default();

    // reach 4 days under the baseline policy
    for _ in 0..3 {
        clock.answer_when_due(&db.storage, &learner, &item.id, Outcome::Correct);
    }
    assert_eq!(db.storage.get_item(&item.id).unwrap().unwrap().level, 0);

    db.reopen(PolicyKind::Leveled);

    // 4 days maps to level 3; the migrating answer does not add a level
    let t = clock.answer_when_due(&db.storage, &learner, &item.id, Outcome::Correct);
    assert_eq!(t, Transition::Promoted { progress: Progress::Level(3) });

    let record = db.storage.get_schedule(&item.id).unwrap().unwrap();
    assert_eq!(record.level, 3);
    assert_eq!(record.cooling_interval, 0);
}

#[test]
fn test_legacy_long_interval_steps_down_inside_new_ladder() {
    let mut db = TestDatabaseManager::new_temp(PolicyKind::Baseline);
    let learner = TestDataFactory::create_learner(&db.storage, false);
    let item = TestDataFactory::create_word(&db.storage, &learner, "bog", Some(640));
    let mut clock = StudyClock::default();

    for _ in 0..4 {
        clock.answer_when_due(&db.storage, &learner, &item.id, Outcome::Correct);
    }
    assert_eq!(
        db.storage.get_schedule(&item.id).unwrap().unwrap().cooling_interval,
        8 * ONE_DAY
    );

    db.reopen(PolicyKind::Leveled);
    let t = clock.answer_when_due(&db.storage, &learner, &item.id, Outcome::Incorrect);
    assert!(matches!(t, Transition::Regressed { cooling_interval, .. } if cooling_interval == ONE_DAY));
    assert_eq!(db.storage.get_item(&item.id).unwrap().unwrap().level, 4);
}

#[test]
fn test_bulk_level_migration() {
    let mut db = TestDatabaseManager::new_temp(PolicyKind::Baseline);
    let learner = TestDataFactory::create_learner(&db.storage, true);
    let words = TestDataFactory::create_vocabulary(&db.storage, &learner);
    let mut clock = StudyClock::default();

    clock.answer_when_due(&db.storage, &learner, &words[0].id, Outcome::Correct);
    clock.answer_when_due(&db.storage, &learner, &words[1].id, Outcome::Correct);
    clock.answer_when_due(&db.storage, &learner, &words[1].id, Outcome::Correct);

    db.reopen(PolicyKind::Leveled);
    assert_eq!(db.storage.migrate_legacy_levels(&learner.id).unwrap(), 2);

    let snapshot = db.storage.schedule_snapshot(&learner.id).unwrap();
    let level_of = |id: &str| snapshot.iter().find(|e| e.item_id == id).map(|e| e.level);
    assert_eq!(level_of(&words[0].id), Some(1));
    assert_eq!(level_of(&words[1].id), Some(2));
}
