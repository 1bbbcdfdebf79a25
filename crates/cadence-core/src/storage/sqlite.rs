//! SQLite Storage Implementation
//!
//! Persists learners, vocabulary items and schedule records, and runs the
//! scheduling policy inside one transaction per submitted outcome.

use chrono::{DateTime, SecondsFormat, Utc};
use directories::ProjectDirs;
use rusqlite::{params, Connection, OptionalExtension, TransactionBehavior};
use std::path::PathBuf;
use std::sync::Mutex;
use uuid::Uuid;

use crate::config::{EngineConfig, DB_FILE_NAME};
use crate::model::{
    ExercisePreference, Learner, LearningCycle, NewItem, NewLearner, Outcome, ScheduleRecord,
    ScheduleSnapshotEntry, VocabularyItem, IMPOSSIBLE_RANK,
};
use crate::schedule::{
    end_of_day, legacy_level_for_interval, validate_interval_tables, PolicyKind, SchedulingPolicy,
    Transition,
};
use crate::selection::{build_queue, OrderingStrategy, StudyCandidate};

// ============================================================================
// ERROR TYPES
// ============================================================================

/// Storage error type
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),
    /// Learner, item or schedule not found
    #[error("Not found: {0}")]
    NotFound(String),
    /// Stored data breaks an invariant (e.g. two schedules for one item)
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// Invalid timestamp
    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),
    /// Initialization error
    #[error("Initialization error: {0}")]
    Init(String),
}

/// Storage result type
pub type Result<T> = std::result::Result<T, StorageError>;

/// Counts describing a learner's study pipeline
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineStats {
    /// Items with a schedule record
    pub in_pipeline: i64,
    /// Scheduled items due before the end of today
    pub due_today: i64,
    /// Items fit for study that were never practised
    pub unscheduled: i64,
    /// Items retired as learned
    pub learned: i64,
}

// ============================================================================
// STORAGE
// ============================================================================

/// Main storage struct
///
/// Uses separate reader/writer connections for interior mutability.
/// All methods take `&self`, making Storage `Send + Sync` so callers can
/// share an `Arc<Storage>`.
pub struct Storage {
    writer: Mutex<Connection>,
    reader: Mutex<Connection>,
    policy: Box<dyn SchedulingPolicy>,
}

impl Storage {
    /// Apply PRAGMAs to a connection
    fn configure_connection(conn: &Connection) -> Result<()> {
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;
             PRAGMA foreign_keys = ON;
             PRAGMA busy_timeout = 5000;
             PRAGMA temp_store = MEMORY;",
        )?;

        Ok(())
    }

    /// Create new storage instance running the given policy
    pub fn new(db_path: Option<PathBuf>, policy: PolicyKind) -> Result<Self> {
        validate_interval_tables()
            .map_err(|e| StorageError::Init(format!("Invalid interval table: {}", e)))?;

        let path = match db_path {
            Some(p) => p,
            None => {
                let proj_dirs = ProjectDirs::from("com", "cadence", "core").ok_or_else(|| {
                    StorageError::Init("Could not determine project directories".to_string())
                })?;

                let data_dir = proj_dirs.data_dir();
                std::fs::create_dir_all(data_dir)?;
                data_dir.join(DB_FILE_NAME)
            }
        };

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        // Open writer connection
        let writer_conn = Connection::open(&path)?;
        Self::configure_connection(&writer_conn)?;

        // Apply migrations on writer only
        super::migrations::apply_migrations(&writer_conn)?;

        // Open reader connection to same path
        let reader_conn = Connection::open(&path)?;
        Self::configure_connection(&reader_conn)?;

        tracing::info!(path = %path.display(), policy = %policy, "Storage opened");

        Ok(Self {
            writer: Mutex::new(writer_conn),
            reader: Mutex::new(reader_conn),
            policy: policy.build(),
        })
    }

    /// Create storage from engine configuration
    pub fn open(config: &EngineConfig) -> Result<Self> {
        Self::new(config.db_path(), config.policy)
    }

    /// Active scheduling policy
    pub fn policy(&self) -> &dyn SchedulingPolicy {
        self.policy.as_ref()
    }

    fn lock_writer(&self) -> Result<std::sync::MutexGuard<'_, Connection>> {
        self.writer
            .lock()
            .map_err(|_| StorageError::Init("Writer lock poisoned".into()))
    }

    fn lock_reader(&self) -> Result<std::sync::MutexGuard<'_, Connection>> {
        self.reader
            .lock()
            .map_err(|_| StorageError::Init("Reader lock poisoned".into()))
    }

    /// Fixed-width RFC3339 so stored timestamps compare correctly as text
    fn format_timestamp(value: &DateTime<Utc>) -> String {
        value.to_rfc3339_opts(SecondsFormat::Micros, true)
    }

    /// Parse RFC3339 timestamp
    fn parse_timestamp(value: &str, field_name: &str) -> rusqlite::Result<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(value)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| {
                rusqlite::Error::FromSqlConversionFailure(
                    0,
                    rusqlite::types::Type::Text,
                    Box::new(StorageError::InvalidTimestamp(format!(
                        "{} '{}': {}",
                        field_name, value, e
                    ))),
                )
            })
    }

    fn limit_param(limit: Option<usize>) -> i64 {
        // SQLite treats a negative LIMIT as unbounded
        limit
            .map(|l| i64::try_from(l).unwrap_or(i64::MAX))
            .unwrap_or(-1)
    }

    // ========================================================================
    // LEARNERS
    // ========================================================================

    /// Register a learner
    pub fn add_learner(&self, input: NewLearner) -> Result<Learner> {
        let now = Utc::now();
        let id = Uuid::new_v4().to_string();

        {
            let writer = self.lock_writer()?;
            writer.execute(
                "INSERT INTO learners (id, name, learned_language, productive_exercises_enabled, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    id,
                    input.name,
                    input.learned_language,
                    input.productive_exercises_enabled,
                    Self::format_timestamp(&now),
                ],
            )?;
        }

        self.get_learner(&id)?
            .ok_or_else(|| StorageError::NotFound(format!("learner {}", id)))
    }

    /// Get a learner by ID
    pub fn get_learner(&self, id: &str) -> Result<Option<Learner>> {
        let reader = self.lock_reader()?;
        Self::load_learner(&reader, id)
    }

    fn require_learner(&self, id: &str) -> Result<Learner> {
        self.get_learner(id)?
            .ok_or_else(|| StorageError::NotFound(format!("learner {}", id)))
    }

    /// Turn productive (active recall) exercises on or off for a learner
    pub fn set_productive_exercises(&self, learner_id: &str, enabled: bool) -> Result<Learner> {
        {
            let writer = self.lock_writer()?;
            let rows = writer.execute(
                "UPDATE learners SET productive_exercises_enabled = ?1 WHERE id = ?2",
                params![enabled, learner_id],
            )?;
            if rows == 0 {
                return Err(StorageError::NotFound(format!("learner {}", learner_id)));
            }
        }
        self.require_learner(learner_id)
    }

    fn load_learner(conn: &Connection, id: &str) -> Result<Option<Learner>> {
        let learner = conn
            .query_row("SELECT * FROM learners WHERE id = ?1", params![id], |row| {
                Self::row_to_learner(row)
            })
            .optional()?;
        Ok(learner)
    }

    fn row_to_learner(row: &rusqlite::Row) -> rusqlite::Result<Learner> {
        let created_at: String = row.get("created_at")?;
        Ok(Learner {
            id: row.get("id")?,
            name: row.get("name")?,
            learned_language: row.get("learned_language")?,
            productive_exercises_enabled: row.get("productive_exercises_enabled")?,
            created_at: Self::parse_timestamp(&created_at, "created_at")?,
        })
    }

    // ========================================================================
    // ITEMS
    // ========================================================================

    /// Save a vocabulary item for a learner
    pub fn add_item(&self, input: NewItem) -> Result<VocabularyItem> {
        let now = Utc::now();
        let id = Uuid::new_v4().to_string();

        {
            let writer = self.lock_writer()?;
            if Self::load_learner(&writer, &input.learner_id)?.is_none() {
                return Err(StorageError::NotFound(format!("learner {}", input.learner_id)));
            }
            writer.execute(
                "INSERT INTO items (id, learner_id, word, translation, language, frequency_rank, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    id,
                    input.learner_id,
                    input.word,
                    input.translation,
                    input.language,
                    input.frequency_rank,
                    Self::format_timestamp(&now),
                ],
            )?;
        }

        self.get_item(&id)?
            .ok_or_else(|| StorageError::NotFound(format!("item {}", id)))
    }

    /// Get an item by ID
    pub fn get_item(&self, id: &str) -> Result<Option<VocabularyItem>> {
        let reader = self.lock_reader()?;
        Self::load_item(&reader, id)
    }

    /// All items saved by a learner, oldest first
    pub fn get_items(&self, learner_id: &str) -> Result<Vec<VocabularyItem>> {
        let reader = self.lock_reader()?;
        let mut stmt = reader.prepare(
            "SELECT * FROM items WHERE learner_id = ?1 ORDER BY created_at ASC, rowid ASC",
        )?;
        let items = stmt.query_map(params![learner_id], |row| Self::row_to_item(row))?;

        let mut result = Vec::new();
        for item in items {
            result.push(item?);
        }
        Ok(result)
    }

    fn load_item(conn: &Connection, id: &str) -> Result<Option<VocabularyItem>> {
        let item = conn
            .query_row("SELECT * FROM items WHERE id = ?1", params![id], |row| {
                Self::row_to_item(row)
            })
            .optional()?;
        Ok(item)
    }

    /// Convert a row to VocabularyItem
    fn row_to_item(row: &rusqlite::Row) -> rusqlite::Result<VocabularyItem> {
        let created_at: String = row.get("created_at")?;
        let learned_at: Option<String> = row.get("learned_at")?;
        let preference: String = row.get("user_preference")?;
        let learning_cycle: String = row.get("learning_cycle")?;

        let learned_at = match learned_at {
            Some(s) => Some(Self::parse_timestamp(&s, "learned_at")?),
            None => None,
        };

        Ok(VocabularyItem {
            id: row.get("id")?,
            learner_id: row.get("learner_id")?,
            word: row.get("word")?,
            translation: row.get("translation")?,
            language: row.get("language")?,
            frequency_rank: row.get("frequency_rank")?,
            learned: row.get("learned")?,
            learned_at,
            fit_for_study: row.get("fit_for_study")?,
            preference: ExercisePreference::parse_name(&preference),
            learning_cycle: LearningCycle::parse_name(&learning_cycle),
            level: row.get("level")?,
            created_at: Self::parse_timestamp(&created_at, "created_at")?,
        })
    }

    // ========================================================================
    // SCHEDULE RECORDS
    // ========================================================================

    /// Get the schedule record of an item
    pub fn get_schedule(&self, item_id: &str) -> Result<Option<ScheduleRecord>> {
        let reader = self.lock_reader()?;
        Self::find_schedule(&reader, item_id)
    }

    /// Delete an item's schedule; the item becomes unscheduled again
    pub fn clear_schedule(&self, item_id: &str) -> Result<bool> {
        let writer = self.lock_writer()?;
        let rows = writer.execute("DELETE FROM schedules WHERE item_id = ?1", params![item_id])?;
        Ok(rows > 0)
    }

    fn find_schedule(conn: &Connection, item_id: &str) -> Result<Option<ScheduleRecord>> {
        let mut stmt = conn.prepare(
            "SELECT s.id, s.item_id, s.next_practice_time, s.consecutive_correct,
                    s.cooling_interval, i.learning_cycle, i.level
             FROM schedules s
             JOIN items i ON i.id = s.item_id
             WHERE s.item_id = ?1",
        )?;
        let rows = stmt.query_map(params![item_id], |row| Self::row_to_schedule(row))?;

        let mut records = Vec::new();
        for record in rows {
            records.push(record?);
        }
        single_record(item_id, records)
    }

    /// Insert a schedule for `item` unless one exists, then read it back.
    ///
    /// Must run inside the caller's transaction so creation and the first
    /// update commit together.
    fn find_or_create_schedule(
        conn: &Connection,
        policy: &dyn SchedulingPolicy,
        item: &VocabularyItem,
        now: DateTime<Utc>,
    ) -> Result<ScheduleRecord> {
        let mut fresh = ScheduleRecord::new(Uuid::new_v4().to_string(), item.id.clone(), now);
        fresh.learning_cycle = item.learning_cycle;
        fresh.level = item.level;
        policy.initialize(&mut fresh);

        let inserted = conn.execute(
            "INSERT INTO schedules (id, item_id, next_practice_time, consecutive_correct, cooling_interval)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(item_id) DO NOTHING",
            params![
                fresh.id,
                fresh.item_id,
                Self::format_timestamp(&fresh.next_practice_time),
                fresh.consecutive_correct,
                fresh.cooling_interval,
            ],
        )?;

        if inserted > 0 {
            conn.execute(
                "UPDATE items SET learning_cycle = ?1, level = ?2 WHERE id = ?3",
                params![fresh.learning_cycle.as_str(), fresh.level, item.id],
            )?;
            tracing::debug!(item_id = %item.id, "Created schedule");
        }

        Self::find_schedule(conn, &item.id)?
            .ok_or_else(|| StorageError::NotFound(format!("schedule for item {}", item.id)))
    }

    fn write_schedule(conn: &Connection, record: &ScheduleRecord) -> Result<()> {
        conn.execute(
            "UPDATE schedules SET
                next_practice_time = ?1,
                consecutive_correct = ?2,
                cooling_interval = ?3
             WHERE id = ?4",
            params![
                Self::format_timestamp(&record.next_practice_time),
                record.consecutive_correct,
                record.cooling_interval,
                record.id,
            ],
        )?;
        conn.execute(
            "UPDATE items SET learning_cycle = ?1, level = ?2 WHERE id = ?3",
            params![record.learning_cycle.as_str(), record.level, record.item_id],
        )?;
        Ok(())
    }

    fn row_to_schedule(row: &rusqlite::Row) -> rusqlite::Result<ScheduleRecord> {
        let next_practice_time: String = row.get("next_practice_time")?;
        let learning_cycle: String = row.get("learning_cycle")?;
        Ok(ScheduleRecord {
            id: row.get("id")?,
            item_id: row.get("item_id")?,
            next_practice_time: Self::parse_timestamp(&next_practice_time, "next_practice_time")?,
            consecutive_correct: row.get("consecutive_correct")?,
            cooling_interval: row.get("cooling_interval")?,
            learning_cycle: LearningCycle::parse_name(&learning_cycle),
            level: row.get("level")?,
        })
    }

    // ========================================================================
    // OUTCOMES
    // ========================================================================

    /// Record a practice outcome for an item, now
    pub fn submit_outcome(&self, learner_id: &str, item_id: &str, outcome: Outcome) -> Result<Transition> {
        self.submit_outcome_at(learner_id, item_id, outcome, Utc::now())
    }

    /// Record a practice outcome as of `now`.
    ///
    /// Everything the outcome changes (schedule, item flags, progress) commits
    /// in one transaction. Returns `Transition::Ignored` when the item was not
    /// due yet.
    pub fn submit_outcome_at(
        &self,
        learner_id: &str,
        item_id: &str,
        outcome: Outcome,
        now: DateTime<Utc>,
    ) -> Result<Transition> {
        let mut writer = self.lock_writer()?;
        let tx = writer.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let item = Self::load_item(&tx, item_id)?
            .filter(|item| item.learner_id == learner_id)
            .ok_or_else(|| {
                StorageError::NotFound(format!("item {} for learner {}", item_id, learner_id))
            })?;
        let learner = Self::load_learner(&tx, learner_id)?
            .ok_or_else(|| StorageError::NotFound(format!("learner {}", learner_id)))?;

        let mut record = match outcome {
            Outcome::OtherFeedback => Self::find_schedule(&tx, item_id)?
                .unwrap_or_else(|| ScheduleRecord::new(String::new(), item_id, now)),
            _ => Self::find_or_create_schedule(&tx, self.policy(), &item, now)?,
        };

        let transition = self.policy.apply(&mut record, outcome, learner.context(), now);

        match transition {
            Transition::Ignored => {
                tracing::debug!(item_id, "Answer before due date ignored");
            }
            Transition::Dropped => {
                tx.execute("DELETE FROM schedules WHERE item_id = ?1", params![item_id])?;
                tx.execute(
                    "UPDATE items SET fit_for_study = 0, user_preference = ?1 WHERE id = ?2",
                    params![ExercisePreference::DontUseInExercises.as_str(), item_id],
                )?;
                tracing::info!(item_id, word = %item.word, "Item excluded from exercises by learner");
            }
            Transition::Learned => {
                tx.execute("DELETE FROM schedules WHERE item_id = ?1", params![item_id])?;
                tx.execute(
                    "UPDATE items SET learned = 1, learned_at = ?1 WHERE id = ?2",
                    params![Self::format_timestamp(&now), item_id],
                )?;
                tracing::info!(item_id, word = %item.word, "Item learned");
            }
            Transition::Advanced { .. } | Transition::Regressed { .. } | Transition::Promoted { .. } => {
                Self::write_schedule(&tx, &record)?;
                tracing::debug!(
                    item_id,
                    transition = transition.name(),
                    cooling_interval = record.cooling_interval,
                    "Schedule updated"
                );
            }
        }

        tx.commit()?;
        Ok(transition)
    }

    // ========================================================================
    // SELECTION
    // ========================================================================

    /// Scheduled items due before the end of today, in the learner's language.
    ///
    /// Items in the productive cycle are left out when the learner has
    /// productive exercises turned off.
    pub fn due_items(
        &self,
        learner_id: &str,
        limit: Option<usize>,
        now: DateTime<Utc>,
    ) -> Result<Vec<StudyCandidate>> {
        self.require_learner(learner_id)?;

        let reader = self.lock_reader()?;
        let mut stmt = reader.prepare(
            "SELECT i.*, s.cooling_interval AS s_cooling_interval,
                    s.next_practice_time AS s_next_practice_time
             FROM items i
             JOIN schedules s ON s.item_id = i.id
             JOIN learners l ON l.id = i.learner_id
             WHERE i.learner_id = ?1
               AND i.language = l.learned_language
               AND s.next_practice_time < ?2
               AND (l.productive_exercises_enabled = 1 OR i.learning_cycle != ?3)
             ORDER BY i.created_at ASC, i.rowid ASC
             LIMIT ?4",
        )?;

        let rows = stmt.query_map(
            params![
                learner_id,
                Self::format_timestamp(&end_of_day(now)),
                LearningCycle::Productive.as_str(),
                Self::limit_param(limit),
            ],
            |row| {
                let item = Self::row_to_item(row)?;
                let next: String = row.get("s_next_practice_time")?;
                Ok(StudyCandidate::scheduled(
                    item,
                    row.get("s_cooling_interval")?,
                    Self::parse_timestamp(&next, "next_practice_time")?,
                ))
            },
        )?;

        let mut result = Vec::new();
        for candidate in rows {
            result.push(candidate?);
        }
        Ok(result)
    }

    /// Items never practised that are fit for study and not learned, most
    /// common words first
    pub fn unscheduled_items(&self, learner_id: &str, limit: Option<usize>) -> Result<Vec<StudyCandidate>> {
        self.require_learner(learner_id)?;

        let reader = self.lock_reader()?;
        let mut stmt = reader.prepare(
            "SELECT i.* FROM items i
             JOIN learners l ON l.id = i.learner_id
             LEFT JOIN schedules s ON s.item_id = i.id
             WHERE i.learner_id = ?1
               AND s.id IS NULL
               AND i.learned = 0
               AND i.fit_for_study = 1
               AND i.language = l.learned_language
             ORDER BY COALESCE(i.frequency_rank, ?3) ASC, i.created_at ASC, i.rowid ASC
             LIMIT ?2",
        )?;

        let rows = stmt.query_map(params![learner_id, Self::limit_param(limit), IMPOSSIBLE_RANK], |row| {
            Self::row_to_item(row).map(StudyCandidate::unscheduled)
        })?;

        let mut result = Vec::new();
        for candidate in rows {
            result.push(candidate?);
        }
        Ok(result)
    }

    /// Prioritised study queue: due and unscheduled items, one per word
    pub fn study_queue(
        &self,
        learner_id: &str,
        limit: Option<usize>,
        strategy: OrderingStrategy,
        now: DateTime<Utc>,
    ) -> Result<Vec<StudyCandidate>> {
        // Whole pools; the limit applies after ranking
        let due = self.due_items(learner_id, None, now)?;
        let unscheduled = self.unscheduled_items(learner_id, None)?;
        let (due_count, unscheduled_count) = (due.len(), unscheduled.len());

        let queue = build_queue(due, unscheduled, strategy, limit);
        tracing::debug!(
            learner_id,
            strategy = %strategy,
            due = due_count,
            unscheduled = unscheduled_count,
            queued = queue.len(),
            "Built study queue"
        );
        Ok(queue)
    }

    /// Every scheduled item of a learner, soonest first
    pub fn schedule_snapshot(&self, learner_id: &str) -> Result<Vec<ScheduleSnapshotEntry>> {
        self.require_learner(learner_id)?;

        let reader = self.lock_reader()?;
        let mut stmt = reader.prepare(
            "SELECT i.id AS item_id, i.word, i.learning_cycle, i.level,
                    s.next_practice_time, s.cooling_interval, s.consecutive_correct
             FROM schedules s
             JOIN items i ON i.id = s.item_id
             WHERE i.learner_id = ?1
             ORDER BY s.next_practice_time ASC, i.rowid ASC",
        )?;

        let rows = stmt.query_map(params![learner_id], |row| {
            let next: String = row.get("next_practice_time")?;
            let cycle: String = row.get("learning_cycle")?;
            Ok(ScheduleSnapshotEntry {
                item_id: row.get("item_id")?,
                word: row.get("word")?,
                next_practice_time: Self::parse_timestamp(&next, "next_practice_time")?,
                cooling_interval: row.get("cooling_interval")?,
                consecutive_correct: row.get("consecutive_correct")?,
                learning_cycle: LearningCycle::parse_name(&cycle),
                level: row.get("level")?,
            })
        })?;

        let mut result = Vec::new();
        for entry in rows {
            result.push(entry?);
        }
        Ok(result)
    }

    /// Pipeline counts for a learner's target language
    pub fn pipeline_stats(&self, learner_id: &str, now: DateTime<Utc>) -> Result<PipelineStats> {
        let learner = self.require_learner(learner_id)?;
        let eod = Self::format_timestamp(&end_of_day(now));

        let reader = self.lock_reader()?;

        let in_pipeline: i64 = reader.query_row(
            "SELECT COUNT(*) FROM schedules s JOIN items i ON i.id = s.item_id
             WHERE i.learner_id = ?1 AND i.language = ?2",
            params![learner_id, learner.learned_language],
            |row| row.get(0),
        )?;

        let due_today: i64 = reader.query_row(
            "SELECT COUNT(*) FROM schedules s JOIN items i ON i.id = s.item_id
             WHERE i.learner_id = ?1 AND i.language = ?2 AND s.next_practice_time < ?3
               AND (?4 = 1 OR i.learning_cycle != ?5)",
            params![
                learner_id,
                learner.learned_language,
                eod,
                learner.productive_exercises_enabled,
                LearningCycle::Productive.as_str(),
            ],
            |row| row.get(0),
        )?;

        let unscheduled: i64 = reader.query_row(
            "SELECT COUNT(*) FROM items i LEFT JOIN schedules s ON s.item_id = i.id
             WHERE i.learner_id = ?1 AND i.language = ?2 AND s.id IS NULL
               AND i.learned = 0 AND i.fit_for_study = 1",
            params![learner_id, learner.learned_language],
            |row| row.get(0),
        )?;

        let learned: i64 = reader.query_row(
            "SELECT COUNT(*) FROM items WHERE learner_id = ?1 AND language = ?2 AND learned = 1",
            params![learner_id, learner.learned_language],
            |row| row.get(0),
        )?;

        Ok(PipelineStats {
            in_pipeline,
            due_today,
            unscheduled,
            learned,
        })
    }

    // ========================================================================
    // MIGRATION TOOLING
    // ========================================================================

    /// Assign levels to every scheduled item of a learner that has none,
    /// using the legacy interval-to-level table.
    ///
    /// The lazy path in the leveled policy does the same on an item's next
    /// answer and also holds the level on that answer's promotion; items
    /// migrated here skip that and promote normally.
    pub fn migrate_legacy_levels(&self, learner_id: &str) -> Result<usize> {
        self.require_learner(learner_id)?;

        let mut writer = self.lock_writer()?;
        let tx = writer.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let pending: Vec<(String, u32)> = {
            let mut stmt = tx.prepare(
                "SELECT i.id, s.cooling_interval
                 FROM items i JOIN schedules s ON s.item_id = i.id
                 WHERE i.learner_id = ?1 AND i.level = 0",
            )?;
            let rows = stmt.query_map(params![learner_id], |row| Ok((row.get(0)?, row.get(1)?)))?;
            let mut pending = Vec::new();
            for row in rows {
                pending.push(row?);
            }
            pending
        };

        for (item_id, interval) in &pending {
            tx.execute(
                "UPDATE items SET level = ?1 WHERE id = ?2",
                params![legacy_level_for_interval(*interval), item_id],
            )?;
        }

        tx.commit()?;
        tracing::info!(learner_id, migrated = pending.len(), "Legacy levels assigned");
        Ok(pending.len())
    }
}

/// At most one schedule may exist per item; more is corrupted data, never
/// resolved by picking one.
fn single_record(item_id: &str, mut records: Vec<ScheduleRecord>) -> Result<Option<ScheduleRecord>> {
    match records.len() {
        0 => Ok(None),
        1 => Ok(records.pop()),
        n => Err(StorageError::InvariantViolation(format!(
            "{} schedule records found for item {}",
            n, item_id
        ))),
    }
}

// ============================================================================
// TESTS
// ============================================================================
