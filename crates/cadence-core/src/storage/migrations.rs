//! Database Migrations
//!
//! Schema migration definitions for the storage layer.

/// Migration definitions
pub const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        description: "Initial schema: learners, items, cooling-interval schedules",
        up: MIGRATION_V1_UP,
    },
    Migration {
        version: 2,
        description: "Leveled scheduling: per-item level",
        up: MIGRATION_V2_UP,
    },
];

/// A database migration
#[derive(Debug, Clone)]
pub struct Migration {
    /// Version number
    pub version: u32,
    /// Description
    pub description: &'static str,
    /// SQL to apply
    pub up: &'static str,
}

/// V1: Initial schema
const MIGRATION_V1_UP: &str = r#"
CREATE TABLE IF NOT EXISTS learners (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    learned_language TEXT NOT NULL,
    productive_exercises_enabled INTEGER NOT NULL DEFAULT 1,
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS items (
    id TEXT PRIMARY KEY,
    learner_id TEXT NOT NULL REFERENCES learners(id) ON DELETE CASCADE,
    word TEXT NOT NULL,
    translation TEXT,
    language TEXT NOT NULL,
    frequency_rank INTEGER,

    -- Study flags
    learned INTEGER NOT NULL DEFAULT 0,
    learned_at TEXT,
    fit_for_study INTEGER NOT NULL DEFAULT 1,
    user_preference TEXT NOT NULL DEFAULT 'no_preference',

    -- Baseline progress: 'not_set', 'receptive', 'productive'
    learning_cycle TEXT NOT NULL DEFAULT 'not_set',

    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_items_learner ON items(learner_id, language);
CREATE INDEX IF NOT EXISTS idx_items_created ON items(created_at);

-- One schedule per item; the UNIQUE constraint makes find-or-create race free
CREATE TABLE IF NOT EXISTS schedules (
    id TEXT PRIMARY KEY,
    item_id TEXT NOT NULL UNIQUE REFERENCES items(id) ON DELETE CASCADE,
    next_practice_time TEXT NOT NULL,
    consecutive_correct INTEGER NOT NULL DEFAULT 0,
    cooling_interval INTEGER NOT NULL DEFAULT 0
);

CREATE INDEX IF NOT EXISTS idx_schedules_next_practice ON schedules(next_practice_time);

-- Schema version tracking
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER PRIMARY KEY,
    applied_at TEXT NOT NULL
);

INSERT OR IGNORE INTO schema_version (version, applied_at) VALUES (1, datetime('now'));
"#;

/// V2: Per-item level for the leveled policy.
/// Existing rows get level 0 and are migrated lazily on their next answer.
const MIGRATION_V2_UP: &str = r#"
ALTER TABLE items ADD COLUMN level INTEGER NOT NULL DEFAULT 0;

UPDATE schema_version SET version = 2, applied_at = datetime('now');
"#;

/// Get current schema version from database
pub fn get_current_version(conn: &rusqlite::Connection) -> rusqlite::Result<u32> {
    conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |row| row.get(0),
    )
    .or(Ok(0))
}

/// Apply pending migrations
pub fn apply_migrations(conn: &rusqlite::Connection) -> rusqlite::Result<u32> {
    let current_version = get_current_version(conn)?;
    let mut applied = 0;

    for migration in MIGRATIONS {
        if migration.version > current_version {
            tracing::info!(
                "Applying migration v{}: {}",
                migration.version,
                migration.description
            );

            conn.execute_batch(migration.up)?;
            applied += 1;
        }
    }

    Ok(applied)
}
