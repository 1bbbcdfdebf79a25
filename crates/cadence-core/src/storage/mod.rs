//! Storage Module
//!
//! SQLite-based storage layer with:
//! - Learners, vocabulary items and one schedule record per item
//! - Transactional outcome submission (find-or-create, apply, persist)
//! - Due/unscheduled candidate queries for the study queue
//! - Versioned schema migrations

mod migrations;
mod sqlite;

pub use migrations::MIGRATIONS;
pub use sqlite::{PipelineStats, Result, Storage, StorageError};
