//! Engine configuration
//!
//! Read from the environment:
//! - `CADENCE_POLICY`: `baseline` (default) or `leveled`
//! - `CADENCE_DATA_DIR`: directory holding `cadence.db`; platform data dir when unset

use std::path::PathBuf;

use crate::schedule::PolicyKind;

/// Environment variable selecting the scheduling policy
pub const POLICY_ENV: &str = "CADENCE_POLICY";

/// Environment variable overriding the data directory
pub const DATA_DIR_ENV: &str = "CADENCE_DATA_DIR";

/// Database file name inside the data directory
pub const DB_FILE_NAME: &str = "cadence.db";

/// Deployment-wide engine settings
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EngineConfig {
    pub policy: PolicyKind,
    pub data_dir: Option<PathBuf>,
}

impl EngineConfig {
    /// Load from process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load through an arbitrary key lookup. Invalid values fall back to
    /// defaults with a warning.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let policy = match lookup(POLICY_ENV) {
            Some(raw) => raw.parse().unwrap_or_else(|e| {
                tracing::warn!("{}, using {}", e, PolicyKind::default());
                PolicyKind::default()
            }),
            None => PolicyKind::default(),
        };

        let data_dir = lookup(DATA_DIR_ENV)
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from);

        Self { policy, data_dir }
    }

    pub fn with_policy(mut self, policy: PolicyKind) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_data_dir(mut self, data_dir: impl Into<PathBuf>) -> Self {
        self.data_dir = Some(data_dir.into());
        self
    }

    /// Database path when a data directory is configured
    pub fn db_path(&self) -> Option<PathBuf> {
        self.data_dir.as_ref().map(|dir| dir.join(DB_FILE_NAME))
    }
}
