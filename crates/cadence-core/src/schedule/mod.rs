//! Scheduling Module
//!
//! Cooling-interval state machine for vocabulary review.
//!
//! ## Policies
//! - **Baseline**: 0 → 1d → 2d → 4d → 8d, walked once receptively and once
//!   productively
//! - **Leveled**: 0 → 1d → 2d, walked once per level up to level 4
//!
//! Exactly one policy is active per deployment, chosen with [`PolicyKind`].

mod baseline;
pub mod intervals;
mod leveled;
mod policy;

pub use baseline::BaselinePolicy;
pub use intervals::{
    legacy_level_for_interval, validate_interval_tables, IntervalTable, IntervalTableError,
    BASELINE_INTERVALS, LEVELED_INTERVALS, MAX_LEVEL, ONE_DAY,
};
pub use leveled::LeveledPolicy;
pub use policy::{end_of_day, is_stale, PolicyKind, SchedulingPolicy, Transition};
