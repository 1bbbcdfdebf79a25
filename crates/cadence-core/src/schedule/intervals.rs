//! Cooling interval tables
//!
//! A cooling interval is the number of minutes to wait before an item is shown
//! again. Each policy walks an ordered ladder of intervals: a correct answer
//! climbs one rung, an incorrect answer drops one rung, and the bottom rung
//! (0) is a floor.
//!
//! The ladders are plain constants. `IntervalTable::validate` checks at startup
//! that the success and failure steps are true inverses of each other.

/// Minutes in one day
pub const ONE_DAY: u32 = 60 * 24;

/// Highest level of the leveled policy; reaching it at max interval means learned
pub const MAX_LEVEL: u8 = 4;

const BASELINE_STEPS: [u32; 5] = [0, ONE_DAY, 2 * ONE_DAY, 4 * ONE_DAY, 8 * ONE_DAY];
const LEVELED_STEPS: [u32; 3] = [0, ONE_DAY, 2 * ONE_DAY];

/// Baseline ladder: 0, 1d, 2d, 4d, 8d
pub const BASELINE_INTERVALS: IntervalTable = IntervalTable::new(&BASELINE_STEPS);

/// Leveled ladder: 0, 1d, 2d
pub const LEVELED_INTERVALS: IntervalTable = IntervalTable::new(&LEVELED_STEPS);

/// Error raised when a ladder is malformed
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IntervalTableError {
    #[error("interval table is empty")]
    Empty,
    #[error("interval table must start at 0, found {0}")]
    NonZeroFloor(u32),
    #[error("interval table is not strictly ascending at position {0}")]
    NotAscending(usize),
    #[error("failure step does not invert success step for interval {0}")]
    NotInverse(u32),
}

/// Ordered ladder of cooling intervals, in minutes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntervalTable {
    steps: &'static [u32],
}

impl IntervalTable {
    /// Build a table from an ascending ladder starting at 0
    pub const fn new(steps: &'static [u32]) -> Self {
        Self { steps }
    }

    /// All intervals of the ladder, ascending
    pub fn steps(&self) -> &'static [u32] {
        self.steps
    }

    /// Largest interval of the ladder
    pub fn max_interval(&self) -> u32 {
        self.steps.last().copied().unwrap_or(0)
    }

    /// Largest interval, rounded down to whole days
    pub fn max_interval_days(&self) -> u32 {
        self.max_interval() / ONE_DAY
    }

    /// Number of success steps between 0 and the maximum
    pub fn cycle_length(&self) -> usize {
        self.steps.len().saturating_sub(1)
    }

    /// Whether `interval` is one of the ladder's rungs
    pub fn contains(&self, interval: u32) -> bool {
        self.steps.contains(&interval)
    }

    /// Whether `interval` sits at (or beyond) the top rung
    pub fn is_at_max(&self, interval: u32) -> bool {
        interval >= self.max_interval()
    }

    /// Interval after a correct answer.
    ///
    /// Values that are not on the ladder, and the top rung itself, map to the
    /// maximum.
    pub fn next(&self, interval: u32) -> u32 {
        match self.steps.iter().position(|&s| s == interval) {
            Some(pos) if pos + 1 < self.steps.len() => self.steps[pos + 1],
            _ => self.max_interval(),
        }
    }

    /// Interval after an incorrect answer.
    ///
    /// 0 stays at 0. Values above the maximum are treated as the maximum, and
    /// values between rungs drop to the rung below them.
    pub fn previous(&self, interval: u32) -> u32 {
        let clamped = interval.min(self.max_interval());
        self.steps
            .iter()
            .rev()
            .copied()
            .find(|&s| s < clamped)
            .unwrap_or(0)
    }

    /// Check the ladder shape and that `previous(next(x)) == x` for every
    /// rung below the maximum.
    pub fn validate(&self) -> Result<(), IntervalTableError> {
        let first = *self.steps.first().ok_or(IntervalTableError::Empty)?;
        if first != 0 {
            return Err(IntervalTableError::NonZeroFloor(first));
        }
        if let Some(pos) = self.steps.windows(2).position(|w| w[0] >= w[1]) {
            return Err(IntervalTableError::NotAscending(pos + 1));
        }
        for &step in &self.steps[..self.steps.len() - 1] {
            if self.previous(self.next(step)) != step {
                return Err(IntervalTableError::NotInverse(step));
            }
        }
        if self.previous(0) != 0 {
            return Err(IntervalTableError::NotInverse(0));
        }
        Ok(())
    }
}

/// Level assigned to an item scheduled before levels existed.
///
/// Keeps progress when a learner moves from the baseline ladder to the leveled
/// one: the further along the old ladder, the higher the starting level.
pub fn legacy_level_for_interval(interval: u32) -> u8 {
    match interval {
        0 => 1,
        i if i == ONE_DAY => 1,
        i if i == 2 * ONE_DAY => 2,
        i if i == 4 * ONE_DAY => 3,
        i if i == 8 * ONE_DAY => 4,
        _ => 1,
    }
}

/// Validate every built-in ladder
pub fn validate_interval_tables() -> Result<(), IntervalTableError> {
    BASELINE_INTERVALS.validate()?;
    LEVELED_INTERVALS.validate()
}
