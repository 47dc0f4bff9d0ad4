//! Errors raised by the simulation engine.
//!
//! All of these are detected synchronously at the point of violation and
//! leave the container they were raised from unchanged.

use thiserror::Error;

/// Errors from building or running a luncheon.
#[derive(Debug, Error)]
pub enum LuncheonError {
    /// A seat was created with a negative population.
    #[error("invalid seat state: population size {0} is negative")]
    InvalidSeatState(i64),
    /// The index is already taken by another seat at the table.
    #[error("seat index {index} is already occupied at table '{table}'")]
    DuplicateIndex { table: String, index: usize },
    /// The index would leave a gap in the seating order.
    #[error("seat index {found} at table '{table}' is not contiguous (expected {expected})")]
    NonContiguousIndex {
        table: String,
        expected: usize,
        found: usize,
    },
    /// The primary key is already used by another seat.
    #[error("seat primary key {0} is already in use")]
    DuplicateKey(u64),
    /// The luncheon already has a table with this name.
    #[error("a table named '{0}' already exists")]
    DuplicateTableName(String),
    /// A seat starts above the luncheon's carrying capacity.
    #[error("seat {primary_key} starts at {population_size}, above carrying capacity {capacity}")]
    ExceedsCapacity {
        primary_key: u64,
        population_size: u64,
        capacity: u64,
    },
    /// Input group label matched neither variant.
    #[error("unknown group label '{0}'")]
    UnknownGroupLabel(String),
    /// Seating rule name matched no known rule.
    #[error("unknown seating rule '{0}'")]
    UnknownSeatingRule(String),
    /// A delta did not fit the integer range; nothing was committed.
    #[error("population overflow while computing seat {0}")]
    PopulationOverflow(u64),
    /// Structured input could not be parsed.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}
