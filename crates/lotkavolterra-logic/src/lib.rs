//! Pure simulation logic for Lotka-Volterra luncheons.
//!
//! Guests sit at tables. Each seat carries a population that belongs to
//! one of two groups, a predator-like [`Group::Pack`] or a prey-like
//! [`Group::Herd`]. Every generation, all seats at a table meet pairwise
//! and their populations grow, shrink or feed on each other. Tables never
//! influence one another.
//!
//! Functions take plain data and return results; there is no file I/O,
//! rendering or process state in this crate.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | Run configuration, interaction rates, validation |
//! | [`error`] | Structural and input errors |
//! | [`group`] | Pack/Herd groups, colors, random group draws |
//! | [`input`] | Structured luncheon descriptions (JSON data model) |
//! | [`luncheon`] | Tables of a luncheon, atomic generation steps |
//! | [`seat`] | One occupant, pairwise interaction rule, layout |
//! | [`seating`] | Rule-based test seating (random, alternating, halves) |
//! | [`snapshot`] | Exported seat states and recorded run history |
//! | [`table`] | Seats of a table, compute/commit generation phases |
//!
//! ```
//! use lotkavolterra_logic::config::InteractionRates;
//! use lotkavolterra_logic::group::Group;
//! use lotkavolterra_logic::luncheon::Luncheon;
//! use lotkavolterra_logic::table::Table;
//!
//! let mut table = Table::new("Test");
//! table.insert(0, 0, "Alice", Group::Pack, 1000).unwrap();
//! table.insert(1, 1, "Bob", Group::Herd, 1000).unwrap();
//!
//! let mut luncheon = Luncheon::new("Demo", InteractionRates::default());
//! luncheon.add_table(table).unwrap();
//! luncheon.run_generation().unwrap();
//!
//! let sizes = luncheon.export_seat_sizes();
//! assert!(sizes[0] > 1000 && sizes[1] < 1000);
//! ```

pub mod config;
pub mod error;
pub mod group;
pub mod input;
pub mod luncheon;
pub mod seat;
pub mod seating;
pub mod snapshot;
pub mod table;

pub use error::LuncheonError;
pub use group::{random_group, Group};
pub use luncheon::Luncheon;
pub use seat::Seat;
pub use table::Table;
