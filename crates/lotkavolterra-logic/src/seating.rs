//! Rule-based test seating.
//!
//! A test luncheon has a single table whose groups are assigned by a
//! named rule instead of being read from an input file.

use std::fmt;
use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::InteractionRates;
use crate::error::LuncheonError;
use crate::group::Group;
use crate::luncheon::Luncheon;
use crate::table::Table;

/// Names handed out to the first test seats.
pub const PEOPLE: [&str; 10] = [
    "Alice", "Bob", "Carol", "Django", "Erlich", "Freddy", "Georgia", "Heidi", "Indigo", "Jack",
];

/// How groups are assigned to test seats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeatingRule {
    /// Every seat draws its own random group.
    Random,
    /// Even seats are packs, odd seats herds.
    Alternating,
    /// The first half (rounded up) are packs, the rest herds.
    Halves,
}

impl SeatingRule {
    pub const ALL: [SeatingRule; 3] = [
        SeatingRule::Random,
        SeatingRule::Alternating,
        SeatingRule::Halves,
    ];

    pub fn name(self) -> &'static str {
        match self {
            SeatingRule::Random => "random",
            SeatingRule::Alternating => "alternating",
            SeatingRule::Halves => "halves",
        }
    }

    /// Group of seat `index` out of `num_seats`.
    pub fn group_for(self, index: usize, num_seats: usize, rng: &mut impl Rng) -> Group {
        match self {
            SeatingRule::Random => Group::random(rng),
            SeatingRule::Alternating => {
                if index % 2 == 0 {
                    Group::Pack
                } else {
                    Group::Herd
                }
            }
            SeatingRule::Halves => {
                if index * 2 < num_seats {
                    Group::Pack
                } else {
                    Group::Herd
                }
            }
        }
    }
}

impl fmt::Display for SeatingRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SeatingRule {
    type Err = LuncheonError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SeatingRule::ALL
            .into_iter()
            .find(|rule| rule.name() == s)
            .ok_or_else(|| LuncheonError::UnknownSeatingRule(s.to_string()))
    }
}

/// Display name of test seat `index`.
pub fn person_name(index: usize) -> String {
    PEOPLE
        .get(index)
        .map(|name| name.to_string())
        .unwrap_or_else(|| format!("Person{index}"))
}

/// Fill `table` with `num_seats` seats, keys and indices `0..num_seats`.
pub fn populate_test_table(
    table: &mut Table,
    rule: SeatingRule,
    num_seats: usize,
    population_size: i64,
    rng: &mut impl Rng,
) -> Result<(), LuncheonError> {
    for i in 0..num_seats {
        let group = rule.group_for(i, num_seats, rng);
        table.insert(i as u64, i, person_name(i), group, population_size)?;
    }
    Ok(())
}

/// Single-table luncheon named after the rule, on a 2×2 layout grid.
pub fn test_luncheon(
    rule: SeatingRule,
    num_seats: usize,
    population_size: i64,
    rates: InteractionRates,
    rng: &mut impl Rng,
) -> Result<Luncheon, LuncheonError> {
    let mut table = Table::with_position("Test", 0.5, 0.25);
    populate_test_table(&mut table, rule, num_seats, population_size, rng)?;

    let mut luncheon = Luncheon::new(rule.name(), rates).with_layout(2, 2);
    luncheon.add_table(table)?;

    log::info!(
        "Built '{}' test luncheon with {} seats at population {}",
        rule,
        num_seats,
        population_size
    );
    Ok(luncheon)
}
