//! Read-only exports of luncheon state for renderers.
//!
//! A recorded run is the full state before any generation runs, followed
//! by the seat sizes after each generation, ordered by table then seat.

use serde::{Deserialize, Serialize};

use crate::error::LuncheonError;
use crate::group::Group;
use crate::luncheon::Luncheon;

/// Upper bound on snapshots reserved before a run starts.
const MAX_PRERESERVED: u32 = 1024;

/// Full state of one seat.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeatState {
    pub primary_key: u64,
    pub index: usize,
    pub name: String,
    pub group: Group,
    pub population_size: u64,
    pub color: String,
    pub x: f64,
    pub y: f64,
}

/// Full state of one table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableState {
    pub name: String,
    pub x: f64,
    pub y: f64,
    pub seats: Vec<SeatState>,
}

/// Population summed per group across the luncheon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupTotals {
    pub pack: u64,
    pub herd: u64,
}

impl GroupTotals {
    pub fn of(luncheon: &Luncheon) -> Self {
        Self {
            pack: luncheon.group_total(Group::Pack),
            herd: luncheon.group_total(Group::Herd),
        }
    }
}

/// Sizes captured after one generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationSnapshot {
    /// 1-based generation number within the trial.
    pub generation: u32,
    pub sizes: Vec<u64>,
    pub totals: GroupTotals,
}

/// Everything a renderer needs to replay a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunHistory {
    pub luncheon: String,
    pub num_tables_x: u32,
    pub num_tables_y: u32,
    pub trial: u32,
    pub initial_state: Vec<TableState>,
    pub initial_totals: GroupTotals,
    pub generations: Vec<GenerationSnapshot>,
}

impl RunHistory {
    /// Capture the initial state, then run and capture `num_generations`.
    ///
    /// On a fault the luncheon stays at the last committed generation and
    /// the error is returned; the partial history is dropped.
    pub fn record(luncheon: &mut Luncheon, num_generations: u32) -> Result<Self, LuncheonError> {
        let mut history = Self {
            luncheon: luncheon.name.clone(),
            num_tables_x: luncheon.num_tables_x,
            num_tables_y: luncheon.num_tables_y,
            trial: luncheon.trial(),
            initial_state: luncheon.export_table_states(),
            initial_totals: GroupTotals::of(luncheon),
            generations: Vec::with_capacity(num_generations.min(MAX_PRERESERVED) as usize),
        };

        for _ in 0..num_generations {
            luncheon.run_generation()?;
            history.generations.push(GenerationSnapshot {
                generation: luncheon.generation(),
                sizes: luncheon.export_seat_sizes(),
                totals: GroupTotals::of(luncheon),
            });
        }

        Ok(history)
    }

    /// Seat sizes after the last generation (or initially, for zero).
    pub fn final_sizes(&self) -> Vec<u64> {
        match self.generations.last() {
            Some(last) => last.sizes.clone(),
            None => self
                .initial_state
                .iter()
                .flat_map(|t| t.seats.iter().map(|s| s.population_size))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::InteractionRates;
    use crate::table::Table;

    fn two_seat_luncheon() -> Luncheon {
        let mut table = Table::new("Test");
        table.push(0, "Alice", Group::Pack, 1000).unwrap();
        table.push(1, "Bob", Group::Herd, 1000).unwrap();
        let mut luncheon = Luncheon::new("Pair", InteractionRates::default());
        luncheon.add_table(table).unwrap();
        luncheon
    }

    #[test]
    fn test_record_zero_generations() {
        let mut luncheon = two_seat_luncheon();
        let history = RunHistory::record(&mut luncheon, 0).unwrap();
        assert!(history.generations.is_empty());
        assert_eq!(history.final_sizes(), vec![1000, 1000]);
        assert_eq!(history.initial_totals, GroupTotals { pack: 1000, herd: 1000 });
        assert_eq!(luncheon.generation(), 0);
    }

    #[test]
    fn test_record_numbers_generations() {
        let mut luncheon = two_seat_luncheon();
        let history = RunHistory::record(&mut luncheon, 3).unwrap();
        let numbers: Vec<u32> = history.generations.iter().map(|g| g.generation).collect();
        assert_eq!(numbers, vec![1, 2, 3]);
        assert_eq!(history.final_sizes(), luncheon.export_seat_sizes());
        assert_eq!(history.initial_state[0].seats.len(), 2);
    }

    #[test]
    fn test_snapshots_are_copies() {
        let mut luncheon = two_seat_luncheon();
        let initial = luncheon.export_seat_states();
        luncheon.run_generation().unwrap();
        assert_eq!(initial[0].population_size, 1000);
        assert_ne!(luncheon.export_seat_states()[0].population_size, 1000);
    }

    #[test]
    fn test_large_generation_count_on_empty_luncheon() {
        let mut luncheon = Luncheon::new("Empty", InteractionRates::default());
        let history = RunHistory::record(&mut luncheon, 200_000).unwrap();
        assert_eq!(history.generations.len(), 200_000);
        assert!(history.final_sizes().is_empty());
        assert_eq!(luncheon.generation(), 200_000);
    }

    #[test]
    fn test_history_serializes_to_json() {
        let mut luncheon = two_seat_luncheon();
        let history = RunHistory::record(&mut luncheon, 1).unwrap();
        let json = serde_json::to_value(&history).unwrap();
        assert_eq!(json["luncheon"], "Pair");
        assert_eq!(json["initial_state"][0]["seats"][1]["group"], "herd");
        assert_eq!(json["generations"][0]["sizes"].as_array().unwrap().len(), 2);
    }
}
