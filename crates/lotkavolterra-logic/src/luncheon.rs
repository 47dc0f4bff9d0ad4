//! The luncheon: every table of one simulation run.
//!
//! Tables are independent. A generation computes the deltas of every
//! table before any table commits, so a fault anywhere leaves the whole
//! luncheon at its previous generation.

use std::collections::HashSet;

use crate::config::InteractionRates;
use crate::error::LuncheonError;
use crate::group::Group;
use crate::seat::Seat;
use crate::snapshot::{SeatState, TableState};
use crate::table::Table;

#[derive(Debug, Clone, PartialEq)]
pub struct Luncheon {
    pub name: String,
    /// Layout grid hint for renderers (tables across).
    pub num_tables_x: u32,
    /// Layout grid hint for renderers (tables down).
    pub num_tables_y: u32,
    rates: InteractionRates,
    tables: Vec<Table>,
    generation: u32,
    trial: u32,
}

impl Luncheon {
    pub fn new(name: impl Into<String>, rates: InteractionRates) -> Self {
        Self {
            name: name.into(),
            num_tables_x: 1,
            num_tables_y: 1,
            rates,
            tables: Vec::new(),
            generation: 0,
            trial: 0,
        }
    }

    pub fn with_layout(mut self, num_tables_x: u32, num_tables_y: u32) -> Self {
        self.num_tables_x = num_tables_x;
        self.num_tables_y = num_tables_y;
        self
    }

    /// Attach a table after checking it against the tables already seated.
    pub fn add_table(&mut self, table: Table) -> Result<(), LuncheonError> {
        if self.tables.iter().any(|t| t.name == table.name) {
            return Err(LuncheonError::DuplicateTableName(table.name));
        }

        let existing: HashSet<u64> = self.seats().map(|s| s.primary_key).collect();
        let capacity = self.rates.carrying_capacity;
        for seat in table.get_seats() {
            if existing.contains(&seat.primary_key) {
                return Err(LuncheonError::DuplicateKey(seat.primary_key));
            }
            if seat.population_size() > capacity {
                return Err(LuncheonError::ExceedsCapacity {
                    primary_key: seat.primary_key,
                    population_size: seat.population_size(),
                    capacity,
                });
            }
        }

        self.tables.push(table);
        Ok(())
    }

    pub fn tables(&self) -> &[Table] {
        &self.tables
    }

    pub fn rates(&self) -> &InteractionRates {
        &self.rates
    }

    /// Generations run since creation or the last reset.
    pub fn generation(&self) -> u32 {
        self.generation
    }

    /// Number of resets so far.
    pub fn trial(&self) -> u32 {
        self.trial
    }

    /// All seats, table order then seat order.
    pub fn seats(&self) -> impl Iterator<Item = &Seat> {
        self.tables.iter().flat_map(|t| t.get_seats())
    }

    pub fn seat_count(&self) -> usize {
        self.tables.iter().map(Table::seat_count).sum()
    }

    /// Run one generation at every table.
    pub fn run_generation(&mut self) -> Result<(), LuncheonError> {
        let deltas = self
            .tables
            .iter()
            .map(|t| t.compute_deltas(&self.rates))
            .collect::<Result<Vec<_>, _>>()?;

        let capacity = self.rates.carrying_capacity;
        for (table, table_deltas) in self.tables.iter_mut().zip(&deltas) {
            table.commit_deltas(table_deltas, capacity);
        }
        self.generation = self.generation.saturating_add(1);

        log::debug!(
            "Luncheon '{}' generation {} committed: pack={} herd={}",
            self.name,
            self.generation,
            self.group_total(Group::Pack),
            self.group_total(Group::Herd)
        );
        Ok(())
    }

    pub fn run_generations(&mut self, num_generations: u32) -> Result<(), LuncheonError> {
        for _ in 0..num_generations {
            self.run_generation()?;
        }
        Ok(())
    }

    /// Restore initial populations and start a new trial.
    pub fn reset(&mut self) {
        for table in &mut self.tables {
            table.reset();
        }
        self.generation = 0;
        self.trial += 1;
    }

    pub fn export_seat_states(&self) -> Vec<SeatState> {
        self.tables
            .iter()
            .flat_map(Table::export_seat_states)
            .collect()
    }

    pub fn export_seat_sizes(&self) -> Vec<u64> {
        self.seats().map(Seat::export_size).collect()
    }

    pub fn export_table_states(&self) -> Vec<TableState> {
        self.tables.iter().map(Table::export_state).collect()
    }

    pub fn group_total(&self, group: Group) -> u64 {
        self.tables.iter().map(|t| t.group_total(group)).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(name: &str, first_pk: u64, groups: &[Group]) -> Table {
        let mut t = Table::new(name);
        for (i, g) in groups.iter().enumerate() {
            t.push(first_pk + i as u64, format!("P{i}"), *g, 1000).unwrap();
        }
        t
    }

    #[test]
    fn test_duplicate_table_name() {
        let mut luncheon = Luncheon::new("L", InteractionRates::default());
        luncheon.add_table(table("A", 0, &[Group::Pack])).unwrap();
        let err = luncheon.add_table(table("A", 5, &[Group::Herd])).unwrap_err();
        assert!(matches!(err, LuncheonError::DuplicateTableName(ref n) if n == "A"));
        assert_eq!(luncheon.tables().len(), 1);
    }

    #[test]
    fn test_duplicate_key_across_tables() {
        let mut luncheon = Luncheon::new("L", InteractionRates::default());
        luncheon
            .add_table(table("A", 0, &[Group::Pack, Group::Herd]))
            .unwrap();
        let err = luncheon.add_table(table("B", 1, &[Group::Herd])).unwrap_err();
        assert!(matches!(err, LuncheonError::DuplicateKey(1)));
        assert_eq!(luncheon.seat_count(), 2);
    }

    #[test]
    fn test_seat_above_capacity_rejected() {
        let rates = InteractionRates {
            carrying_capacity: 500,
            ..InteractionRates::default()
        };
        let mut luncheon = Luncheon::new("L", rates);
        let err = luncheon.add_table(table("A", 0, &[Group::Pack])).unwrap_err();
        assert!(matches!(
            err,
            LuncheonError::ExceedsCapacity {
                primary_key: 0,
                population_size: 1000,
                capacity: 500
            }
        ));
    }

    #[test]
    fn test_generation_counter_and_reset() {
        let mut luncheon = Luncheon::new("L", InteractionRates::default()).with_layout(2, 2);
        luncheon
            .add_table(table("A", 0, &[Group::Pack, Group::Herd, Group::Herd]))
            .unwrap();
        let initial = luncheon.export_seat_sizes();

        luncheon.run_generations(4).unwrap();
        assert_eq!(luncheon.generation(), 4);
        assert_ne!(luncheon.export_seat_sizes(), initial);

        luncheon.reset();
        assert_eq!(luncheon.generation(), 0);
        assert_eq!(luncheon.trial(), 1);
        assert_eq!(luncheon.export_seat_sizes(), initial);
        assert_eq!((luncheon.num_tables_x, luncheon.num_tables_y), (2, 2));
    }

    #[test]
    fn test_fault_leaves_all_tables_intact() {
        let rates = InteractionRates {
            predation_rate: f64::MAX,
            ..InteractionRates::default()
        };
        let mut luncheon = Luncheon::new("L", rates);
        // First table has no cross-group pair and would commit fine alone.
        luncheon
            .add_table(table("A", 0, &[Group::Herd, Group::Herd]))
            .unwrap();
        luncheon
            .add_table(table("B", 10, &[Group::Pack, Group::Herd]))
            .unwrap();
        let before = luncheon.export_seat_sizes();

        assert!(luncheon.run_generation().is_err());
        assert_eq!(luncheon.export_seat_sizes(), before);
        assert_eq!(luncheon.generation(), 0);
    }

    #[test]
    fn test_exports_preserve_table_then_seat_order() {
        let mut luncheon = Luncheon::new("L", InteractionRates::default());
        luncheon
            .add_table(table("A", 0, &[Group::Pack, Group::Herd]))
            .unwrap();
        luncheon.add_table(table("B", 2, &[Group::Herd])).unwrap();

        let keys: Vec<u64> = luncheon
            .export_seat_states()
            .iter()
            .map(|s| s.primary_key)
            .collect();
        assert_eq!(keys, vec![0, 1, 2]);
        assert_eq!(luncheon.export_seat_sizes().len(), 3);

        let tables = luncheon.export_table_states();
        assert_eq!(tables.len(), 2);
        assert_eq!(tables[1].name, "B");
        assert_eq!(tables[1].seats[0].primary_key, 2);
    }

    #[test]
    fn test_group_totals() {
        let mut luncheon = Luncheon::new("L", InteractionRates::default());
        luncheon
            .add_table(table("A", 0, &[Group::Pack, Group::Herd, Group::Herd]))
            .unwrap();
        assert_eq!(luncheon.group_total(Group::Pack), 1000);
        assert_eq!(luncheon.group_total(Group::Herd), 2000);
    }
}
