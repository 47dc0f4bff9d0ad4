//! A table: an ordered ring of seats that interact with each other.
//!
//! A generation at a table runs in two phases:
//!
//! 1. **Compute** — every unordered pair of seats meets once; each side's
//!    change is read from the sizes at the start of the generation and
//!    added to that seat's running total. Nothing is written.
//! 2. **Commit** — every seat applies its total, clamped to
//!    `0..=carrying_capacity`.
//!
//! Sums of integer deltas do not depend on the order pairs are visited in.

use crate::config::InteractionRates;
use crate::error::LuncheonError;
use crate::group::Group;
use crate::seat::Seat;
use crate::snapshot::{SeatState, TableState};

/// Anchor used when a table has no explicit position.
pub const DEFAULT_ANCHOR: (f64, f64) = (0.5, 0.5);

/// A named table with a plane anchor and its seats in seating order.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub name: String,
    pub x: f64,
    pub y: f64,
    seats: Vec<Seat>,
}

impl Table {
    /// Empty table at the default anchor.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_position(name, DEFAULT_ANCHOR.0, DEFAULT_ANCHOR.1)
    }

    pub fn with_position(name: impl Into<String>, x: f64, y: f64) -> Self {
        Self {
            name: name.into(),
            x,
            y,
            seats: Vec::new(),
        }
    }

    pub fn anchor(&self) -> (f64, f64) {
        (self.x, self.y)
    }

    /// Place a new seat at `index`.
    ///
    /// Indices stay contiguous: `index` must equal the current seat count.
    /// Nothing is added on error.
    pub fn insert(
        &mut self,
        primary_key: u64,
        index: usize,
        name: impl Into<String>,
        group: Group,
        population_size: i64,
    ) -> Result<(), LuncheonError> {
        if index < self.seats.len() {
            return Err(LuncheonError::DuplicateIndex {
                table: self.name.clone(),
                index,
            });
        }
        if index > self.seats.len() {
            return Err(LuncheonError::NonContiguousIndex {
                table: self.name.clone(),
                expected: self.seats.len(),
                found: index,
            });
        }
        if self.seats.iter().any(|s| s.primary_key == primary_key) {
            return Err(LuncheonError::DuplicateKey(primary_key));
        }

        let seat = Seat::new(primary_key, index, name, group, population_size)?;
        self.seats.push(seat);
        Ok(())
    }

    /// Append a seat at the next free index.
    pub fn push(
        &mut self,
        primary_key: u64,
        name: impl Into<String>,
        group: Group,
        population_size: i64,
    ) -> Result<(), LuncheonError> {
        self.insert(primary_key, self.seats.len(), name, group, population_size)
    }

    pub fn get_seats(&self) -> &[Seat] {
        &self.seats
    }

    pub fn seat_count(&self) -> usize {
        self.seats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seats.is_empty()
    }

    /// Summed generation delta of every seat, in seat order.
    ///
    /// Fails with `ExceedsCapacity` if any seat is above the carrying
    /// capacity; such a seat could only be clamped down by the commit.
    pub fn compute_deltas(&self, rates: &InteractionRates) -> Result<Vec<i64>, LuncheonError> {
        let capacity = rates.carrying_capacity;
        if let Some(seat) = self.seats.iter().find(|s| s.population_size() > capacity) {
            return Err(LuncheonError::ExceedsCapacity {
                primary_key: seat.primary_key,
                population_size: seat.population_size(),
                capacity,
            });
        }
        self.accumulate_deltas(unordered_pairs(self.seats.len()), rates)
    }

    /// Sum pairwise deltas over `pairs`, each pair `(i, j)` with `i != j`
    /// visited once.
    fn accumulate_deltas(
        &self,
        pairs: impl IntoIterator<Item = (usize, usize)>,
        rates: &InteractionRates,
    ) -> Result<Vec<i64>, LuncheonError> {
        let mut deltas = vec![0i64; self.seats.len()];
        for (i, j) in pairs {
            let (a, b) = (&self.seats[i], &self.seats[j]);
            let d_a = a.interact_with(b, rates)?;
            let d_b = b.interact_with(a, rates)?;
            deltas[i] = deltas[i]
                .checked_add(d_a)
                .ok_or(LuncheonError::PopulationOverflow(a.primary_key))?;
            deltas[j] = deltas[j]
                .checked_add(d_b)
                .ok_or(LuncheonError::PopulationOverflow(b.primary_key))?;
        }
        Ok(deltas)
    }

    /// Apply deltas produced by [`Table::compute_deltas`] for this table.
    pub(crate) fn commit_deltas(&mut self, deltas: &[i64], capacity: u64) {
        debug_assert_eq!(deltas.len(), self.seats.len());
        for (seat, &delta) in self.seats.iter_mut().zip(deltas) {
            seat.commit(delta, capacity);
        }
    }

    /// Run one generation at this table.
    ///
    /// On error no seat is changed.
    pub fn all_seats_interact(&mut self, rates: &InteractionRates) -> Result<(), LuncheonError> {
        let deltas = self.compute_deltas(rates)?;
        self.commit_deltas(&deltas, rates.carrying_capacity);
        Ok(())
    }

    pub fn run_generations(
        &mut self,
        num_generations: u32,
        rates: &InteractionRates,
    ) -> Result<(), LuncheonError> {
        for _ in 0..num_generations {
            self.all_seats_interact(rates)?;
        }
        Ok(())
    }

    /// Put every seat back to its initial population.
    pub fn reset(&mut self) {
        for seat in &mut self.seats {
            seat.reset();
        }
    }

    pub fn export_seat_states(&self) -> Vec<SeatState> {
        let count = self.seats.len();
        self.seats
            .iter()
            .map(|s| s.export_state(count, self.anchor()))
            .collect()
    }

    pub fn export_seat_sizes(&self) -> Vec<u64> {
        self.seats.iter().map(Seat::export_size).collect()
    }

    pub fn export_state(&self) -> TableState {
        TableState {
            name: self.name.clone(),
            x: self.x,
            y: self.y,
            seats: self.export_seat_states(),
        }
    }

    /// Total population per group at this table.
    pub fn group_total(&self, group: Group) -> u64 {
        self.seats
            .iter()
            .filter(|s| s.group == group)
            .map(Seat::population_size)
            .sum()
    }
}

/// Every unordered pair `(i, j)` with `i < j < n`.
pub fn unordered_pairs(n: usize) -> impl Iterator<Item = (usize, usize)> {
    (0..n).flat_map(move |i| (i + 1..n).map(move |j| (i, j)))
}
