//! A single seat and the pairwise interaction rule.
//!
//! Interaction is split in two phases. [`Seat::interact_with`] only reads
//! the two seats and returns the change the meeting causes for `self`;
//! nothing is written. The owning table sums those changes over every
//! other seat and hands the total to [`Seat::commit`] once the whole
//! generation has been computed.

use std::f64::consts::PI;

use crate::config::InteractionRates;
use crate::error::LuncheonError;
use crate::group::Group;
use crate::snapshot::SeatState;

/// Radius of the seat ring around a table anchor, in normalized plane units.
pub const SEAT_RING_RADIUS: f64 = 0.1;

/// One occupant of a table.
#[derive(Debug, Clone, PartialEq)]
pub struct Seat {
    /// Unique identifier, assigned by the caller.
    pub primary_key: u64,
    /// Position within the owning table, 0-based.
    pub index: usize,
    pub name: String,
    pub group: Group,
    population_size: u64,
    initial_population: u64,
}

impl Seat {
    /// Create a seat. Fails with `InvalidSeatState` on a negative population.
    pub fn new(
        primary_key: u64,
        index: usize,
        name: impl Into<String>,
        group: Group,
        population_size: i64,
    ) -> Result<Self, LuncheonError> {
        let population_size = u64::try_from(population_size)
            .map_err(|_| LuncheonError::InvalidSeatState(population_size))?;
        Ok(Self {
            primary_key,
            index,
            name: name.into(),
            group,
            population_size,
            initial_population: population_size,
        })
    }

    pub fn population_size(&self) -> u64 {
        self.population_size
    }

    /// Population the seat was created with.
    pub fn initial_population(&self) -> u64 {
        self.initial_population
    }

    pub fn color(&self) -> &'static str {
        self.group.color()
    }

    /// First word of the occupant's name.
    pub fn first_name(&self) -> &str {
        self.name.split_whitespace().next().unwrap_or("")
    }

    pub fn is_extinct(&self) -> bool {
        self.population_size == 0
    }

    /// Change to `self` caused by meeting `other`, from current sizes only.
    ///
    /// Same group: `round(growth_rate * p_self)`, independent of `other`.
    /// Pack meets herd: with `E = p_pack * p_herd / carrying_capacity`,
    /// the herd loses `round(predation_rate * E)` and the pack gains
    /// `round(predation_rate * conversion_efficiency * E)`.
    pub fn interact_with(
        &self,
        other: &Seat,
        rates: &InteractionRates,
    ) -> Result<i64, LuncheonError> {
        let own = self.population_size as f64;
        let change = if self.group == other.group {
            rates.growth_rate(self.group) * own
        } else {
            let encounters = own * other.population_size as f64 / rates.carrying_capacity as f64;
            match self.group {
                Group::Herd => -(rates.predation_rate * encounters),
                Group::Pack => rates.predation_rate * rates.conversion_efficiency * encounters,
            }
        };
        round_delta(change).ok_or(LuncheonError::PopulationOverflow(self.primary_key))
    }

    /// Apply a generation's summed delta, clamped to `0..=capacity`.
    pub(crate) fn commit(&mut self, delta: i64, capacity: u64) {
        let next = (self.population_size as i128 + delta as i128).clamp(0, capacity as i128);
        self.population_size = next as u64;
    }

    /// Restore the population the seat was created with.
    pub(crate) fn reset(&mut self) {
        self.population_size = self.initial_population;
    }

    pub fn export_size(&self) -> u64 {
        self.population_size
    }

    /// Full read-only state, positioned on the ring around `anchor`.
    pub fn export_state(&self, seat_count: usize, anchor: (f64, f64)) -> SeatState {
        let (x, y) = seat_position(self.index, seat_count, anchor);
        SeatState {
            primary_key: self.primary_key,
            index: self.index,
            name: self.name.clone(),
            group: self.group,
            population_size: self.population_size,
            color: self.color().to_string(),
            x,
            y,
        }
    }
}

/// Ring position of seat `index` out of `seat_count`; seat 0 sits on top.
pub fn seat_position(index: usize, seat_count: usize, anchor: (f64, f64)) -> (f64, f64) {
    let count = seat_count.max(1) as f64;
    let angle = 2.0 * PI * index as f64 / count - PI / 2.0;
    (
        anchor.0 + SEAT_RING_RADIUS * angle.cos(),
        anchor.1 + SEAT_RING_RADIUS * angle.sin(),
    )
}

fn round_delta(change: f64) -> Option<i64> {
    let rounded = change.round();
    // i64::MAX is not representable in f64; stay strictly below 2^63.
    if rounded.is_finite() && rounded.abs() < 9.2e18 {
        Some(rounded as i64)
    } else {
        None
    }
}
