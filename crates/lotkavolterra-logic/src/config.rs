//! Run configuration and interaction rates.
//!
//! A run is described by how many seats the test table gets, what
//! population every seat starts with, how many generations to run, and
//! the rates that drive the pairwise interaction rule. Everything has a
//! default, so a JSON config file only needs the fields it overrides.
//!
//! ```
//! use lotkavolterra_logic::config::{validate_config, SimulationConfig};
//!
//! let mut config = SimulationConfig::default();
//! config.num_generations = 25;
//! assert!(validate_config(&config).is_empty());
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::LuncheonError;
use crate::group::Group;

pub const DEFAULT_NUM_GENERATIONS: u32 = 10;
pub const DEFAULT_NUM_SEATS: usize = 10;
pub const DEFAULT_POPULATION_SIZE: i64 = 1000;
pub const DEFAULT_CARRYING_CAPACITY: u64 = 10_000;

/// Coefficients of the pairwise interaction rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionRates {
    /// Growth per same-group encounter for packs.
    pub pack_growth_rate: f64,
    /// Growth per same-group encounter for herds.
    pub herd_growth_rate: f64,
    /// Herd loss per normalized pack/herd encounter.
    pub predation_rate: f64,
    /// Share of the herd loss that turns into pack growth (0.0–1.0).
    pub conversion_efficiency: f64,
    /// No seat ever holds more than this.
    pub carrying_capacity: u64,
}

impl Default for InteractionRates {
    fn default() -> Self {
        Self {
            pack_growth_rate: 0.01,
            herd_growth_rate: 0.03,
            predation_rate: 0.05,
            conversion_efficiency: 0.5,
            carrying_capacity: DEFAULT_CARRYING_CAPACITY,
        }
    }
}

impl InteractionRates {
    pub fn growth_rate(&self, group: Group) -> f64 {
        match group {
            Group::Pack => self.pack_growth_rate,
            Group::Herd => self.herd_growth_rate,
        }
    }
}

/// Everything a driver needs to set up and run a simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Seats at the rule-based test table.
    pub num_seats: usize,
    /// Initial population of every seat.
    pub population_size: i64,
    /// Generations to run after the initial snapshot.
    pub num_generations: u32,
    pub rates: InteractionRates,
    /// Random seed for group draws (None = thread RNG).
    pub seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            num_seats: DEFAULT_NUM_SEATS,
            population_size: DEFAULT_POPULATION_SIZE,
            num_generations: DEFAULT_NUM_GENERATIONS,
            rates: InteractionRates::default(),
            seed: None,
        }
    }
}

impl SimulationConfig {
    /// Parse a (possibly partial) config from JSON.
    pub fn from_json(json: &str) -> Result<Self, LuncheonError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Configuration validation error.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// A rate is negative, NaN or infinite.
    #[error("rate '{name}' must be a finite non-negative number, got {value}")]
    InvalidRate { name: &'static str, value: f64 },
    /// Conversion efficiency outside 0.0–1.0.
    #[error("conversion efficiency must be within 0.0..=1.0, got {0}")]
    EfficiencyOutOfRange(f64),
    /// Initial population below zero.
    #[error("population size must not be negative, got {0}")]
    NegativePopulation(i64),
    #[error("carrying capacity must be positive")]
    ZeroCarryingCapacity,
    /// Initial population above the carrying capacity.
    #[error("population size {population_size} exceeds carrying capacity {capacity}")]
    PopulationAboveCapacity { population_size: i64, capacity: u64 },
    #[error("a test table needs at least one seat")]
    NoSeats,
}

/// Validate a configuration, returning all errors found.
pub fn validate_config(config: &SimulationConfig) -> Vec<ConfigError> {
    let mut errors = validate_rates(&config.rates);

    if config.num_seats == 0 {
        errors.push(ConfigError::NoSeats);
    }
    if config.population_size < 0 {
        errors.push(ConfigError::NegativePopulation(config.population_size));
    } else if config.rates.carrying_capacity > 0
        && config.population_size as u64 > config.rates.carrying_capacity
    {
        errors.push(ConfigError::PopulationAboveCapacity {
            population_size: config.population_size,
            capacity: config.rates.carrying_capacity,
        });
    }

    errors
}

/// Validate interaction rates on their own.
pub fn validate_rates(rates: &InteractionRates) -> Vec<ConfigError> {
    let mut errors = Vec::new();

    let named = [
        ("pack_growth_rate", rates.pack_growth_rate),
        ("herd_growth_rate", rates.herd_growth_rate),
        ("predation_rate", rates.predation_rate),
    ];
    for (name, value) in named {
        if !value.is_finite() || value < 0.0 {
            errors.push(ConfigError::InvalidRate { name, value });
        }
    }

    if !(0.0..=1.0).contains(&rates.conversion_efficiency) {
        errors.push(ConfigError::EfficiencyOutOfRange(
            rates.conversion_efficiency,
        ));
    }
    if rates.carrying_capacity == 0 {
        errors.push(ConfigError::ZeroCarryingCapacity);
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_valid() {
        assert!(validate_config(&SimulationConfig::default()).is_empty());
    }

    #[test]
    fn test_default_growth_rates_distinct() {
        let rates = InteractionRates::default();
        assert_ne!(rates.growth_rate(Group::Pack), rates.growth_rate(Group::Herd));
        assert!(rates.growth_rate(Group::Pack) > 0.0);
    }

    #[test]
    fn test_negative_rate_rejected() {
        let mut config = SimulationConfig::default();
        config.rates.predation_rate = -0.1;
        let errors = validate_config(&config);
        assert!(errors
            .iter()
            .any(|e| matches!(e, ConfigError::InvalidRate { name: "predation_rate", .. })));
    }

    #[test]
    fn test_nan_rate_rejected() {
        let mut config = SimulationConfig::default();
        config.rates.herd_growth_rate = f64::NAN;
        assert_eq!(validate_config(&config).len(), 1);
    }

    #[test]
    fn test_efficiency_range() {
        let mut config = SimulationConfig::default();
        config.rates.conversion_efficiency = 1.5;
        assert!(validate_config(&config).contains(&ConfigError::EfficiencyOutOfRange(1.5)));
    }

    #[test]
    fn test_collects_all_errors() {
        let config = SimulationConfig {
            num_seats: 0,
            population_size: 50,
            rates: InteractionRates {
                carrying_capacity: 0,
                ..InteractionRates::default()
            },
            ..SimulationConfig::default()
        };
        let errors = validate_config(&config);
        assert!(errors.contains(&ConfigError::NoSeats));
        assert!(errors.contains(&ConfigError::ZeroCarryingCapacity));
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn test_negative_population() {
        let config = SimulationConfig {
            population_size: -5,
            ..SimulationConfig::default()
        };
        assert_eq!(validate_config(&config), vec![ConfigError::NegativePopulation(-5)]);
    }

    #[test]
    fn test_population_above_capacity() {
        let config = SimulationConfig {
            population_size: 20_000,
            ..SimulationConfig::default()
        };
        assert_eq!(
            validate_config(&config),
            vec![ConfigError::PopulationAboveCapacity {
                population_size: 20_000,
                capacity: DEFAULT_CARRYING_CAPACITY,
            }]
        );
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config =
            SimulationConfig::from_json(r#"{"num_generations": 3, "rates": {"predation_rate": 0.1}}"#)
                .unwrap();
        assert_eq!(config.num_generations, 3);
        assert_eq!(config.num_seats, DEFAULT_NUM_SEATS);
        assert_eq!(config.rates.predation_rate, 0.1);
        assert_eq!(config.rates.carrying_capacity, DEFAULT_CARRYING_CAPACITY);
        assert_eq!(config.seed, None);
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            SimulationConfig::from_json("{not json"),
            Err(LuncheonError::Json(_))
        ));
    }
}
