//! Structured luncheon descriptions.
//!
//! This is the data model of a luncheon input file; reading the file is
//! left to the caller. Keys are camelCase:
//!
//! ```json
//! {
//!   "luncheon": {
//!     "name": "Board Lunch",
//!     "numTablesX": 2,
//!     "numTablesY": 1,
//!     "tables": [
//!       { "name": "North", "x": 0.25, "y": 0.5,
//!         "people": [ { "name": "Ada", "group": "pack" }, { "name": "Lin" } ] }
//!     ]
//!   }
//! }
//! ```
//!
//! A person without a group, or with a label that is neither `pack` nor
//! `herd`, gets a random group.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::InteractionRates;
use crate::error::LuncheonError;
use crate::group::Group;
use crate::luncheon::Luncheon;
use crate::table::{Table, DEFAULT_ANCHOR};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LuncheonFile {
    pub luncheon: LuncheonSpec,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LuncheonSpec {
    pub name: String,
    #[serde(default = "one")]
    pub num_tables_x: u32,
    #[serde(default = "one")]
    pub num_tables_y: u32,
    #[serde(default)]
    pub tables: Vec<TableSpec>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableSpec {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub x: Option<f64>,
    #[serde(default)]
    pub y: Option<f64>,
    #[serde(default)]
    pub people: Vec<PersonSpec>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonSpec {
    pub name: String,
    #[serde(default)]
    pub group: Option<String>,
}

fn one() -> u32 {
    1
}

impl LuncheonFile {
    pub fn from_json(json: &str) -> Result<Self, LuncheonError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn seat_count(&self) -> usize {
        self.luncheon.tables.iter().map(|t| t.people.len()).sum()
    }
}

/// Group for an input label; absent or unknown labels draw a random group.
pub fn resolve_group(label: Option<&str>, rng: &mut impl Rng) -> Group {
    match label {
        None => Group::random(rng),
        Some(label) => label.parse().unwrap_or_else(|err: LuncheonError| {
            let group = Group::random(rng);
            log::warn!("{err}; seating as {group}");
            group
        }),
    }
}

/// Build a luncheon where every seat starts at `population_size`.
///
/// Primary keys run sequentially across all tables in file order.
pub fn build_luncheon(
    file: &LuncheonFile,
    population_size: i64,
    rates: InteractionRates,
    rng: &mut impl Rng,
) -> Result<Luncheon, LuncheonError> {
    let spec = &file.luncheon;
    let mut luncheon =
        Luncheon::new(spec.name.clone(), rates).with_layout(spec.num_tables_x, spec.num_tables_y);

    let mut primary_key = 0u64;
    for (n, table_spec) in spec.tables.iter().enumerate() {
        let name = table_spec
            .name
            .clone()
            .unwrap_or_else(|| format!("Table {}", n + 1));
        let mut table = Table::with_position(
            name,
            table_spec.x.unwrap_or(DEFAULT_ANCHOR.0),
            table_spec.y.unwrap_or(DEFAULT_ANCHOR.1),
        );

        for (index, person) in table_spec.people.iter().enumerate() {
            let group = resolve_group(person.group.as_deref(), rng);
            table.insert(primary_key, index, person.name.clone(), group, population_size)?;
            primary_key += 1;
        }

        luncheon.add_table(table)?;
    }

    log::info!(
        "Built luncheon '{}' with {} tables and {} seats",
        luncheon.name,
        luncheon.tables().len(),
        luncheon.seat_count()
    );
    Ok(luncheon)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const SAMPLE: &str = r#"{
        "luncheon": {
            "name": "Board Lunch",
            "numTablesX": 2,
            "numTablesY": 1,
            "tables": [
                { "name": "North", "x": 0.25, "y": 0.5,
                  "people": [ { "name": "Ada", "group": "pack" }, { "name": "Lin", "group": "HERD" } ] },
                { "people": [ { "name": "Sam" }, { "name": "Kit", "group": "wolf" } ] }
            ]
        }
    }"#;

    #[test]
    fn test_parse_sample() {
        let file = LuncheonFile::from_json(SAMPLE).unwrap();
        assert_eq!(file.luncheon.name, "Board Lunch");
        assert_eq!(file.luncheon.num_tables_x, 2);
        assert_eq!(file.seat_count(), 4);
        assert_eq!(file.luncheon.tables[1].name, None);
    }

    #[test]
    fn test_build_assigns_keys_and_defaults() {
        let file = LuncheonFile::from_json(SAMPLE).unwrap();
        let mut rng = StdRng::seed_from_u64(5);
        let luncheon =
            build_luncheon(&file, 800, InteractionRates::default(), &mut rng).unwrap();

        let tables = luncheon.tables();
        assert_eq!(tables[0].name, "North");
        assert_eq!(tables[0].anchor(), (0.25, 0.5));
        assert_eq!(tables[1].name, "Table 2");
        assert_eq!(tables[1].anchor(), DEFAULT_ANCHOR);

        let keys: Vec<u64> = luncheon.seats().map(|s| s.primary_key).collect();
        assert_eq!(keys, vec![0, 1, 2, 3]);
        assert_eq!(tables[1].get_seats()[1].index, 1);
        assert!(luncheon.seats().all(|s| s.population_size() == 800));

        assert_eq!(tables[0].get_seats()[0].group, Group::Pack);
        assert_eq!(tables[0].get_seats()[1].group, Group::Herd);
    }

    #[test]
    fn test_unknown_label_never_errors() {
        let mut rng = StdRng::seed_from_u64(9);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..64 {
            seen.insert(resolve_group(Some("wolf"), &mut rng));
        }
        assert_eq!(seen.len(), 2);
    }

    #[test]
    fn test_missing_name_is_parse_error() {
        let json = r#"{"luncheon": {"tables": []}}"#;
        assert!(matches!(
            LuncheonFile::from_json(json),
            Err(LuncheonError::Json(_))
        ));
    }

    #[test]
    fn test_duplicate_table_names_rejected() {
        let json = r#"{"luncheon": {"name": "L", "tables": [
            {"name": "A", "people": [{"name": "x"}]},
            {"name": "A", "people": [{"name": "y"}]}
        ]}}"#;
        let file = LuncheonFile::from_json(json).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        assert!(matches!(
            build_luncheon(&file, 10, InteractionRates::default(), &mut rng),
            Err(LuncheonError::DuplicateTableName(_))
        ));
    }
}
