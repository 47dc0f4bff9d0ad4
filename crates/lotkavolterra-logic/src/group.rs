//! Group affiliation of a seat.

use std::fmt;
use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::LuncheonError;

/// Which side of the predator/prey relationship a seat is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Group {
    /// Predator-like; grows by feeding on herds.
    Pack,
    /// Prey-like; shrinks when it meets a pack.
    Herd,
}

impl Group {
    pub const ALL: [Group; 2] = [Group::Pack, Group::Herd];

    /// Display color token for renderers.
    pub fn color(self) -> &'static str {
        match self {
            Group::Pack => "#d62728",
            Group::Herd => "#1f77b4",
        }
    }

    /// Lowercase label used in input files and exports.
    pub fn label(self) -> &'static str {
        match self {
            Group::Pack => "pack",
            Group::Herd => "herd",
        }
    }

    /// Draw Pack or Herd with probability 0.5 each.
    pub fn random(rng: &mut impl Rng) -> Self {
        if rng.gen_bool(0.5) {
            Group::Pack
        } else {
            Group::Herd
        }
    }
}

/// Free-standing color lookup.
pub fn color_of(group: Group) -> &'static str {
    group.color()
}

/// Draw a uniformly random group from the thread-local generator.
pub fn random_group() -> Group {
    Group::random(&mut rand::thread_rng())
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Group {
    type Err = LuncheonError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pack" => Ok(Group::Pack),
            "herd" => Ok(Group::Herd),
            _ => Err(LuncheonError::UnknownGroupLabel(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_parse_labels_case_insensitive() {
        assert_eq!("pack".parse::<Group>().unwrap(), Group::Pack);
        assert_eq!(" Herd ".parse::<Group>().unwrap(), Group::Herd);
        assert_eq!("PACK".parse::<Group>().unwrap(), Group::Pack);
    }

    #[test]
    fn test_parse_unknown_label() {
        let err = "wolf".parse::<Group>().unwrap_err();
        assert!(matches!(err, LuncheonError::UnknownGroupLabel(ref l) if l == "wolf"));
    }

    #[test]
    fn test_colors_distinct_and_stable() {
        assert_ne!(Group::Pack.color(), Group::Herd.color());
        assert_eq!(color_of(Group::Pack), Group::Pack.color());
    }

    #[test]
    fn test_display_matches_label() {
        for group in Group::ALL {
            assert_eq!(group.to_string(), group.label());
            assert_eq!(group.label().parse::<Group>().unwrap(), group);
        }
    }

    #[test]
    fn test_random_is_roughly_uniform() {
        let mut rng = StdRng::seed_from_u64(7);
        let draws = 20_000;
        let packs = (0..draws)
            .filter(|_| Group::random(&mut rng) == Group::Pack)
            .count();
        let ratio = packs as f64 / draws as f64;
        assert!((ratio - 0.5).abs() < 0.02, "pack ratio={ratio}");
    }

    #[test]
    fn test_random_group_yields_both() {
        let seen: std::collections::HashSet<Group> = (0..200).map(|_| random_group()).collect();
        assert_eq!(seen.len(), 2);
    }

    #[test]
    fn test_serde_lowercase() {
        assert_eq!(serde_json::to_string(&Group::Herd).unwrap(), "\"herd\"");
    }
}
