//! Unit cost selection from a component's sources

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::entities::Source;

/// Strategy for choosing one source out of several
///
/// Implementations must be pure functions of the slice: same sources in,
/// same choice out.
pub trait SourceSelector {
    fn select<'a>(&self, sources: &'a [Source]) -> Option<&'a Source>;
}

/// Built-in selection policies
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourcePolicy {
    /// Cheapest unit cost; ties go to the most recently updated, then distributor name
    #[default]
    Lowest,
    /// Most recently updated; ties go to the cheapest, then distributor name
    Recent,
}

impl std::fmt::Display for SourcePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourcePolicy::Lowest => write!(f, "lowest"),
            SourcePolicy::Recent => write!(f, "recent"),
        }
    }
}

impl std::str::FromStr for SourcePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "lowest" | "cheapest" => Ok(SourcePolicy::Lowest),
            "recent" | "latest" => Ok(SourcePolicy::Recent),
            _ => Err(format!("Invalid source policy: {}. Use 'lowest' or 'recent'", s)),
        }
    }
}

fn newer_first(a: &Source, b: &Source) -> Ordering {
    // None sorts below Some, so undated sources lose
    b.last_updated.cmp(&a.last_updated)
}

impl SourceSelector for SourcePolicy {
    fn select<'a>(&self, sources: &'a [Source]) -> Option<&'a Source> {
        match self {
            SourcePolicy::Lowest => sources.iter().min_by(|a, b| {
                a.unit_cost
                    .cmp(&b.unit_cost)
                    .then_with(|| newer_first(a, b))
                    .then_with(|| a.distributor.cmp(&b.distributor))
            }),
            SourcePolicy::Recent => sources.iter().min_by(|a, b| {
                newer_first(a, b)
                    .then_with(|| a.unit_cost.cmp(&b.unit_cost))
                    .then_with(|| a.distributor.cmp(&b.distributor))
            }),
        }
    }
}

/// Outcome of costing one component
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedCost {
    pub unit_cost: Decimal,

    /// Chosen source; `None` means no sources and a zero cost
    pub source: Option<Source>,
}

impl ResolvedCost {
    pub fn is_missing(&self) -> bool {
        self.source.is_none()
    }
}

/// Pick a unit cost for a component from its sources
pub fn resolve_unit_cost<S: SourceSelector + ?Sized>(
    selector: &S,
    sources: &[Source],
) -> ResolvedCost {
    match selector.select(sources) {
        Some(source) => ResolvedCost {
            unit_cost: source.unit_cost,
            source: Some(source.clone()),
        },
        None => ResolvedCost {
            unit_cost: Decimal::ZERO,
            source: None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn source(distributor: &str, cents: i64, day: Option<u32>) -> Source {
        let mut s = Source::new(distributor, Decimal::new(cents, 2));
        s.last_updated = day.map(|d| Utc.with_ymd_and_hms(2024, 1, d, 0, 0, 0).unwrap());
        s
    }

    #[test]
    fn test_no_sources_is_zero_and_missing() {
        let resolved = resolve_unit_cost(&SourcePolicy::Lowest, &[]);
        assert_eq!(resolved.unit_cost, Decimal::ZERO);
        assert!(resolved.is_missing());
    }

    #[test]
    fn test_lowest_picks_cheapest() {
        let sources = [source("Digikey", 12, Some(5)), source("Mouser", 10, Some(1))];
        let resolved = resolve_unit_cost(&SourcePolicy::Lowest, &sources);
        assert_eq!(resolved.unit_cost, Decimal::new(10, 2));
        assert_eq!(resolved.source.unwrap().distributor, "Mouser");
    }

    #[test]
    fn test_lowest_tie_prefers_recent_then_name() {
        let sources = [
            source("Zeta", 10, None),
            source("Mouser", 10, Some(2)),
            source("Arrow", 10, Some(2)),
        ];
        let chosen = SourcePolicy::Lowest.select(&sources).unwrap();
        assert_eq!(chosen.distributor, "Arrow");
    }

    #[test]
    fn test_recent_picks_newest_even_if_pricier() {
        let sources = [source("Digikey", 10, Some(1)), source("Mouser", 15, Some(9))];
        let resolved = resolve_unit_cost(&SourcePolicy::Recent, &sources);
        assert_eq!(resolved.unit_cost, Decimal::new(15, 2));
    }

    #[test]
    fn test_recent_tie_prefers_cheapest() {
        let sources = [source("Digikey", 20, Some(3)), source("Mouser", 15, Some(3))];
        assert_eq!(SourcePolicy::Recent.select(&sources).unwrap().distributor, "Mouser");
    }

    #[test]
    fn test_selection_ignores_input_order() {
        let a = [source("A", 10, Some(1)), source("B", 10, Some(1))];
        let b = [source("B", 10, Some(1)), source("A", 10, Some(1))];
        for policy in [SourcePolicy::Lowest, SourcePolicy::Recent] {
            assert_eq!(
                policy.select(&a).unwrap().distributor,
                policy.select(&b).unwrap().distributor
            );
        }
    }

    #[test]
    fn test_policy_parse() {
        assert_eq!("LOWEST".parse::<SourcePolicy>().unwrap(), SourcePolicy::Lowest);
        assert_eq!("recent".parse::<SourcePolicy>().unwrap(), SourcePolicy::Recent);
        assert!("average".parse::<SourcePolicy>().is_err());
    }
}
