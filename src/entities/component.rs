//! Component entity type - purchased leaf parts and their sources

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::identity::ComponentKey;

fn default_uom() -> String {
    "EA".to_string()
}

fn default_moq() -> u32 {
    1
}

/// A Component - always a leaf of the composition graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Component {
    /// Identity: manufacturer + manufacturer part number
    #[serde(flatten)]
    pub key: ComponentKey,

    /// Short description
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,

    /// Category (e.g., "Resistor", "Connector")
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub category: String,

    /// Unit of measure
    #[serde(default = "default_uom")]
    pub unit_of_measure: String,

    /// Informational only; composition is expressed through BOM edges
    #[serde(default)]
    pub is_assembly: bool,

    /// Free-text notes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Component {
    pub fn new(key: ComponentKey, description: impl Into<String>) -> Self {
        Self {
            key,
            description: description.into(),
            category: String::new(),
            unit_of_measure: default_uom(),
            is_assembly: false,
            notes: None,
        }
    }

    pub fn manufacturer(&self) -> &str {
        &self.key.manufacturer
    }

    pub fn mpn(&self) -> &str {
        &self.key.mpn
    }
}

/// A place to buy a component
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Source {
    /// Distributor name
    pub distributor: String,

    /// Distributor's part number
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distributor_pn: Option<String>,

    /// Unit cost, currency scale
    pub unit_cost: Decimal,

    /// Minimum order quantity
    #[serde(default = "default_moq")]
    pub moq: u32,

    /// Lead time in days
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lead_time_days: Option<u32>,

    /// When the pricing was last refreshed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<DateTime<Utc>>,
}

impl Source {
    pub fn new(distributor: impl Into<String>, unit_cost: Decimal) -> Self {
        Self {
            distributor: distributor.into(),
            distributor_pn: None,
            unit_cost,
            moq: default_moq(),
            lead_time_days: None,
            last_updated: None,
        }
    }

    /// Check the row-level invariants of a source
    pub fn validate(&self) -> Result<(), SourceError> {
        if self.unit_cost.is_sign_negative() && !self.unit_cost.is_zero() {
            return Err(SourceError::NegativeCost(self.unit_cost));
        }
        if self.moq == 0 {
            return Err(SourceError::ZeroMoq);
        }
        Ok(())
    }
}

/// Malformed source rows
#[derive(Debug, Error, PartialEq)]
pub enum SourceError {
    #[error("unit cost must not be negative (got {0})")]
    NegativeCost(Decimal),

    #[error("minimum order quantity must be at least 1")]
    ZeroMoq,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key() -> ComponentKey {
        ComponentKey::new("Yageo", "RC0603FR-0710KL").unwrap()
    }

    #[test]
    fn test_component_creation_defaults() {
        let cmp = Component::new(key(), "10k resistor");
        assert_eq!(cmp.unit_of_measure, "EA");
        assert!(!cmp.is_assembly);
        assert_eq!(cmp.manufacturer(), "Yageo");
        assert_eq!(cmp.mpn(), "RC0603FR-0710KL");
    }

    #[test]
    fn test_component_yaml_is_flat() {
        let cmp = Component::new(key(), "10k resistor");
        let yaml = serde_yml::to_string(&cmp).unwrap();
        assert!(yaml.contains("mpn: RC0603FR-0710KL"));
        assert!(yaml.contains("manufacturer: Yageo"));

        let parsed: Component = serde_yml::from_str(&yaml).unwrap();
        assert_eq!(parsed, cmp);
    }

    #[test]
    fn test_source_defaults_from_yaml() {
        let src: Source = serde_yml::from_str("distributor: Digikey\nunit_cost: 0.10\n").unwrap();
        assert_eq!(src.moq, 1);
        assert_eq!(src.unit_cost, Decimal::new(10, 2));
        assert!(src.validate().is_ok());
    }

    #[test]
    fn test_source_rejects_negative_cost() {
        let src = Source::new("Mouser", Decimal::new(-5, 2));
        assert_eq!(src.validate(), Err(SourceError::NegativeCost(Decimal::new(-5, 2))));
    }

    #[test]
    fn test_source_rejects_zero_moq() {
        let mut src = Source::new("Mouser", Decimal::ONE);
        src.moq = 0;
        assert_eq!(src.validate(), Err(SourceError::ZeroMoq));
    }
}
