//! Identity types for composition graph nodes

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Product part number - the unique key of a product
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ProductId(String);

impl ProductId {
    /// Parse a part number, rejecting blank input
    pub fn parse(s: &str) -> Result<Self, IdParseError> {
        s.parse()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ProductId {
    type Err = IdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(IdParseError::EmptyPartNumber);
        }
        if trimmed.chars().any(char::is_control) {
            return Err(IdParseError::InvalidCharacter(trimmed.to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }
}

impl Serialize for ProductId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for ProductId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Component identity: (manufacturer, manufacturer part number)
///
/// Ordering is by part number first so flattened lists read like a
/// purchasing sheet.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct ComponentKey {
    /// Manufacturer part number
    pub mpn: String,

    /// Manufacturer name
    pub manufacturer: String,
}

impl ComponentKey {
    /// Build a key, rejecting a blank manufacturer part number
    pub fn new(
        manufacturer: impl Into<String>,
        mpn: impl Into<String>,
    ) -> Result<Self, IdParseError> {
        let mpn = mpn.into().trim().to_string();
        if mpn.is_empty() {
            return Err(IdParseError::EmptyPartNumber);
        }
        Ok(Self {
            mpn,
            manufacturer: manufacturer.into().trim().to_string(),
        })
    }
}

impl<'de> Deserialize<'de> for ComponentKey {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Raw {
            mpn: String,
            #[serde(default)]
            manufacturer: String,
        }

        let raw = Raw::deserialize(deserializer)?;
        ComponentKey::new(raw.manufacturer, raw.mpn).map_err(serde::de::Error::custom)
    }
}

impl fmt::Display for ComponentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.manufacturer.is_empty() {
            f.write_str(&self.mpn)
        } else {
            write!(f, "{} ({})", self.mpn, self.manufacturer)
        }
    }
}

/// A node of the composition graph
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "kind", content = "id")]
pub enum NodeId {
    Product(ProductId),
    Component(ComponentKey),
}

impl NodeId {
    pub fn as_product(&self) -> Option<&ProductId> {
        match self {
            NodeId::Product(id) => Some(id),
            NodeId::Component(_) => None,
        }
    }

    pub fn as_component(&self) -> Option<&ComponentKey> {
        match self {
            NodeId::Product(_) => None,
            NodeId::Component(key) => Some(key),
        }
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeId::Product(id) => id.fmt(f),
            NodeId::Component(key) => key.fmt(f),
        }
    }
}

impl From<ProductId> for NodeId {
    fn from(id: ProductId) -> Self {
        NodeId::Product(id)
    }
}

impl From<ComponentKey> for NodeId {
    fn from(key: ComponentKey) -> Self {
        NodeId::Component(key)
    }
}

/// Errors that can occur when parsing identifiers
#[derive(Debug, Error, PartialEq, Eq)]
pub enum IdParseError {
    #[error("part number must not be empty")]
    EmptyPartNumber,

    #[error("part number contains control characters: {0:?}")]
    InvalidCharacter(String),
}
