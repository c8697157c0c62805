//! Composition edges - parent product to child product or component

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

use crate::core::identity::{ComponentKey, NodeId, ProductId};

/// Directed edge from a parent product to a child node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositionEdge {
    /// Owning product
    pub parent: ProductId,

    /// Child node, tagged with its kind
    pub child: NodeId,

    /// Quantity of the child per one parent
    pub quantity: Decimal,

    /// Reference designators (e.g., ["R1", "R2"])
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub reference_designators: Vec<String>,

    /// Do-not-populate: kept for visibility, excluded from cost and quantity
    #[serde(default)]
    pub dnp: bool,

    /// Edge-specific notes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl CompositionEdge {
    pub fn component(parent: ProductId, child: ComponentKey, quantity: Decimal) -> Self {
        Self::new(parent, NodeId::Component(child), quantity)
    }

    pub fn subassembly(parent: ProductId, child: ProductId, quantity: Decimal) -> Self {
        Self::new(parent, NodeId::Product(child), quantity)
    }

    fn new(parent: ProductId, child: NodeId, quantity: Decimal) -> Self {
        Self {
            parent,
            child,
            quantity,
            reference_designators: Vec::new(),
            dnp: false,
            notes: None,
        }
    }

    pub fn with_designators<I, S>(mut self, designators: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.reference_designators = designators.into_iter().map(Into::into).collect();
        self
    }

    pub fn dnp(mut self) -> Self {
        self.dnp = true;
        self
    }

    /// Check the row-level invariants of an edge
    pub fn validate(&self) -> Result<(), EdgeError> {
        if self.quantity <= Decimal::ZERO {
            return Err(EdgeError::NonPositiveQuantity(self.quantity));
        }
        if self.child == NodeId::Product(self.parent.clone()) {
            return Err(EdgeError::SelfReference(self.parent.clone()));
        }
        let mut seen = HashSet::new();
        for designator in &self.reference_designators {
            if designator.trim().is_empty() {
                return Err(EdgeError::BlankDesignator);
            }
            if !seen.insert(designator.as_str()) {
                return Err(EdgeError::DuplicateDesignator(designator.clone()));
            }
        }
        Ok(())
    }
}

/// Split a stored designator list such as "R1, R2 R3" into entries.
/// Ranges like "R1-R10" stay opaque.
pub fn split_designators(raw: &str) -> Vec<String> {
    raw.split(|c: char| c == ',' || c == ';' || c.is_whitespace())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Malformed edge rows
#[derive(Debug, Error, PartialEq)]
pub enum EdgeError {
    #[error("quantity per parent must be positive (got {0})")]
    NonPositiveQuantity(Decimal),

    #[error("product {0} lists itself as a child")]
    SelfReference(ProductId),

    #[error("reference designator {0:?} appears more than once on the same line")]
    DuplicateDesignator(String),

    #[error("reference designators must not be blank")]
    BlankDesignator,
}
