//! Product entity - a buildable assembly identified by part number

use serde::{Deserialize, Serialize};

use crate::core::identity::ProductId;

/// Product - a composition graph node that owns BOM edges
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Unique part number
    pub part_number: ProductId,

    /// Product description
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,

    /// Product revision
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revision: Option<String>,

    /// Free-text notes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Product {
    /// Create a new product with required fields
    pub fn new(part_number: ProductId, description: impl Into<String>) -> Self {
        Self {
            part_number,
            description: description.into(),
            revision: Some("A".to_string()),
            notes: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_creation_defaults_revision_a() {
        let p = Product::new(ProductId::parse("PCB-001").unwrap(), "Main board");
        assert_eq!(p.revision.as_deref(), Some("A"));
        assert_eq!(p.description, "Main board");
    }

    #[test]
    fn test_product_description_optional_in_yaml() {
        let p: Product = serde_yml::from_str("part_number: PCB-002\n").unwrap();
        assert_eq!(p.part_number.as_str(), "PCB-002");
        assert!(p.description.is_empty());
        assert_eq!(p.revision, None);
    }

    #[test]
    fn test_product_roundtrip() {
        let mut p = Product::new(ProductId::parse("PSU-001").unwrap(), "Power supply");
        p.notes = Some("Conformal coat".to_string());

        let yaml = serde_yml::to_string(&p).unwrap();
        let parsed: Product = serde_yml::from_str(&yaml).unwrap();
        assert_eq!(parsed, p);
    }
}
