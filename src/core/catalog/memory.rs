//! In-memory catalog snapshot

use std::collections::BTreeMap;

use super::{Catalog, CatalogError};
use crate::core::identity::{ComponentKey, ProductId};
use crate::entities::{CompositionEdge, Component, Product, Source};

/// Immutable-once-built snapshot of a catalog
///
/// Every insert validates the row, so anything reachable through the
/// [`Catalog`] methods already satisfies the record invariants.
#[derive(Debug, Default, Clone)]
pub struct MemoryCatalog {
    products: BTreeMap<ProductId, Product>,
    components: BTreeMap<ComponentKey, Component>,
    sources: BTreeMap<ComponentKey, Vec<Source>>,
    edges: BTreeMap<ProductId, Vec<CompositionEdge>>,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_product(&mut self, product: Product) -> Result<(), CatalogError> {
        if self.products.contains_key(&product.part_number) {
            return Err(CatalogError::Duplicate(format!(
                "product {}",
                product.part_number
            )));
        }
        self.products.insert(product.part_number.clone(), product);
        Ok(())
    }

    pub fn insert_component(&mut self, component: Component) -> Result<(), CatalogError> {
        if self.components.contains_key(&component.key) {
            return Err(CatalogError::Duplicate(format!("component {}", component.key)));
        }
        self.components.insert(component.key.clone(), component);
        Ok(())
    }

    /// Attach a source to an existing component
    pub fn insert_source(
        &mut self,
        key: &ComponentKey,
        source: Source,
    ) -> Result<(), CatalogError> {
        if !self.components.contains_key(key) {
            return Err(CatalogError::Dangling {
                record: format!("source {}", source.distributor),
                missing: format!("component {}", key),
            });
        }
        source
            .validate()
            .map_err(|e| CatalogError::bad_source(key, &source, e))?;
        self.sources.entry(key.clone()).or_default().push(source);
        Ok(())
    }

    /// Append an edge to its parent's BOM. The parent must already exist;
    /// the child is resolved lazily so files may be loaded in any order.
    pub fn insert_edge(&mut self, edge: CompositionEdge) -> Result<(), CatalogError> {
        if !self.products.contains_key(&edge.parent) {
            return Err(CatalogError::Dangling {
                record: format!("BOM line -> {}", edge.child),
                missing: format!("product {}", edge.parent),
            });
        }
        edge.validate()
            .map_err(|e| CatalogError::bad_edge(&edge, e))?;
        self.edges.entry(edge.parent.clone()).or_default().push(edge);
        Ok(())
    }

    pub fn product_count(&self) -> usize {
        self.products.len()
    }

    pub fn component_count(&self) -> usize {
        self.components.len()
    }
}

impl Catalog for MemoryCatalog {
    fn product(&self, id: &ProductId) -> Result<Option<Product>, CatalogError> {
        Ok(self.products.get(id).cloned())
    }

    fn component(&self, key: &ComponentKey) -> Result<Option<Component>, CatalogError> {
        Ok(self.components.get(key).cloned())
    }

    fn sources_for(&self, key: &ComponentKey) -> Result<Vec<Source>, CatalogError> {
        Ok(self.sources.get(key).cloned().unwrap_or_default())
    }

    fn child_edges(&self, id: &ProductId) -> Result<Vec<CompositionEdge>, CatalogError> {
        Ok(self.edges.get(id).cloned().unwrap_or_default())
    }
}
