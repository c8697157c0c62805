//! Hierarchical BOM resolution engine
//!
//! A resolution call runs four stages over a catalog snapshot:
//!
//! 1. [`CompositionGraph::load`] - fetch everything reachable from the root
//! 2. [`cycle::validate`] - prove the subgraph is a DAG within the depth limit
//! 3. [`cost`] - pick a unit cost per component under a [`SourcePolicy`]
//! 4. [`tree`] / [`flatten`] - multiply quantities down every path and
//!    aggregate into a cost tree or a flattened parts list
//!
//! Nothing is cached between calls and the catalog is only ever read.

pub mod cost;
pub mod cycle;
pub mod error;
pub mod flatten;
pub mod graph;
pub mod tree;

use rust_decimal::Decimal;
use serde::Serialize;
use std::fmt::Display;

use crate::core::catalog::Catalog;
use crate::core::identity::ProductId;

pub use cost::{ResolvedCost, SourcePolicy, SourceSelector};
pub use cycle::ValidatedGraph;
pub use error::{MissingSourceWarning, RecordKind, ResolveError};
pub use flatten::{FlatRow, FlattenedBom};
pub use graph::{CompositionGraph, GraphNode};
pub use tree::{CostNode, CostReport};

/// Default limit on hierarchy depth, in edges
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Default limit on the number of nodes in an expanded cost tree
pub const DEFAULT_MAX_TREE_NODES: usize = 200_000;

/// Knobs for a resolution call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ResolveOptions {
    /// Source selection when a component has several sources
    pub policy: SourcePolicy,

    /// Longest allowed root-to-leaf path, in edges
    pub max_depth: usize,

    /// Treat do-not-populate lines as populated
    pub include_dnp: bool,

    /// Largest cost tree `resolve_cost` will expand
    pub max_tree_nodes: usize,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            policy: SourcePolicy::default(),
            max_depth: DEFAULT_MAX_DEPTH,
            include_dnp: false,
            max_tree_nodes: DEFAULT_MAX_TREE_NODES,
        }
    }
}

/// Shape of a validated subgraph, for `hbom check`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphSummary {
    pub root: ProductId,
    pub products: usize,
    pub components: usize,
    pub edges: usize,
    pub shared_nodes: usize,
    pub depth: usize,

    /// Nodes in the expanded cost tree; `None` past `usize::MAX`
    pub tree_nodes: Option<usize>,
}

/// Resolves cost trees and flattened lists against a catalog
///
/// Holds only shared references, so one resolver (or many) can serve
/// concurrent calls as long as the catalog itself is `Sync`.
pub struct Resolver<'c, C: ?Sized, S = SourcePolicy> {
    catalog: &'c C,
    options: ResolveOptions,
    selector: S,
}

impl<'c, C: Catalog + ?Sized> Resolver<'c, C, SourcePolicy> {
    pub fn new(catalog: &'c C, options: ResolveOptions) -> Self {
        Self {
            catalog,
            selector: options.policy,
            options,
        }
    }
}

impl<'c, C: Catalog + ?Sized, S: SourceSelector> Resolver<'c, C, S> {
    /// Use a custom source selector instead of the built-in policy
    pub fn with_selector(catalog: &'c C, options: ResolveOptions, selector: S) -> Self {
        Self {
            catalog,
            options,
            selector,
        }
    }

    pub fn options(&self) -> &ResolveOptions {
        &self.options
    }

    /// Load and validate the subgraph of `root` without computing anything
    pub fn check(&self, root: &ProductId) -> Result<GraphSummary, ResolveError> {
        let graph = CompositionGraph::load(self.catalog, root)?;
        let validated = cycle::validate(&graph, self.options.max_depth)?;
        Ok(GraphSummary {
            root: root.clone(),
            products: graph.product_count(),
            components: graph.component_count(),
            edges: graph.edges().len(),
            shared_nodes: graph.shared_nodes(),
            depth: validated.depth(),
            tree_nodes: tree::expanded_size(&validated),
        })
    }

    /// Cost tree and grand total for `build_quantity` units of `root`
    pub fn resolve_cost(
        &self,
        root: &ProductId,
        build_quantity: Decimal,
    ) -> Result<CostReport, ResolveError> {
        check_build_quantity(build_quantity)?;
        let graph = CompositionGraph::load(self.catalog, root)?;
        let validated = cycle::validate(&graph, self.options.max_depth)?;
        tree::build_cost_tree(
            &validated,
            build_quantity,
            &self.selector,
            self.options.include_dnp,
            self.options.max_tree_nodes,
        )
    }

    /// Flattened, quantity-aggregated parts list for `build_quantity` units of `root`
    pub fn flatten(
        &self,
        root: &ProductId,
        build_quantity: Decimal,
    ) -> Result<FlattenedBom, ResolveError> {
        check_build_quantity(build_quantity)?;
        let graph = CompositionGraph::load(self.catalog, root)?;
        let validated = cycle::validate(&graph, self.options.max_depth)?;
        flatten::flatten_graph(
            &validated,
            build_quantity,
            &self.selector,
            self.options.include_dnp,
        )
    }
}

fn check_build_quantity(quantity: Decimal) -> Result<(), ResolveError> {
    if quantity <= Decimal::ZERO {
        return Err(ResolveError::InvalidBuildQuantity(quantity));
    }
    Ok(())
}

pub(crate) fn checked_mul(
    a: Decimal,
    b: Decimal,
    at: &dyn Display,
) -> Result<Decimal, ResolveError> {
    a.checked_mul(b)
        .ok_or_else(|| ResolveError::Overflow(at.to_string()))
}

pub(crate) fn checked_add(
    a: Decimal,
    b: Decimal,
    at: &dyn Display,
) -> Result<Decimal, ResolveError> {
    a.checked_add(b)
        .ok_or_else(|| ResolveError::Overflow(at.to_string()))
}
