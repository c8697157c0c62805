//! Resolution errors and warnings

use miette::Diagnostic;
use serde::Serialize;
use std::fmt;
use thiserror::Error;

use crate::core::catalog::CatalogError;
use crate::core::identity::{ComponentKey, ProductId};

/// Kind of record a lookup was looking for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    Product,
    Component,
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordKind::Product => write!(f, "product"),
            RecordKind::Component => write!(f, "component"),
        }
    }
}

/// Fatal resolution errors. None of these ever come with a partial result.
#[derive(Debug, Error, Diagnostic)]
pub enum ResolveError {
    #[error("{kind} {id} not found in catalog{}", referenced_suffix(.referenced_by))]
    #[diagnostic(code(hbom::resolve::not_found))]
    NotFound {
        kind: RecordKind,
        id: String,
        referenced_by: Option<ProductId>,
    },

    #[error("composition cycle: {}", format_path(.path))]
    #[diagnostic(
        code(hbom::resolve::cycle),
        help("a product may not contain itself, directly or through sub-assemblies")
    )]
    Cycle { path: Vec<ProductId> },

    #[error("hierarchy depth {depth} exceeds the limit of {limit}")]
    #[diagnostic(
        code(hbom::resolve::depth),
        help("raise `max_depth` in the config or pass --max-depth")
    )]
    DepthExceeded { limit: usize, depth: usize },

    #[error(
        "cost tree for {root} would have {} nodes, over the limit of {limit}",
        node_count(.nodes)
    )]
    #[diagnostic(
        code(hbom::resolve::tree_size),
        help("shared sub-assemblies repeat per path; raise `max_tree_nodes` or use `hbom flatten`")
    )]
    TreeTooLarge {
        root: ProductId,
        /// `None` when the count does not fit in `usize`
        nodes: Option<usize>,
        limit: usize,
    },

    #[error("build quantity must be positive (got {0})")]
    #[diagnostic(code(hbom::resolve::quantity))]
    InvalidBuildQuantity(rust_decimal::Decimal),

    #[error("arithmetic overflow while resolving {0}")]
    #[diagnostic(code(hbom::resolve::overflow))]
    Overflow(String),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Catalog(#[from] CatalogError),
}

fn referenced_suffix(parent: &Option<ProductId>) -> String {
    parent
        .as_ref()
        .map(|p| format!(" (referenced by {})", p))
        .unwrap_or_default()
}

fn node_count(nodes: &Option<usize>) -> String {
    match nodes {
        Some(n) => n.to_string(),
        None => "more than usize::MAX".to_string(),
    }
}

fn format_path(path: &[ProductId]) -> String {
    path.iter()
        .map(ProductId::as_str)
        .collect::<Vec<_>>()
        .join(" -> ")
}

/// Non-fatal: a component with no sources was costed at zero
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MissingSourceWarning {
    pub component: ComponentKey,
    pub description: String,
}

impl fmt::Display for MissingSourceWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "no source for {}; costed at 0", self.component)
    }
}
