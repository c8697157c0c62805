//! Catalog query interface - read-only access to BOM records
//!
//! The resolution engine never reaches for ambient state: every call is
//! handed a [`Catalog`] and only reads from it. Backends:
//!
//! - [`MemoryCatalog`] - immutable in-memory snapshot, validated on insert
//! - [`files::load_dir`] - reads a catalog directory of YAML files into a
//!   [`MemoryCatalog`]
//! - [`SqliteCatalog`] - per-query reads from a BOM manager SQLite database

pub mod files;
mod memory;
mod sqlite;

use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

use crate::core::identity::{ComponentKey, ProductId};
use crate::entities::{CompositionEdge, Component, EdgeError, Product, Source, SourceError};
use crate::yaml::RecordSyntaxError;

pub use memory::MemoryCatalog;
pub use sqlite::SqliteCatalog;

/// Read-only view of products, components, sources and composition edges
///
/// Lookups return `Ok(None)` when the record is absent; `Err` is reserved
/// for backend failures and malformed rows.
pub trait Catalog {
    fn product(&self, id: &ProductId) -> Result<Option<Product>, CatalogError>;

    fn component(&self, key: &ComponentKey) -> Result<Option<Component>, CatalogError>;

    /// All sources for a component; empty when none are known
    fn sources_for(&self, key: &ComponentKey) -> Result<Vec<Source>, CatalogError>;

    /// Edges owned by a product, in stored order
    fn child_edges(&self, id: &ProductId) -> Result<Vec<CompositionEdge>, CatalogError>;
}

impl<C: Catalog + ?Sized> Catalog for &C {
    fn product(&self, id: &ProductId) -> Result<Option<Product>, CatalogError> {
        (**self).product(id)
    }

    fn component(&self, key: &ComponentKey) -> Result<Option<Component>, CatalogError> {
        (**self).component(key)
    }

    fn sources_for(&self, key: &ComponentKey) -> Result<Vec<Source>, CatalogError> {
        (**self).sources_for(key)
    }

    fn child_edges(&self, id: &ProductId) -> Result<Vec<CompositionEdge>, CatalogError> {
        (**self).child_edges(id)
    }
}

/// Errors raised at the catalog boundary
#[derive(Debug, Error, Diagnostic)]
pub enum CatalogError {
    #[error("malformed {record}: {reason}")]
    #[diagnostic(code(hbom::catalog::malformed))]
    Malformed { record: String, reason: String },

    #[error("duplicate {0} in catalog")]
    #[diagnostic(code(hbom::catalog::duplicate))]
    Duplicate(String),

    #[error("{record} references unknown {missing}")]
    #[diagnostic(
        code(hbom::catalog::dangling),
        help("add the referenced record before the lines that use it")
    )]
    Dangling { record: String, missing: String },

    #[error("failed to read {path:?}: {message}")]
    #[diagnostic(code(hbom::catalog::io))]
    Io { path: PathBuf, message: String },

    #[error("failed to parse {path:?}: {message}")]
    #[diagnostic(code(hbom::catalog::parse), help("check the YAML layout of this record"))]
    Parse { path: PathBuf, message: String },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Yaml(#[from] RecordSyntaxError),

    #[error("database error: {0}")]
    #[diagnostic(code(hbom::catalog::sqlite))]
    Sqlite(#[from] rusqlite::Error),
}

impl CatalogError {
    pub(crate) fn bad_edge(edge: &CompositionEdge, err: EdgeError) -> Self {
        CatalogError::Malformed {
            record: format!("BOM line {} -> {}", edge.parent, edge.child),
            reason: err.to_string(),
        }
    }

    pub(crate) fn bad_source(key: &ComponentKey, source: &Source, err: SourceError) -> Self {
        CatalogError::Malformed {
            record: format!("source {} for {}", source.distributor, key),
            reason: err.to_string(),
        }
    }
}
