//! Core module - identities, catalog access, configuration and project layout

pub mod catalog;
pub mod config;
pub mod identity;
pub mod project;

pub use catalog::{Catalog, CatalogError, MemoryCatalog, SqliteCatalog};
pub use config::Config;
pub use identity::{ComponentKey, IdParseError, NodeId, ProductId};
pub use project::{Project, ProjectError};
