//! Entity type definitions
//!
//! The composition graph is built from three record types:
//!
//! - [`Product`] - buildable assemblies, keyed by part number
//! - [`Component`] - leaf parts, keyed by manufacturer + part number, each
//!   with zero or more [`Source`]s
//! - [`CompositionEdge`] - "parent contains N of child" lines, where the child
//!   is a component or a sub-assembly product

pub mod component;
pub mod edge;
pub mod product;

pub use component::{Component, Source, SourceError};
pub use edge::{CompositionEdge, EdgeError};
pub use product::Product;
