//! hierbom: hierarchical bill-of-materials resolution
//!
//! Loads a product's composition graph from a [`core::Catalog`], rejects
//! cycles and over-deep hierarchies, and produces either a cost tree with a
//! grand total or a flattened, quantity-aggregated parts list.

pub mod cli;
pub mod core;
pub mod engine;
pub mod entities;
pub mod report;
pub mod yaml;
