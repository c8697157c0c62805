//! YAML helpers for catalog files

pub mod diagnostics;

pub use diagnostics::RecordSyntaxError;
