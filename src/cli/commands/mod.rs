//! CLI command implementations

pub mod check;
pub mod completions;
pub mod cost;
pub mod flatten;
pub mod init;

use miette::{IntoDiagnostic, Result};
use rust_decimal::Decimal;
use std::path::PathBuf;

use crate::core::identity::ProductId;
use crate::core::Config;
use crate::engine::{ResolveOptions, SourcePolicy};

/// Arguments shared by `cost` and `flatten`
#[derive(clap::Args, Debug)]
pub struct ResolveArgs {
    /// Product part number to resolve
    pub part: String,

    /// Number of units to build
    #[arg(long, short = 'n', default_value = "1")]
    pub qty: Decimal,

    /// Source selection policy (lowest, recent)
    #[arg(long)]
    pub policy: Option<SourcePolicy>,

    /// Maximum hierarchy depth
    #[arg(long)]
    pub max_depth: Option<usize>,

    /// Count do-not-populate lines (`--include-dnp=false` overrides the config)
    #[arg(
        long,
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true",
        value_name = "BOOL"
    )]
    pub include_dnp: Option<bool>,

    /// Largest cost tree to expand, in nodes
    #[arg(long)]
    pub max_tree_nodes: Option<usize>,

    /// Output to file instead of stdout
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
}

impl ResolveArgs {
    pub fn product(&self) -> Result<ProductId> {
        ProductId::parse(&self.part).into_diagnostic()
    }

    /// Command-line flags layered over the configuration
    pub fn options(&self, config: &Config) -> ResolveOptions {
        let mut options = config.resolve_options();
        if let Some(policy) = self.policy {
            options.policy = policy;
        }
        if let Some(depth) = self.max_depth {
            options.max_depth = depth;
        }
        if let Some(include) = self.include_dnp {
            options.include_dnp = include;
        }
        if let Some(nodes) = self.max_tree_nodes {
            options.max_tree_nodes = nodes;
        }
        options
    }
}
