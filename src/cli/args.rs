//! CLI argument definitions using clap derive

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::cli::commands::{
    check::CheckArgs, completions::CompletionsArgs, cost::CostArgs, flatten::FlattenArgs,
    init::InitArgs,
};

#[derive(Parser)]
#[command(name = "hbom")]
#[command(author, version, about = "Hierarchical BOM cost rollup and flattening")]
#[command(long_about = "Resolves multi-level bills of materials: rolls up costs through \
sub-assemblies, flattens them into purchasing lists, and rejects cyclic or overly deep \
compositions.")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalOpts,
}

#[derive(clap::Args, Clone, Debug)]
pub struct GlobalOpts {
    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "auto")]
    pub format: OutputFormat,

    /// Suppress warnings and status messages
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Enable debug logging
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Catalog directory or SQLite database (default: auto-detect by finding .hbom/)
    #[arg(long, global = true, env = "HBOM_CATALOG")]
    pub catalog: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new catalog directory
    Init(InitArgs),

    /// Roll up the cost of a product through its sub-assemblies
    Cost(CostArgs),

    /// Flatten a product into a quantity-aggregated parts list
    Flatten(FlattenArgs),

    /// Validate a product's hierarchy without costing it
    Check(CheckArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Pick per command (tree for cost, markdown for flatten)
    #[default]
    Auto,
    /// Indented tree
    Tree,
    /// Markdown tables
    Md,
    /// CSV format (for spreadsheets)
    Csv,
    /// JSON format (for programming)
    Json,
}
