//! `hbom check` command - validate a hierarchy without costing it

use console::style;
use miette::{IntoDiagnostic, Result};

use crate::cli::helpers::{write_output, CatalogContext};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::identity::ProductId;
use crate::engine::{ResolveOptions, Resolver};
use crate::report;

#[derive(clap::Args, Debug)]
pub struct CheckArgs {
    /// Product part number to check
    pub part: String,

    /// Maximum hierarchy depth
    #[arg(long)]
    pub max_depth: Option<usize>,
}

pub fn run(args: CheckArgs, global: &GlobalOpts) -> Result<()> {
    let ctx = CatalogContext::open(global)?;
    let root = ProductId::parse(&args.part).into_diagnostic()?;
    let mut options: ResolveOptions = ctx.config.resolve_options();
    if let Some(depth) = args.max_depth {
        options.max_depth = depth;
    }

    let summary = Resolver::new(ctx.catalog(), options).check(&root)?;

    let content = match ctx.format(global.format, OutputFormat::Tree) {
        OutputFormat::Json => report::to_json(&summary).into_diagnostic()?,
        _ => {
            let mut out = format!(
                "{} {} is a valid hierarchy\n",
                style("✓").green(),
                style(&summary.root).cyan()
            );
            out.push_str(&format!("  products:     {}\n", summary.products));
            out.push_str(&format!("  components:   {}\n", summary.components));
            out.push_str(&format!("  edges:        {}\n", summary.edges));
            out.push_str(&format!("  shared nodes: {}\n", summary.shared_nodes));
            out.push_str(&format!(
                "  depth:        {} (limit {})\n",
                summary.depth, options.max_depth
            ));
            let tree_nodes = summary
                .tree_nodes
                .map_or_else(|| "overflow".to_string(), |n| n.to_string());
            out.push_str(&format!(
                "  tree nodes:   {} (limit {})\n",
                tree_nodes, options.max_tree_nodes
            ));
            out
        }
    };
    write_output(&content, None, global)
}
