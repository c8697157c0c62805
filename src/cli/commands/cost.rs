//! `hbom cost` command - cost rollup through the hierarchy

use miette::{IntoDiagnostic, Result};

use super::ResolveArgs;
use crate::cli::helpers::{print_warnings, write_output, CatalogContext};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::engine::Resolver;
use crate::report;

#[derive(clap::Args, Debug)]
pub struct CostArgs {
    #[command(flatten)]
    pub resolve: ResolveArgs,
}

pub fn run(args: CostArgs, global: &GlobalOpts) -> Result<()> {
    let ctx = CatalogContext::open(global)?;
    let root = args.resolve.product()?;
    let options = args.resolve.options(&ctx.config);

    let report = Resolver::new(ctx.catalog(), options).resolve_cost(&root, args.resolve.qty)?;

    let content = match ctx.format(global.format, OutputFormat::Tree) {
        OutputFormat::Auto | OutputFormat::Tree => report::render_cost_tree(&report),
        OutputFormat::Md => report::cost_markdown(&report),
        OutputFormat::Csv => report::cost_csv(&report).into_diagnostic()?,
        OutputFormat::Json => report::to_json(&report).into_diagnostic()?,
    };

    print_warnings(&report.warnings, global);
    write_output(&content, args.resolve.output, global)
}
