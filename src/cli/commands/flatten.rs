//! `hbom flatten` command - aggregated purchasing list

use miette::{IntoDiagnostic, Result};

use super::ResolveArgs;
use crate::cli::helpers::{print_warnings, write_output, CatalogContext};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::engine::Resolver;
use crate::report;

#[derive(clap::Args, Debug)]
pub struct FlattenArgs {
    #[command(flatten)]
    pub resolve: ResolveArgs,
}

pub fn run(args: FlattenArgs, global: &GlobalOpts) -> Result<()> {
    let ctx = CatalogContext::open(global)?;
    let root = args.resolve.product()?;
    let options = args.resolve.options(&ctx.config);

    let bom = Resolver::new(ctx.catalog(), options).flatten(&root, args.resolve.qty)?;

    // A flattened list has no tree shape; tree falls back to the table
    let content = match ctx.format(global.format, OutputFormat::Md) {
        OutputFormat::Auto | OutputFormat::Tree | OutputFormat::Md => report::flat_markdown(&bom),
        OutputFormat::Csv => report::flat_csv(&bom).into_diagnostic()?,
        OutputFormat::Json => report::to_json(&bom).into_diagnostic()?,
    };

    print_warnings(&bom.warnings, global);
    write_output(&content, args.resolve.output, global)
}
