//! `hbom init` command - scaffold a catalog directory

use console::style;
use miette::{IntoDiagnostic, Result};
use std::path::{Path, PathBuf};

use crate::core::catalog::files::{COMPONENTS_DIR, PRODUCTS_DIR};
use crate::core::project::{Project, ProjectError, MARKER_DIR};

#[derive(clap::Args, Debug)]
pub struct InitArgs {
    /// Directory to initialize (default: current directory)
    #[arg(default_value = ".")]
    pub path: PathBuf,
}

pub fn run(args: InitArgs) -> Result<()> {
    let path = if args.path.as_os_str() == "." {
        std::env::current_dir().into_diagnostic()?
    } else {
        args.path.clone()
    };

    match Project::init(&path) {
        Ok(project) => {
            println!(
                "{} Initialized hbom catalog at {}",
                style("✓").green(),
                style(project.root().display()).cyan()
            );
            println!();
            print_structure(project.root());
            println!();
            println!("Next steps:");
            println!(
                "  {} Add one YAML file per product under {}/",
                style("1.").yellow(),
                PRODUCTS_DIR
            );
            println!(
                "  {} Add one YAML file per component under {}/",
                style("2.").yellow(),
                COMPONENTS_DIR
            );
            println!("  {} Roll up a cost", style("hbom cost <PART> -n 10").yellow());
            Ok(())
        }
        Err(ProjectError::AlreadyExists(path)) => {
            println!(
                "{} hbom catalog already exists at {}",
                style("!").yellow(),
                style(path.display()).cyan()
            );
            Ok(())
        }
        Err(e) => Err(miette::miette!("{}", e)),
    }
}

fn print_structure(root: &Path) {
    let config = format!("{}/config.yaml", MARKER_DIR);
    let products = format!("{}/", PRODUCTS_DIR);
    let components = format!("{}/", COMPONENTS_DIR);

    for entry in [config.as_str(), products.as_str(), components.as_str()] {
        if root.join(entry).exists() {
            println!("  {}", style(entry).dim());
        }
    }
}
