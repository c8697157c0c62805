//! Shared helper functions for CLI commands
//!
//! Catalog opening, option layering and output writing used by every
//! resolving command.

use console::style;
use miette::{IntoDiagnostic, Result};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::catalog::{Catalog, SqliteCatalog};
use crate::core::project::Project;
use crate::core::Config;
use crate::engine::MissingSourceWarning;

/// An opened catalog together with the configuration that applies to it
pub struct CatalogContext {
    catalog: Box<dyn Catalog>,
    pub config: Config,
}

impl CatalogContext {
    /// Open the catalog named by `--catalog`, or discover one from the
    /// working directory
    ///
    /// A file path is opened as a SQLite database; a directory is searched
    /// upward for `.hbom/` and loaded as YAML records.
    pub fn open(global: &GlobalOpts) -> Result<Self> {
        match &global.catalog {
            Some(path) if path.is_file() => Self::open_database(path),
            Some(path) => {
                let project = Project::discover_from(path).map_err(|e| miette::miette!("{}", e))?;
                Self::open_project(project)
            }
            None => {
                let project = Project::discover().map_err(|e| miette::miette!("{}", e))?;
                Self::open_project(project)
            }
        }
    }

    fn open_project(project: Project) -> Result<Self> {
        let catalog = project.load_catalog()?;
        tracing::debug!(root = %project.root().display(), "opened catalog directory");
        Ok(Self {
            catalog: Box::new(catalog),
            config: Config::load(Some(&project.config_path())),
        })
    }

    fn open_database(path: &Path) -> Result<Self> {
        let catalog = SqliteCatalog::open(path)?;
        tracing::debug!(path = %path.display(), "opened catalog database");
        Ok(Self {
            catalog: Box::new(catalog),
            config: Config::load(None),
        })
    }

    pub fn catalog(&self) -> &dyn Catalog {
        self.catalog.as_ref()
    }

    /// Resolve `auto` through the configured default, then the command's own
    pub fn format(&self, requested: OutputFormat, fallback: OutputFormat) -> OutputFormat {
        if requested != OutputFormat::Auto {
            return requested;
        }
        self.config
            .default_format
            .as_deref()
            .and_then(|f| clap::ValueEnum::from_str(f, true).ok())
            .filter(|f| *f != OutputFormat::Auto)
            .unwrap_or(fallback)
    }
}

/// Print missing-source warnings to stderr
pub fn print_warnings(warnings: &[MissingSourceWarning], global: &GlobalOpts) {
    if global.quiet {
        return;
    }
    for warning in warnings {
        eprintln!("{} {}", style("warning:").yellow().bold(), warning);
    }
}

/// Write rendered output to a file or stdout
pub fn write_output(
    content: &str,
    output_path: Option<PathBuf>,
    global: &GlobalOpts,
) -> Result<()> {
    match output_path {
        Some(path) => {
            let file = File::create(&path).into_diagnostic()?;
            let mut writer = BufWriter::new(file);
            writer.write_all(content.as_bytes()).into_diagnostic()?;
            writer.flush().into_diagnostic()?;
            if !global.quiet {
                eprintln!(
                    "{} Report written to {}",
                    style("✓").green(),
                    style(path.display()).cyan()
                );
            }
        }
        None => {
            let stdout = std::io::stdout();
            let mut lock = stdout.lock();
            lock.write_all(content.as_bytes()).into_diagnostic()?;
        }
    }
    Ok(())
}
