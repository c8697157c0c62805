//! Catalog project discovery and structure

use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::core::catalog::files::{self, COMPONENTS_DIR, PRODUCTS_DIR};
use crate::core::catalog::{CatalogError, MemoryCatalog};

/// Marker directory at the root of every catalog project
pub const MARKER_DIR: &str = ".hbom";

/// A directory-backed catalog
#[derive(Debug)]
pub struct Project {
    /// Root directory of the project (parent of .hbom/)
    root: PathBuf,
}

impl Project {
    /// Find project root by walking up from the current directory
    pub fn discover() -> Result<Self, ProjectError> {
        let current = std::env::current_dir()
            .map_err(|e| ProjectError::IoError(e.to_string()))?;
        Self::discover_from(&current)
    }

    /// Find project root by walking up from the given directory
    pub fn discover_from(start: &Path) -> Result<Self, ProjectError> {
        let mut current = start
            .canonicalize()
            .map_err(|e| ProjectError::IoError(format!("{}: {}", start.display(), e)))?;

        loop {
            if current.join(MARKER_DIR).is_dir() {
                return Ok(Self { root: current });
            }

            if !current.pop() {
                return Err(ProjectError::NotFound {
                    searched_from: start.to_path_buf(),
                });
            }
        }
    }

    /// Create a new catalog layout at the given path
    pub fn init(path: &Path) -> Result<Self, ProjectError> {
        std::fs::create_dir_all(path).map_err(|e| ProjectError::IoError(e.to_string()))?;
        let root = path
            .canonicalize()
            .unwrap_or_else(|_| path.to_path_buf());

        let marker = root.join(MARKER_DIR);
        if marker.exists() {
            return Err(ProjectError::AlreadyExists(root));
        }

        let project = Self { root };
        std::fs::create_dir_all(project.hbom_dir())
            .map_err(|e| ProjectError::IoError(e.to_string()))?;
        std::fs::write(project.config_path(), Self::default_config())
            .map_err(|e| ProjectError::IoError(e.to_string()))?;

        for dir in [project.products_dir(), project.components_dir()] {
            std::fs::create_dir_all(dir).map_err(|e| ProjectError::IoError(e.to_string()))?;
        }

        Ok(project)
    }

    fn default_config() -> &'static str {
        r#"# hbom catalog configuration
#
# Values here override the global config (~/.config/hbom/config.yaml) and
# are overridden by HBOM_* environment variables and command-line flags.

# Source selection when a component has several sources: lowest, recent
# policy: lowest

# Longest allowed chain of sub-assemblies, in edges
# max_depth: 64

# Count do-not-populate lines in totals and flattened lists
# include_dnp: false

# Refuse to expand a cost tree with more nodes than this
# max_tree_nodes: 200000

# Default output format (auto, tree, md, csv, json)
# default_format: auto
"#
    }

    /// Get the project root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Get the .hbom configuration directory
    pub fn hbom_dir(&self) -> PathBuf {
        self.root.join(MARKER_DIR)
    }

    /// Path of the catalog-level config file
    pub fn config_path(&self) -> PathBuf {
        self.hbom_dir().join("config.yaml")
    }

    pub fn products_dir(&self) -> PathBuf {
        self.root.join(PRODUCTS_DIR)
    }

    pub fn components_dir(&self) -> PathBuf {
        self.root.join(COMPONENTS_DIR)
    }

    /// Read every record into an in-memory snapshot
    pub fn load_catalog(&self) -> Result<MemoryCatalog, CatalogError> {
        files::load_dir(&self.root)
    }
}

/// Errors that can occur during project operations
#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("not an hbom catalog (searched from {searched_from:?}). Run 'hbom init' to create one.")]
    NotFound { searched_from: PathBuf },

    #[error("hbom catalog already exists at {0:?}")]
    AlreadyExists(PathBuf),

    #[error("IO error: {0}")]
    IoError(String),
}
