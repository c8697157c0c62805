//! Configuration management with layered hierarchy

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::engine::{ResolveOptions, SourcePolicy};

/// hbom configuration with layered hierarchy
#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Source selection policy (lowest, recent)
    pub policy: Option<SourcePolicy>,

    /// Maximum hierarchy depth, in edges
    pub max_depth: Option<usize>,

    /// Count do-not-populate lines
    pub include_dnp: Option<bool>,

    /// Largest cost tree to expand, in nodes
    pub max_tree_nodes: Option<usize>,

    /// Default output format
    pub default_format: Option<String>,
}

impl Config {
    /// Load configuration from all sources, merging in priority order
    pub fn load(catalog_config: Option<&Path>) -> Self {
        Self::load_from(
            Self::global_config_path().as_deref(),
            catalog_config,
            |key| std::env::var(key).ok(),
        )
    }

    /// Layer defaults, global file, catalog file and environment
    pub fn load_from(
        global: Option<&Path>,
        catalog: Option<&Path>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Self {
        let mut config = Config::default();

        // 1. Built-in defaults (already in Default impl)

        // 2. Global user config (~/.config/hbom/config.yaml)
        if let Some(global) = global.and_then(Self::read_file) {
            config.merge(global);
        }

        // 3. Catalog config (.hbom/config.yaml)
        if let Some(local) = catalog.and_then(Self::read_file) {
            config.merge(local);
        }

        // 4. Environment variables
        if let Some(policy) = env("HBOM_POLICY") {
            match policy.parse() {
                Ok(p) => config.policy = Some(p),
                Err(e) => tracing::warn!("ignoring HBOM_POLICY: {}", e),
            }
        }
        if let Some(depth) = env("HBOM_MAX_DEPTH") {
            match depth.trim().parse() {
                Ok(d) => config.max_depth = Some(d),
                Err(_) => tracing::warn!("ignoring HBOM_MAX_DEPTH: not a number: {}", depth),
            }
        }
        if let Some(nodes) = env("HBOM_MAX_TREE_NODES") {
            match nodes.trim().parse() {
                Ok(n) => config.max_tree_nodes = Some(n),
                Err(_) => tracing::warn!("ignoring HBOM_MAX_TREE_NODES: not a number: {}", nodes),
            }
        }

        config
    }

    pub(crate) fn read_file(path: &Path) -> Option<Config> {
        if !path.exists() {
            return None;
        }
        let contents = std::fs::read_to_string(path).ok()?;
        // A file of nothing but comments is an empty document, not an error
        if contents
            .lines()
            .map(str::trim)
            .all(|line| line.is_empty() || line.starts_with('#'))
        {
            return Some(Config::default());
        }
        match serde_yml::from_str::<Option<Config>>(&contents) {
            Ok(config) => Some(config.unwrap_or_default()),
            Err(e) => {
                tracing::warn!(path = %path.display(), "ignoring unreadable config: {}", e);
                None
            }
        }
    }

    /// Get the path to the global config file
    fn global_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "hbom")
            .map(|dirs| dirs.config_dir().join("config.yaml"))
    }

    /// Merge another config into this one (other takes precedence)
    fn merge(&mut self, other: Config) {
        if other.policy.is_some() {
            self.policy = other.policy;
        }
        if other.max_depth.is_some() {
            self.max_depth = other.max_depth;
        }
        if other.include_dnp.is_some() {
            self.include_dnp = other.include_dnp;
        }
        if other.max_tree_nodes.is_some() {
            self.max_tree_nodes = other.max_tree_nodes;
        }
        if other.default_format.is_some() {
            self.default_format = other.default_format;
        }
    }

    /// Engine options with unset values filled from defaults
    pub fn resolve_options(&self) -> ResolveOptions {
        let defaults = ResolveOptions::default();
        ResolveOptions {
            policy: self.policy.unwrap_or(defaults.policy),
            max_depth: self.max_depth.unwrap_or(defaults.max_depth),
            include_dnp: self.include_dnp.unwrap_or(defaults.include_dnp),
            max_tree_nodes: self.max_tree_nodes.unwrap_or(defaults.max_tree_nodes),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{DEFAULT_MAX_DEPTH, DEFAULT_MAX_TREE_NODES};
    use std::collections::HashMap;
    use tempfile::tempdir;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_defaults() {
        let config = Config::load_from(None, None, no_env);
        let options = config.resolve_options();
        assert_eq!(options.policy, SourcePolicy::Lowest);
        assert_eq!(options.max_depth, DEFAULT_MAX_DEPTH);
        assert!(!options.include_dnp);
        assert_eq!(options.max_tree_nodes, DEFAULT_MAX_TREE_NODES);
    }

    #[test]
    fn test_catalog_overrides_global() {
        let tmp = tempdir().unwrap();
        let global = tmp.path().join("global.yaml");
        let local = tmp.path().join("local.yaml");
        std::fs::write(&global, "policy: recent\nmax_depth: 10\ninclude_dnp: true\n").unwrap();
        std::fs::write(&local, "max_depth: 20\n").unwrap();

        let config = Config::load_from(Some(&global), Some(&local), no_env);
        assert_eq!(config.policy, Some(SourcePolicy::Recent));
        assert_eq!(config.max_depth, Some(20));
        assert_eq!(config.include_dnp, Some(true));
    }

    #[test]
    fn test_env_overrides_files() {
        let tmp = tempdir().unwrap();
        let local = tmp.path().join("config.yaml");
        std::fs::write(&local, "policy: recent\nmax_depth: 5\n").unwrap();

        let env: HashMap<&str, &str> = [
            ("HBOM_POLICY", "lowest"),
            ("HBOM_MAX_DEPTH", "7"),
            ("HBOM_MAX_TREE_NODES", "500"),
        ]
        .into_iter()
        .collect();
        let config = Config::load_from(None, Some(&local), |k| env.get(k).map(|v| v.to_string()));
        assert_eq!(config.policy, Some(SourcePolicy::Lowest));
        assert_eq!(config.max_depth, Some(7));
        assert_eq!(config.resolve_options().max_tree_nodes, 500);
    }

    #[test]
    fn test_comment_only_file_reads_as_empty_config() {
        let tmp = tempdir().unwrap();
        let local = tmp.path().join("config.yaml");
        std::fs::write(&local, "# nothing set yet\n\n# policy: lowest\n").unwrap();
        assert_eq!(Config::read_file(&local), Some(Config::default()));

        std::fs::write(&local, "").unwrap();
        assert_eq!(Config::read_file(&local), Some(Config::default()));
    }

    #[test]
    fn test_bad_values_are_ignored() {
        let tmp = tempdir().unwrap();
        let local = tmp.path().join("config.yaml");
        std::fs::write(&local, "policy: [not, a, policy]\n").unwrap();

        let config = Config::load_from(None, Some(&local), |k| {
            (k == "HBOM_MAX_DEPTH").then(|| "deep".to_string())
        });
        assert_eq!(config, Config::default());
    }
}
