use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::model::{ScanOptions, Scope, DEFAULT_IGNORE_PREFIXES};
use crate::policy::EmptyDirMode;

/// Top-level configuration from `.dirlint.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub scan: ScanConfig,
    #[serde(default)]
    pub check: CheckConfig,
}

/// Scan defaults; each field can be overridden from the command line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanConfig {
    #[serde(default = "default_scope")]
    pub scope: Scope,
    #[serde(default = "default_ignore_prefixes")]
    pub ignore_prefixes: Vec<String>,
    #[serde(default)]
    pub follow_symlinks: bool,
    /// Advisory only; the in-process adapter ignores it.
    #[serde(default)]
    pub concurrency: Option<usize>,
}

fn default_scope() -> Scope {
    Scope::Docc
}

fn default_ignore_prefixes() -> Vec<String> {
    DEFAULT_IGNORE_PREFIXES.iter().map(|s| s.to_string()).collect()
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            scope: default_scope(),
            ignore_prefixes: default_ignore_prefixes(),
            follow_symlinks: false,
            concurrency: None,
        }
    }
}

/// Policy parameters for the `check` command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckConfig {
    /// Violations above this count fail the max-violations policy.
    #[serde(default)]
    pub max_violations: usize,
    /// Emptiness mode: "strict-zero" or "ignore-noise"; custom ignore/keep
    /// lists below switch to custom mode.
    #[serde(default = "default_empty_dir_mode")]
    pub empty_dir_mode: String,
    #[serde(default)]
    pub empty_dir_ignore: Vec<String>,
    #[serde(default)]
    pub empty_dir_keep: Vec<String>,
}

fn default_empty_dir_mode() -> String {
    "ignore-noise".into()
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            max_violations: 0,
            empty_dir_mode: default_empty_dir_mode(),
            empty_dir_ignore: Vec::new(),
            empty_dir_keep: Vec::new(),
        }
    }
}

impl Config {
    /// Load config from a TOML file. Returns default if file doesn't exist.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Scan options for the given roots, seeded from this config.
    pub fn scan_options(&self, roots: Vec<PathBuf>) -> ScanOptions {
        let mut options = ScanOptions::new(roots);
        options.scope = self.scan.scope;
        options.ignore_prefixes = self.scan.ignore_prefixes.clone();
        options.follow_symlinks = self.scan.follow_symlinks;
        options.concurrency = self.scan.concurrency;
        options
    }

    /// Emptiness mode for the no-empty-dirs policy.
    pub fn empty_dir_mode(&self) -> EmptyDirMode {
        if !self.check.empty_dir_ignore.is_empty() || !self.check.empty_dir_keep.is_empty() {
            return EmptyDirMode::Custom {
                ignore: self.check.empty_dir_ignore.clone(),
                keep: self.check.empty_dir_keep.clone(),
            };
        }
        match self.check.empty_dir_mode.as_str() {
            "strict-zero" => EmptyDirMode::StrictZero,
            _ => EmptyDirMode::IgnoreNoise,
        }
    }

    /// Generate a starter config file.
    pub fn starter_toml() -> &'static str {
        r#"# dirlint configuration

[scan]
# Traversal scope: "docc" restricts to .docc catalogs, "all" scans everything.
scope = "all"

# Path-component ignore strings, matched as prefix or suffix.
# ignore_prefixes = [".git", ".DS_Store", "LICENSE"]

follow_symlinks = false

[check]
# Violations above this count fail the scan.
max_violations = 0

# Emptiness mode: "strict-zero" or "ignore-noise".
empty_dir_mode = "ignore-noise"

# Custom classification (switches mode to custom when non-empty).
# empty_dir_ignore = [".DS_Store"]
# empty_dir_keep = [".gitkeep"]
"#
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn missing_file_yields_defaults() {
        let config = Config::load(Path::new("/nonexistent/.dirlint.toml")).unwrap();
        assert_eq!(config.scan.scope, Scope::Docc);
        assert_eq!(config.check.max_violations, 0);
        assert!(!config.scan.follow_symlinks);
    }

    #[test]
    fn starter_toml_parses() {
        let config: Config = toml::from_str(Config::starter_toml()).unwrap();
        assert_eq!(config.scan.scope, Scope::All);
        assert!(matches!(config.empty_dir_mode(), EmptyDirMode::IgnoreNoise));
    }

    #[test]
    fn partial_config_fills_in_defaults() {
        let config: Config = toml::from_str(
            r#"
            [scan]
            scope = "all"
            follow_symlinks = true
            "#,
        )
        .unwrap();
        assert_eq!(config.scan.scope, Scope::All);
        assert!(config.scan.follow_symlinks);
        assert!(config.scan.ignore_prefixes.iter().any(|p| p == ".git"));
        assert_eq!(config.check.max_violations, 0);
    }

    #[test]
    fn custom_lists_switch_empty_dir_mode() {
        let config: Config = toml::from_str(
            r#"
            [check]
            empty_dir_keep = [".gitkeep"]
            "#,
        )
        .unwrap();
        assert!(matches!(
            config.empty_dir_mode(),
            EmptyDirMode::Custom { .. }
        ));

        let config: Config = toml::from_str(
            r#"
            [check]
            empty_dir_mode = "strict-zero"
            "#,
        )
        .unwrap();
        assert!(matches!(config.empty_dir_mode(), EmptyDirMode::StrictZero));
    }

    #[test]
    fn scan_options_carry_config_values() {
        let config: Config = toml::from_str(
            r#"
            [scan]
            scope = "all"
            ignore_prefixes = [".hg"]
            concurrency = 4
            "#,
        )
        .unwrap();
        let options = config.scan_options(vec![PathBuf::from("/tmp")]);
        assert_eq!(options.scope, Scope::All);
        assert_eq!(options.ignore_prefixes, vec![".hg".to_string()]);
        assert_eq!(options.concurrency, Some(4));
    }
}
