//! # Configuration
//!
//! Optional YAML config file (`--config`). Every key is optional; explicit
//! command-line flags take precedence over the file, and the file over the
//! built-in defaults.
//!
//! ```yaml
//! root: ./lists
//! manifest_dir: erc20
//! manifest_file: index.json
//! ```
//!
//! A relative `root` is resolved against the directory holding the config
//! file, not the current directory.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use tokenlist_schema::ManifestConvention;

/// Settings read from a config file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CheckConfig {
    /// Root of the tree to scan.
    pub root: Option<PathBuf>,
    /// Directory-name fragment of the manifest convention.
    pub manifest_dir: Option<String>,
    /// File-name fragment of the manifest convention.
    pub manifest_file: Option<String>,
}

impl CheckConfig {
    /// Load and parse a config file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let mut config: Self = serde_yaml::from_str(&content)
            .with_context(|| format!("invalid config file {}", path.display()))?;

        if let Some(root) = config.root.take() {
            let base = path.parent().unwrap_or_else(|| Path::new(""));
            config.root = Some(resolve_path(&root, base));
        }
        tracing::debug!(config = ?config, path = %path.display(), "loaded config file");
        Ok(config)
    }

    /// Merge flag values over file values over defaults.
    pub fn resolve(
        &self,
        root: Option<&Path>,
        manifest_dir: Option<&str>,
        manifest_file: Option<&str>,
    ) -> (PathBuf, ManifestConvention) {
        let defaults = ManifestConvention::default();
        let root = root
            .map(Path::to_path_buf)
            .or_else(|| self.root.clone())
            .unwrap_or_else(|| PathBuf::from("."));
        let directory = manifest_dir
            .map(str::to_string)
            .or_else(|| self.manifest_dir.clone())
            .unwrap_or(defaults.directory);
        let file = manifest_file
            .map(str::to_string)
            .or_else(|| self.manifest_file.clone())
            .unwrap_or(defaults.file);
        (root, ManifestConvention::new(directory, file))
    }
}

/// Resolve `path` against `base` unless it is already absolute.
pub fn resolve_path(path: &Path, base: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}
