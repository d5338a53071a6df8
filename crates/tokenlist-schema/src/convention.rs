//! # Manifest Location Convention
//!
//! Manifests live at `<root>/.../<directory>/.../<file>`. Matching is a
//! substring test on the full path string, not a structured "file named
//! exactly X inside directory exactly Y" check:
//!
//! - directory test: the lowercased path contains the lowercased directory
//!   name;
//! - file test: the path contains the file name, case-sensitively.
//!
//! This tolerates nested layouts but also matches unrelated paths such as
//! `erc20/otherindex.json` or a scan root whose own name contains the
//! directory name. The looseness is kept on purpose and isolated in the two
//! predicates below so it can be tightened without touching traversal or
//! schema logic.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Directory name of the ERC-20 token list layout.
pub const DEFAULT_MANIFEST_DIR: &str = "erc20";

/// File name of a manifest inside the manifest directory.
pub const DEFAULT_MANIFEST_FILE: &str = "index.json";

/// Returns true if `path` contains `dir_name`, ignoring case.
pub fn path_looks_like_manifest_dir(path: &Path, dir_name: &str) -> bool {
    path.to_string_lossy()
        .to_lowercase()
        .contains(&dir_name.to_lowercase())
}

/// Returns true if `path` contains `file_name` (case-sensitive).
pub fn path_looks_like_manifest_file(path: &Path, file_name: &str) -> bool {
    path.to_string_lossy().contains(file_name)
}

/// Naming convention used to pick manifest files out of a scanned tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestConvention {
    /// Directory-name fragment, matched case-insensitively.
    pub directory: String,
    /// File-name fragment, matched case-sensitively.
    pub file: String,
}

impl Default for ManifestConvention {
    fn default() -> Self {
        Self::new(DEFAULT_MANIFEST_DIR, DEFAULT_MANIFEST_FILE)
    }
}

impl ManifestConvention {
    /// Create a convention from explicit names.
    pub fn new(directory: impl Into<String>, file: impl Into<String>) -> Self {
        Self {
            directory: directory.into(),
            file: file.into(),
        }
    }

    /// Directory test for this convention.
    pub fn matches_dir(&self, path: &Path) -> bool {
        path_looks_like_manifest_dir(path, &self.directory)
    }

    /// File test for this convention.
    pub fn matches_file(&self, path: &Path) -> bool {
        path_looks_like_manifest_file(path, &self.file)
    }
}

impl std::fmt::Display for ManifestConvention {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/**/{}", self.directory, self.file)
    }
}
