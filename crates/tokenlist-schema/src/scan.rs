//! # Tree Scanner
//!
//! Recursively enumerates every file and directory under a root, producing
//! a flat list of absolute paths in pre-order: the root first, and each
//! directory before its own descendants. Entries within one directory come
//! in whatever order the filesystem yields them; callers must not assume
//! lexical ordering.
//!
//! Symbolic links are followed, so an entry's kind is that of its target.
//! A link that points back at an ancestor is reported as
//! [`ScanError::Loop`] instead of being walked forever.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use walkdir::WalkDir;

/// Errors raised while enumerating a tree. All of them abort the scan.
#[derive(Error, Debug)]
pub enum ScanError {
    /// A directory or entry could not be read.
    #[error("cannot read {path}: {source}")]
    Io {
        /// Path that failed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The scan root exists but is not a directory.
    #[error("scan root {path} is not a directory")]
    NotADirectory {
        /// The offending root.
        path: PathBuf,
    },

    /// A symbolic link leads back to one of its own ancestors.
    #[error("filesystem loop at {path} (links back to {ancestor})")]
    Loop {
        /// The link that closes the loop.
        path: PathBuf,
        /// The ancestor it points at.
        ancestor: PathBuf,
    },
}

/// Kind of a discovered filesystem node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    /// A directory.
    Directory,
    /// Anything that is not a directory.
    File,
}

/// A discovered filesystem node.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PathEntry {
    /// Absolute path of the node.
    pub path: PathBuf,
    /// Directory or file.
    pub kind: EntryKind,
}

impl PathEntry {
    /// Returns true for directories.
    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Directory
    }
}

/// Enumerate `root` and everything beneath it.
///
/// A relative `root` is resolved against the current directory so every
/// returned path is absolute.
///
/// # Errors
///
/// Returns [`ScanError::Io`] if the root is missing or unreadable, or if
/// any directory below it cannot be listed. Returns
/// [`ScanError::NotADirectory`] if the root is a file.
pub fn scan(root: &Path) -> Result<Vec<PathEntry>, ScanError> {
    let root = absolute_root(root)?;
    let metadata = std::fs::metadata(&root).map_err(|source| ScanError::Io {
        path: root.clone(),
        source,
    })?;
    if !metadata.is_dir() {
        return Err(ScanError::NotADirectory { path: root });
    }

    let mut entries = Vec::new();
    for entry in WalkDir::new(&root).follow_links(true) {
        let entry = entry.map_err(|e| walk_error(e, &root))?;
        let kind = if entry.file_type().is_dir() {
            EntryKind::Directory
        } else {
            EntryKind::File
        };
        entries.push(PathEntry {
            path: entry.into_path(),
            kind,
        });
    }

    tracing::debug!(root = %root.display(), entries = entries.len(), "scanned tree");
    Ok(entries)
}

fn absolute_root(root: &Path) -> Result<PathBuf, ScanError> {
    if root.is_absolute() {
        return Ok(root.to_path_buf());
    }
    let cwd = std::env::current_dir().map_err(|source| ScanError::Io {
        path: root.to_path_buf(),
        source,
    })?;
    Ok(cwd.join(root))
}

fn walk_error(err: walkdir::Error, root: &Path) -> ScanError {
    let path = err
        .path()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| root.to_path_buf());
    if let Some(ancestor) = err.loop_ancestor() {
        return ScanError::Loop {
            path,
            ancestor: ancestor.to_path_buf(),
        };
    }
    let source = err
        .into_io_error()
        .unwrap_or_else(|| io::Error::other("directory walk failed"));
    ScanError::Io { path, source }
}
