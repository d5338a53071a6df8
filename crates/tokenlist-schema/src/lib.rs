//! # tokenlist-schema — Manifest Validation Engine
//!
//! Answers one question about a directory tree: does it contain manifests
//! in the expected layout, and does every token record in them satisfy the
//! record schema?
//!
//! ## Pipeline
//!
//! 1. [`scan`] — pre-order traversal of the tree, every file and directory
//!    including the root.
//! 2. [`ManifestConvention`] — loose substring predicates that pick the
//!    manifest files out of the scan.
//! 3. [`rules`] — the declarative per-field rule list, lowered to a JSON
//!    Schema and evaluated by the `jsonschema` crate.
//! 4. [`ManifestValidator`] — ties the steps together and returns either a
//!    [`ValidationReport`] or exactly one [`ValidationError`].
//!
//! ## Crate Policy
//!
//! - Depends only on `tokenlist-core` internally.
//! - Read-only: nothing under the scanned root is written or deleted.
//! - No global state. Root and naming convention are explicit parameters.
//! - Validation is a trust boundary: failures carry the manifest, record
//!   index, field and the violated constraint.

pub mod convention;
pub mod rules;
pub mod scan;
pub mod validate;

pub use convention::{
    path_looks_like_manifest_dir, path_looks_like_manifest_file, ManifestConvention,
};
pub use rules::{token_list_schema, Check, FieldRule, Format, ValueType, TOKEN_RECORD_RULES};
pub use scan::{scan, EntryKind, PathEntry, ScanError};
pub use validate::{
    run, validate, ErrorKind, ManifestSummary, ManifestValidator, RunOutcome, StructureError,
    ValidationError, ValidationReport, Violation,
};
