//! # Manifest Validation
//!
//! Runs one scan-and-validate pass over a tree:
//!
//! 1. scan the root ([`crate::scan`]); a scan failure aborts the run;
//! 2. keep paths passing the directory test, failing with
//!    [`StructureError::NoManifestDirectory`] if none do;
//! 3. of those, keep paths passing the file test, failing with
//!    [`StructureError::NoManifestFile`] if none do;
//! 4. read and parse every match as JSON; the first unreadable or malformed
//!    file aborts the run;
//! 5. check the ordered set of parsed documents against
//!    [`token_list_schema`](crate::rules::token_list_schema), then decode
//!    every record into a [`TokenRecord`].
//!
//! ## Error policy
//!
//! A run yields a [`ValidationReport`] or exactly one [`ValidationError`].
//! Schema violations are accumulated across all documents into the single
//! [`ValidationError::Schema`] value. Matched manifests are sorted before
//! reading so that, for an unchanged tree, repeated runs report identical
//! errors in identical order regardless of filesystem enumeration order.

use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use tokenlist_core::TokenRecord;

use crate::convention::ManifestConvention;
use crate::rules::{allowed_fields, token_list_schema, Format, TOKEN_RECORD_RULES};
use crate::scan::{scan, ScanError};

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// The expected directory/file layout was not found.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StructureError {
    /// No scanned path passed the directory test.
    #[error("invalid folder structure")]
    NoManifestDirectory,

    /// Some paths passed the directory test but none passed the file test.
    #[error("invalid manifest file path")]
    NoManifestFile,
}

/// Coarse classification of a [`ValidationError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Filesystem unreadable or missing.
    Io,
    /// Layout convention not found.
    Structure,
    /// A manifest is not well-formed JSON.
    Parse,
    /// One or more records violate the schema.
    Schema,
    /// The built-in schema failed to compile.
    Internal,
}

/// A single schema violation with its location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    /// Index of the document in the checked set.
    pub document: usize,
    /// Path of the manifest the document was read from.
    pub manifest: PathBuf,
    /// Index of the record inside the manifest, if the failure is inside one.
    pub record: Option<usize>,
    /// Field name, when the failure is attributable to one.
    pub field: Option<String>,
    /// JSON Pointer to the failing value, relative to the document.
    pub instance_path: String,
    /// JSON Pointer to the violated keyword in the lowered schema.
    pub schema_path: String,
    /// Human-readable description including the offending value.
    pub message: String,
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.manifest.display())?;
        if let Some(record) = self.record {
            write!(f, " record {record}")?;
        }
        if let Some(field) = &self.field {
            write!(f, " field '{field}'")?;
        }
        if self.record.is_none() && self.field.is_none() {
            write!(f, " (root)")?;
        }
        write!(f, ": {}", self.message)
    }
}

/// Terminal failure of a validation run.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// Traversal failed.
    #[error(transparent)]
    Scan(#[from] ScanError),

    /// A matched manifest could not be read.
    #[error("cannot read manifest {path}: {source}")]
    Read {
        /// The manifest path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The directory/file convention was not found.
    #[error(transparent)]
    Structure(#[from] StructureError),

    /// A matched manifest is not well-formed JSON.
    #[error("cannot parse manifest {path}: {source}")]
    Parse {
        /// The manifest path.
        path: PathBuf,
        /// The JSON parser error, with line and column.
        #[source]
        source: serde_json::Error,
    },

    /// One or more records violate the schema.
    #[error("token manifests failed schema validation ({} violation(s))", .violations.len())]
    Schema {
        /// Every violation found, in document order.
        violations: Vec<Violation>,
    },

    /// The built-in schema could not be compiled.
    #[error("failed to compile token list schema: {reason}")]
    Compile {
        /// Compiler message.
        reason: String,
    },
}

impl ValidationError {
    /// Classify the error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Scan(_) | Self::Read { .. } => ErrorKind::Io,
            Self::Structure(_) => ErrorKind::Structure,
            Self::Parse { .. } => ErrorKind::Parse,
            Self::Schema { .. } => ErrorKind::Schema,
            Self::Compile { .. } => ErrorKind::Internal,
        }
    }

    /// The schema violations, empty for every other kind.
    pub fn violations(&self) -> &[Violation] {
        match self {
            Self::Schema { violations } => violations,
            _ => &[],
        }
    }
}

// ---------------------------------------------------------------------------
// Report types
// ---------------------------------------------------------------------------

/// A manifest that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestSummary {
    /// Path the manifest was read from.
    pub path: PathBuf,
    /// Decoded records, in file order.
    pub records: Vec<TokenRecord>,
}

/// Result of a successful run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    /// Every checked manifest, sorted by path.
    pub manifests: Vec<ManifestSummary>,
}

impl ValidationReport {
    /// Number of checked manifests.
    pub fn manifest_count(&self) -> usize {
        self.manifests.len()
    }

    /// Total records across all manifests.
    pub fn record_count(&self) -> usize {
        self.manifests.iter().map(|m| m.records.len()).sum()
    }
}

/// Process-level outcome: a success flag plus the error on failure.
#[derive(Debug)]
pub struct RunOutcome {
    /// True when every manifest passed.
    pub success: bool,
    /// The report of a successful run.
    pub report: Option<ValidationReport>,
    /// The single error of a failed run.
    pub error: Option<ValidationError>,
}

impl From<Result<ValidationReport, ValidationError>> for RunOutcome {
    fn from(result: Result<ValidationReport, ValidationError>) -> Self {
        match result {
            Ok(report) => Self {
                success: true,
                report: Some(report),
                error: None,
            },
            Err(error) => Self {
                success: false,
                report: None,
                error: Some(error),
            },
        }
    }
}

// ---------------------------------------------------------------------------
// ManifestValidator
// ---------------------------------------------------------------------------

/// Validates manifest trees under one [`ManifestConvention`].
///
/// The token list schema is compiled once at construction; a validator can
/// be reused for any number of roots. Holds no state between runs.
pub struct ManifestValidator {
    convention: ManifestConvention,
    compiled: jsonschema::Validator,
}

impl std::fmt::Debug for ManifestValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ManifestValidator")
            .field("convention", &self.convention)
            .finish()
    }
}

impl ManifestValidator {
    /// Compile the token list schema for the given convention.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::Compile`] if the lowered schema is rejected
    /// by the schema engine.
    pub fn new(convention: ManifestConvention) -> Result<Self, ValidationError> {
        let schema = token_list_schema();
        let [address, uri, base64] = Format::ALL;
        let compiled = jsonschema::options()
            .with_draft(jsonschema::Draft::Draft202012)
            .should_validate_formats(true)
            .with_format(address.name(), address.predicate())
            .with_format(uri.name(), uri.predicate())
            .with_format(base64.name(), base64.predicate())
            .build(&schema)
            .map_err(|e| ValidationError::Compile {
                reason: e.to_string(),
            })?;
        Ok(Self {
            convention,
            compiled,
        })
    }

    /// The convention used to locate manifests.
    pub fn convention(&self) -> &ManifestConvention {
        &self.convention
    }

    /// Scan `root` and return the manifest paths it contains, sorted.
    ///
    /// # Errors
    ///
    /// [`ValidationError::Scan`] if traversal fails, or
    /// [`ValidationError::Structure`] if the convention is not found.
    pub fn discover(&self, root: &Path) -> Result<Vec<PathBuf>, ValidationError> {
        let entries = scan(root)?;

        let in_manifest_dir: Vec<&Path> = entries
            .iter()
            .map(|entry| entry.path.as_path())
            .filter(|path| self.convention.matches_dir(path))
            .collect();
        if in_manifest_dir.is_empty() {
            return Err(StructureError::NoManifestDirectory.into());
        }

        let mut manifests: Vec<PathBuf> = in_manifest_dir
            .into_iter()
            .filter(|path| self.convention.matches_file(path))
            .map(Path::to_path_buf)
            .collect();
        if manifests.is_empty() {
            return Err(StructureError::NoManifestFile.into());
        }
        manifests.sort();

        tracing::debug!(
            convention = %self.convention,
            candidates = manifests.len(),
            "located manifest files"
        );
        Ok(manifests)
    }

    /// Run the full pipeline on `root`.
    ///
    /// # Errors
    ///
    /// Returns the first fatal error of the run; see [`ValidationError`].
    pub fn validate(&self, root: &Path) -> Result<ValidationReport, ValidationError> {
        let manifests = self.discover(root)?;

        let mut documents = Vec::with_capacity(manifests.len());
        for path in &manifests {
            let bytes = std::fs::read(path).map_err(|source| ValidationError::Read {
                path: path.clone(),
                source,
            })?;
            let document: Value =
                serde_json::from_slice(&bytes).map_err(|source| ValidationError::Parse {
                    path: path.clone(),
                    source,
                })?;
            documents.push(document);
        }

        tracing::info!(
            manifests = ?manifests.iter().map(|p| p.display().to_string()).collect::<Vec<_>>(),
            "running schema check"
        );
        self.check_documents(manifests, documents)
    }

    /// Schema-check already parsed documents. `manifests[i]` names the
    /// source of `documents[i]`.
    ///
    /// # Errors
    ///
    /// [`ValidationError::Schema`] with every violation found.
    pub fn check_documents(
        &self,
        manifests: Vec<PathBuf>,
        documents: Vec<Value>,
    ) -> Result<ValidationReport, ValidationError> {
        let set = Value::Array(documents);
        let violations = self.schema_violations(&manifests, &set);
        if !violations.is_empty() {
            return Err(ValidationError::Schema { violations });
        }

        let Value::Array(documents) = set else {
            return Ok(ValidationReport::default());
        };
        let mut summaries = Vec::with_capacity(documents.len());
        let mut violations = Vec::new();
        for (document, (path, value)) in manifests.into_iter().zip(documents).enumerate() {
            let items = match value {
                Value::Array(items) => items,
                _ => Vec::new(),
            };
            let mut records = Vec::with_capacity(items.len());
            for (index, item) in items.into_iter().enumerate() {
                match serde_json::from_value::<TokenRecord>(item) {
                    Ok(record) => records.push(record),
                    Err(e) => violations.push(Violation {
                        document,
                        manifest: path.clone(),
                        record: Some(index),
                        field: None,
                        instance_path: format!("/{index}"),
                        schema_path: String::new(),
                        message: format!("cannot decode token record: {e}"),
                    }),
                }
            }
            summaries.push(ManifestSummary { path, records });
        }

        if violations.is_empty() {
            Ok(ValidationReport {
                manifests: summaries,
            })
        } else {
            Err(ValidationError::Schema { violations })
        }
    }

    fn schema_violations(&self, manifests: &[PathBuf], set: &Value) -> Vec<Violation> {
        let mut violations = Vec::new();
        for err in self.compiled.iter_errors(set) {
            let pointer = err.instance_path.to_string();
            let schema_path = err.schema_path.to_string();
            let message = err.to_string();

            let segments = pointer_segments(&pointer);
            let document = segments
                .first()
                .and_then(|s| s.parse::<usize>().ok())
                .unwrap_or(0);
            let record = segments.get(1).and_then(|s| s.parse::<usize>().ok());
            let mut field = segments.get(2).cloned();
            let manifest = manifests.get(document).cloned().unwrap_or_default();
            let instance_path = document_pointer(&pointer).to_string();

            if field.is_none() {
                if let Some(index) = record {
                    let unexpected = unexpected_fields(&set[document][index]);
                    if schema_path.ends_with("additionalProperties") && !unexpected.is_empty() {
                        for key in unexpected {
                            violations.push(Violation {
                                document,
                                manifest: manifest.clone(),
                                record,
                                field: Some(key),
                                instance_path: instance_path.clone(),
                                schema_path: schema_path.clone(),
                                message: message.clone(),
                            });
                        }
                        continue;
                    }
                    if schema_path.ends_with("required") {
                        field = missing_field(&message);
                    }
                }
            }

            violations.push(Violation {
                document,
                manifest,
                record,
                field,
                instance_path,
                schema_path,
                message,
            });
        }
        violations
    }
}

/// Split a JSON Pointer into unescaped reference tokens.
fn pointer_segments(pointer: &str) -> Vec<String> {
    pointer
        .split('/')
        .skip(1)
        .map(|s| s.replace("~1", "/").replace("~0", "~"))
        .collect()
}

/// Drop the leading document index from a pointer into the document set.
fn document_pointer(pointer: &str) -> &str {
    match pointer.get(1..).and_then(|rest| rest.find('/')) {
        Some(idx) => &pointer[idx + 1..],
        None => "",
    }
}

fn unexpected_fields(record: &Value) -> Vec<String> {
    let Some(object) = record.as_object() else {
        return Vec::new();
    };
    object
        .keys()
        .filter(|key| !allowed_fields(TOKEN_RECORD_RULES).any(|name| name == key.as_str()))
        .cloned()
        .collect()
}

fn missing_field(message: &str) -> Option<String> {
    allowed_fields(TOKEN_RECORD_RULES)
        .find(|name| message.contains(&format!("\"{name}\"")))
        .map(str::to_string)
}

// ---------------------------------------------------------------------------
// Entry points
// ---------------------------------------------------------------------------

/// Validate the tree at `root` against the given directory and file names.
///
/// # Errors
///
/// Returns the single terminal [`ValidationError`] of the run.
pub fn validate(
    root: &Path,
    manifest_dir_name: &str,
    manifest_file_name: &str,
) -> Result<(), ValidationError> {
    let convention = ManifestConvention::new(manifest_dir_name, manifest_file_name);
    ManifestValidator::new(convention)?.validate(root).map(|_| ())
}

/// Validate `root` and fold the result into a [`RunOutcome`].
pub fn run(root: &Path, convention: &ManifestConvention) -> RunOutcome {
    ManifestValidator::new(convention.clone())
        .and_then(|validator| validator.validate(root))
        .into()
}
