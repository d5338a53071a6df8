//! # tokenlist-cli — Token List Validator CLI
//!
//! Thin wrapper around `tokenlist-schema`: resolves settings from flags and
//! an optional config file, runs one validation, prints the verdict, and
//! maps it to an exit status.
//!
//! ## Subcommands
//!
//! - `tokenlist validate [ROOT]` — scan and validate a manifest tree.
//! - `tokenlist schema` — print the JSON Schema every record is checked against.
//!
//! ## Exit status
//!
//! - `0` — every manifest passed.
//! - `1` — verdict failure: layout not found, malformed JSON, or schema violations.
//! - `2` — operational error: unreadable tree, bad config file.
//!
//! ## Crate Policy
//!
//! - Argument parsing is separated from the handlers.
//! - Handlers delegate to `tokenlist-schema` — no validation logic here.

pub mod config;
pub mod schema;
pub mod validate;

/// Exit status for a passing run.
pub const EXIT_OK: u8 = 0;

/// Exit status for a failed verdict.
pub const EXIT_INVALID: u8 = 1;

/// Exit status for an operational error.
pub const EXIT_ERROR: u8 = 2;
