//! # Error Types
//!
//! Errors raised when constructing validated domain values directly,
//! outside of schema validation.

use thiserror::Error;

/// Error constructing an [`EvmAddress`](crate::EvmAddress).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AddressError {
    /// Not `0x` followed by exactly 40 hexadecimal digits.
    #[error("malformed address {0:?}: expected 40 hex digits with optional 0x prefix")]
    Malformed(String),

    /// Mixed-case address whose casing does not match its EIP-55 checksum.
    #[error("address {input:?} fails EIP-55 checksum (expected {expected})")]
    BadChecksum {
        /// The address as supplied.
        input: String,
        /// The correctly checksummed form.
        expected: String,
    },
}
