//! # tokenlist-core — Token Record Primitives
//!
//! Leaf crate of the workspace. Defines the shape of a single entry in a
//! token-list manifest and the value predicates that the schema layer
//! plugs into its validator.
//!
//! ## Key Types
//!
//! - [`TokenRecord`] — one manifest entry, decoded with unknown fields denied.
//! - [`EvmAddress`] — an account address that passed [`is_address`].
//! - [`LogoUri`] — which branch (absolute URI or embedded base64) a logo
//!   value satisfied.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `tokenlist-*` crates.
//! - Predicates are pure `fn(&str) -> bool` so they can be registered as
//!   schema formats without captured state.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod address;
pub mod error;
pub mod logo;
pub mod record;

pub use address::{is_address, to_checksum, EvmAddress};
pub use error::AddressError;
pub use logo::{is_absolute_uri, is_base64_payload, LogoUri};
pub use record::{TokenRecord, TOKEN_RECORD_FIELDS};
