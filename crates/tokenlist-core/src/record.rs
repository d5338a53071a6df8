//! # Token Record
//!
//! One entry of a token-list manifest. The wire shape is a JSON object with
//! exactly six camelCase keys; unknown keys are rejected on decode.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

use crate::address::EvmAddress;
use crate::logo::LogoUri;

/// The exact key set of a record, in declaration order.
pub const TOKEN_RECORD_FIELDS: [&str; 6] =
    ["name", "symbol", "address", "logoURI", "decimals", "chainId"];

/// A fungible-asset entry as it appears in a manifest.
///
/// Decoding enforces presence, the exact key set, address validity, and
/// the `decimals` range. Value constraints that serde
/// cannot express (non-empty strings, logo branches) are enforced by the
/// schema layer before decoding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TokenRecord {
    /// Display name.
    pub name: String,
    /// Ticker symbol.
    pub symbol: String,
    /// On-chain account address.
    pub address: EvmAddress,
    /// Absolute URI or base64-embedded image.
    #[serde(rename = "logoURI")]
    pub logo_uri: String,
    /// Number of decimal places, 0..=255. Whole-number floats such as
    /// `18.0` are accepted, as for `chainId`.
    #[serde(deserialize_with = "decimals_from_number")]
    pub decimals: u8,
    /// Chain identifier. Unbounded integer.
    #[serde(rename = "chainId")]
    pub chain_id: serde_json::Number,
}

impl TokenRecord {
    /// Classify the logo value; `None` if it satisfies neither branch.
    pub fn logo(&self) -> Option<LogoUri> {
        LogoUri::classify(&self.logo_uri)
    }
}

fn decimals_from_number<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let number = serde_json::Number::deserialize(deserializer)?;
    let whole = match (number.as_u64(), number.as_f64()) {
        (Some(n), _) => Some(n),
        (None, Some(f)) if f.fract() == 0.0 && (0.0..=255.0).contains(&f) => Some(f as u64),
        _ => None,
    };
    whole
        .and_then(|n| u8::try_from(n).ok())
        .ok_or_else(|| D::Error::custom(format!("decimals {number} is not an integer in 0..=255")))
}
