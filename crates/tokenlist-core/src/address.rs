//! # EVM Account Addresses
//!
//! Syntactic validity of an account address: length, charset, and the
//! EIP-55 mixed-case checksum. Whether the account exists on any chain is
//! not a concern here.
//!
//! ## Accepted forms
//!
//! - Optional `0x` (or `0X`) prefix followed by exactly 40 hex digits.
//! - All-lowercase or all-uppercase hex digits carry no checksum and are
//!   accepted as-is.
//! - Mixed case must match the EIP-55 encoding: the nibble of
//!   `keccak256(lowercase_hex)` at each letter's index is `>= 8` exactly
//!   when that letter is uppercase.

use serde::{Deserialize, Serialize};
use tiny_keccak::{Hasher, Keccak};

use crate::error::AddressError;

const ADDRESS_HEX_LEN: usize = 40;

fn keccak256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak::v256();
    let mut output = [0u8; 32];
    hasher.update(data);
    hasher.finalize(&mut output);
    output
}

/// Strip the optional prefix and return the 40 hex digits, or `None`.
fn hex_body(input: &str) -> Option<&str> {
    let body = input
        .strip_prefix("0x")
        .or_else(|| input.strip_prefix("0X"))
        .unwrap_or(input);
    if body.len() == ADDRESS_HEX_LEN && body.bytes().all(|b| b.is_ascii_hexdigit()) {
        Some(body)
    } else {
        None
    }
}

fn checksum_digits(lower_hex: &str) -> String {
    let hash = keccak256(lower_hex.as_bytes());
    lower_hex
        .chars()
        .enumerate()
        .map(|(i, c)| {
            let nibble = if i % 2 == 0 {
                hash[i / 2] >> 4
            } else {
                hash[i / 2] & 0x0f
            };
            if nibble >= 8 {
                c.to_ascii_uppercase()
            } else {
                c
            }
        })
        .collect()
}

/// Returns true when `input` is a syntactically valid EVM address.
///
/// Single-case addresses are accepted without a checksum test.
pub fn is_address(input: &str) -> bool {
    let Some(body) = hex_body(input) else {
        return false;
    };
    let has_lower = body.bytes().any(|b| b.is_ascii_lowercase());
    let has_upper = body.bytes().any(|b| b.is_ascii_uppercase());
    if !(has_lower && has_upper) {
        return true;
    }
    checksum_digits(&body.to_ascii_lowercase()) == body
}

/// EIP-55 checksummed form (`0x`-prefixed) of a well-formed address.
///
/// # Errors
///
/// Returns [`AddressError::Malformed`] if `input` is not 40 hex digits with
/// an optional prefix. Casing of the input is ignored.
pub fn to_checksum(input: &str) -> Result<String, AddressError> {
    let body = hex_body(input).ok_or_else(|| AddressError::Malformed(input.to_string()))?;
    Ok(format!("0x{}", checksum_digits(&body.to_ascii_lowercase())))
}

/// An account address that passed [`is_address`].
///
/// Stores the address exactly as written in the manifest; use
/// [`EvmAddress::checksummed`] for the canonical EIP-55 form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EvmAddress(String);

impl EvmAddress {
    /// Validate and wrap an address string.
    pub fn parse(input: &str) -> Result<Self, AddressError> {
        if hex_body(input).is_none() {
            return Err(AddressError::Malformed(input.to_string()));
        }
        if !is_address(input) {
            return Err(AddressError::BadChecksum {
                input: input.to_string(),
                expected: to_checksum(input)?,
            });
        }
        Ok(Self(input.to_string()))
    }

    /// The address as written.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The EIP-55 checksummed form with a lowercase `0x` prefix.
    pub fn checksummed(&self) -> String {
        // Construction guarantees 40 hex digits.
        to_checksum(&self.0).unwrap_or_else(|_| self.0.clone())
    }
}

impl TryFrom<String> for EvmAddress {
    type Error = AddressError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<EvmAddress> for String {
    fn from(value: EvmAddress) -> Self {
        value.0
    }
}

impl std::fmt::Display for EvmAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // EIP-55 reference vectors.
    const CHECKSUMMED: [&str; 4] = [
        "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed",
        "0xfB6916095ca1df60bB79Ce92cE3Ea74c37c5d359",
        "0xdbF03B407c01E7cD3CBea99509d93f8DDDC8C6FB",
        "0xD1220A0cf47c7B9Be7A2E6BA89F429762e7b9aDb",
    ];

    #[test]
    fn accepts_eip55_vectors() {
        for addr in CHECKSUMMED {
            assert!(is_address(addr), "{addr} should be valid");
        }
    }

    #[test]
    fn checksum_reproduces_vectors() {
        for addr in CHECKSUMMED {
            assert_eq!(to_checksum(&addr.to_lowercase()).unwrap(), addr);
        }
    }

    #[test]
    fn accepts_single_case_without_checksum() {
        let lower = format!("0x{}", "a".repeat(40));
        assert!(is_address(&lower));
        assert!(is_address(&"5aaeb6053f3e94c9b9a09f33669435e7ef1beaed".to_uppercase()));
        assert!(is_address("0x52908400098527886E0F7030069857D2E4169EE7"));
        assert!(is_address("0x0000000000000000000000000000000000000000"));
    }

    #[test]
    fn accepts_missing_prefix() {
        assert!(is_address("5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed"));
    }

    #[test]
    fn rejects_bad_checksum() {
        // First letter flipped to lowercase.
        assert!(!is_address("0x5aaeb6053F3E94C9b9A09f33669435E7Ef1BeAed"));
    }

    #[test]
    fn rejects_wrong_length_and_charset() {
        assert!(!is_address(""));
        assert!(!is_address("0x"));
        assert!(!is_address(&format!("0x{}", "a".repeat(39))));
        assert!(!is_address(&format!("0x{}", "a".repeat(41))));
        assert!(!is_address(&format!("0x{}", "g".repeat(40))));
        assert!(!is_address(&format!("0x0x{}", "a".repeat(38))));
    }

    #[test]
    fn parse_reports_expected_checksum() {
        let err = EvmAddress::parse("0x5aaeb6053F3E94C9b9A09f33669435E7Ef1BeAed").unwrap_err();
        match err {
            AddressError::BadChecksum { expected, .. } => {
                assert_eq!(expected, CHECKSUMMED[0]);
            }
            other => panic!("expected BadChecksum, got {other:?}"),
        }
        assert!(matches!(
            EvmAddress::parse("nope"),
            Err(AddressError::Malformed(_))
        ));
    }

    #[test]
    fn evm_address_serde_roundtrip_validates() {
        let ok: EvmAddress = serde_json::from_str(&format!("\"{}\"", CHECKSUMMED[1])).unwrap();
        assert_eq!(ok.as_str(), CHECKSUMMED[1]);
        assert_eq!(ok.checksummed(), CHECKSUMMED[1]);
        let bad: Result<EvmAddress, _> = serde_json::from_str("\"0x1234\"");
        assert!(bad.is_err());
    }
}
