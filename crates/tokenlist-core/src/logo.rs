//! # Logo URI Predicates
//!
//! A manifest's `logoURI` is either a well-formed absolute URI or a
//! non-empty standard base64 payload (an embedded image). The URI branch
//! is tried first; once one branch matches the other is not consulted.

use base64::alphabet;
use base64::engine::{GeneralPurpose, GeneralPurposeConfig};
use base64::Engine;
use url::Url;

/// Standard alphabet, canonical padding required, non-zero trailing bits
/// in the final symbol tolerated (`QR==`).
const PAYLOAD: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_allow_trailing_bits(true),
);

/// Returns true for a non-empty string that parses as an absolute URI.
///
/// Relative references (`logo.png`, `/img/x.png`) have no scheme and fail.
pub fn is_absolute_uri(input: &str) -> bool {
    !input.is_empty() && Url::parse(input).is_ok()
}

/// Returns true for a non-empty string that decodes as padded standard
/// base64.
pub fn is_base64_payload(input: &str) -> bool {
    !input.is_empty() && PAYLOAD.decode(input).is_ok()
}

/// Which branch a logo value satisfied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogoUri {
    /// An absolute URI pointing at the image.
    Remote(Url),
    /// Image bytes embedded as base64.
    Embedded(Vec<u8>),
}

impl LogoUri {
    /// Classify a logo value. `None` if neither branch accepts it.
    pub fn classify(input: &str) -> Option<Self> {
        if input.is_empty() {
            return None;
        }
        if let Ok(url) = Url::parse(input) {
            return Some(Self::Remote(url));
        }
        PAYLOAD.decode(input).ok().map(Self::Embedded)
    }

    /// Short label for reports: `"uri"` or `"base64"`.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Remote(_) => "uri",
            Self::Embedded(_) => "base64",
        }
    }
}
