//! # Token Record Rules
//!
//! The record shape is declared once, as a list of [`FieldRule`]s, and
//! lowered to a JSON Schema (Draft 2020-12) document. The validator in
//! [`crate::validate`] compiles that document; nothing else in the crate
//! speaks the schema library's API.
//!
//! Value predicates that JSON Schema cannot express natively are plugged in
//! as custom [`Format`]s backed by the pure functions in `tokenlist-core`.
//!
//! ## Lowered shape
//!
//! ```text
//! document set = array, minItems 1, items = manifest
//! manifest     = array, minItems 1, items = record
//! record       = object, every rule required, additionalProperties false
//! ```

use serde_json::{json, Map, Value};

use tokenlist_core::{is_absolute_uri, is_address, is_base64_payload};

/// A named string predicate registered with the schema engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    /// Syntactically valid EVM address, EIP-55 checked when mixed-case.
    EvmAddress,
    /// Absolute URI with a scheme.
    AbsoluteUri,
    /// Padded standard base64.
    Base64,
}

impl Format {
    /// Every format the rules may reference.
    pub const ALL: [Format; 3] = [Format::EvmAddress, Format::AbsoluteUri, Format::Base64];

    /// Name used for the `format` keyword.
    pub fn name(self) -> &'static str {
        match self {
            Self::EvmAddress => "evm-address",
            Self::AbsoluteUri => "absolute-uri",
            Self::Base64 => "base64",
        }
    }

    /// The predicate behind the format.
    pub fn predicate(self) -> fn(&str) -> bool {
        match self {
            Self::EvmAddress => is_address,
            Self::AbsoluteUri => is_absolute_uri,
            Self::Base64 => is_base64_payload,
        }
    }
}

/// JSON type of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueType {
    /// JSON string.
    String,
    /// JSON number with no fractional part.
    Integer,
}

impl ValueType {
    fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
        }
    }
}

/// A single constraint on a field value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Check {
    /// String length lower bound.
    MinLength(u64),
    /// Inclusive integer lower bound.
    Minimum(i64),
    /// Inclusive integer upper bound.
    Maximum(i64),
    /// Named predicate.
    Format(Format),
    /// At least one branch must hold; branches are tried in order.
    AnyOf(&'static [&'static [Check]]),
}

/// Declarative rule for one record field.
#[derive(Debug, Clone, Copy)]
pub struct FieldRule {
    /// Wire name of the field.
    pub name: &'static str,
    /// Expected JSON type.
    pub value_type: ValueType,
    /// Whether the field must be present.
    pub required: bool,
    /// Constraints applied once the type matches.
    pub checks: &'static [Check],
}

/// Rules for a token record. No field outside this list is accepted.
pub const TOKEN_RECORD_RULES: &[FieldRule] = &[
    FieldRule {
        name: "name",
        value_type: ValueType::String,
        required: true,
        checks: &[Check::MinLength(1)],
    },
    FieldRule {
        name: "symbol",
        value_type: ValueType::String,
        required: true,
        checks: &[Check::MinLength(1)],
    },
    FieldRule {
        name: "address",
        value_type: ValueType::String,
        required: true,
        checks: &[Check::Format(Format::EvmAddress)],
    },
    FieldRule {
        name: "logoURI",
        value_type: ValueType::String,
        required: true,
        checks: &[Check::AnyOf(&[
            &[Check::MinLength(1), Check::Format(Format::AbsoluteUri)],
            &[Check::MinLength(1), Check::Format(Format::Base64)],
        ])],
    },
    FieldRule {
        name: "decimals",
        value_type: ValueType::Integer,
        required: true,
        checks: &[Check::Minimum(0), Check::Maximum(255)],
    },
    FieldRule {
        name: "chainId",
        value_type: ValueType::Integer,
        required: true,
        checks: &[],
    },
];

fn lower_checks(value_type: ValueType, checks: &[Check], out: &mut Map<String, Value>) {
    for check in checks {
        match *check {
            Check::MinLength(n) => {
                out.insert("minLength".into(), json!(n));
            }
            Check::Minimum(n) => {
                out.insert("minimum".into(), json!(n));
            }
            Check::Maximum(n) => {
                out.insert("maximum".into(), json!(n));
            }
            Check::Format(format) => {
                out.insert("format".into(), json!(format.name()));
            }
            Check::AnyOf(branches) => {
                let lowered: Vec<Value> = branches
                    .iter()
                    .map(|branch| {
                        let mut schema = Map::new();
                        schema.insert("type".into(), json!(value_type.as_str()));
                        lower_checks(value_type, branch, &mut schema);
                        Value::Object(schema)
                    })
                    .collect();
                out.insert("anyOf".into(), Value::Array(lowered));
            }
        }
    }
}

/// Lower one field rule to its property schema.
pub fn field_schema(rule: &FieldRule) -> Value {
    let mut schema = Map::new();
    schema.insert("type".into(), json!(rule.value_type.as_str()));
    lower_checks(rule.value_type, rule.checks, &mut schema);
    Value::Object(schema)
}

/// Object schema for a record built from `rules`.
pub fn record_schema(rules: &[FieldRule]) -> Value {
    let properties: Map<String, Value> = rules
        .iter()
        .map(|rule| (rule.name.to_string(), field_schema(rule)))
        .collect();
    let required: Vec<&str> = rules
        .iter()
        .filter(|rule| rule.required)
        .map(|rule| rule.name)
        .collect();
    json!({
        "type": "object",
        "properties": properties,
        "required": required,
        "additionalProperties": false
    })
}

/// Array schema for one manifest: at least one record.
pub fn manifest_schema(rules: &[FieldRule]) -> Value {
    json!({
        "type": "array",
        "minItems": 1,
        "items": record_schema(rules)
    })
}

/// Schema for the ordered set of parsed manifests checked in one run.
pub fn token_list_schema() -> Value {
    json!({
        "$schema": "https://json-schema.org/draft/2020-12/schema",
        "title": "Token list manifests",
        "type": "array",
        "minItems": 1,
        "items": manifest_schema(TOKEN_RECORD_RULES)
    })
}

/// Names of every field a record may carry.
pub fn allowed_fields(rules: &[FieldRule]) -> impl Iterator<Item = &'static str> + '_ {
    rules.iter().map(|rule| rule.name)
}
