//! # Schema Subcommand
//!
//! Prints the JSON Schema that every manifest set is checked against.

use anyhow::Result;
use clap::Args;
use serde_json::Value;

use tokenlist_schema::token_list_schema;

use crate::EXIT_OK;

/// Arguments for the `tokenlist schema` subcommand.
#[derive(Args, Debug, Default)]
pub struct SchemaArgs {
    /// Emit the schema on a single line.
    #[arg(long)]
    pub compact: bool,
}

/// Execute the schema subcommand.
pub fn run_schema(args: &SchemaArgs) -> Result<u8> {
    println!("{}", render_schema(&token_list_schema(), args.compact)?);
    Ok(EXIT_OK)
}

fn render_schema(schema: &Value, compact: bool) -> Result<String> {
    let rendered = if compact {
        serde_json::to_string(schema)?
    } else {
        serde_json::to_string_pretty(schema)?
    };
    Ok(rendered)
}
