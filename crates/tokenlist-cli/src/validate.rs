//! # Validate Subcommand
//!
//! Runs one scan-and-validate pass and reports the verdict.
//!
//! Text output prints `OK:` with manifest and record counts, or `FAIL:`
//! followed by one line per schema violation. JSON output prints a single
//! object so CI jobs can consume the structured error.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, ValueEnum};
use serde_json::{json, Value};

use tokenlist_schema::{run, ErrorKind, RunOutcome};

use crate::config::CheckConfig;
use crate::{EXIT_ERROR, EXIT_INVALID, EXIT_OK};

/// Output rendering for the verdict.
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable lines.
    #[default]
    Text,
    /// One JSON object.
    Json,
}

/// Arguments for the `tokenlist validate` subcommand.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Root of the tree to scan (default: config file root, then the current directory).
    #[arg(value_name = "ROOT")]
    pub root: Option<PathBuf>,

    /// Directory-name fragment that marks manifest locations (case-insensitive).
    #[arg(long)]
    pub manifest_dir: Option<String>,

    /// File-name fragment that marks manifest files.
    #[arg(long)]
    pub manifest_file: Option<String>,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

/// Execute the validate subcommand.
///
/// Returns exit code: 0 on success, 1 on a failed verdict, 2 on operational error.
pub fn run_validate(args: &ValidateArgs, config: &CheckConfig) -> Result<u8> {
    let (root, convention) = config.resolve(
        args.root.as_deref(),
        args.manifest_dir.as_deref(),
        args.manifest_file.as_deref(),
    );
    tracing::info!(root = %root.display(), %convention, "validating manifest tree");

    let outcome = run(&root, &convention);
    match args.format {
        OutputFormat::Text => println!("{}", render_text(&outcome)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&render_json(&outcome))?),
    }
    Ok(exit_code(&outcome))
}

/// Map an outcome to the process exit status.
pub fn exit_code(outcome: &RunOutcome) -> u8 {
    match &outcome.error {
        None => EXIT_OK,
        Some(e) => match e.kind() {
            ErrorKind::Io | ErrorKind::Internal => EXIT_ERROR,
            ErrorKind::Structure | ErrorKind::Parse | ErrorKind::Schema => EXIT_INVALID,
        },
    }
}

/// Human-readable verdict.
pub fn render_text(outcome: &RunOutcome) -> String {
    if let Some(report) = &outcome.report {
        let mut out = format!(
            "OK: {} manifest(s), {} record(s)",
            report.manifest_count(),
            report.record_count()
        );
        for manifest in &report.manifests {
            out.push_str(&format!(
                "\n  {} ({} record(s))",
                manifest.path.display(),
                manifest.records.len()
            ));
        }
        return out;
    }

    let Some(error) = &outcome.error else {
        return "FAIL: no verdict".to_string();
    };
    let mut out = format!("FAIL: {error}");
    for violation in error.violations() {
        out.push_str(&format!("\n  {violation}"));
    }
    out
}

/// Structured verdict.
pub fn render_json(outcome: &RunOutcome) -> Value {
    if let Some(report) = &outcome.report {
        let manifests: Vec<Value> = report
            .manifests
            .iter()
            .map(|m| {
                let logos: Vec<&str> = m
                    .records
                    .iter()
                    .filter_map(|r| r.logo().map(|logo| logo.kind()))
                    .collect();
                json!({
                    "path": m.path.display().to_string(),
                    "records": m.records.len(),
                    "logo_kinds": logos,
                })
            })
            .collect();
        return json!({ "success": true, "manifests": manifests });
    }

    match &outcome.error {
        Some(error) => json!({
            "success": false,
            "kind": error.kind(),
            "message": error.to_string(),
            "violations": error.violations(),
        }),
        None => json!({ "success": outcome.success }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn token() -> Value {
        json!({
            "name": "Token",
            "symbol": "TKN",
            "address": format!("0x{}", "a".repeat(40)),
            "logoURI": "https://example.com/logo.png",
            "decimals": 18,
            "chainId": 1
        })
    }

    fn write_manifest(root: &Path, manifest: &Value) {
        let erc20 = root.join("erc20");
        std::fs::create_dir_all(&erc20).unwrap();
        std::fs::write(erc20.join("index.json"), manifest.to_string()).unwrap();
    }

    fn args(root: &Path) -> ValidateArgs {
        ValidateArgs {
            root: Some(root.to_path_buf()),
            manifest_dir: None,
            manifest_file: None,
            format: OutputFormat::Text,
        }
    }

    #[test]
    fn valid_tree_exits_zero() {
        let dir = tempfile::tempdir().unwrap();
        write_manifest(dir.path(), &json!([token()]));
        let code = run_validate(&args(dir.path()), &CheckConfig::default()).unwrap();
        assert_eq!(code, EXIT_OK);
    }

    #[test]
    fn schema_failure_exits_one() {
        let dir = tempfile::tempdir().unwrap();
        write_manifest(dir.path(), &json!([]));
        let code = run_validate(&args(dir.path()), &CheckConfig::default()).unwrap();
        assert_eq!(code, EXIT_INVALID);
    }

    #[test]
    fn missing_layout_exits_one() {
        let dir = tempfile::tempdir().unwrap();
        let code = run_validate(&args(dir.path()), &CheckConfig::default()).unwrap();
        assert_eq!(code, EXIT_INVALID);
    }

    #[test]
    fn unreadable_root_exits_two() {
        let dir = tempfile::tempdir().unwrap();
        let code =
            run_validate(&args(&dir.path().join("missing")), &CheckConfig::default()).unwrap();
        assert_eq!(code, EXIT_ERROR);
    }

    #[test]
    fn flags_select_convention() {
        let dir = tempfile::tempdir().unwrap();
        let lists = dir.path().join("ERC721");
        std::fs::create_dir_all(&lists).unwrap();
        std::fs::write(lists.join("list.json"), json!([token()]).to_string()).unwrap();

        let mut args = args(dir.path());
        args.manifest_dir = Some("erc721".into());
        args.manifest_file = Some("list.json".into());
        args.format = OutputFormat::Json;
        assert_eq!(run_validate(&args, &CheckConfig::default()).unwrap(), EXIT_OK);
    }

    #[test]
    fn text_lists_each_violation() {
        let dir = tempfile::tempdir().unwrap();
        let mut bad = token();
        bad["decimals"] = json!(256);
        bad["extra"] = json!("x");
        write_manifest(dir.path(), &json!([bad]));

        let outcome = run(dir.path(), &Default::default());
        let text = render_text(&outcome);
        assert!(text.starts_with("FAIL:"), "{text}");
        assert!(text.contains("field 'decimals'"), "{text}");
        assert!(text.contains("field 'extra'"), "{text}");
        assert_eq!(text.lines().count(), 3, "{text}");
    }

    #[test]
    fn json_carries_structured_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut bad = token();
        bad["logoURI"] = json!("not-a-url-and-not-base64!");
        write_manifest(dir.path(), &json!([bad]));

        let outcome = run(dir.path(), &Default::default());
        let value = render_json(&outcome);
        assert_eq!(value["success"], false);
        assert_eq!(value["kind"], "schema");
        assert_eq!(value["violations"][0]["field"], "logoURI");
        assert_eq!(value["violations"][0]["record"], 0);
        assert_eq!(value["violations"][0]["document"], 0);
    }

    #[test]
    fn json_success_lists_manifests() {
        let dir = tempfile::tempdir().unwrap();
        write_manifest(dir.path(), &json!([token(), token()]));

        let outcome = run(dir.path(), &Default::default());
        let value = render_json(&outcome);
        assert_eq!(value["success"], true);
        assert_eq!(value["manifests"][0]["records"], 2);
        assert_eq!(value["manifests"][0]["logo_kinds"], json!(["uri", "uri"]));
        assert!(render_text(&outcome).starts_with("OK: 1 manifest(s), 2 record(s)"));
    }

    #[test]
    fn structure_message_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("erc20")).unwrap();
        let outcome = run(dir.path(), &Default::default());
        assert_eq!(render_text(&outcome), "FAIL: invalid manifest file path");
        assert_eq!(render_json(&outcome)["kind"], "structure");
    }
}
