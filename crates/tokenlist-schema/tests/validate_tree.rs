//! Integration tests: validate whole manifest trees from disk.
//!
//! Each test builds a throwaway tree with `tempfile`, runs the public entry
//! points, and checks the verdict the CLI would act on.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use proptest::prelude::*;
use serde_json::{json, Value};
use tokenlist_schema::{
    run, scan, validate, ErrorKind, ManifestConvention, ManifestValidator, ValidationError,
};

fn token(symbol: &str) -> Value {
    json!({
        "name": format!("{symbol} Token"),
        "symbol": symbol,
        "address": "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed",
        "logoURI": "https://example.com/logo.png",
        "decimals": 18,
        "chainId": 1
    })
}

fn write_manifest(root: &Path, rel: &str, manifest: &Value) -> PathBuf {
    let path = root.join(rel);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(&path, serde_json::to_string_pretty(manifest).unwrap()).unwrap();
    path
}

#[test]
fn nested_layout_with_several_manifests_passes() {
    let dir = tempfile::tempdir().unwrap();
    write_manifest(dir.path(), "lists/erc20/mainnet/index.json", &json!([token("AAA")]));
    write_manifest(
        dir.path(),
        "lists/erc20/optimism/index.json",
        &json!([token("BBB"), token("CCC")]),
    );
    std::fs::write(dir.path().join("README.md"), "token lists").unwrap();

    let validator = ManifestValidator::new(ManifestConvention::default()).unwrap();
    let report = validator.validate(dir.path()).unwrap();
    assert_eq!(report.manifest_count(), 2);
    assert_eq!(report.record_count(), 3);
    assert!(report.manifests[0].path < report.manifests[1].path);
}

#[test]
fn one_bad_manifest_fails_the_whole_run() {
    let dir = tempfile::tempdir().unwrap();
    write_manifest(dir.path(), "erc20/a/index.json", &json!([token("AAA")]));
    let mut bad = token("BBB");
    bad["decimals"] = json!(256);
    let bad_path = write_manifest(dir.path(), "erc20/b/index.json", &json!([bad]));

    let err = validate(dir.path(), "erc20", "index.json").unwrap_err();
    let violations = err.violations();
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].document, 1);
    assert_eq!(violations[0].manifest, bad_path);
    assert_eq!(violations[0].field.as_deref(), Some("decimals"));
}

#[test]
fn parse_error_aborts_before_schema_check() {
    let dir = tempfile::tempdir().unwrap();
    let mut bad = token("AAA");
    bad["extra"] = json!(true);
    write_manifest(dir.path(), "erc20/a/index.json", &json!([bad]));
    let broken = dir.path().join("erc20/b/index.json");
    std::fs::create_dir_all(broken.parent().unwrap()).unwrap();
    std::fs::write(&broken, "not json").unwrap();

    match validate(dir.path(), "erc20", "index.json") {
        Err(ValidationError::Parse { path, .. }) => assert_eq!(path, broken),
        other => panic!("expected parse error, got {other:?}"),
    }
}

#[test]
fn repeated_runs_yield_identical_verdicts() {
    let dir = tempfile::tempdir().unwrap();
    let mut bad = token("AAA");
    bad["extra"] = json!("x");
    bad["decimals"] = json!(-1);
    write_manifest(dir.path(), "erc20/x/index.json", &json!([bad, token("BBB")]));
    write_manifest(dir.path(), "erc20/y/index.json", &json!([]));

    let convention = ManifestConvention::default();
    let first = run(dir.path(), &convention);
    let second = run(dir.path(), &convention);
    assert!(!first.success && !second.success);

    let first = first.error.unwrap();
    let second = second.error.unwrap();
    assert_eq!(first.kind(), ErrorKind::Schema);
    assert_eq!(first.to_string(), second.to_string());
    assert_eq!(first.violations(), second.violations());
    assert_eq!(first.violations().len(), 3);
}

#[test]
fn validation_leaves_tree_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_manifest(dir.path(), "erc20/index.json", &json!([token("AAA")]));
    let before = std::fs::read(&path).unwrap();
    let entries_before = scan(dir.path()).unwrap().len();

    validate(dir.path(), "erc20", "index.json").unwrap();

    assert_eq!(std::fs::read(&path).unwrap(), before);
    assert_eq!(scan(dir.path()).unwrap().len(), entries_before);
}

#[test]
fn structure_errors_are_distinct() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(dir.path().join("tokens")).unwrap();
    let no_dir = validate(dir.path(), "erc20", "index.json").unwrap_err();

    std::fs::create_dir_all(dir.path().join("erc20")).unwrap();
    let no_file = validate(dir.path(), "erc20", "index.json").unwrap_err();

    assert_eq!(no_dir.kind(), ErrorKind::Structure);
    assert_eq!(no_file.kind(), ErrorKind::Structure);
    assert_ne!(no_dir.to_string(), no_file.to_string());
}

/// A relative path made of `d*` directory segments, optionally ending in an
/// `f*` file. The prefixes keep files and directories from colliding.
fn tree_entry() -> impl Strategy<Value = (Vec<String>, bool)> {
    (prop::collection::vec("d[a-c]", 1..4), any::<bool>())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// The scan output is exactly the set of nodes under the root, once each.
    #[test]
    fn scan_is_complete_and_duplicate_free(
        entries in prop::collection::vec(tree_entry(), 0..12)
    ) {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().to_path_buf();
        let mut expected: HashSet<PathBuf> = HashSet::new();
        expected.insert(root.clone());

        for (segments, with_file) in &entries {
            let mut current = root.clone();
            for segment in segments {
                current = current.join(segment);
                expected.insert(current.clone());
            }
            std::fs::create_dir_all(&current).unwrap();
            if *with_file {
                let file = current.join("fx.json");
                std::fs::write(&file, b"[]").unwrap();
                expected.insert(file);
            }
        }

        let scanned = scan(&root).unwrap();
        let found: HashSet<PathBuf> = scanned.iter().map(|e| e.path.clone()).collect();
        prop_assert_eq!(found.len(), scanned.len());
        prop_assert_eq!(found, expected);
    }
}
