// SPDX-License-Identifier: PMPL-1.0-or-later

//! Build: catalogs compiled into locres dictionaries

use locsync::catalog::{self, CatalogRecord};
use locsync::compile::Compiler;
use locsync::fingerprint::{fingerprint, SourceHasher};
use locsync::locres::{LocresFile, LocresVersion};
use locsync::pipeline;
use locsync::skip::SkipRules;
use locsync::types::RejectReason;
use std::fs;
use tempfile::TempDir;

const CATALOG: &str = concat!(
    "{\"namespace\":\"UI\",\"key\":\"Start\",\"source\":\"Start Game\",\"translated\":\"Démarrer\"}\n",
    "{\"namespace\":\"UI\",\"key\":\"Quit\",\"source\":\"Quit\",\"translated\":\"\"}\n",
    "{\"namespace\":\"Debug\",\"key\":\"Fps\",\"source\":\"FPS\",\"translated\":\"IPS\"}\n",
    "{\"namespace\":\"UI\",\"key\":\"Help\",\"translated\":\"Aide\",\"importedHash\":\"0x10\"}\n",
    "{\"namespace\":\"UI\",\"key\":\"Bad\",\"source\":\"Bad\",\"translated\":\"Mauvais\",\"importedHash\":\"abc\"}\n",
    "{\"namespace\":\"UI\",\"key\":\"Orphan\",\"translated\":\"Orphelin\"}\n",
);

const RULES: &str = r#"{"rules":[{"namespace":"Debug"}]}"#;

fn records() -> Vec<CatalogRecord> {
    catalog::parse_catalog(CATALOG, "fr.ndjson").unwrap()
}

#[test]
fn test_compile_rejects_per_reason() {
    let rules = SkipRules::from_json(RULES).unwrap();
    let hasher = SourceHasher::raw();
    let compiled = Compiler::new(&rules, &hasher).compile(&records());
    let summary = &compiled.summary;

    assert_eq!(summary.written, 2);
    assert_eq!(summary.namespaces, 1);
    assert_eq!(summary.rejected(RejectReason::SkipRule), 1);
    assert_eq!(summary.rejected(RejectReason::NoTranslation), 1);
    assert_eq!(summary.rejected(RejectReason::UnresolvedHash), 1);
    assert_eq!(summary.rejected(RejectReason::MissingSource), 1);
    assert_eq!(summary.rejected(RejectReason::EmptyKey), 0);

    let ui = compiled.dictionary.namespace("UI").unwrap();
    assert_eq!(ui.get("Start").unwrap().source_hash, fingerprint("Start Game"));
    assert_eq!(ui.get("Help").unwrap().source_hash, 0x10);
    assert!(compiled.dictionary.namespace("Debug").is_none());
}

#[test]
fn test_compile_is_pure_and_deterministic() {
    let rules = SkipRules::from_json(RULES).unwrap();
    let hasher = SourceHasher::raw();
    let input = records();
    let before = input.clone();

    let first = Compiler::new(&rules, &hasher).compile(&input);
    let second = Compiler::new(&rules, &hasher).compile(&input);

    assert_eq!(input, before);
    assert_eq!(
        first.dictionary.to_bytes(LocresVersion::OptimizedCrc32).unwrap(),
        second.dictionary.to_bytes(LocresVersion::OptimizedCrc32).unwrap()
    );
}

#[test]
fn test_run_build_writes_readable_dictionary() {
    let dir = TempDir::new().unwrap();
    let catalog_path = dir.path().join("fr.ndjson");
    fs::write(&catalog_path, CATALOG).unwrap();
    let output = dir.path().join("out").join("Game.locres");

    let rules = SkipRules::from_json(RULES).unwrap();
    let report = pipeline::run_build(
        &catalog_path,
        &output,
        LocresVersion::OptimizedCrc32,
        &rules,
        &SourceHasher::raw(),
    )
    .unwrap();
    assert_eq!(report.summary.written, 2);
    assert_eq!(report.format_version, 2);

    let file = LocresFile::read(&output).unwrap();
    assert_eq!(file.entry_count(), 2);
    let start = file.namespace("UI").and_then(|ns| ns.get("Start")).unwrap();
    assert_eq!(start.text, "Démarrer");

    // the catalog itself is never rewritten by a build
    assert_eq!(fs::read_to_string(&catalog_path).unwrap(), CATALOG);
}

#[test]
fn test_build_line_endings_normalized() {
    let dir = TempDir::new().unwrap();
    let catalog_path = dir.path().join("fr.ndjson");
    fs::write(
        &catalog_path,
        "{\"namespace\":\"UI\",\"key\":\"Two\",\"source\":\"a\\nb\",\"translated\":\"x\\ny\"}\n",
    )
    .unwrap();
    let output = dir.path().join("Game.locres");

    pipeline::run_build(
        &catalog_path,
        &output,
        LocresVersion::Legacy,
        &SkipRules::empty(),
        &SourceHasher::raw(),
    )
    .unwrap();

    let file = LocresFile::read(&output).unwrap();
    let entry = file.namespace("UI").and_then(|ns| ns.get("Two")).unwrap();
    assert_eq!(entry.text, "x\r\ny");
    assert_eq!(entry.source_hash, fingerprint("a\r\nb"));
}

#[test]
fn test_catalog_save_load_keeps_unknown_fields() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("fr.ndjson");
    fs::write(
        &path,
        "{\"namespace\":\"UI\",\"key\":\"B\",\"context\":{\"screen\":\"main\"}}\n\n{\"namespace\":\"UI\",\"key\":\"A\",\"importedHash\":\"oops\"}\n",
    )
    .unwrap();

    let loaded = catalog::load(&path).unwrap();
    catalog::save_atomic(&path, &loaded).unwrap();
    let reloaded = catalog::load(&path).unwrap();

    assert_eq!(reloaded.len(), 2);
    assert_eq!(reloaded[0].key, "A");
    assert_eq!(
        reloaded[1].extra.get("context"),
        Some(&serde_json::json!({"screen": "main"}))
    );
    let raw = fs::read_to_string(&path).unwrap();
    assert!(raw.contains("\"importedHash\":\"oops\""));
}

#[test]
fn test_malformed_catalog_line_is_fatal() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("fr.ndjson");
    fs::write(&path, "{\"namespace\":\"UI\",\"key\":\"A\"}\n{broken\n").unwrap();

    let err = catalog::load(&path).unwrap_err();
    assert!(format!("{:#}", err).contains("line 2"));
}
