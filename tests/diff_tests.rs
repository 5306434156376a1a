// SPDX-License-Identifier: PMPL-1.0-or-later

//! Diff: a catalog against an earlier copy of itself

use locsync::pipeline;
use locsync::report::{Report, ReportOutputFormat};
use serde_json::json;
use std::fs;
use tempfile::TempDir;

const BASELINE: &str = concat!(
    "{\"namespace\":\"UI\",\"key\":\"Start\",\"source\":\"Start Game\",\"translated\":null}\n",
    "{\"namespace\":\"UI\",\"key\":\"Old\",\"source\":\"Old\",\"translated\":\"Vieux\"}\n",
);

const CURRENT: &str = concat!(
    "{\"namespace\":\"UI\",\"key\":\"Start\",\"source\":\"Start Game\",\"translated\":\"Démarrer\",\"importedHash\":\"0x10\"}\n",
    "{\"namespace\":\"\",\"key\":\"Title\",\"source\":\"Title\",\"translated\":null}\n",
);

#[test]
fn test_run_diff_reports_each_bucket() {
    let dir = TempDir::new().unwrap();
    let baseline = dir.path().join("fr.base.ndjson");
    let current = dir.path().join("fr.ndjson");
    fs::write(&baseline, BASELINE).unwrap();
    fs::write(&current, CURRENT).unwrap();

    let report = pipeline::run_diff(&baseline, &current, Some(10)).unwrap();
    let diff = &report.diff;
    assert_eq!(diff.added.len(), 1);
    assert_eq!(diff.added[0].key, "Title");
    assert_eq!(diff.removed.len(), 1);
    assert_eq!(diff.removed[0].translated, json!("Vieux"));
    assert_eq!(diff.changed.len(), 1);

    let fields: Vec<&str> = diff.changed[0]
        .changes
        .iter()
        .map(|c| c.field.as_str())
        .collect();
    assert_eq!(fields, vec!["translated", "importedHash"]);
    assert_eq!(diff.changed[0].changes[1].after, json!(16));

    // neither file is rewritten
    assert_eq!(fs::read_to_string(&baseline).unwrap(), BASELINE);
    assert_eq!(fs::read_to_string(&current).unwrap(), CURRENT);
}

#[test]
fn test_missing_baseline_means_everything_added() {
    let dir = TempDir::new().unwrap();
    let current = dir.path().join("fr.ndjson");
    fs::write(&current, CURRENT).unwrap();

    let report = pipeline::run_diff(&dir.path().join("absent.ndjson"), &current, None).unwrap();
    assert_eq!(report.diff.added.len(), 2);
    assert!(report.diff.removed.is_empty());
}

#[test]
fn test_missing_catalog_is_fatal() {
    let dir = TempDir::new().unwrap();
    let err = pipeline::run_diff(
        &dir.path().join("a.ndjson"),
        &dir.path().join("b.ndjson"),
        None,
    )
    .unwrap_err();
    assert!(err.to_string().contains("catalog not found"));
}

#[test]
fn test_diff_json_has_zero_counts_and_buckets() {
    let dir = TempDir::new().unwrap();
    let current = dir.path().join("fr.ndjson");
    fs::write(&current, CURRENT).unwrap();

    let report = pipeline::run_diff(&current, &current, Some(5)).unwrap();
    assert!(report.diff.is_empty());
    let json = ReportOutputFormat::Json
        .serialize(&Report::Diff(report))
        .unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["added"], json!([]));
    assert_eq!(value["removed"], json!([]));
    assert_eq!(value["changed"], json!([]));
    assert!(value.get("display_limit").is_none());
}
