// SPDX-License-Identifier: PMPL-1.0-or-later

//! Record-level comparison of two catalogs.
//!
//! Records are matched on `(namespace, key)`. When a catalog repeats a pair
//! the last record wins, at the position the pair first appeared.

use super::record::{
    CatalogRecord, FIELD_IMPORTED_HASH, FIELD_LOCRES_IMPORT, FIELD_SOURCE, FIELD_TRANSLATED,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Fields whose changes are reported. Unknown fields are not compared.
pub const DIFF_FIELDS: [&str; 4] = [
    FIELD_SOURCE,
    FIELD_TRANSLATED,
    FIELD_LOCRES_IMPORT,
    FIELD_IMPORTED_HASH,
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiffEntry {
    pub namespace: String,
    pub key: String,
    pub source: Value,
    pub translated: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldChange {
    pub field: String,
    pub before: Value,
    pub after: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangedRecord {
    pub namespace: String,
    pub key: String,
    pub changes: Vec<FieldChange>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogDiff {
    pub added: Vec<DiffEntry>,
    pub removed: Vec<DiffEntry>,
    pub changed: Vec<ChangedRecord>,
}

impl CatalogDiff {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.changed.is_empty()
    }

    pub fn total(&self) -> usize {
        self.added.len() + self.removed.len() + self.changed.len()
    }
}

/// Compare `current` against `baseline`.
///
/// `added` and `changed` follow `current`'s order; `removed` follows
/// `baseline`'s.
pub fn diff(baseline: &[CatalogRecord], current: &[CatalogRecord]) -> CatalogDiff {
    let baseline = latest_by_identity(baseline);
    let current = latest_by_identity(current);

    let mut unmatched: HashMap<(&str, &str), &CatalogRecord> = baseline
        .iter()
        .map(|&record| (identity(record), record))
        .collect();

    let mut out = CatalogDiff::default();
    for &record in &current {
        let Some(before) = unmatched.remove(&identity(record)) else {
            out.added.push(entry(record));
            continue;
        };
        let changes = field_changes(before, record);
        if !changes.is_empty() {
            out.changed.push(ChangedRecord {
                namespace: record.namespace.clone(),
                key: record.key.clone(),
                changes,
            });
        }
    }

    for &record in &baseline {
        if unmatched.contains_key(&identity(record)) {
            out.removed.push(entry(record));
        }
    }
    out
}

fn identity(record: &CatalogRecord) -> (&str, &str) {
    (record.namespace.as_str(), record.key.as_str())
}

fn latest_by_identity(records: &[CatalogRecord]) -> Vec<&CatalogRecord> {
    let mut slots: HashMap<(&str, &str), usize> = HashMap::new();
    let mut out: Vec<&CatalogRecord> = Vec::new();
    for record in records {
        match slots.get(&identity(record)).copied() {
            Some(slot) => out[slot] = record,
            None => {
                slots.insert(identity(record), out.len());
                out.push(record);
            }
        }
    }
    out
}

fn field_changes(before: &CatalogRecord, after: &CatalogRecord) -> Vec<FieldChange> {
    let before = before.to_object();
    let after = after.to_object();
    DIFF_FIELDS
        .iter()
        .filter_map(|field| {
            let old = before.get(*field).cloned().unwrap_or(Value::Null);
            let new = after.get(*field).cloned().unwrap_or(Value::Null);
            (old != new).then(|| FieldChange {
                field: (*field).to_string(),
                before: old,
                after: new,
            })
        })
        .collect()
}

fn entry(record: &CatalogRecord) -> DiffEntry {
    let obj = record.to_object();
    DiffEntry {
        namespace: record.namespace.clone(),
        key: record.key.clone(),
        source: obj.get(FIELD_SOURCE).cloned().unwrap_or(Value::Null),
        translated: obj.get(FIELD_TRANSLATED).cloned().unwrap_or(Value::Null),
    }
}
