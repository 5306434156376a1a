// SPDX-License-Identifier: PMPL-1.0-or-later

//! Import: merge dictionary state into a catalog without touching translations.
//!
//! For every dictionary entry:
//!
//! | catalog state                      | action                                   | count   |
//! |------------------------------------|------------------------------------------|---------|
//! | known key, source hash matches     | store dictionary text, drop hash override | updated |
//! | known key, source hash differs     | leave record alone (conflict)            | skipped |
//! | known key, no usable source        | leave record alone                       | skipped |
//! | unknown key                        | append import-only record                | added   |
//! | empty key                          | ignore                                   | skipped |
//!
//! Only the first record for a duplicated `(namespace, key)` is ever looked
//! at, and import never creates a duplicate itself. `translated` is never
//! read or written here.

use crate::catalog::{CatalogRecord, ImportedHash};
use crate::fingerprint::SourceHasher;
use crate::normalize::normalize_line_endings;
use crate::types::{DictionaryEntry, ImportSummary};
use std::collections::HashMap;
use tracing::debug;

pub struct Reconciler<'a> {
    hasher: &'a SourceHasher,
}

impl<'a> Reconciler<'a> {
    pub fn new(hasher: &'a SourceHasher) -> Self {
        Self { hasher }
    }

    pub fn reconcile<I>(
        &self,
        entries: I,
        mut records: Vec<CatalogRecord>,
    ) -> (Vec<CatalogRecord>, ImportSummary)
    where
        I: IntoIterator<Item = DictionaryEntry>,
    {
        let mut index = index_records(&records);
        let mut summary = ImportSummary::default();

        for entry in entries {
            if entry.key.is_empty() {
                debug!(namespace = %entry.namespace, "dictionary entry without key ignored");
                summary.skipped += 1;
                continue;
            }
            let pair = (entry.namespace, entry.key);
            match index.get(&pair).copied() {
                Some(idx) => {
                    let record = &mut records[idx];
                    let Some(source) = record.usable_source() else {
                        debug!(namespace = %pair.0, key = %pair.1, "no source to validate against");
                        summary.skipped += 1;
                        continue;
                    };
                    let expected = self.hasher.source_hash(source);
                    if expected == entry.source_hash {
                        record.set_locres_import(normalize_line_endings(&entry.text));
                        record.clear_imported_hash();
                        summary.updated += 1;
                    } else {
                        debug!(
                            namespace = %pair.0,
                            key = %pair.1,
                            catalog_hash = expected,
                            dictionary_hash = entry.source_hash,
                            "source drifted from published dictionary; left untouched"
                        );
                        summary.skipped += 1;
                    }
                }
                None => {
                    let (namespace, key) = pair.clone();
                    let mut record = CatalogRecord::new(namespace, key);
                    record.locres_import = Some(normalize_line_endings(&entry.text));
                    record.imported_hash = Some(ImportedHash::Resolved(entry.source_hash));
                    records.push(record);
                    index.insert(pair, records.len() - 1);
                    summary.added += 1;
                }
            }
        }

        (records, summary)
    }
}

/// First occurrence of each `(namespace, key)` wins.
fn index_records(records: &[CatalogRecord]) -> HashMap<(String, String), usize> {
    let mut index = HashMap::with_capacity(records.len());
    for (idx, record) in records.iter().enumerate() {
        if record.key.is_empty() {
            continue;
        }
        index
            .entry((record.namespace.clone(), record.key.clone()))
            .or_insert(idx);
    }
    index
}

/// Convenience wrapper around [`Reconciler::reconcile`].
pub fn reconcile<I>(
    entries: I,
    records: Vec<CatalogRecord>,
    hasher: &SourceHasher,
) -> (Vec<CatalogRecord>, ImportSummary)
where
    I: IntoIterator<Item = DictionaryEntry>,
{
    Reconciler::new(hasher).reconcile(entries, records)
}
