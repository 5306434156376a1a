// SPDX-License-Identifier: PMPL-1.0-or-later

//! Build: project a catalog into a locres dictionary.
//!
//! Compilation is read-only over the catalog and deterministic: the same
//! records in the same order always produce the same dictionary. Records are
//! rejected individually, never aborting the build.

use crate::catalog::{CatalogRecord, ImportedHash};
use crate::fingerprint::SourceHasher;
use crate::locres::LocresFile;
use crate::normalize::normalize_line_endings;
use crate::skip::SkipRules;
use crate::types::{BuildSummary, RejectReason};
use tracing::debug;

pub struct Compiler<'a> {
    rules: &'a SkipRules,
    hasher: &'a SourceHasher,
}

/// A compiled dictionary and what happened to each record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Compiled {
    pub dictionary: LocresFile,
    pub summary: BuildSummary,
}

impl<'a> Compiler<'a> {
    pub fn new(rules: &'a SkipRules, hasher: &'a SourceHasher) -> Self {
        Self { rules, hasher }
    }

    pub fn compile(&self, records: &[CatalogRecord]) -> Compiled {
        let mut dictionary = LocresFile::new();
        let mut summary = BuildSummary::default();

        for record in records {
            match self.resolve(record) {
                Ok((text, source_hash)) => {
                    let namespace = dictionary.namespace_mut(&record.namespace);
                    if namespace.get(&record.key).is_some() {
                        debug!(
                            namespace = %record.namespace,
                            key = %record.key,
                            "duplicate record replaces earlier entry"
                        );
                        summary.superseded += 1;
                    }
                    namespace.add(record.key.clone(), text, source_hash);
                }
                Err(reason) => {
                    debug!(
                        namespace = %record.namespace,
                        key = %record.key,
                        %reason,
                        "record not compiled"
                    );
                    summary.reject(reason);
                }
            }
        }

        summary.written = dictionary.entry_count();
        summary.namespaces = dictionary.namespaces().len();
        Compiled {
            dictionary,
            summary,
        }
    }

    /// The `(text, source hash)` to embed for `record`, or why there is none.
    pub fn resolve(&self, record: &CatalogRecord) -> Result<(String, u32), RejectReason> {
        if record.key.is_empty() {
            return Err(RejectReason::EmptyKey);
        }
        if self.rules.should_skip(&record.namespace, &record.key) {
            return Err(RejectReason::SkipRule);
        }
        let translated = record
            .translated
            .as_deref()
            .filter(|text| !text.is_empty())
            .ok_or(RejectReason::NoTranslation)?;
        let text = normalize_line_endings(translated);

        let source_hash = match &record.imported_hash {
            Some(ImportedHash::Resolved(hash)) => *hash,
            Some(ImportedHash::Unresolved(_)) => return Err(RejectReason::UnresolvedHash),
            None => {
                let source = record
                    .source
                    .as_deref()
                    .filter(|s| !s.is_empty())
                    .ok_or(RejectReason::MissingSource)?;
                self.hasher.source_hash(source)
            }
        };

        Ok((text, source_hash))
    }
}

/// Convenience wrapper around [`Compiler::compile`].
pub fn compile(records: &[CatalogRecord], rules: &SkipRules, hasher: &SourceHasher) -> Compiled {
    Compiler::new(rules, hasher).compile(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fingerprint::fingerprint;

    fn translated(ns: &str, key: &str, source: Option<&str>, text: &str) -> CatalogRecord {
        let mut record = CatalogRecord::new(ns, key);
        record.source = source.map(str::to_string);
        record.translated = Some(text.to_string());
        record
    }

    #[test]
    fn test_source_hash_computed_when_no_override() {
        let rules = SkipRules::empty();
        let hasher = SourceHasher::raw();
        let compiled = compile(
            &[translated("UI", "k", Some("a\nb"), "x\ny")],
            &rules,
            &hasher,
        );
        let entry = compiled.dictionary.namespace("UI").unwrap().get("k").unwrap();
        assert_eq!(entry.text, "x\r\ny");
        assert_eq!(entry.source_hash, fingerprint("a\r\nb"));
        assert_eq!(compiled.summary.written, 1);
    }

    #[test]
    fn test_override_beats_source() {
        let rules = SkipRules::empty();
        let hasher = SourceHasher::raw();
        let mut record = translated("UI", "k", Some("A"), "B");
        record.imported_hash = Some(ImportedHash::Resolved(42));
        let (_, hash) = Compiler::new(&rules, &hasher).resolve(&record).unwrap();
        assert_eq!(hash, 42);
    }

    #[test]
    fn test_reject_reasons() {
        let rules = SkipRules::from_json(r#"{"rules":[{"namespace":"Debug"}]}"#).unwrap();
        let hasher = SourceHasher::raw();
        let compiler = Compiler::new(&rules, &hasher);

        let mut unresolved = translated("UI", "u", Some("A"), "B");
        unresolved.imported_hash = Some(ImportedHash::Unresolved("zz".into()));

        let cases = vec![
            (translated("UI", "", Some("A"), "B"), RejectReason::EmptyKey),
            (translated("Debug", "k", Some("A"), "B"), RejectReason::SkipRule),
            (translated("UI", "e", Some("A"), ""), RejectReason::NoTranslation),
            (CatalogRecord::new("UI", "n"), RejectReason::NoTranslation),
            (unresolved, RejectReason::UnresolvedHash),
            (translated("UI", "s", None, "B"), RejectReason::MissingSource),
            (translated("UI", "s", Some(""), "B"), RejectReason::MissingSource),
        ];
        for (record, reason) in cases {
            assert_eq!(compiler.resolve(&record), Err(reason), "{:?}", record.key);
        }
    }

    #[test]
    fn test_namespaces_in_first_seen_order() {
        let rules = SkipRules::empty();
        let hasher = SourceHasher::raw();
        let compiled = compile(
            &[
                translated("B", "1", Some("s"), "t"),
                translated("A", "1", Some("s"), "t"),
                translated("B", "2", Some("s"), "t"),
            ],
            &rules,
            &hasher,
        );
        let names: Vec<_> = compiled
            .dictionary
            .namespaces()
            .iter()
            .map(|ns| ns.name().to_string())
            .collect();
        assert_eq!(names, vec!["B", "A"]);
        let keys: Vec<_> = compiled.dictionary.namespaces()[0]
            .entries()
            .iter()
            .map(|e| e.key.as_str())
            .collect();
        assert_eq!(keys, vec!["1", "2"]);
        assert_eq!(compiled.summary.namespaces, 2);
    }

    #[test]
    fn test_duplicate_key_counted_as_superseded() {
        let rules = SkipRules::empty();
        let hasher = SourceHasher::raw();
        let records = [
            translated("UI", "k", Some("s"), "one"),
            translated("UI", "k", Some("s"), "two"),
            translated("UI", "k", None, "three"),
        ];
        let compiled = compile(&records, &rules, &hasher);
        let summary = &compiled.summary;
        assert_eq!(summary.written, 1);
        assert_eq!(summary.superseded, 1);
        assert_eq!(summary.rejected(RejectReason::MissingSource), 1);
        assert_eq!(summary.records_seen(), records.len());
        let entry = compiled.dictionary.namespace("UI").unwrap().get("k").unwrap();
        assert_eq!(entry.text, "two");
    }

    #[test]
    fn test_whitespace_translation_is_kept() {
        let rules = SkipRules::empty();
        let hasher = SourceHasher::raw();
        let compiled = compile(&[translated("UI", "k", Some("A"), " ")], &rules, &hasher);
        assert_eq!(compiled.summary.written, 1);
    }

    #[test]
    fn test_fold_policy_applies_to_computed_hash() {
        let rules = SkipRules::empty();
        let hasher = SourceHasher::with_fold(crate::normalize::ScriptFold::parse("漢\t汉\n"));
        let compiled = compile(&[translated("UI", "k", Some("漢"), "Han")], &rules, &hasher);
        let entry = compiled.dictionary.namespace("UI").unwrap().get("k").unwrap();
        assert_eq!(entry.source_hash, fingerprint("汉"));
    }
}
