// SPDX-License-Identifier: PMPL-1.0-or-later

//! Core type definitions shared by import, build and reporting

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// One entry observed in a binary dictionary.
///
/// This is the only shape the reconciler accepts; the dictionary reader is
/// responsible for producing it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DictionaryEntry {
    pub namespace: String,
    pub key: String,
    pub text: String,
    pub source_hash: u32,
}

impl DictionaryEntry {
    pub fn new(
        namespace: impl Into<String>,
        key: impl Into<String>,
        text: impl Into<String>,
        source_hash: u32,
    ) -> Self {
        Self {
            namespace: namespace.into(),
            key: key.into(),
            text: text.into(),
            source_hash,
        }
    }
}

/// Outcome counts of one import run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportSummary {
    pub added: usize,
    pub updated: usize,
    pub skipped: usize,
}

/// Why a catalog record did not make it into the compiled dictionary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectReason {
    EmptyKey,
    SkipRule,
    NoTranslation,
    UnresolvedHash,
    MissingSource,
}

impl RejectReason {
    pub fn all() -> [RejectReason; 5] {
        [
            RejectReason::EmptyKey,
            RejectReason::SkipRule,
            RejectReason::NoTranslation,
            RejectReason::UnresolvedHash,
            RejectReason::MissingSource,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RejectReason::EmptyKey => "empty key",
            RejectReason::SkipRule => "skip rule",
            RejectReason::NoTranslation => "no translation",
            RejectReason::UnresolvedHash => "unresolved hash",
            RejectReason::MissingSource => "missing source",
        }
    }
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome counts of one build run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildSummary {
    pub written: usize,
    pub namespaces: usize,
    /// Accepted records replaced by a later record with the same key.
    pub superseded: usize,
    pub rejected: BTreeMap<RejectReason, usize>,
}

impl BuildSummary {
    pub fn reject(&mut self, reason: RejectReason) {
        *self.rejected.entry(reason).or_insert(0) += 1;
    }

    pub fn rejected(&self, reason: RejectReason) -> usize {
        self.rejected.get(&reason).copied().unwrap_or(0)
    }

    pub fn total_rejected(&self) -> usize {
        self.rejected.values().sum()
    }

    /// Every input record lands in exactly one of these buckets.
    pub fn records_seen(&self) -> usize {
        self.written + self.superseded + self.total_rejected()
    }
}
