// SPDX-License-Identifier: PMPL-1.0-or-later

use super::CatalogRecord;
use crate::skip::SkipRules;
use serde::{Deserialize, Serialize};

/// Translation progress for one catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogStats {
    pub total: usize,
    pub translated: usize,
    pub pending: usize,
    pub skipped_by_rule: usize,
    pub import_only: usize,
    pub unresolved_hashes: usize,
}

impl CatalogStats {
    pub fn collect(records: &[CatalogRecord], rules: &SkipRules) -> Self {
        let mut stats = Self::default();
        for record in records {
            stats.total += 1;
            if rules.should_skip(&record.namespace, &record.key) {
                stats.skipped_by_rule += 1;
            } else if record.is_pending() {
                stats.pending += 1;
            } else {
                stats.translated += 1;
            }
            if record.usable_source().is_none() && record.locres_import.is_some() {
                stats.import_only += 1;
            }
            if record
                .imported_hash
                .as_ref()
                .is_some_and(|hash| hash.resolved().is_none())
            {
                stats.unresolved_hashes += 1;
            }
        }
        stats
    }
}
