// SPDX-License-Identifier: PMPL-1.0-or-later

//! NDJSON translation catalog: one record per line, sorted on write.
//!
//! Loading is strict. A line that is not a JSON object aborts the load with
//! its line number, because a half-read catalog must never be merged into or
//! compiled. Blank lines are ignored and key-less records are dropped.

mod diff;
mod record;
mod stats;

pub use diff::{diff, CatalogDiff, ChangedRecord, DiffEntry, FieldChange, DIFF_FIELDS};
pub use record::{
    parse_int_literal, CatalogRecord, ImportedHash, FIELD_IMPORTED_HASH, FIELD_KEY,
    FIELD_LOCRES_IMPORT, FIELD_NAMESPACE, FIELD_SOURCE, FIELD_TRANSLATED,
};
pub use stats::CatalogStats;

use crate::skip::SkipRules;
use crate::storage;
use anyhow::{anyhow, Context, Result};
use serde_json::Value;
use std::fs;
use std::path::Path;
use tracing::{info, warn};

pub fn parse_catalog(raw: &str, label: &str) -> Result<Vec<CatalogRecord>> {
    let raw = raw.strip_prefix('\u{feff}').unwrap_or(raw);
    let mut records = Vec::new();
    for (idx, line) in raw.lines().enumerate() {
        let line_number = idx + 1;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let value: Value = serde_json::from_str(line)
            .with_context(|| format!("invalid JSON at line {} of {}", line_number, label))?;
        let Value::Object(obj) = value else {
            return Err(anyhow!(
                "line {} of {} is not a JSON object",
                line_number,
                label
            ));
        };
        let record = CatalogRecord::from_object(obj)
            .with_context(|| format!("invalid record at line {} of {}", line_number, label))?;
        if record.key.is_empty() {
            warn!(line = line_number, catalog = label, "record without key dropped");
            continue;
        }
        records.push(record);
    }
    Ok(records)
}

/// Load a catalog that must exist.
pub fn load(path: &Path) -> Result<Vec<CatalogRecord>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("reading catalog {}", path.display()))?;
    let records = parse_catalog(&raw, &path.display().to_string())?;
    info!(catalog = %path.display(), records = records.len(), "catalog loaded");
    Ok(records)
}

/// A missing catalog is an empty one.
pub fn load_or_empty(path: &Path) -> Result<Vec<CatalogRecord>> {
    if path.exists() {
        load(path)
    } else {
        info!(catalog = %path.display(), "catalog does not exist yet; starting empty");
        Ok(Vec::new())
    }
}

/// Serialize records sorted, one object per line, each line newline-terminated.
///
/// The sort is stable on `(namespace, key)` with an ordinal, case-sensitive
/// compare, so duplicate pairs keep their relative order.
pub fn render(records: &[CatalogRecord]) -> Result<String> {
    let mut sorted: Vec<&CatalogRecord> = records.iter().collect();
    sorted.sort_by(|a, b| (&a.namespace, &a.key).cmp(&(&b.namespace, &b.key)));

    let mut out = String::new();
    for record in sorted {
        let line = serde_json::to_string(&Value::Object(record.to_object()))
            .with_context(|| format!("serializing record {}/{}", record.namespace, record.key))?;
        out.push_str(&line);
        out.push('\n');
    }
    Ok(out)
}

/// Write in place. Not atomic; see [`save_atomic`].
pub fn save(path: &Path, records: &[CatalogRecord]) -> Result<()> {
    let content = render(records)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content).with_context(|| format!("writing catalog {}", path.display()))
}

/// Write to a sibling temp file, then rename over `path`.
pub fn save_atomic(path: &Path, records: &[CatalogRecord]) -> Result<()> {
    let content = render(records)?;
    storage::write_atomic(path, content.as_bytes())
}

/// Clear `translated` on every record a skip rule matches.
pub fn sanitize(records: &mut [CatalogRecord], rules: &SkipRules) -> usize {
    let mut cleared = 0;
    for record in records.iter_mut() {
        if rules.should_skip(&record.namespace, &record.key) && record.clear_translated() {
            cleared += 1;
        }
    }
    cleared
}
