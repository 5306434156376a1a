// SPDX-License-Identifier: PMPL-1.0-or-later

//! Filesystem helpers for the translations workspace

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

const CATALOG_EXTENSION: &str = "ndjson";
/// FormatString catalogs sit next to the locres catalogs but are not locres-backed.
const FMTSTRING_SUFFIX: &str = ".fmtstring";

pub fn catalog_path(dir: &Path, language: &str) -> PathBuf {
    dir.join(format!("{}.{}", language, CATALOG_EXTENSION))
}

/// Language codes with a `<lang>.ndjson` catalog directly under `dir`, sorted.
pub fn discover_languages(dir: &Path) -> Result<Vec<String>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut languages = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
        let entry = entry.with_context(|| format!("scanning {}", dir.display()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        let is_catalog = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case(CATALOG_EXTENSION))
            .unwrap_or(false);
        if !is_catalog {
            continue;
        }
        if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
            if !stem.is_empty() && !stem.ends_with(FMTSTRING_SUFFIX) {
                languages.push(stem.to_string());
            }
        }
    }

    languages.sort();
    Ok(languages)
}

/// Write `<path>.tmp`, then rename it over `path`.
pub fn write_atomic(path: &Path, contents: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating directory {}", parent.display()))?;
    }
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);
    fs::write(&tmp, contents).with_context(|| format!("writing {}", tmp.display()))?;
    fs::rename(&tmp, path)
        .with_context(|| format!("renaming {} to {}", tmp.display(), path.display()))?;
    Ok(())
}
