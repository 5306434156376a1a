// SPDX-License-Identifier: PMPL-1.0-or-later

//! End-to-end runs: read inputs, call the core, write outputs, report counts.
//!
//! Each run is one batch over fully loaded files. Nothing here locks the
//! catalog; two runs against the same path at once are the caller's problem.

use crate::catalog::{self, CatalogStats};
use crate::compile::Compiler;
use crate::config::Settings;
use crate::fingerprint::SourceHasher;
use crate::locres::{LocresFile, LocresVersion};
use crate::reconcile::Reconciler;
use crate::report::{
    BuildReport, CatalogImport, CatalogStatus, DiffReport, ImportReport, SanitizeReport,
};
use crate::skip::SkipRules;
use crate::storage;
use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// A catalog file, optionally tied to a language code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogTarget {
    pub language: Option<String>,
    pub path: PathBuf,
}

impl CatalogTarget {
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self {
            language: None,
            path: path.into(),
        }
    }
}

/// Explicit catalog paths win, then explicit languages, then every
/// configured or discovered language.
pub fn resolve_targets(
    settings: &Settings,
    languages: &[String],
    catalogs: &[PathBuf],
) -> Result<Vec<CatalogTarget>> {
    if !catalogs.is_empty() {
        return Ok(catalogs.iter().cloned().map(CatalogTarget::file).collect());
    }
    let languages = if languages.is_empty() {
        settings.languages()?
    } else {
        languages.to_vec()
    };
    Ok(languages
        .into_iter()
        .map(|language| CatalogTarget {
            path: settings.catalog_path(&language),
            language: Some(language),
        })
        .collect())
}

/// Read a dictionary that must exist; codec errors stay in the chain.
pub fn load_dictionary(path: &Path) -> Result<LocresFile> {
    if !path.is_file() {
        bail!("locres file not found: {}", path.display());
    }
    LocresFile::read(path).with_context(|| format!("reading locres {}", path.display()))
}

pub fn run_import(
    dictionary: &Path,
    targets: &[CatalogTarget],
    hasher: &SourceHasher,
) -> Result<ImportReport> {
    let file = load_dictionary(dictionary)?;
    let entries = file.dictionary_entries();
    info!(dictionary = %dictionary.display(), entries = entries.len(), "dictionary loaded");

    let reconciler = Reconciler::new(hasher);
    let mut catalogs = Vec::with_capacity(targets.len());
    for target in targets {
        let records = catalog::load_or_empty(&target.path)?;
        let (records, summary) = reconciler.reconcile(entries.iter().cloned(), records);
        catalog::save_atomic(&target.path, &records)?;
        info!(
            catalog = %target.path.display(),
            added = summary.added,
            updated = summary.updated,
            skipped = summary.skipped,
            "import finished"
        );
        catalogs.push(CatalogImport {
            language: target.language.clone(),
            catalog: target.path.clone(),
            summary,
        });
    }

    Ok(ImportReport {
        dictionary: dictionary.to_path_buf(),
        dictionary_entries: entries.len(),
        catalogs,
    })
}

pub fn run_build(
    catalog_path: &Path,
    output: &Path,
    version: LocresVersion,
    rules: &SkipRules,
    hasher: &SourceHasher,
) -> Result<BuildReport> {
    if !catalog_path.is_file() {
        bail!("catalog not found: {}", catalog_path.display());
    }
    let records = catalog::load(catalog_path)?;
    let compiled = Compiler::new(rules, hasher).compile(&records);
    let bytes = compiled
        .dictionary
        .to_bytes(version)
        .with_context(|| format!("encoding locres for {}", output.display()))?;
    storage::write_atomic(output, &bytes)?;
    info!(
        output = %output.display(),
        written = compiled.summary.written,
        rejected = compiled.summary.total_rejected(),
        "build finished"
    );

    Ok(BuildReport {
        catalog: catalog_path.to_path_buf(),
        output: output.to_path_buf(),
        format_version: version.as_u8(),
        summary: compiled.summary,
    })
}

/// Missing catalogs are reported as empty.
pub fn run_status(targets: &[CatalogTarget], rules: &SkipRules) -> Result<Vec<CatalogStatus>> {
    let mut out = Vec::with_capacity(targets.len());
    for target in targets {
        let records = catalog::load_or_empty(&target.path)?;
        out.push(CatalogStatus {
            language: target.language.clone(),
            catalog: target.path.clone(),
            stats: CatalogStats::collect(&records, rules),
        });
    }
    Ok(out)
}

/// Missing catalogs are left missing.
pub fn run_sanitize(
    targets: &[CatalogTarget],
    rules: &SkipRules,
    dry_run: bool,
) -> Result<Vec<SanitizeReport>> {
    let mut out = Vec::with_capacity(targets.len());
    for target in targets {
        if !target.path.is_file() {
            continue;
        }
        let mut records = catalog::load(&target.path)?;
        let cleared = catalog::sanitize(&mut records, rules);
        if cleared > 0 && !dry_run {
            catalog::save_atomic(&target.path, &records)?;
        }
        out.push(SanitizeReport {
            catalog: target.path.clone(),
            cleared,
            dry_run,
        });
    }
    Ok(out)
}

/// Compare `catalog` against `baseline`. A missing baseline counts as empty,
/// so every record shows up as added.
pub fn run_diff(
    baseline: &Path,
    catalog_path: &Path,
    display_limit: Option<usize>,
) -> Result<DiffReport> {
    if !catalog_path.is_file() {
        bail!("catalog not found: {}", catalog_path.display());
    }
    let current = catalog::load(catalog_path)?;
    let previous = if baseline.exists() {
        catalog::load(baseline)?
    } else {
        warn!(baseline = %baseline.display(), "no baseline catalog; treating as empty");
        Vec::new()
    };
    let diff = catalog::diff(&previous, &current);
    info!(
        added = diff.added.len(),
        removed = diff.removed.len(),
        changed = diff.changed.len(),
        "diff finished"
    );

    Ok(DiffReport {
        baseline: baseline.to_path_buf(),
        catalog: catalog_path.to_path_buf(),
        diff,
        display_limit,
    })
}
