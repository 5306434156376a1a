// SPDX-License-Identifier: PMPL-1.0-or-later

//! Run reports for import, build, status and sanitize

pub mod formatter;
pub mod output;

use crate::catalog::{CatalogDiff, CatalogStats};
use crate::types::{BuildSummary, ImportSummary};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub use formatter::ReportFormatter;
pub use output::ReportOutputFormat;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogImport {
    pub language: Option<String>,
    pub catalog: PathBuf,
    pub summary: ImportSummary,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportReport {
    pub dictionary: PathBuf,
    pub dictionary_entries: usize,
    pub catalogs: Vec<CatalogImport>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildReport {
    pub catalog: PathBuf,
    pub output: PathBuf,
    pub format_version: u8,
    pub summary: BuildSummary,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogStatus {
    pub language: Option<String>,
    pub catalog: PathBuf,
    pub stats: CatalogStats,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SanitizeReport {
    pub catalog: PathBuf,
    pub cleared: usize,
    pub dry_run: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiffReport {
    pub baseline: PathBuf,
    pub catalog: PathBuf,
    #[serde(flatten)]
    pub diff: CatalogDiff,
    /// Per-section cap on printed records; `None` prints everything.
    #[serde(skip)]
    pub display_limit: Option<usize>,
}

/// Anything the CLI can print either as text or as a serialized document.
pub enum Report {
    Import(ImportReport),
    Build(BuildReport),
    Status(Vec<CatalogStatus>),
    Sanitize(Vec<SanitizeReport>),
    Diff(DiffReport),
}

/// Print a report to stdout in the chosen format.
pub fn emit(report: &Report, format: ReportOutputFormat) -> Result<()> {
    match format {
        ReportOutputFormat::Text => {
            ReportFormatter::new().print(report);
            Ok(())
        }
        other => {
            println!("{}", other.serialize(report)?);
            Ok(())
        }
    }
}
