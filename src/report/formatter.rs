// SPDX-License-Identifier: PMPL-1.0-or-later

//! Terminal formatting for run reports

use super::{BuildReport, CatalogStatus, DiffReport, ImportReport, Report, SanitizeReport};
use crate::catalog::DiffEntry;
use crate::types::RejectReason;
use colored::*;
use serde_json::Value;

pub struct ReportFormatter;

impl ReportFormatter {
    pub fn new() -> Self {
        Self
    }

    pub fn print(&self, report: &Report) {
        match report {
            Report::Import(r) => self.print_import(r),
            Report::Build(r) => self.print_build(r),
            Report::Status(r) => self.print_status(r),
            Report::Sanitize(r) => self.print_sanitize(r),
            Report::Diff(r) => self.print_diff(r),
        }
    }

    fn print_import(&self, report: &ImportReport) {
        println!("{}", "IMPORT".bold().yellow());
        println!(
            "  Dictionary: {} ({} entries)",
            report.dictionary.display(),
            report.dictionary_entries
        );
        if report.catalogs.is_empty() {
            println!("  {}", "No catalogs to import into".yellow());
            return;
        }
        for item in &report.catalogs {
            let label = item.language.as_deref().unwrap_or("-");
            println!(
                "  [{}] {}: updated {}, added {}, skipped {}",
                label.cyan(),
                item.catalog.display(),
                item.summary.updated.to_string().green(),
                item.summary.added.to_string().green(),
                colour_nonzero(item.summary.skipped, "yellow"),
            );
        }
    }

    fn print_build(&self, report: &BuildReport) {
        println!("{}", "BUILD".bold().yellow());
        println!("  Catalog: {}", report.catalog.display());
        println!(
            "  Wrote {} entries in {} namespaces to {} (format v{})",
            report.summary.written.to_string().green().bold(),
            report.summary.namespaces,
            report.output.display(),
            report.format_version
        );
        println!(
            "  Superseded duplicates: {}",
            colour_nonzero(report.summary.superseded, "yellow")
        );
        println!("  Rejected: {}", report.summary.total_rejected());
        for reason in RejectReason::all() {
            let count = report.summary.rejected(reason);
            println!("    {:<16} {}", reason.as_str(), count.to_string().dimmed());
        }
    }

    fn print_status(&self, statuses: &[CatalogStatus]) {
        println!("{}", "CATALOG STATUS".bold().yellow());
        if statuses.is_empty() {
            println!("  {}", "No catalogs found".yellow());
            return;
        }
        println!(
            "  {:<10} {:>8} {:>10} {:>8} {:>8} {:>8} {:>10}",
            "Language", "Total", "Translated", "Pending", "Skipped", "Import", "BadHash"
        );
        println!("  {}", "-".repeat(70));
        for status in statuses {
            let stats = &status.stats;
            println!(
                "  {:<10} {:>8} {:>10} {:>8} {:>8} {:>8} {:>10}",
                status.language.as_deref().unwrap_or("-"),
                stats.total,
                stats.translated,
                stats.pending,
                stats.skipped_by_rule,
                stats.import_only,
                stats.unresolved_hashes,
            );
        }
    }

    fn print_sanitize(&self, reports: &[SanitizeReport]) {
        println!("{}", "SANITIZE".bold().yellow());
        if reports.is_empty() {
            println!("  {}", "No catalogs found".yellow());
            return;
        }
        for report in reports {
            let verb = if report.dry_run {
                "would clear"
            } else {
                "cleared"
            };
            println!(
                "  {}: {} {} skipped translations",
                report.catalog.display(),
                verb,
                colour_nonzero(report.cleared, "yellow")
            );
        }
    }

    fn print_diff(&self, report: &DiffReport) {
        println!("{}", "CATALOG DIFF".bold().yellow());
        println!("  Baseline: {}", report.baseline.display());
        println!("  Catalog:  {}", report.catalog.display());
        let diff = &report.diff;
        println!("  added: {}", colour_nonzero(diff.added.len(), "green"));
        println!("  removed: {}", colour_nonzero(diff.removed.len(), "red"));
        println!("  changed: {}", colour_nonzero(diff.changed.len(), "yellow"));
        if diff.is_empty() {
            println!("  {}", "No differences".green());
            return;
        }

        let limit = report.display_limit;
        print_section("Added", &diff.added, limit, |entry| print_entry(entry));
        print_section("Removed", &diff.removed, limit, |entry| print_entry(entry));
        print_section("Changed", &diff.changed, limit, |record| {
            println!("  {}", record_header(&record.namespace, &record.key));
            for change in &record.changes {
                println!("      {}:", change.field.cyan());
                println!("        {} {}", "-".red(), format_value(&change.before));
                println!("        {} {}", "+".green(), format_value(&change.after));
            }
        });
    }
}

fn print_section<T>(label: &str, items: &[T], limit: Option<usize>, render: impl Fn(&T)) {
    if items.is_empty() {
        return;
    }
    let shown = limit.map_or(items.len(), |cap| cap.min(items.len()));
    if shown < items.len() {
        println!(
            "  {} ({}, showing first {}):",
            label.bold(),
            items.len(),
            shown
        );
    } else {
        println!("  {} ({}):", label.bold(), items.len());
    }
    items[..shown].iter().for_each(render);
    if shown < items.len() {
        println!("    ... {} more not shown", items.len() - shown);
    }
}

fn print_entry(entry: &DiffEntry) {
    println!("  {}", record_header(&entry.namespace, &entry.key));
    println!("      source: {}", format_value(&entry.source));
    println!("      translated: {}", format_value(&entry.translated));
}

fn record_header(namespace: &str, key: &str) -> String {
    let namespace = if namespace.is_empty() { "<root>" } else { namespace };
    format!("- ({}, {})", namespace, key)
}

const MAX_SHOWN_CHARS: usize = 200;

fn format_value(value: &Value) -> String {
    match value {
        Value::String(text) if text.chars().count() > MAX_SHOWN_CHARS => {
            let head: String = text.chars().take(MAX_SHOWN_CHARS).collect();
            Value::String(format!("{}...", head)).to_string()
        }
        other => other.to_string(),
    }
}

impl Default for ReportFormatter {
    fn default() -> Self {
        Self::new()
    }
}

fn colour_nonzero(count: usize, colour: &str) -> ColoredString {
    if count == 0 {
        count.to_string().normal()
    } else {
        count.to_string().color(colour).bold()
    }
}
