// SPDX-License-Identifier: PMPL-1.0-or-later

//! `locsync doctor`: check that the workspace is usable before a run.

use crate::config::Settings;
use crate::normalize::ScriptFold;
use crate::skip::SkipRules;
use anyhow::{anyhow, Result};
use std::path::Path;

pub fn run_self_diagnostics(settings: &Settings) -> Result<()> {
    println!("locsync self-diagnostics");

    let checks = collect(settings);
    println!();
    for entry in &checks {
        entry.print();
    }

    if checks
        .iter()
        .any(|entry| matches!(entry.level, Level::Error))
    {
        Err(anyhow!("self-diagnostics reported issues"))
    } else {
        Ok(())
    }
}

fn collect(settings: &Settings) -> Vec<Diagnostic> {
    let mut checks = Vec::new();
    checks.push(Diagnostic::ok(
        "version",
        format!("locsync {}", env!("CARGO_PKG_VERSION")),
    ));
    checks.push(check_version(settings));
    checks.push(check_directory(
        "translations dir",
        &settings.translations_dir,
    ));
    checks.push(check_languages(settings));
    checks.push(check_skip_rules(&settings.skip_rules));
    checks.push(check_fold(settings.script_fold.as_deref()));
    checks
}

#[derive(Debug, PartialEq, Eq)]
enum Level {
    Ok,
    Warn,
    Error,
}

impl Level {
    fn tag(&self) -> &'static str {
        match self {
            Level::Ok => "OK",
            Level::Warn => "WARN",
            Level::Error => "ERR",
        }
    }
}

struct Diagnostic {
    label: &'static str,
    level: Level,
    detail: String,
}

impl Diagnostic {
    fn new(label: &'static str, level: Level, detail: String) -> Self {
        Self {
            label,
            level,
            detail,
        }
    }

    fn ok(label: &'static str, detail: String) -> Self {
        Self::new(label, Level::Ok, detail)
    }

    fn warning(label: &'static str, detail: String) -> Self {
        Self::new(label, Level::Warn, detail)
    }

    fn error(label: &'static str, detail: String) -> Self {
        Self::new(label, Level::Error, detail)
    }

    fn print(&self) {
        println!("  [{}] {:18} {}", self.level.tag(), self.label, self.detail);
    }
}

fn check_version(settings: &Settings) -> Diagnostic {
    match settings.locres_version() {
        Ok(version) if version == crate::locres::LocresVersion::OptimizedCityHash => {
            Diagnostic::error(
                "locres version",
                "version 3 can be read but not written".to_string(),
            )
        }
        Ok(version) => Diagnostic::ok("locres version", format!("writing {:?}", version)),
        Err(err) => Diagnostic::error("locres version", err.to_string()),
    }
}

fn check_directory(label: &'static str, path: &Path) -> Diagnostic {
    if path.is_dir() {
        Diagnostic::ok(label, format!("{} exists", path.display()))
    } else if path.exists() {
        Diagnostic::error(label, format!("{} exists but is not a directory", path.display()))
    } else {
        Diagnostic::warning(
            label,
            format!("{} missing (import will create catalogs there)", path.display()),
        )
    }
}

fn check_languages(settings: &Settings) -> Diagnostic {
    match settings.languages() {
        Ok(langs) if langs.is_empty() => Diagnostic::warning(
            "languages",
            "none configured or discovered; pass --catalog explicitly".to_string(),
        ),
        Ok(langs) => Diagnostic::ok("languages", langs.join(", ")),
        Err(err) => Diagnostic::error("languages", format!("{:#}", err)),
    }
}

fn check_skip_rules(path: &Path) -> Diagnostic {
    if !path.exists() {
        return Diagnostic::warning(
            "skip rules",
            format!("{} missing (nothing will be skipped)", path.display()),
        );
    }
    match SkipRules::load(path) {
        Ok(rules) => Diagnostic::ok("skip rules", format!("{} rules loaded", rules.len())),
        Err(err) => Diagnostic::error("skip rules", format!("{:#}", err)),
    }
}

fn check_fold(path: Option<&Path>) -> Diagnostic {
    let Some(path) = path else {
        return Diagnostic::ok("hash policy", "raw text (no script folding)".to_string());
    };
    match ScriptFold::load(path) {
        Ok(fold) if fold.is_empty() => Diagnostic::error(
            "hash policy",
            format!("{} has no usable mappings", path.display()),
        ),
        Ok(fold) => Diagnostic::ok(
            "hash policy",
            format!("script folding via {} ({} chars)", path.display(), fold.len()),
        ),
        Err(err) => Diagnostic::error("hash policy", format!("{:#}", err)),
    }
}
