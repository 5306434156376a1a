// SPDX-License-Identifier: PMPL-1.0-or-later

//! Project settings (`locsync.yaml`).
//!
//! ```yaml
//! translations_dir: translations
//! languages: [fr, de]            # omit to discover <lang>.ndjson files
//! skip_rules: config/translation-skip.json
//! script_fold: config/t2s.txt    # omit to hash raw text
//! locres_version: 2
//! ```
//!
//! The script fold is the single hash policy for the whole project: import
//! and build both go through the [`SourceHasher`] built here.

use crate::fingerprint::SourceHasher;
use crate::locres::LocresVersion;
use crate::normalize::ScriptFold;
use crate::skip::SkipRules;
use crate::storage;
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_SETTINGS_FILES: [&str; 3] = ["locsync.yaml", "locsync.yml", "locsync.json"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub translations_dir: PathBuf,
    pub languages: Option<Vec<String>>,
    pub skip_rules: PathBuf,
    pub script_fold: Option<PathBuf>,
    pub locres_version: u8,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            translations_dir: PathBuf::from("translations"),
            languages: None,
            skip_rules: PathBuf::from("config/translation-skip.json"),
            script_fold: None,
            locres_version: LocresVersion::default().as_u8(),
        }
    }
}

impl Settings {
    /// Explicit path must exist; otherwise the first default file found is
    /// used, falling back to built-in defaults.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        for name in DEFAULT_SETTINGS_FILES {
            let path = Path::new(name);
            if path.is_file() {
                return Self::load(path);
            }
        }
        Ok(Self::default())
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading settings {}", path.display()))?;
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => serde_json::from_str(&content)
                .with_context(|| format!("parsing json settings {}", path.display())),
            _ => serde_yaml::from_str(&content)
                .with_context(|| format!("parsing yaml settings {}", path.display())),
        }
    }

    pub fn locres_version(&self) -> Result<LocresVersion> {
        LocresVersion::from_u8(self.locres_version)
            .ok_or_else(|| anyhow!("unknown locres_version {}", self.locres_version))
    }

    pub fn hasher(&self) -> Result<SourceHasher> {
        match &self.script_fold {
            Some(path) => Ok(SourceHasher::with_fold(ScriptFold::load(path)?)),
            None => Ok(SourceHasher::raw()),
        }
    }

    pub fn skip_rules(&self) -> Result<SkipRules> {
        SkipRules::load(&self.skip_rules)
    }

    /// Configured languages, or whatever catalogs exist on disk.
    pub fn languages(&self) -> Result<Vec<String>> {
        match &self.languages {
            Some(list) => Ok(list.clone()),
            None => storage::discover_languages(&self.translations_dir),
        }
    }

    pub fn catalog_path(&self, language: &str) -> PathBuf {
        storage::catalog_path(&self.translations_dir, language)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.locres_version().unwrap(), LocresVersion::OptimizedCrc32);
        assert!(!settings.hasher().unwrap().folds_script());
        assert_eq!(settings.catalog_path("fr"), PathBuf::from("translations/fr.ndjson"));
    }

    #[test]
    fn test_yaml_and_json_by_extension() {
        let dir = TempDir::new().unwrap();
        let yaml = dir.path().join("locsync.yaml");
        fs::write(&yaml, "translations_dir: cat\nlanguages: [fr]\nlocres_version: 1\n").unwrap();
        let settings = Settings::load(&yaml).unwrap();
        assert_eq!(settings.translations_dir, PathBuf::from("cat"));
        assert_eq!(settings.languages().unwrap(), vec!["fr".to_string()]);
        assert_eq!(settings.locres_version().unwrap(), LocresVersion::Compact);

        let json = dir.path().join("locsync.json");
        fs::write(&json, r#"{"skip_rules":"rules.json"}"#).unwrap();
        let settings = Settings::load(&json).unwrap();
        assert_eq!(settings.skip_rules, PathBuf::from("rules.json"));
        assert_eq!(settings.translations_dir, PathBuf::from("translations"));
    }

    #[test]
    fn test_unknown_field_rejected() {
        let dir = TempDir::new().unwrap();
        let yaml = dir.path().join("s.yaml");
        fs::write(&yaml, "translation_dir: typo\n").unwrap();
        assert!(Settings::load(&yaml).is_err());
    }

    #[test]
    fn test_explicit_missing_file_is_error() {
        let dir = TempDir::new().unwrap();
        assert!(Settings::resolve(Some(&dir.path().join("nope.yaml"))).is_err());
    }

    #[test]
    fn test_bad_version() {
        let settings = Settings {
            locres_version: 7,
            ..Settings::default()
        };
        assert!(settings.locres_version().is_err());
    }

    #[test]
    fn test_fold_table_enables_folding() {
        let dir = TempDir::new().unwrap();
        let table = dir.path().join("t2s.txt");
        fs::write(&table, "漢\t汉\n").unwrap();
        let settings = Settings {
            script_fold: Some(table),
            ..Settings::default()
        };
        assert!(settings.hasher().unwrap().folds_script());
    }
}
