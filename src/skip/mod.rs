// SPDX-License-Identifier: PMPL-1.0-or-later

//! Namespace/key rules that keep entries out of the compiled dictionary.
//!
//! Rules come from a JSON document:
//!
//! ```json
//! { "rules": [ { "namespace": "Debug" }, { "namespace": "UI", "keyRegex": "^Dev_" } ] }
//! ```
//!
//! A rule without `keyRegex` matches every key in its namespace. Key
//! patterns are searched, not anchored. A rule set is immutable once built;
//! callers wanting fresh rules load a new one.

use anyhow::{Context, Result};
use regex::Regex;
use serde::Deserialize;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use tracing::{debug, warn};

#[derive(Debug, Clone)]
struct SkipRule {
    namespace: String,
    key_pattern: Option<Regex>,
}

impl SkipRule {
    fn matches(&self, namespace: &str, key: &str) -> bool {
        if self.namespace != namespace {
            return false;
        }
        match &self.key_pattern {
            Some(pattern) => pattern.is_match(key),
            None => true,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawRuleFile {
    #[serde(default)]
    rules: Vec<RawRule>,
}

#[derive(Debug, Deserialize)]
struct RawRule {
    #[serde(default)]
    namespace: Option<String>,
    #[serde(default, rename = "keyRegex")]
    key_regex: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Default)]
pub struct SkipRules {
    rules: Vec<SkipRule>,
}

impl SkipRules {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Load rules from `path`. A missing file means "skip nothing".
    pub fn load(path: &Path) -> Result<Self> {
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!(path = %path.display(), "no skip-rule file, nothing will be skipped");
                return Ok(Self::empty());
            }
            Err(err) => {
                return Err(err)
                    .with_context(|| format!("reading skip rules {}", path.display()))
            }
        };
        Self::from_json(&raw).with_context(|| format!("parsing skip rules {}", path.display()))
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        let file: RawRuleFile = serde_json::from_str(raw)?;
        let mut rules = Vec::with_capacity(file.rules.len());
        for (idx, rule) in file.rules.into_iter().enumerate() {
            let namespace = match rule.namespace {
                Some(ns) if !ns.is_empty() => ns,
                _ => {
                    warn!(rule = idx, "skip rule without namespace ignored");
                    continue;
                }
            };
            // a non-string keyRegex is treated as "whole namespace"
            let key_pattern = match rule.key_regex {
                Some(serde_json::Value::String(pattern)) => Some(
                    Regex::new(&pattern)
                        .with_context(|| format!("rule {} has invalid keyRegex {:?}", idx, pattern))?,
                ),
                _ => None,
            };
            rules.push(SkipRule {
                namespace,
                key_pattern,
            });
        }
        Ok(Self { rules })
    }

    /// First matching rule short-circuits; no match means keep.
    pub fn should_skip(&self, namespace: &str, key: &str) -> bool {
        self.rules.iter().any(|rule| rule.matches(namespace, key))
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
