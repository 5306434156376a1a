// SPDX-License-Identifier: PMPL-1.0-or-later

//! One catalog line, plus the field migrations applied when it is read.

use anyhow::{bail, Result};
use serde_json::{Map, Value};
use tracing::warn;

pub const FIELD_NAMESPACE: &str = "namespace";
pub const FIELD_KEY: &str = "key";
pub const FIELD_SOURCE: &str = "source";
pub const FIELD_TRANSLATED: &str = "translated";
pub const FIELD_LOCRES_IMPORT: &str = "locresImport";
pub const FIELD_IMPORTED_HASH: &str = "importedHash";

/// Older catalogs used these names before the current ones.
const LEGACY_LOCRES_IMPORT: &str = "locres";
const LEGACY_IMPORTED_HASH: &str = "hashOverride";

/// Stored hash override.
#[derive(Debug, Clone, PartialEq)]
pub enum ImportedHash {
    /// Parsed and masked to 32 bits.
    Resolved(u32),
    /// Present but not an integer; kept verbatim so saving loses nothing.
    Unresolved(Value),
}

impl ImportedHash {
    pub fn from_value(value: &Value) -> Self {
        let parsed = match value {
            Value::Number(n) => n
                .as_i64()
                .map(i128::from)
                .or_else(|| n.as_u64().map(i128::from)),
            Value::String(s) => parse_int_literal(s),
            _ => None,
        };
        match parsed {
            Some(v) => ImportedHash::Resolved(mask32(v)),
            None => ImportedHash::Unresolved(value.clone()),
        }
    }

    pub fn resolved(&self) -> Option<u32> {
        match self {
            ImportedHash::Resolved(hash) => Some(*hash),
            ImportedHash::Unresolved(_) => None,
        }
    }

    fn to_value(&self) -> Value {
        match self {
            ImportedHash::Resolved(hash) => Value::from(*hash),
            ImportedHash::Unresolved(raw) => raw.clone(),
        }
    }
}

fn mask32(value: i128) -> u32 {
    (value & 0xFFFF_FFFF) as u32
}

/// Integer literal with optional sign and `0x`/`0o`/`0b` prefix.
///
/// Decimal literals may not carry leading zeros (`"007"` is rejected, `"0"`
/// and `"000"` are fine). Single underscores between digits are allowed.
pub fn parse_int_literal(raw: &str) -> Option<i128> {
    let text = raw.trim();
    let (negative, body) = match text.as_bytes().first()? {
        b'-' => (true, &text[1..]),
        b'+' => (false, &text[1..]),
        _ => (false, text),
    };
    let lower = body.to_ascii_lowercase();
    let (radix, digits) = if let Some(rest) = lower.strip_prefix("0x") {
        (16, rest.strip_prefix('_').unwrap_or(rest))
    } else if let Some(rest) = lower.strip_prefix("0o") {
        (8, rest.strip_prefix('_').unwrap_or(rest))
    } else if let Some(rest) = lower.strip_prefix("0b") {
        (2, rest.strip_prefix('_').unwrap_or(rest))
    } else {
        if lower.len() > 1 && lower.starts_with('0') && lower.chars().any(|c| c != '0' && c != '_') {
            return None;
        }
        (10, lower.as_str())
    };
    if digits.is_empty()
        || digits.starts_with('_')
        || digits.ends_with('_')
        || digits.contains("__")
        || !digits.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
    {
        return None;
    }
    let cleaned: String = digits.chars().filter(|c| *c != '_').collect();
    let value = i128::from_str_radix(&cleaned, radix).ok()?;
    Some(if negative { -value } else { value })
}

/// A translatable string keyed by `(namespace, key)`.
///
/// Fields the core does not know about live in `extra` and are written back
/// in their original order. A `source`, `translated` or `locresImport` value
/// that is not a string is also parked there and treated as absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogRecord {
    pub namespace: String,
    pub key: String,
    pub source: Option<String>,
    pub translated: Option<String>,
    pub locres_import: Option<String>,
    pub imported_hash: Option<ImportedHash>,
    pub extra: Map<String, Value>,
}

impl CatalogRecord {
    pub fn new(namespace: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            key: key.into(),
            ..Self::default()
        }
    }

    /// Build a record from a parsed line, applying legacy-field migrations.
    ///
    /// `namespace` and `key` form the record's identity, so a value of any
    /// other type than string (or null) is an error rather than being
    /// coerced.
    pub fn from_object(mut obj: Map<String, Value>) -> Result<Self> {
        rename_legacy(&mut obj, LEGACY_LOCRES_IMPORT, FIELD_LOCRES_IMPORT);
        rename_legacy(&mut obj, LEGACY_IMPORTED_HASH, FIELD_IMPORTED_HASH);

        let namespace = take_identity(&mut obj, FIELD_NAMESPACE)?;
        let key = take_identity(&mut obj, FIELD_KEY)?;
        let source = take_text(&mut obj, FIELD_SOURCE);
        let translated = take_text(&mut obj, FIELD_TRANSLATED);
        let locres_import = take_text(&mut obj, FIELD_LOCRES_IMPORT);

        let imported_hash = match obj.shift_remove(FIELD_IMPORTED_HASH) {
            None | Some(Value::Null) => None,
            Some(raw) => {
                let hash = ImportedHash::from_value(&raw);
                if let ImportedHash::Unresolved(bad) = &hash {
                    warn!(%namespace, %key, value = %bad, "importedHash is not an integer; treating as absent");
                }
                Some(hash)
            }
        };

        Ok(Self {
            namespace,
            key,
            source,
            translated,
            locres_import,
            imported_hash,
            extra: obj,
        })
    }

    pub fn to_object(&self) -> Map<String, Value> {
        let mut obj = Map::new();
        obj.insert(FIELD_NAMESPACE.into(), Value::String(self.namespace.clone()));
        obj.insert(FIELD_KEY.into(), Value::String(self.key.clone()));
        obj.insert(FIELD_SOURCE.into(), self.text_value(FIELD_SOURCE, &self.source));
        obj.insert(
            FIELD_TRANSLATED.into(),
            self.text_value(FIELD_TRANSLATED, &self.translated),
        );
        match (&self.locres_import, self.extra.get(FIELD_LOCRES_IMPORT)) {
            (Some(text), _) => {
                obj.insert(FIELD_LOCRES_IMPORT.into(), Value::String(text.clone()));
            }
            (None, Some(raw)) => {
                obj.insert(FIELD_LOCRES_IMPORT.into(), raw.clone());
            }
            (None, None) => {}
        }
        if let Some(hash) = &self.imported_hash {
            obj.insert(FIELD_IMPORTED_HASH.into(), hash.to_value());
        }
        for (name, value) in &self.extra {
            if !obj.contains_key(name) {
                obj.insert(name.clone(), value.clone());
            }
        }
        obj
    }

    fn text_value(&self, field: &str, typed: &Option<String>) -> Value {
        match typed {
            Some(text) => Value::String(text.clone()),
            None => self.extra.get(field).cloned().unwrap_or(Value::Null),
        }
    }

    /// Source text, if present and not blank.
    pub fn usable_source(&self) -> Option<&str> {
        self.source.as_deref().filter(|s| !s.trim().is_empty())
    }

    /// Absent, blank, or identical to the source.
    pub fn is_pending(&self) -> bool {
        match self.translated.as_deref() {
            None => true,
            Some(text) if text.trim().is_empty() => true,
            Some(text) => self.source.as_deref() == Some(text),
        }
    }

    pub fn set_locres_import(&mut self, text: String) {
        self.extra.shift_remove(FIELD_LOCRES_IMPORT);
        self.locres_import = Some(text);
    }

    pub fn clear_imported_hash(&mut self) {
        self.imported_hash = None;
    }

    /// Returns whether anything was cleared.
    pub fn clear_translated(&mut self) -> bool {
        let shadowed = self.extra.shift_remove(FIELD_TRANSLATED).is_some();
        self.translated.take().is_some() || shadowed
    }
}

fn rename_legacy(obj: &mut Map<String, Value>, legacy: &str, current: &str) {
    let has_value = obj.get(legacy).is_some_and(|v| !v.is_null());
    if has_value {
        if let Some(value) = obj.shift_remove(legacy) {
            obj.insert(current.to_string(), value);
        }
    }
}

fn take_identity(obj: &mut Map<String, Value>, field: &str) -> Result<String> {
    match obj.get(field) {
        None | Some(Value::Null) | Some(Value::String(_)) => {}
        Some(other) => bail!("`{}` must be a string, found {}", field, other),
    }
    match obj.shift_remove(field) {
        Some(Value::String(s)) => Ok(s),
        _ => Ok(String::new()),
    }
}

/// Strings come out typed; other non-null values stay in `obj` untouched.
fn take_text(obj: &mut Map<String, Value>, field: &str) -> Option<String> {
    match obj.get(field) {
        Some(Value::String(_)) | Some(Value::Null) => match obj.shift_remove(field) {
            Some(Value::String(s)) => Some(s),
            _ => None,
        },
        _ => None,
    }
}
