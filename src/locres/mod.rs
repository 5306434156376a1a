// SPDX-License-Identifier: PMPL-1.0-or-later

//! Unreal Engine `.locres` localization resources.
//!
//! A locres file maps `namespace -> key -> (localized text, source hash)`.
//! The source hash is the fingerprint of the text the translation was made
//! from; the engine uses it to discard translations whose source changed.
//!
//! Layout summary (all integers little-endian):
//!
//! ```text
//! [magic: 16 bytes][version: u8]              -- absent in Legacy files
//! [string table offset: i64]                  -- Compact and later
//! [entry count: u32]                          -- Optimized and later
//! [namespace count: u32]
//!   [ns hash: u32]? [ns name: FString] [key count: u32]
//!     [key hash: u32]? [key: FString] [source hash: u32]
//!     [string index: i32]  or  [text: FString]   -- Legacy inlines text
//! [string count: i32] ([text: FString] [refcount: i32]?)*
//! ```
//!
//! `FString` is an `i32` length followed by Latin-1 bytes (positive length)
//! or UTF-16LE units (negative length), both including a trailing NUL.

mod error;
mod reader;
mod writer;

pub use error::LocresError;

use crate::normalize::normalize_line_endings;
use crate::types::DictionaryEntry;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

pub(crate) const MAGIC: [u8; 16] = [
    0x0E, 0x14, 0x74, 0x75, 0x67, 0x4A, 0x03, 0xFC, 0x4A, 0x15, 0x90, 0x9D, 0xC3, 0x37, 0x7F, 0x1B,
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum LocresVersion {
    Legacy = 0,
    Compact = 1,
    #[default]
    OptimizedCrc32 = 2,
    OptimizedCityHash = 3,
}

impl LocresVersion {
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(LocresVersion::Legacy),
            1 => Some(LocresVersion::Compact),
            2 => Some(LocresVersion::OptimizedCrc32),
            3 => Some(LocresVersion::OptimizedCityHash),
            _ => None,
        }
    }

    pub fn as_u8(self) -> u8 {
        self as u8
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocresEntry {
    pub key: String,
    pub text: String,
    pub source_hash: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocresNamespace {
    name: String,
    entries: Vec<LocresEntry>,
    index: HashMap<String, usize>,
}

impl LocresNamespace {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn entries(&self) -> &[LocresEntry] {
        &self.entries
    }

    pub fn get(&self, key: &str) -> Option<&LocresEntry> {
        self.index.get(key).map(|&idx| &self.entries[idx])
    }

    /// Insert an entry; a key seen before is replaced where it stands.
    pub fn add(&mut self, key: impl Into<String>, text: impl Into<String>, source_hash: u32) {
        let entry = LocresEntry {
            key: key.into(),
            text: text.into(),
            source_hash,
        };
        match self.index.get(&entry.key) {
            Some(&idx) => self.entries[idx] = entry,
            None => {
                self.index.insert(entry.key.clone(), self.entries.len());
                self.entries.push(entry);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocresFile {
    namespaces: Vec<LocresNamespace>,
    index: HashMap<String, usize>,
}

impl LocresFile {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn read(path: &Path) -> Result<Self, LocresError> {
        let data = fs::read(path)?;
        Self::from_bytes(&data)
    }

    pub fn from_bytes(data: &[u8]) -> Result<Self, LocresError> {
        reader::read(data)
    }

    pub fn to_bytes(&self, version: LocresVersion) -> Result<Vec<u8>, LocresError> {
        writer::write(self, version)
    }

    pub fn write(&self, path: &Path, version: LocresVersion) -> Result<(), LocresError> {
        let bytes = self.to_bytes(version)?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, bytes)?;
        Ok(())
    }

    pub fn namespaces(&self) -> &[LocresNamespace] {
        &self.namespaces
    }

    pub fn namespace(&self, name: &str) -> Option<&LocresNamespace> {
        self.index.get(name).map(|&idx| &self.namespaces[idx])
    }

    /// Get or create; new namespaces are appended in first-seen order.
    pub fn namespace_mut(&mut self, name: &str) -> &mut LocresNamespace {
        let idx = match self.index.get(name) {
            Some(&idx) => idx,
            None => {
                self.namespaces.push(LocresNamespace::new(name));
                self.index.insert(name.to_string(), self.namespaces.len() - 1);
                self.namespaces.len() - 1
            }
        };
        &mut self.namespaces[idx]
    }

    pub fn entry_count(&self) -> usize {
        self.namespaces.iter().map(LocresNamespace::len).sum()
    }

    /// Flatten into reconciler input: empty keys dropped, text line endings
    /// normalized.
    pub fn dictionary_entries(&self) -> Vec<DictionaryEntry> {
        let mut out = Vec::with_capacity(self.entry_count());
        for ns in &self.namespaces {
            for entry in ns.entries() {
                if entry.key.is_empty() {
                    continue;
                }
                out.push(DictionaryEntry {
                    namespace: ns.name.clone(),
                    key: entry.key.clone(),
                    text: normalize_line_endings(&entry.text),
                    source_hash: entry.source_hash,
                });
            }
        }
        out
    }
}
