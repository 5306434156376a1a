// SPDX-License-Identifier: PMPL-1.0-or-later

use super::{LocresError, LocresFile, LocresVersion, MAGIC};
use crate::fingerprint::fingerprint;
use std::collections::HashMap;

/// Deduplicated localized strings in first-use order.
#[derive(Default)]
struct StringTable {
    strings: Vec<(String, i32)>,
    index: HashMap<String, usize>,
}

impl StringTable {
    fn intern(&mut self, text: &str) -> Result<i32, LocresError> {
        let idx = match self.index.get(text) {
            Some(&idx) => idx,
            None => {
                self.strings.push((text.to_string(), 0));
                self.index.insert(text.to_string(), self.strings.len() - 1);
                self.strings.len() - 1
            }
        };
        self.strings[idx].1 += 1;
        to_i32("localized string", idx)
    }
}

fn to_u32(what: &'static str, count: usize) -> Result<u32, LocresError> {
    u32::try_from(count).map_err(|_| LocresError::TooLarge { what, count })
}

fn to_i32(what: &'static str, count: usize) -> Result<i32, LocresError> {
    i32::try_from(count).map_err(|_| LocresError::TooLarge { what, count })
}

fn put_u32(out: &mut Vec<u8>, value: u32) {
    out.extend_from_slice(&value.to_le_bytes());
}

fn put_i32(out: &mut Vec<u8>, value: i32) {
    out.extend_from_slice(&value.to_le_bytes());
}

/// ASCII goes out as single bytes; anything else as UTF-16LE.
fn put_fstring(out: &mut Vec<u8>, text: &str) -> Result<(), LocresError> {
    if text.is_empty() {
        put_i32(out, 0);
        return Ok(());
    }
    if text.is_ascii() {
        put_i32(out, to_i32("string byte", text.len() + 1)?);
        out.extend_from_slice(text.as_bytes());
        out.push(0);
    } else {
        let units: Vec<u16> = text.encode_utf16().collect();
        put_i32(out, -to_i32("string unit", units.len() + 1)?);
        for unit in units {
            out.extend_from_slice(&unit.to_le_bytes());
        }
        out.extend_from_slice(&[0, 0]);
    }
    Ok(())
}

pub(super) fn write(file: &LocresFile, version: LocresVersion) -> Result<Vec<u8>, LocresError> {
    if version == LocresVersion::OptimizedCityHash {
        return Err(LocresError::UnsupportedWriteVersion(version));
    }
    let compact = version >= LocresVersion::Compact;
    let optimized = version >= LocresVersion::OptimizedCrc32;

    let mut out = Vec::new();
    let mut offset_pos = None;
    if compact {
        out.extend_from_slice(&MAGIC);
        out.push(version.as_u8());
        offset_pos = Some(out.len());
        out.extend_from_slice(&(-1i64).to_le_bytes());
    }
    if optimized {
        put_u32(&mut out, to_u32("entry", file.entry_count())?);
    }

    let mut table = StringTable::default();
    put_u32(&mut out, to_u32("namespace", file.namespaces().len())?);
    for ns in file.namespaces() {
        if optimized {
            put_u32(&mut out, fingerprint(ns.name()));
        }
        put_fstring(&mut out, ns.name())?;
        put_u32(&mut out, to_u32("key", ns.len())?);
        for entry in ns.entries() {
            if optimized {
                put_u32(&mut out, fingerprint(&entry.key));
            }
            put_fstring(&mut out, &entry.key)?;
            put_u32(&mut out, entry.source_hash);
            if compact {
                let index = table.intern(&entry.text)?;
                put_i32(&mut out, index);
            } else {
                put_fstring(&mut out, &entry.text)?;
            }
        }
    }

    if let Some(pos) = offset_pos {
        let table_offset = out.len() as i64;
        out[pos..pos + 8].copy_from_slice(&table_offset.to_le_bytes());
        put_i32(&mut out, to_i32("localized string", table.strings.len())?);
        for (text, refs) in &table.strings {
            put_fstring(&mut out, text)?;
            if optimized {
                put_i32(&mut out, *refs);
            }
        }
    }

    Ok(out)
}
