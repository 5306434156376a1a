// SPDX-License-Identifier: PMPL-1.0-or-later

use super::{LocresError, LocresFile, LocresVersion, MAGIC};

/// Index value meaning "no string table".
const INDEX_NONE: i64 = -1;

struct Cursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    fn take(&mut self, len: usize) -> Result<&'a [u8], LocresError> {
        let remaining = self.data.len().saturating_sub(self.pos);
        if len > remaining {
            return Err(LocresError::Truncated {
                offset: self.pos,
                needed: len - remaining,
            });
        }
        let slice = &self.data[self.pos..self.pos + len];
        self.pos += len;
        Ok(slice)
    }

    fn array<const N: usize>(&mut self) -> Result<[u8; N], LocresError> {
        let mut buf = [0u8; N];
        buf.copy_from_slice(self.take(N)?);
        Ok(buf)
    }

    fn u8(&mut self) -> Result<u8, LocresError> {
        Ok(self.array::<1>()?[0])
    }

    fn u32(&mut self) -> Result<u32, LocresError> {
        Ok(u32::from_le_bytes(self.array()?))
    }

    fn i32(&mut self) -> Result<i32, LocresError> {
        Ok(i32::from_le_bytes(self.array()?))
    }

    fn i64(&mut self) -> Result<i64, LocresError> {
        Ok(i64::from_le_bytes(self.array()?))
    }

    fn fstring(&mut self) -> Result<String, LocresError> {
        let offset = self.pos;
        let length = self.i32()?;
        if length == 0 {
            return Ok(String::new());
        }
        if length > 0 {
            let bytes = self.take(length as usize)?;
            let bytes = bytes.strip_suffix(&[0u8]).unwrap_or(bytes);
            // positive length means one byte per character, Latin-1
            return Ok(bytes.iter().map(|&b| char::from(b)).collect());
        }
        let units = length
            .checked_neg()
            .and_then(|n| usize::try_from(n).ok())
            .ok_or(LocresError::BadLength { length, offset })?;
        let byte_len = units
            .checked_mul(2)
            .ok_or(LocresError::BadLength { length, offset })?;
        let bytes = self.take(byte_len)?;
        let decoded = encoding_rs::UTF_16LE
            .decode_without_bom_handling_and_without_replacement(bytes)
            .ok_or(LocresError::InvalidUtf16(offset))?;
        Ok(decoded.strip_suffix('\0').unwrap_or(&*decoded).to_string())
    }
}

pub(super) fn read(data: &[u8]) -> Result<LocresFile, LocresError> {
    let mut cur = Cursor::new(data);

    let version = if data.len() >= MAGIC.len() && data[..MAGIC.len()] == MAGIC {
        cur.pos = MAGIC.len();
        let raw = cur.u8()?;
        LocresVersion::from_u8(raw).ok_or(LocresError::UnsupportedVersion(raw))?
    } else {
        LocresVersion::Legacy
    };

    let mut strings: Vec<String> = Vec::new();
    if version >= LocresVersion::Compact {
        let offset = cur.i64()?;
        if offset != INDEX_NONE {
            let start = usize::try_from(offset)
                .ok()
                .filter(|&o| o <= data.len())
                .ok_or(LocresError::BadOffset(offset))?;
            let resume = cur.pos;
            cur.pos = start;
            let count_offset = cur.pos;
            let count = cur.i32()?;
            if count < 0 {
                return Err(LocresError::BadLength {
                    length: count,
                    offset: count_offset,
                });
            }
            for _ in 0..count {
                strings.push(cur.fstring()?);
                if version >= LocresVersion::OptimizedCrc32 {
                    // refcount, only meaningful to the engine's loader
                    cur.i32()?;
                }
            }
            cur.pos = resume;
        }
    }

    if version >= LocresVersion::OptimizedCrc32 {
        cur.u32()?;
    }

    let mut file = LocresFile::new();
    let namespace_count = cur.u32()?;
    for _ in 0..namespace_count {
        if version >= LocresVersion::OptimizedCrc32 {
            cur.u32()?;
        }
        let name = cur.fstring()?;
        let key_count = cur.u32()?;
        let namespace = file.namespace_mut(&name);
        for _ in 0..key_count {
            if version >= LocresVersion::OptimizedCrc32 {
                cur.u32()?;
            }
            let key = cur.fstring()?;
            let source_hash = cur.u32()?;
            let text = if version >= LocresVersion::Compact {
                let index = cur.i32()?;
                usize::try_from(index)
                    .ok()
                    .and_then(|i| strings.get(i))
                    .cloned()
                    .ok_or(LocresError::StringIndex {
                        index,
                        count: strings.len(),
                    })?
            } else {
                cur.fstring()?
            };
            namespace.add(key, text, source_hash);
        }
    }

    Ok(file)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fstring_ascii(out: &mut Vec<u8>, s: &str) {
        out.extend_from_slice(&((s.len() + 1) as i32).to_le_bytes());
        out.extend_from_slice(s.as_bytes());
        out.push(0);
    }

    fn fstring_utf16(out: &mut Vec<u8>, s: &str) {
        let units: Vec<u16> = s.encode_utf16().collect();
        out.extend_from_slice(&(-((units.len() + 1) as i32)).to_le_bytes());
        for unit in units {
            out.extend_from_slice(&unit.to_le_bytes());
        }
        out.extend_from_slice(&[0, 0]);
    }

    #[test]
    fn test_read_handwritten_legacy() {
        let mut data = Vec::new();
        data.extend_from_slice(&1u32.to_le_bytes());
        fstring_ascii(&mut data, "UI");
        data.extend_from_slice(&1u32.to_le_bytes());
        fstring_ascii(&mut data, "Hello");
        data.extend_from_slice(&0xABCDu32.to_le_bytes());
        fstring_utf16(&mut data, "你好");

        let file = read(&data).unwrap();
        let entry = file.namespace("UI").unwrap().get("Hello").unwrap();
        assert_eq!(entry.text, "你好");
        assert_eq!(entry.source_hash, 0xABCD);
    }

    #[test]
    fn test_read_handwritten_compact() {
        let mut data = MAGIC.to_vec();
        data.push(1);
        let offset_pos = data.len();
        data.extend_from_slice(&0i64.to_le_bytes());
        data.extend_from_slice(&1u32.to_le_bytes());
        data.extend_from_slice(&0i32.to_le_bytes()); // empty namespace name
        data.extend_from_slice(&2u32.to_le_bytes());
        fstring_ascii(&mut data, "a");
        data.extend_from_slice(&1u32.to_le_bytes());
        data.extend_from_slice(&0i32.to_le_bytes());
        fstring_ascii(&mut data, "b");
        data.extend_from_slice(&2u32.to_le_bytes());
        data.extend_from_slice(&0i32.to_le_bytes());
        let table = data.len() as i64;
        data[offset_pos..offset_pos + 8].copy_from_slice(&table.to_le_bytes());
        data.extend_from_slice(&1i32.to_le_bytes());
        fstring_ascii(&mut data, "shared");

        let file = read(&data).unwrap();
        let ns = file.namespace("").unwrap();
        assert_eq!(ns.len(), 2);
        assert!(ns.entries().iter().all(|e| e.text == "shared"));
    }

    #[test]
    fn test_unsupported_version() {
        let mut data = MAGIC.to_vec();
        data.push(9);
        assert!(matches!(read(&data), Err(LocresError::UnsupportedVersion(9))));
    }

    #[test]
    fn test_truncated_input() {
        let mut data = MAGIC.to_vec();
        data.push(2);
        data.extend_from_slice(&[0xFF; 3]);
        assert!(matches!(read(&data), Err(LocresError::Truncated { .. })));
    }

    #[test]
    fn test_string_index_out_of_range() {
        let mut data = MAGIC.to_vec();
        data.push(1);
        data.extend_from_slice(&(-1i64).to_le_bytes());
        data.extend_from_slice(&1u32.to_le_bytes());
        fstring_ascii(&mut data, "NS");
        data.extend_from_slice(&1u32.to_le_bytes());
        fstring_ascii(&mut data, "k");
        data.extend_from_slice(&0u32.to_le_bytes());
        data.extend_from_slice(&3i32.to_le_bytes());
        assert!(matches!(
            read(&data),
            Err(LocresError::StringIndex { index: 3, count: 0 })
        ));
    }

    #[test]
    fn test_latin1_bytes_decode() {
        let mut data = Vec::new();
        data.extend_from_slice(&((2) as i32).to_le_bytes());
        data.extend_from_slice(&[0xE9, 0]);
        let mut cur = Cursor::new(&data);
        assert_eq!(cur.fstring().unwrap(), "é");
    }

    #[test]
    fn test_empty_input_is_truncated_legacy() {
        assert!(matches!(read(&[]), Err(LocresError::Truncated { .. })));
    }
}
