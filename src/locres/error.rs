// SPDX-License-Identifier: PMPL-1.0-or-later

use super::LocresVersion;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LocresError {
    #[error("unexpected end of data at offset {offset} (needed {needed} more bytes)")]
    Truncated { offset: usize, needed: usize },

    #[error("unsupported locres version {0}")]
    UnsupportedVersion(u8),

    #[error("writing locres version {0:?} is not supported")]
    UnsupportedWriteVersion(LocresVersion),

    #[error("invalid string length {length} at offset {offset}")]
    BadLength { length: i32, offset: usize },

    #[error("invalid UTF-16 string at offset {0}")]
    InvalidUtf16(usize),

    #[error("string table offset {0} is outside the file")]
    BadOffset(i64),

    #[error("localized string index {index} out of range ({count} strings)")]
    StringIndex { index: i32, count: usize },

    #[error("{what} count {count} does not fit the format")]
    TooLarge { what: &'static str, count: usize },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
