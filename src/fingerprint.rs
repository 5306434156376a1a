// SPDX-License-Identifier: PMPL-1.0-or-later

//! Source-text fingerprints used to detect whether a string changed.
//!
//! The fingerprint is CRC-32 (ISO-HDLC) over the UTF-32LE encoding of the
//! text, which is how the dictionary format hashes its own strings. It is
//! a change detector only; collisions are possible and acceptable.

use crate::normalize::{normalize_line_endings, ScriptFold};

/// CRC-32 of `text` encoded as four little-endian bytes per character.
pub fn fingerprint(text: &str) -> u32 {
    let mut hasher = crc32fast::Hasher::new();
    let mut buf = Vec::with_capacity(text.len() * 4);
    for ch in text.chars() {
        buf.extend_from_slice(&(ch as u32).to_le_bytes());
    }
    hasher.update(&buf);
    hasher.finalize()
}

/// The single hash policy shared by import and build.
///
/// Both directions must derive source hashes identically, so the policy is
/// one value constructed from settings and handed to the reconciler and
/// the compiler alike.
#[derive(Debug, Clone, Default)]
pub struct SourceHasher {
    fold: Option<ScriptFold>,
}

impl SourceHasher {
    /// Hash line-ending-normalized text as-is.
    pub fn raw() -> Self {
        Self { fold: None }
    }

    /// Fold script variants after line-ending normalization.
    pub fn with_fold(fold: ScriptFold) -> Self {
        Self { fold: Some(fold) }
    }

    pub fn folds_script(&self) -> bool {
        self.fold.is_some()
    }

    /// The exact text that gets hashed for `source`.
    pub fn canonical(&self, source: &str) -> String {
        let normalized = normalize_line_endings(source);
        match &self.fold {
            Some(fold) => fold.apply(&normalized),
            None => normalized,
        }
    }

    pub fn source_hash(&self, source: &str) -> u32 {
        fingerprint(&self.canonical(source))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_vectors() {
        assert_eq!(fingerprint(""), 0);
        assert_eq!(fingerprint("Hello"), 0x2DB7_CE90);
        assert_eq!(fingerprint("A"), 0x02EC_E044);
        assert_eq!(fingerprint(" 你好"), 0xFB74_D5C2);
    }

    #[test]
    fn test_matches_crc_of_utf32le_bytes() {
        let text = "Start Game";
        let bytes: Vec<u8> = text
            .chars()
            .flat_map(|c| (c as u32).to_le_bytes())
            .collect();
        assert_eq!(fingerprint(text), crc32fast::hash(&bytes));
        assert_eq!(fingerprint(text), 0xAFC8_75BE);
    }

    #[test]
    fn test_source_hash_normalizes_line_endings() {
        let hasher = SourceHasher::raw();
        let expected = 0xE5D2_75ED;
        assert_eq!(hasher.source_hash("a\nb"), expected);
        assert_eq!(hasher.source_hash("a\r\nb"), expected);
        assert_eq!(hasher.source_hash("a\rb"), expected);
    }

    #[test]
    fn test_fold_runs_after_line_endings() {
        let hasher = SourceHasher::with_fold(ScriptFold::parse("漢\t汉\n"));
        assert!(hasher.folds_script());
        assert_eq!(hasher.canonical("漢\n"), "汉\r\n");
        assert_eq!(hasher.source_hash("漢"), fingerprint("汉"));
        assert_ne!(SourceHasher::raw().source_hash("漢"), fingerprint("汉"));
    }

    #[test]
    fn test_distinct_fixtures_differ() {
        let samples = ["Hello", "Hello!", "hello", "Bonjour", "A", "B"];
        for (i, a) in samples.iter().enumerate() {
            for b in &samples[i + 1..] {
                assert_ne!(fingerprint(a), fingerprint(b), "{a:?} vs {b:?}");
            }
        }
    }
}
