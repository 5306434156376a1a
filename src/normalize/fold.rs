// SPDX-License-Identifier: PMPL-1.0-or-later

//! Character-level script folding (e.g. traditional -> simplified Chinese).
//!
//! Tables use the OpenCC character dictionary layout:
//!
//! ```text
//! 漢	汉
//! 著	着 著
//! ```
//!
//! Only single-character sources are used and the first candidate wins.
//! Phrase entries are ignored, so folding never changes string length in
//! characters.

use anyhow::{Context, Result};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScriptFold {
    map: HashMap<char, char>,
}

impl ScriptFold {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("reading script fold table {}", path.display()))?;
        Ok(Self::parse(&raw))
    }

    pub fn parse(raw: &str) -> Self {
        let mut map = HashMap::new();
        for line in raw.lines() {
            let line = line.trim_end_matches('\r');
            if line.trim().is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((from, to)) = line.split_once('\t') else {
                continue;
            };
            let (Some(src), Some(dst)) = (single_char(from), to.split_whitespace().next())
            else {
                continue;
            };
            if let Some(dst) = single_char(dst) {
                // first mapping for a character wins, matching OpenCC lookup order
                map.entry(src).or_insert(dst);
            }
        }
        Self { map }
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn apply(&self, text: &str) -> String {
        text.chars()
            .map(|ch| self.map.get(&ch).copied().unwrap_or(ch))
            .collect()
    }
}

fn single_char(value: &str) -> Option<char> {
    let mut chars = value.chars();
    match (chars.next(), chars.next()) {
        (Some(ch), None) => Some(ch),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_opencc_layout() {
        let fold = ScriptFold::parse("漢\t汉\n著\t着 著\n# comment\n\n臺灣\t台湾\n");
        assert_eq!(fold.len(), 2);
        assert_eq!(fold.apply("漢字著作"), "汉字着作");
    }

    #[test]
    fn test_first_mapping_wins() {
        let fold = ScriptFold::parse("後\t后\n後\t後\n");
        assert_eq!(fold.apply("後"), "后");
    }

    #[test]
    fn test_untouched_without_mapping() {
        let fold = ScriptFold::default();
        assert!(fold.is_empty());
        assert_eq!(fold.apply("a\r\nb"), "a\r\nb");
    }
}
