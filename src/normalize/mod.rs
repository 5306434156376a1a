// SPDX-License-Identifier: PMPL-1.0-or-later

//! Text canonicalisation applied before anything is hashed or embedded.
//!
//! The dictionary stores text with `\r\n` line endings regardless of the
//! host platform, so every line-ending variant is rewritten to that form.
//! An optional second stage folds one script variant onto another (see
//! [`ScriptFold`]); it always runs after line endings are canonical.

mod fold;

pub use fold::ScriptFold;

/// Rewrite `\r\n`, bare `\r` and bare `\n` to `\r\n`.
pub fn normalize_line_endings(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + text.len() / 16);
    let mut chars = text.chars().peekable();
    while let Some(ch) = chars.next() {
        match ch {
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                out.push_str("\r\n");
            }
            '\n' => out.push_str("\r\n"),
            other => out.push(other),
        }
    }
    out
}

/// Absent text normalizes to the empty string.
pub fn normalize_optional(text: Option<&str>) -> String {
    text.map(normalize_line_endings).unwrap_or_default()
}
