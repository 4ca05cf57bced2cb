//
// Copyright (c) 2025-2026 Jeff Garzik
//
// This file is part of the posixutils-rs project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//

use once_cell::sync::Lazy;
use regex::Regex;
use std::borrow::Cow;
use std::ops::Range;

/// Declaration up to and including `=`: qualifiers, type and name.
const DECL_PREFIX: &str = r"(?:(?:inline|static)\s+)*const\s+std::string\s+";
/// Expression and terminator. The expression may span lines.
const DECL_VALUE: &str = r"\s*=\s*([^;]+);";

static DEFINITION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"{DECL_PREFIX}(\w+){DECL_VALUE}")).expect("valid definition regex")
});

/// One `const std::string NAME = <expr>;` statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Definition<'a> {
    pub name: &'a str,
    /// Right-hand side, trimmed.
    pub expr: &'a str,
    /// Byte range of the whole statement in the scanned text.
    pub span: Range<usize>,
}

/// Every definition statement in `text`, in textual order.
pub fn definitions(text: &str) -> impl Iterator<Item = Definition<'_>> {
    DEFINITION_RE.captures_iter(text).filter_map(|caps| {
        let whole = caps.get(0)?;
        Some(Definition {
            name: caps.get(1)?.as_str(),
            expr: caps.get(2)?.as_str().trim(),
            span: whole.range(),
        })
    })
}

/// Regex matching the definition of one specific constant.
///
/// Groups: 1 = declaration prefix through `=`, 2 = expression, 3 = `;`.
pub fn definition_regex(name: &str) -> Regex {
    let pattern = format!(
        r"({DECL_PREFIX}{}\s*=\s*)([^;]+)(;)",
        regex::escape(name)
    );
    Regex::new(&pattern).expect("escaped name yields a valid regex")
}

/// Remove `//` and `/* */` comments, leaving string, character and raw
/// string literals untouched. Block comments become a single space and
/// line comments keep their terminating newline.
pub fn strip_comments(text: &str) -> Cow<'_, str> {
    if !text.contains("//") && !text.contains("/*") {
        return Cow::Borrowed(text);
    }

    let bytes = text.as_bytes();
    let mut out = String::with_capacity(text.len());
    let mut copied = 0;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'"' | b'\'' => {
                if bytes[i] == b'"' && starts_raw_string(bytes, i) {
                    i = skip_raw_string(text, i + 1);
                } else {
                    i = skip_quoted(bytes, i);
                }
            }
            b'/' if bytes.get(i + 1) == Some(&b'/') => {
                out.push_str(&text[copied..i]);
                i = text[i..].find('\n').map_or(bytes.len(), |n| i + n);
                copied = i;
            }
            b'/' if bytes.get(i + 1) == Some(&b'*') => {
                out.push_str(&text[copied..i]);
                out.push(' ');
                i = text[i + 2..].find("*/").map_or(bytes.len(), |n| i + 2 + n + 2);
                copied = i;
            }
            _ => i += 1,
        }
    }
    out.push_str(&text[copied..]);

    Cow::Owned(out)
}

/// Encoding prefixes allowed in front of a raw literal's `R`.
const RAW_PREFIXES: [&[u8]; 5] = [b"u8", b"u", b"U", b"L", b""];

/// `"` at `quote` is preceded by an `R`, optionally with an encoding
/// prefix (`u8`, `u`, `U`, `L`), that is not the tail of a longer
/// identifier.
fn starts_raw_string(bytes: &[u8], quote: usize) -> bool {
    if quote == 0 || bytes[quote - 1] != b'R' {
        return false;
    }
    let before = &bytes[..quote - 1];
    RAW_PREFIXES.iter().any(|prefix| {
        before.strip_suffix(*prefix).is_some_and(|rest| {
            rest.last()
                .map_or(true, |&c| !(c.is_ascii_alphanumeric() || c == b'_'))
        })
    })
}

/// Skip a quoted literal starting at `start`; returns the offset just
/// past the closing quote, or the end of input.
fn skip_quoted(bytes: &[u8], start: usize) -> usize {
    let delim = bytes[start];
    let mut i = start + 1;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'\n' => return i,
            c if c == delim => return i + 1,
            _ => i += 1,
        }
    }
    bytes.len()
}

/// Skip the body of a raw string whose `(delim` starts at `body`.
fn skip_raw_string(text: &str, body: usize) -> usize {
    let rest = &text[body..];
    let Some(open) = rest.find('(') else {
        return text.len();
    };
    let end_marker = format!("){}\"", &rest[..open]);
    rest[open..]
        .find(&end_marker)
        .map_or(text.len(), |end| body + open + end + end_marker.len())
}
