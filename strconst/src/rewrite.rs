//
// Copyright (c) 2025-2026 Jeff Garzik
//
// This file is part of the posixutils-rs project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//
// Rewriters producing the derived headers:
// - backup: every definition's value replaced by one literal
// - macro: every definition replaced by a #define
//

use std::fs;
use std::path::{Path, PathBuf};

use regex::Captures;

use crate::error::{Error, Result};
use crate::extract::definition_regex;
use crate::table::ConstantTable;
use crate::token::unescape_char;
use crate::walk::read_source;

pub const DEFAULT_MAX_LINE_LENGTH: usize = 12000;

const CONTINUATION_INDENT: &str = "    ";
/// Characters after which a long macro value may be split.
const BREAK_CHARS: &[char] = &[' ', ',', '(', ')', '{', '}', ';'];
/// How far back from the line limit to look for a break character.
const BREAK_LOOKBACK: usize = 20;

/// Which derived file to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputKind {
    Backup,
    Macro,
}

impl OutputKind {
    fn tag(self) -> &'static str {
        match self {
            OutputKind::Backup => "bak",
            OutputKind::Macro => "macro",
        }
    }

    /// `dir/name.h` -> `dir/name_bak.h` or `dir/name_macro.h`
    pub fn output_path(self, original: &Path) -> PathBuf {
        let stem = original
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let file_name = match original.extension() {
            Some(ext) => format!("{stem}_{}.{}", self.tag(), ext.to_string_lossy()),
            None => format!("{stem}_{}", self.tag()),
        };
        original.with_file_name(file_name)
    }
}

/// Escape a value for use inside a C++ string literal.
///
/// A NUL followed by an octal digit ends the literal and opens a new one
/// (`\0""7`) so the digit is not read as part of an octal escape.
pub fn escape_literal(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            '\0' => {
                out.push_str("\\0");
                if chars.peek().is_some_and(|next| ('0'..='7').contains(next)) {
                    out.push_str("\"\"");
                }
            }
            _ => out.push(c),
        }
    }
    out
}

/// Inverse of [`escape_literal`], using the tokenizer's escape rules.
pub fn unescape_literal(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => {}
            // Unescaped quotes only appear where a literal was split
            '"' => continue,
            _ => {
                out.push(c);
                continue;
            }
        }
        match chars.next() {
            Some(escaped) => out.push(unescape_char(escaped)),
            None => out.push('\\'),
        }
    }
    out
}

/// Replace the value of every definition of each constant in `constants`
/// with its resolved literal. Declarations are kept as written.
pub fn rewrite_backup(content: &str, constants: &ConstantTable) -> String {
    let mut text = content.to_string();
    for (name, value) in constants.iter() {
        let escaped = escape_literal(value);
        text = definition_regex(name)
            .replace_all(&text, |caps: &Captures| {
                format!("{}\"{escaped}\"{}", &caps[1], &caps[3])
            })
            .into_owned();
    }
    text
}

/// Replace every definition of each constant in `constants` with a
/// `#define`, split over continuation lines when longer than
/// `max_line_length`.
pub fn rewrite_macro(content: &str, constants: &ConstantTable, max_line_length: usize) -> String {
    let mut text = content.to_string();
    for (name, value) in constants.iter() {
        let define = macro_definition(name, value, max_line_length);
        text = definition_regex(name)
            .replace_all(&text, regex::NoExpand(&define))
            .into_owned();
    }
    text
}

/// `#define NAME "value"`, possibly as several adjacent literals joined
/// by line continuations.
pub fn macro_definition(name: &str, value: &str, max_line_length: usize) -> String {
    let escaped = escape_literal(value);
    let prefix = format!("#define {name} \"");
    let prefix_len = prefix.chars().count();

    if escaped.is_empty() || prefix_len + escaped.chars().count() + 1 <= max_line_length {
        return format!("{prefix}{escaped}\"");
    }

    // Room for the quotes, a space and the backslash
    let first_max = max_line_length.saturating_sub(prefix_len + 3).max(1);
    let cont_max = max_line_length
        .saturating_sub(CONTINUATION_INDENT.len() + 4)
        .max(1);

    let mut chunks = Vec::new();
    let mut remaining = escaped.as_str();
    while !remaining.is_empty() {
        let budget = if chunks.is_empty() { first_max } else { cont_max };
        let cut = split_point(remaining, budget);
        chunks.push(&remaining[..cut]);
        remaining = &remaining[cut..];
    }

    log::debug!("{name}: macro split into {} lines", chunks.len());

    let last = chunks.len() - 1;
    let mut lines = Vec::with_capacity(chunks.len());
    for (i, chunk) in chunks.iter().enumerate() {
        let lead = if i == 0 { prefix.as_str() } else { "" };
        let line = match (i, i == last) {
            (0, true) => format!("{lead}{chunk}\""),
            (0, false) => format!("{lead}{chunk}\" \\"),
            (_, true) => format!("{CONTINUATION_INDENT}\"{chunk}\""),
            (_, false) => format!("{CONTINUATION_INDENT}\"{chunk}\" \\"),
        };
        lines.push(line);
    }
    lines.join("\n")
}

/// Byte offset at which to end the next chunk of `text`, at most
/// `budget` characters in. Prefers the position just after the last
/// break character near the limit, and never separates a backslash from
/// the character it escapes.
fn split_point(text: &str, budget: usize) -> usize {
    let head: Vec<char> = text.chars().take(budget + 1).collect();
    if head.len() <= budget {
        return text.len();
    }

    let lowest = budget.saturating_sub(BREAK_LOOKBACK - 1).max(1);
    let mut cut = (lowest..budget)
        .rev()
        .find(|&j| BREAK_CHARS.contains(&head[j]))
        .map_or(budget, |j| j + 1);

    let backslashes = head[..cut].iter().rev().take_while(|&&c| c == '\\').count();
    if backslashes % 2 == 1 {
        cut = if cut > 1 { cut - 1 } else { cut + 1 };
    }
    // Keep the two quotes of a literal split together
    if head[cut - 1] == '"' && head.get(cut) == Some(&'"') {
        cut = if cut > 1 { cut - 1 } else { cut + 1 };
    }

    text.char_indices().nth(cut).map_or(text.len(), |(i, _)| i)
}

fn write_output(path: &Path, text: &str) -> Result<()> {
    fs::write(path, text).map_err(|source| Error::Write {
        path: path.to_path_buf(),
        source,
    })
}

/// Produce `kind`'s derived file next to `original`. Returns its path.
pub fn generate(
    kind: OutputKind,
    original: &Path,
    constants: &ConstantTable,
    max_line_length: usize,
) -> Result<PathBuf> {
    let content = read_source(original)?;
    let text = match kind {
        OutputKind::Backup => rewrite_backup(&content, constants),
        OutputKind::Macro => rewrite_macro(&content, constants, max_line_length),
    };

    let path = kind.output_path(original);
    write_output(&path, &text)?;
    log::info!("wrote {}", path.display());
    Ok(path)
}
