//
// Copyright (c) 2025-2026 Jeff Garzik
//
// This file is part of the posixutils-rs project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//
// Expression tokenizer for string constant definitions.
// Splits the right-hand side of `const std::string NAME = ...;` into
// literal fragments and constant references.
//

// ============================================================================
// Token
// ============================================================================

/// A fragment of a definition's right-hand side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// Decoded contents of a quoted or raw string literal.
    Literal(String),
    /// Name of another constant, possibly namespace-qualified (`ns::NAME`).
    ConstantRef(String),
}

// ============================================================================
// Tokenizer
// ============================================================================

const RAW_PREFIX: &str = "R\"";

/// Single pass, left-to-right scanner over an expression.
///
/// Concatenation operators and whitespace are consumed without producing
/// tokens. Malformed input never fails: an unterminated literal runs to
/// the end of the input.
pub struct Tokenizer<'a> {
    input: &'a str,
    offset: usize,
}

impl<'a> Tokenizer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self { input, offset: 0 }
    }

    fn rest(&self) -> &'a str {
        let input: &'a str = self.input;
        &input[self.offset..]
    }

    fn peekchar(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn nextchar(&mut self) -> Option<char> {
        let c = self.peekchar()?;
        self.offset += c.len_utf8();
        Some(c)
    }

    fn skip_whitespace(&mut self) {
        while self.peekchar().is_some_and(char::is_whitespace) {
            self.nextchar();
        }
    }

    /// Quoted literal; the opening quote has already been consumed.
    fn get_string(&mut self) -> Token {
        let mut content = String::new();

        while let Some(c) = self.nextchar() {
            match c {
                '"' => return Token::Literal(content),
                '\\' => match self.nextchar() {
                    Some(escaped) => content.push(unescape_char(escaped)),
                    // Trailing backslash at end of input is kept as-is
                    None => content.push('\\'),
                },
                _ => content.push(c),
            }
        }

        log::debug!("unterminated string literal: {content:?}");
        Token::Literal(content)
    }

    /// Raw literal `R"delim(...)delim"`; the `R"` prefix has already been
    /// consumed.
    fn get_raw_string(&mut self) -> Token {
        let rest = self.rest();
        let Some(open) = rest.find('(') else {
            log::debug!("raw string literal without opening parenthesis");
            self.offset = self.input.len();
            return Token::Literal(String::new());
        };

        let delimiter = &rest[..open];
        let body = &rest[open + 1..];
        let end_marker = format!("){delimiter}\"");

        match body.find(&end_marker) {
            Some(end) => {
                self.offset += open + 1 + end + end_marker.len();
                Token::Literal(body[..end].to_string())
            }
            None => {
                log::debug!("unterminated raw string literal, delimiter {delimiter:?}");
                self.offset = self.input.len();
                Token::Literal(body.to_string())
            }
        }
    }

    /// Identifier, including `::` qualifiers; the first character has
    /// already been consumed.
    fn get_identifier(&mut self, first: char) -> Token {
        let start = self.offset - first.len_utf8();
        while self.peekchar().is_some_and(is_identifier_char) {
            self.nextchar();
        }
        Token::ConstantRef(self.input[start..self.offset].to_string())
    }

    pub fn tokenize(self) -> Vec<Token> {
        self.collect()
    }
}

impl Iterator for Tokenizer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        loop {
            self.skip_whitespace();

            if self.rest().starts_with(RAW_PREFIX) {
                self.offset += RAW_PREFIX.len();
                return Some(self.get_raw_string());
            }

            let c = self.nextchar()?;
            match c {
                '"' => return Some(self.get_string()),
                '+' => continue,
                c if c.is_alphabetic() || c == '_' => return Some(self.get_identifier(c)),
                _ => {
                    log::trace!("skipping unexpected character {c:?} in expression");
                    continue;
                }
            }
        }
    }
}

#[inline]
fn is_identifier_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == ':'
}

/// Map the character following a backslash to the character it denotes.
/// Unknown escapes denote the character itself.
pub fn unescape_char(c: char) -> char {
    match c {
        'n' => '\n',
        't' => '\t',
        'r' => '\r',
        '0' => '\0',
        other => other,
    }
}

/// Convenience wrapper: tokenize a whole expression.
pub fn tokenize(expr: &str) -> Vec<Token> {
    Tokenizer::new(expr).tokenize()
}

// ============================================================================
// Tests
// ============================================================================
