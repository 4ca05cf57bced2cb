//
// Copyright (c) 2025-2026 Jeff Garzik
//
// This file is part of the posixutils-rs project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//

use crate::table::ConstantTable;
use crate::token::{tokenize, Token};

/// Outcome of resolving one definition's expression.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    pub value: String,
    /// References, as written, that had no entry in the table.
    pub unresolved: Vec<String>,
}

impl Resolution {
    pub fn is_complete(&self) -> bool {
        self.unresolved.is_empty()
    }
}

/// Strip any namespace qualifier: `a::b::NAME` -> `NAME`.
pub fn bare_name(qualified: &str) -> &str {
    match qualified.rfind("::") {
        Some(pos) => &qualified[pos + 2..],
        None => qualified,
    }
}

/// Concatenate `tokens` in order, substituting constant references with
/// their values from `table`. Unknown references contribute nothing and
/// are reported in [`Resolution::unresolved`].
pub fn resolve_tokens<'t, I>(tokens: I, table: &ConstantTable) -> Resolution
where
    I: IntoIterator<Item = &'t Token>,
{
    let mut res = Resolution::default();

    for token in tokens {
        match token {
            Token::Literal(text) => res.value.push_str(text),
            Token::ConstantRef(name) => match table.get(bare_name(name.trim())) {
                Some(value) => res.value.push_str(value),
                None => res.unresolved.push(name.clone()),
            },
        }
    }

    res
}

/// Tokenize and resolve a raw expression.
pub fn resolve_expression(expr: &str, table: &ConstantTable) -> Resolution {
    let tokens = tokenize(expr.trim());
    log::trace!("tokens for {expr:?}: {tokens:?}");
    resolve_tokens(&tokens, table)
}
