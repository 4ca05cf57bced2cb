//
// Copyright (c) 2025-2026 Jeff Garzik
//
// This file is part of the posixutils-rs project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//
// Table of resolved string constants.
//
// Layout:
// - HashMap for lookup (name -> slot)
// - Vec for ordered storage (slot -> entry)
//

use std::collections::HashMap;

/// Mapping from bare constant name to its fully resolved value.
///
/// Entries are never removed. Inserting an existing name replaces its
/// value but keeps the position of the first insertion, so iteration
/// follows the order in which names were first defined.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConstantTable {
    lookup: HashMap<String, usize>,
    entries: Vec<(String, String)>,
}

impl ConstantTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite `name`. Returns the previous value, if any.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) -> Option<String> {
        let name = name.into();
        let value = value.into();
        match self.lookup.get(&name) {
            Some(&slot) => Some(std::mem::replace(&mut self.entries[slot].1, value)),
            None => {
                self.lookup.insert(name.clone(), self.entries.len());
                self.entries.push((name, value));
                None
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.lookup
            .get(name)
            .map(|&slot| self.entries[slot].1.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.lookup.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.lookup.clear();
        self.entries.clear();
    }

    /// Entries in first-definition order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Entries ordered by name.
    pub fn sorted(&self) -> Vec<(&str, &str)> {
        let mut entries: Vec<_> = self.iter().collect();
        entries.sort_unstable_by(|a, b| a.0.cmp(b.0));
        entries
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ConstantTable {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut table = ConstantTable::new();
        for (k, v) in iter {
            table.insert(k, v);
        }
        table
    }
}
