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
use std::collections::HashMap;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

static INCLUDE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"#include\s+[<"]([^>"]+)[>"]"#).expect("valid include regex"));

/// Names referenced by `#include <...>` and `#include "..."` directives,
/// in textual order.
pub fn scan_includes(text: &str) -> impl Iterator<Item = &str> {
    INCLUDE_RE
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Canonical identity of an existing file, or the path itself when it
/// cannot be canonicalized.
pub fn canonical(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
}

/// Turn a user supplied path into a file identity. Relative paths are
/// taken relative to `project_root`.
pub fn resolve_path(project_root: &Path, raw: &Path) -> PathBuf {
    if raw.is_absolute() {
        canonical(raw)
    } else {
        canonical(&project_root.join(raw))
    }
}

/// Locates included files on disk.
///
/// Search order:
/// 1. relative to the directory of the including file
/// 2. anywhere under the project root
///
/// The project-root search is served by an index of every regular file,
/// built on first use. The index is walked depth first with directory
/// entries sorted by name, so among several candidates the first in that
/// order wins.
#[derive(Debug)]
pub struct IncludeSearch {
    root: PathBuf,
    index: Option<HashMap<OsString, Vec<PathBuf>>>,
}

impl IncludeSearch {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            index: None,
        }
    }

    /// Forget the file index; it is rebuilt on the next root search.
    pub fn reset(&mut self) {
        self.index = None;
    }

    pub fn find(&mut self, name: &str, including_file: &Path) -> Option<PathBuf> {
        let dir = including_file.parent().unwrap_or_else(|| Path::new("."));
        let relative = dir.join(name);
        if relative.is_file() {
            return Some(canonical(&relative));
        }

        self.find_under_root(Path::new(name))
    }

    fn find_under_root(&mut self, name: &Path) -> Option<PathBuf> {
        let file_name = name.file_name()?;
        let index = self.index.get_or_insert_with(|| build_index(&self.root));

        index
            .get(file_name)?
            .iter()
            .find(|candidate| candidate.ends_with(name))
            .map(|found| canonical(found))
    }
}

fn build_index(root: &Path) -> HashMap<OsString, Vec<PathBuf>> {
    let mut index: HashMap<OsString, Vec<PathBuf>> = HashMap::new();
    let mut count = 0usize;

    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                log::debug!("skipping unreadable entry under {}: {e}", root.display());
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        count += 1;
        index
            .entry(entry.file_name().to_os_string())
            .or_default()
            .push(entry.into_path());
    }

    log::debug!("indexed {count} files under {}", root.display());
    index
}
