//
// Copyright (c) 2025-2026 Jeff Garzik
//
// This file is part of the posixutils-rs project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//
// Include-graph walk and definition extraction.
//

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::extract::{definitions, strip_comments};
use crate::include::{resolve_path, scan_includes, IncludeSearch};
use crate::resolve::resolve_expression;
use crate::table::ConstantTable;

/// Read a file as text. Invalid UTF-8 is replaced rather than rejected.
pub fn read_source(path: &Path) -> std::io::Result<String> {
    let bytes = fs::read(path)?;
    Ok(match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
    })
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ResolveOptions {
    /// Ignore `//` and `/* */` comments when looking for includes and
    /// definitions.
    pub strip_comments: bool,
}

/// Counters for one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WalkStats {
    pub files: usize,
    pub definitions: usize,
    pub unresolved: usize,
}

/// A file whose includes are still being walked.
struct Frame {
    path: PathBuf,
    text: String,
    pending: std::vec::IntoIter<PathBuf>,
}

/// Resolves string constants of a header and everything it includes.
///
/// All state (constant table, visited files, root file index) belongs to
/// this value and is reset by each [`ConstantResolver::parse_file`] call.
#[derive(Debug)]
pub struct ConstantResolver {
    project_root: PathBuf,
    options: ResolveOptions,
    table: ConstantTable,
    visited: HashSet<PathBuf>,
    search: IncludeSearch,
    stats: WalkStats,
}

impl ConstantResolver {
    pub fn new(project_root: impl AsRef<Path>) -> Self {
        Self::with_options(project_root, ResolveOptions::default())
    }

    pub fn with_options(project_root: impl AsRef<Path>, options: ResolveOptions) -> Self {
        let project_root = crate::include::canonical(project_root.as_ref());
        Self {
            search: IncludeSearch::new(project_root.clone()),
            project_root,
            options,
            table: ConstantTable::new(),
            visited: HashSet::new(),
            stats: WalkStats::default(),
        }
    }

    /// File identity for a path given relative to the project root.
    pub fn resolve_path(&self, raw: impl AsRef<Path>) -> PathBuf {
        resolve_path(&self.project_root, raw.as_ref())
    }

    /// Every constant seen during the last run, including those of
    /// included files.
    pub fn constants(&self) -> &ConstantTable {
        &self.table
    }

    pub fn stats(&self) -> WalkStats {
        self.stats
    }

    /// Files walked during the last run.
    pub fn visited(&self) -> impl Iterator<Item = &Path> {
        self.visited.iter().map(PathBuf::as_path)
    }

    /// Resolve the constants defined in `header`.
    ///
    /// Included files are processed first, so references to their
    /// constants resolve. Returns only the constants defined in `header`
    /// itself; the full table is available from [`Self::constants`].
    pub fn parse_file(&mut self, header: impl AsRef<Path>) -> ConstantTable {
        self.table.clear();
        self.visited.clear();
        self.search.reset();
        self.stats = WalkStats::default();

        let path = self.resolve_path(header);
        if !path.exists() {
            log::error!("file does not exist: {}", path.display());
            return ConstantTable::new();
        }
        log::info!("parsing {}", path.display());

        let mut result = ConstantTable::new();
        let mut stack: Vec<Frame> = self.enter(path).into_iter().collect();

        while let Some(frame) = stack.last_mut() {
            if let Some(include) = frame.pending.next() {
                if let Some(child) = self.enter(include) {
                    stack.push(child);
                }
                continue;
            }

            let Some(frame) = stack.pop() else { break };
            let defined = self.extract(&frame.path, &frame.text);
            if stack.is_empty() {
                result = defined;
            }
        }

        log::info!(
            "walked {} files, {} definitions, {} unresolved references",
            self.stats.files,
            self.stats.definitions,
            self.stats.unresolved
        );
        result
    }

    /// Start walking `path` unless it was already visited or cannot be read.
    fn enter(&mut self, path: PathBuf) -> Option<Frame> {
        if !self.visited.insert(path.clone()) {
            log::trace!("already visited {}", path.display());
            return None;
        }

        let text = match read_source(&path) {
            Ok(text) => text,
            Err(e) => {
                log::warn!("cannot read {}: {e}", path.display());
                return None;
            }
        };
        let text = if self.options.strip_comments {
            strip_comments(&text).into_owned()
        } else {
            text
        };
        self.stats.files += 1;

        let mut includes = Vec::new();
        for name in scan_includes(&text) {
            match self.search.find(name, &path) {
                Some(found) => {
                    log::debug!("{}: include {name} -> {}", path.display(), found.display());
                    includes.push(found);
                }
                None => log::debug!("{}: include {name} not found", path.display()),
            }
        }

        Some(Frame {
            path,
            text,
            pending: includes.into_iter(),
        })
    }

    /// Resolve every definition in `text` into the shared table. Returns
    /// this file's own definitions.
    fn extract(&mut self, path: &Path, text: &str) -> ConstantTable {
        let mut defined = ConstantTable::new();

        for def in definitions(text) {
            let res = resolve_expression(def.expr, &self.table);
            for name in &res.unresolved {
                log::warn!(
                    "{}: {}: no definition for constant '{name}'",
                    path.display(),
                    def.name
                );
            }
            log::debug!("{} = {:?}", def.name, res.value);

            self.stats.definitions += 1;
            self.stats.unresolved += res.unresolved.len();
            self.table.insert(def.name, res.value.clone());
            defined.insert(def.name, res.value);
        }

        defined
    }
}
