//
// Copyright (c) 2025-2026 Jeff Garzik
//
// This file is part of the posixutils-rs project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//

use std::io::Write;
use std::path::PathBuf;

use error::{Error, Result};
use rewrite::{escape_literal, OutputKind};
use walk::{ConstantResolver, ResolveOptions};

pub mod error;
pub mod extract;
pub mod include;
pub mod resolve;
pub mod rewrite;
pub mod table;
pub mod token;
pub mod walk;

/// strconst - resolve C++ string constants and write expanded copies of a header
#[derive(Debug, clap::Parser, Clone)]
#[command(version, about)]
pub struct Args {
    /// Also write `<name>_macro<ext>`, with every constant turned into a #define.
    #[arg(short = 'm', long = "macro")]
    pub generate_macro: bool,

    /// Maximum line length of generated #define lines before they are split.
    #[arg(short = 'l', long, default_value_t = rewrite::DEFAULT_MAX_LINE_LENGTH)]
    pub max_line_length: usize,

    /// Ignore // and /* */ comments when looking for includes and definitions.
    #[arg(short = 'c', long)]
    pub strip_comments: bool,

    /// Root directory of the C++ project; includes are searched under it.
    pub project_root: PathBuf,

    /// Header to process, absolute or relative to the project root.
    pub header: PathBuf,
}

impl Args {
    pub fn new(project_root: impl Into<PathBuf>, header: impl Into<PathBuf>) -> Self {
        Self {
            generate_macro: false,
            max_line_length: rewrite::DEFAULT_MAX_LINE_LENGTH,
            strip_comments: false,
            project_root: project_root.into(),
            header: header.into(),
        }
    }
}

/// Resolve the constants of `args.header`, report them on `stdout` and
/// write the derived headers next to it.
pub fn run<W: Write>(stdout: &mut W, args: Args) -> Result<()> {
    if !args.project_root.exists() {
        return Err(Error::ProjectRoot(args.project_root));
    }

    let options = ResolveOptions {
        strip_comments: args.strip_comments,
    };
    let mut resolver = ConstantResolver::with_options(&args.project_root, options);
    let constants = resolver.parse_file(&args.header);

    let all = resolver.constants();
    writeln!(stdout, "{} constants resolved", all.len())?;
    for (name, value) in all.sorted() {
        writeln!(stdout, "{name} = \"{}\"", escape_literal(value))?;
    }

    let original = resolver.resolve_path(&args.header);
    if constants.is_empty() {
        writeln!(
            stdout,
            "no constants found in {}; no backup written",
            original.display()
        )?;
        return Ok(());
    }

    let mut kinds = vec![OutputKind::Backup];
    if args.generate_macro {
        kinds.push(OutputKind::Macro);
    }
    for kind in kinds {
        let path = rewrite::generate(kind, &original, &constants, args.max_line_length)?;
        let label = match kind {
            OutputKind::Backup => "backup",
            OutputKind::Macro => "macro",
        };
        writeln!(stdout, "{label} written to {}", path.display())?;
    }

    Ok(())
}
