//
// Copyright (c) 2025-2026 Jeff Garzik
//
// This file is part of the posixutils-rs project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//

use std::fs;
use std::path::Path;
use strconst::error::Error;
use strconst::rewrite::unescape_literal;
use strconst::walk::ConstantResolver;
use strconst::{run, Args};
use tempfile::TempDir;

fn write(root: &Path, rel: &str, text: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, text).unwrap();
}

fn run_to_string(args: Args) -> (String, Result<(), Error>) {
    let mut out = Vec::new();
    let result = run(&mut out, args);
    (String::from_utf8(out).unwrap(), result)
}

#[test]
fn test_run_reports_sorted_table() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "inc/base.h", "const std::string kZ = \"z\";\nconst std::string kA = \"a\\tb\";\n");
    write(
        dir.path(),
        "top.h",
        "#include <inc/base.h>\nconst std::string kM = kA + kZ;\n",
    );

    let (out, result) = run_to_string(Args::new(dir.path(), "top.h"));
    assert!(result.is_ok());
    let lines: Vec<_> = out.lines().collect();
    assert_eq!(lines[0], "3 constants resolved");
    assert_eq!(lines[1], "kA = \"a\\tb\"");
    assert_eq!(lines[2], "kM = \"a\\tbz\"");
    assert_eq!(lines[3], "kZ = \"z\"");
    assert!(lines[4].starts_with("backup written to "));
    assert!(dir.path().join("top_bak.h").exists());
}

#[test]
fn test_run_missing_root() {
    let dir = TempDir::new().unwrap();
    let (out, result) = run_to_string(Args::new(dir.path().join("gone"), "x.h"));
    assert!(out.is_empty());
    assert!(matches!(result, Err(Error::ProjectRoot(_))));
}

#[test]
fn test_run_with_macro_and_comments() {
    let dir = TempDir::new().unwrap();
    write(
        dir.path(),
        "sqls.h",
        "// const std::string kDead = \"dead\";\n\
         static const std::string kCreate = R\"sql(CREATE TABLE t (\n  id INT\n))sql\";\n",
    );

    let mut args = Args::new(dir.path(), "sqls.h");
    args.generate_macro = true;
    args.strip_comments = true;
    let (out, result) = run_to_string(args);
    assert!(result.is_ok());
    assert!(out.starts_with("1 constants resolved\n"));
    assert!(!out.contains("kDead"));

    let text = fs::read_to_string(dir.path().join("sqls_macro.h")).unwrap();
    assert!(text.contains("#define kCreate \"CREATE TABLE t (\\n  id INT\\n)\"\n"));
    // Comments are only ignored while resolving; output keeps the source as is
    assert!(text.starts_with("// const std::string kDead"));
}

/// Resolving the backup file reproduces the values resolved from the
/// original header.
#[test]
fn test_backup_round_trip() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "a/names.h", "namespace ns { const std::string kTable = \"tab\\\\le\"; }\n");
    write(
        dir.path(),
        "b/query.h",
        "#include \"names.h\"\n\
         const std::string kQuery = \"SELECT \\\"x\\\"\\n FROM \" + ns::kTable;\n\
         const std::string kCopy = kQuery;\n",
    );

    let mut resolver = ConstantResolver::new(dir.path());
    let original = resolver.parse_file("b/query.h");
    assert_eq!(original.get("kQuery"), Some("SELECT \"x\"\n FROM tab\\le"));
    assert_eq!(original.get("kCopy"), original.get("kQuery"));

    let (_, result) = run_to_string(Args::new(dir.path(), "b/query.h"));
    assert!(result.is_ok());

    let backup = resolver.parse_file("b/query_bak.h");
    assert_eq!(backup, original);

    // Every value in the backup is a single literal
    let text = fs::read_to_string(dir.path().join("b/query_bak.h")).unwrap();
    let line = text.lines().find(|l| l.contains("kQuery")).unwrap();
    let literal = &line[line.find('"').unwrap() + 1..line.rfind('"').unwrap()];
    assert_eq!(unescape_literal(literal), "SELECT \"x\"\n FROM tab\\le");
}
