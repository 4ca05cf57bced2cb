//
// Copyright (c) 2025-2026 Jeff Garzik
//
// This file is part of the posixutils-rs project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};
use tempfile::TempDir;

struct TestPlan {
    args: Vec<String>,
    expected_out: String,
    expected_exit_code: i32,
}

fn run_strconst(args: &[String]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_strconst"))
        .args(args)
        .env("RUST_LOG", "off")
        .stdin(Stdio::null())
        .output()
        .expect("failed to spawn strconst")
}

fn run_test(plan: TestPlan) -> Output {
    let output = run_strconst(&plan.args);

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout, plan.expected_out);
    assert_eq!(output.status.code(), Some(plan.expected_exit_code));
    output
}

fn write(root: &Path, rel: &str, text: &str) -> PathBuf {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, text).unwrap();
    path.canonicalize().unwrap()
}

fn arg(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

/// Small project: a shared table-name header and a SQL header using it.
fn media_project() -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    write(
        dir.path(),
        "common/include/media_column.h",
        r#"#include <string>
namespace Media {
const std::string PhotoColumn = "Photos";
const std::string kId = "file_id";
}
"#,
    );
    let header = write(
        dir.path(),
        "dao/include/vision_sqls.h",
        r#"#include "media_column.h"
namespace Media {
inline const std::string kCols = kId + ", " + "title";
const std::string kSelect = "SELECT " + kCols +
    " FROM " + Media::PhotoColumn +
    " WHERE x = \"y\"";
}
"#,
    );
    (dir, header)
}

#[test]
fn test_resolve_and_write_backup() {
    let (dir, header) = media_project();
    let backup = header.with_file_name("vision_sqls_bak.h");

    run_test(TestPlan {
        args: vec![arg(dir.path()), String::from("dao/include/vision_sqls.h")],
        expected_out: format!(
            "4 constants resolved\n\
             PhotoColumn = \"Photos\"\n\
             kCols = \"file_id, title\"\n\
             kId = \"file_id\"\n\
             kSelect = \"SELECT file_id, title FROM Photos WHERE x = \\\"y\\\"\"\n\
             backup written to {}\n",
            backup.display()
        ),
        expected_exit_code: 0,
    });

    let text = fs::read_to_string(&backup).unwrap();
    assert!(text.contains("inline const std::string kCols = \"file_id, title\";"));
    assert!(text.contains("#include \"media_column.h\""));
    assert!(!header.with_file_name("vision_sqls_macro.h").exists());
}

#[test]
fn test_macro_output() {
    let (dir, header) = media_project();
    let output = run_strconst(&[
        String::from("--macro"),
        arg(dir.path()),
        arg(&header),
    ]);
    assert!(output.status.success());

    let macro_path = header.with_file_name("vision_sqls_macro.h");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.ends_with(&format!("macro written to {}\n", macro_path.display())));

    let text = fs::read_to_string(macro_path).unwrap();
    assert!(text.contains("#define kCols \"file_id, title\"\n"));
    assert!(!text.contains("const std::string kCols"));
}

#[test]
fn test_macro_line_length() {
    let dir = TempDir::new().unwrap();
    let header = write(
        dir.path(),
        "long.h",
        "const std::string kLong = \"alpha beta gamma delta epsilon zeta eta theta\";\n",
    );
    let output = run_strconst(&[
        String::from("-m"),
        String::from("--max-line-length"),
        String::from("30"),
        arg(dir.path()),
        arg(&header),
    ]);
    assert!(output.status.success());

    let text = fs::read_to_string(header.with_file_name("long_macro.h")).unwrap();
    assert!(text.starts_with("#define kLong \""));
    assert!(text.lines().count() > 2);
    for line in text.lines() {
        assert!(line.chars().count() <= 30, "{line}");
    }
}

#[test]
fn test_cyclic_includes() {
    let dir = TempDir::new().unwrap();
    write(
        dir.path(),
        "f.h",
        "#include \"g.h\"\nconst std::string kF = kG + \"f\";\n",
    );
    write(
        dir.path(),
        "g.h",
        "#include \"f.h\"\nconst std::string kG = \"g\";\n",
    );
    let backup = dir.path().canonicalize().unwrap().join("f_bak.h");

    run_test(TestPlan {
        args: vec![arg(dir.path()), String::from("f.h")],
        expected_out: format!(
            "2 constants resolved\nkF = \"gf\"\nkG = \"g\"\nbackup written to {}\n",
            backup.display()
        ),
        expected_exit_code: 0,
    });
}

#[test]
fn test_unresolved_reference_warns() {
    let dir = TempDir::new().unwrap();
    write(
        dir.path(),
        "u.h",
        "const std::string kU = \"a\" + UNKNOWN + \"b\";\n",
    );

    let output = Command::new(env!("CARGO_BIN_EXE_strconst"))
        .args([arg(dir.path()), String::from("u.h")])
        .env("RUST_LOG", "warn")
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("1 constants resolved\nkU = \"ab\"\n"));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("UNKNOWN"), "{stderr}");
}

#[test]
fn test_no_constants() {
    let dir = TempDir::new().unwrap();
    let header = write(dir.path(), "empty.h", "#pragma once\nconst int kX = 1;\n");

    run_test(TestPlan {
        args: vec![arg(dir.path()), String::from("empty.h")],
        expected_out: format!(
            "0 constants resolved\nno constants found in {}; no backup written\n",
            header.display()
        ),
        expected_exit_code: 0,
    });
    assert!(!header.with_file_name("empty_bak.h").exists());
}

#[test]
fn test_missing_arguments() {
    let output = run_test(TestPlan {
        args: vec![String::from("/tmp")],
        expected_out: String::new(),
        expected_exit_code: 2,
    });
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Usage"), "{stderr}");
}

#[test]
fn test_missing_project_root() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("no-such-project");

    let output = run_test(TestPlan {
        args: vec![arg(&missing), String::from("a.h")],
        expected_out: String::new(),
        expected_exit_code: 2,
    });
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("project root does not exist"), "{stderr}");
    assert!(stderr.contains("Usage"), "{stderr}");
}
