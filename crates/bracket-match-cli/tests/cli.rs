use std::fs;
use std::io::Write;
use std::path::Path;
use std::process::{Command, Output, Stdio};

use tempfile::TempDir;

fn bracket_match(dir: &Path, args: &[&str], stdin: &str) -> Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_bracket-match"))
        .args(args)
        .current_dir(dir)
        .env_remove("RUST_LOG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to spawn bracket-match");

    // The child may exit before reading stdin (usage errors, file inputs).
    if let Some(mut pipe) = child.stdin.take() {
        let _ = pipe.write_all(stdin.as_bytes());
    }

    child.wait_with_output().expect("failed to wait for bracket-match")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn test_stdin_index() {
    let dir = TempDir::new().unwrap();
    let output = bracket_match(dir.path(), &["--index", "1"], "[[]]");
    assert_eq!(output.status.code(), Some(0));
    assert_eq!(stdout(&output), "2\n");
}

#[test]
fn test_stdin_no_match_prints_sentinel() {
    let dir = TempDir::new().unwrap();
    let output = bracket_match(dir.path(), &["--index", "0"], "][");
    assert_eq!(output.status.code(), Some(1));
    assert_eq!(stdout(&output), "-1\n");
}

#[test]
fn test_excerpt_failure_goes_to_stderr() {
    let dir = TempDir::new().unwrap();
    let output = bracket_match(
        dir.path(),
        &["--index", "3", "--output", "excerpt"],
        "[]][]",
    );
    assert_eq!(output.status.code(), Some(1));
    assert_eq!(stdout(&output), "");
    assert!(stderr(&output).contains("stdin:1:3: unmatched closing bracket at offset 2"));
}

#[test]
fn test_all_pairs_from_file() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("cmd.tcl"), "puts [lindex [list a b] 0]\n").unwrap();

    let output = bracket_match(dir.path(), &["--all", "cmd.tcl"], "");
    assert_eq!(output.status.code(), Some(0));
    assert_eq!(stdout(&output), "13 22\n5 25\n");
}

#[test]
fn test_multiple_files_are_labelled_in_order() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("a.txt"), "[x]").unwrap();
    fs::write(dir.path().join("b.txt"), "y[z]").unwrap();

    let output = bracket_match(
        dir.path(),
        &["--all", "--output", "excerpt", "a.txt", "b.txt"],
        "",
    );
    assert_eq!(output.status.code(), Some(0));
    assert_eq!(stdout(&output), "a.txt: [x]\nb.txt: [z]\n");
}

#[test]
fn test_glob_pattern() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("one.txt"), "[]").unwrap();
    fs::write(dir.path().join("two.txt"), "[[]]").unwrap();
    fs::write(dir.path().join("skip.md"), "[").unwrap();

    let output = bracket_match(dir.path(), &["--index", "0", "*.txt"], "");
    assert_eq!(output.status.code(), Some(0));
    assert_eq!(stdout(&output), "one.txt: 1\ntwo.txt: 3\n");
}

#[test]
fn test_default_config_file_is_used() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("bracket-match.toml"), "output = \"location\"\n").unwrap();

    let output = bracket_match(dir.path(), &["--index", "0"], "[\n ]");
    assert_eq!(output.status.code(), Some(0));
    assert_eq!(stdout(&output), "2:2\n");
}

#[test]
fn test_flag_overrides_config_file() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("custom.toml");
    fs::write(&config, "output = \"location\"\n").unwrap();

    let output = bracket_match(
        dir.path(),
        &["--index", "0", "--config", "custom.toml", "--output", "index"],
        "[\n ]",
    );
    assert_eq!(output.status.code(), Some(0));
    assert_eq!(stdout(&output), "3\n");
}

#[test]
fn test_invalid_config_is_an_error() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("bracket-match.toml"), "max_input_bytes = 0\n").unwrap();

    let output = bracket_match(dir.path(), &["--index", "0"], "[]");
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("max_input_bytes"));
}

#[test]
fn test_input_over_limit_is_rejected() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("bracket-match.toml"), "max_input_bytes = 4\n").unwrap();
    fs::write(dir.path().join("big.txt"), "[[[[]]]]").unwrap();

    let output = bracket_match(dir.path(), &["--all", "big.txt"], "");
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("larger than max_input_bytes"));
}

#[test]
fn test_stdin_over_limit_is_rejected() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("bracket-match.toml"), "max_input_bytes = 4\n").unwrap();

    let big = "[".repeat(1 << 20);
    let output = bracket_match(dir.path(), &["--all"], &big);
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("stdin: input is larger than max_input_bytes (4)"));
}

#[test]
fn test_stdin_at_limit_is_accepted() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("bracket-match.toml"), "max_input_bytes = 4\n").unwrap();

    let output = bracket_match(dir.path(), &["--index", "0"], "[[]]");
    assert_eq!(output.status.code(), Some(0));
    assert_eq!(stdout(&output), "3\n");
}

#[test]
fn test_non_utf8_file_is_an_error() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("latin1.txt"), b"[\xe9]").unwrap();

    let output = bracket_match(dir.path(), &["--all", "latin1.txt"], "");
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("latin1.txt"));
}

#[test]
fn test_missing_file_is_an_error() {
    let dir = TempDir::new().unwrap();
    let output = bracket_match(dir.path(), &["--index", "0", "missing.txt"], "");
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("missing.txt"));
}

#[test]
fn test_mode_is_required() {
    let dir = TempDir::new().unwrap();
    let output = bracket_match(dir.path(), &[], "[]");
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_index_and_all_conflict() {
    let dir = TempDir::new().unwrap();
    let output = bracket_match(dir.path(), &["--index", "0", "--all"], "[]");
    assert_eq!(output.status.code(), Some(2));
}
