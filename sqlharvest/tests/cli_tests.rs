//! Exit status and end-to-end tests for the `sqlharvest` binary.
//!
//! Each test runs the compiled binary inside its own scratch directory, so
//! relative targets, the default `statements` output and temporary clones
//! all land somewhere disposable.

#![allow(clippy::expect_used)]
#![allow(clippy::unwrap_used)]

use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};
use tempfile::TempDir;

fn sqlharvest(cwd: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_sqlharvest"))
        .current_dir(cwd)
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to run sqlharvest")
}

fn write_file(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, content).unwrap();
}

fn git(cwd: &Path, args: &[&str]) {
    let status = Command::new("git")
        .current_dir(cwd)
        .args(args)
        .stdin(Stdio::null())
        .status()
        .expect("Failed to run git");
    assert!(status.success(), "git {args:?} failed");
}

/// Builds a one-commit repository at `root` and returns it.
fn init_repository(root: &Path) -> PathBuf {
    git(root, &["init", "--quiet"]);
    git(root, &["add", "."]);
    git(
        root,
        &[
            "-c",
            "user.name=sqlharvest",
            "-c",
            "user.email=sqlharvest@example.invalid",
            "-c",
            "commit.gpgsign=false",
            "commit",
            "--quiet",
            "-m",
            "schema",
        ],
    );
    root.to_path_buf()
}

fn entries(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[test]
fn test_cli_no_targets_exits_with_usage_error() {
    let scratch = TempDir::new().unwrap();
    let output = sqlharvest(scratch.path(), &[]);

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("At least one target is required"));
    assert!(stderr.contains("Usage"));
    assert!(entries(scratch.path()).is_empty(), "no work before validation");
}

#[test]
fn test_cli_unknown_flag_exits_with_one() {
    let scratch = TempDir::new().unwrap();
    let output = sqlharvest(scratch.path(), &["--bogus", "./repo"]);
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn test_cli_missing_output_value_exits_with_one() {
    let scratch = TempDir::new().unwrap();
    let output = sqlharvest(scratch.path(), &["./repo", "-o"]);
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn test_cli_help_exits_successfully() {
    let scratch = TempDir::new().unwrap();
    let output = sqlharvest(scratch.path(), &["--help"]);

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("--output"));
}

#[test]
fn test_cli_integration_two_repositories() {
    let scratch = TempDir::new().unwrap();
    write_file(scratch.path(), "repoA/a.sql", "SELECT 'a';");
    write_file(scratch.path(), "repoA/b.txt", "plain text");
    write_file(scratch.path(), "repoB/x/y/c.sql", "SELECT 'c';");

    let output = sqlharvest(scratch.path(), &["./repoA", "./repoB"]);
    assert_eq!(output.status.code(), Some(0));

    let statements = scratch.path().join("statements");
    let names = entries(&statements);
    assert_eq!(names.len(), 2);
    assert!(names.iter().all(|n| n.ends_with(".sql") && n.len() == 40));

    let mut contents: Vec<String> = names
        .iter()
        .map(|n| std::fs::read_to_string(statements.join(n)).unwrap())
        .collect();
    contents.sort();
    assert_eq!(contents, vec!["SELECT 'a';", "SELECT 'c';"]);

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("All targets processed"));
}

#[test]
fn test_cli_missing_target_still_exits_zero() {
    let scratch = TempDir::new().unwrap();
    write_file(scratch.path(), "repo/a.sql", "SELECT 1;");

    let output = sqlharvest(scratch.path(), &["-o", "pool", "./nope", "./repo"]);
    assert_eq!(output.status.code(), Some(0));

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("./nope"));
    assert_eq!(entries(&scratch.path().join("pool")).len(), 1);
}

#[test]
fn test_cli_integration_failed_clone() {
    let scratch = TempDir::new().unwrap();
    let url = "http://127.0.0.1:9/repo.git";

    let output = sqlharvest(scratch.path(), &[url]);
    assert_eq!(output.status.code(), Some(0));

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Failed to clone repository"));
    assert!(stdout.contains(url));
    // Neither a clone directory nor an output directory is left behind
    assert!(entries(scratch.path()).is_empty());
}

#[test]
fn test_cli_integration_failed_clone_keeps_existing_output() {
    let scratch = TempDir::new().unwrap();
    write_file(scratch.path(), "statements/old.sql", "SELECT 0;");

    let output = sqlharvest(scratch.path(), &["https://127.0.0.1:9/nobody/nothing.git"]);
    assert_eq!(output.status.code(), Some(0));

    assert_eq!(entries(scratch.path()), vec!["statements".to_string()]);
    assert_eq!(
        entries(&scratch.path().join("statements")),
        vec!["old.sql".to_string()]
    );
}

#[test]
fn test_cli_integration_successful_clone_is_removed() {
    let upstream = TempDir::new().unwrap();
    write_file(upstream.path(), "db/migrations/001_init.sql", "SELECT 42;");
    write_file(upstream.path(), "README.md", "not sql");
    let repository = init_repository(upstream.path());

    let scratch = TempDir::new().unwrap();
    let url = "https://example.invalid/repo.git";
    // Redirect the remote URL to the local repository so no network is needed
    let output = Command::new(env!("CARGO_BIN_EXE_sqlharvest"))
        .current_dir(scratch.path())
        .arg(url)
        .env_remove("RUST_LOG")
        .env("GIT_CONFIG_COUNT", "2")
        .env(
            "GIT_CONFIG_KEY_0",
            format!("url.file://{}.insteadOf", repository.display()),
        )
        .env("GIT_CONFIG_VALUE_0", url)
        .env("GIT_CONFIG_KEY_1", "protocol.file.allow")
        .env("GIT_CONFIG_VALUE_1", "always")
        .output()
        .expect("Failed to run sqlharvest");
    assert_eq!(output.status.code(), Some(0));

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Clone complete"), "stdout: {stdout}");

    // Only the output directory remains; the <uuid> clone is gone
    assert_eq!(entries(scratch.path()), vec!["statements".to_string()]);

    let statements = scratch.path().join("statements");
    let names = entries(&statements);
    assert_eq!(names.len(), 1);
    assert_eq!(
        std::fs::read(statements.join(&names[0])).unwrap(),
        b"SELECT 42;"
    );
}
