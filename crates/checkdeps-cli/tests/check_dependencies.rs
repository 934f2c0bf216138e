//! Integration tests for `check-dependencies`.
//!
//! These tests create small projects with a `node_modules` tree and check the
//! exit code and output of the binary.

use serde_json::{json, Value};
use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

fn cargo_bin() -> Command {
    let mut cmd = Command::new(env!("CARGO"));
    cmd.args(["run", "-p", "checkdeps-cli", "--bin", "check-dependencies", "--"]);
    cmd.env_remove("CHECK_DEPENDENCIES_PACKAGE_MANAGER")
        .env_remove("CHECK_DEPENDENCIES_PACKAGE_DIR")
        .env_remove("RUST_LOG");
    cmd
}

fn project(manifest: &Value) -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("package.json"),
        serde_json::to_string_pretty(manifest).unwrap(),
    )
    .unwrap();
    dir
}

fn install(root: &Path, name: &str, version: &str) {
    let pkg = root.join("node_modules").join(name);
    fs::create_dir_all(&pkg).unwrap();
    fs::write(
        pkg.join("package.json"),
        json!({ "name": name, "version": version }).to_string(),
    )
    .unwrap();
}

/// Stderr without cargo's own progress lines.
fn program_stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr)
        .lines()
        .filter(|l| {
            let l = l.trim_start();
            !l.starts_with("Compiling")
                && !l.starts_with("Finished")
                && !l.starts_with("Running")
                && !l.starts_with("Blocking")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn run(args: &[&str]) -> Output {
    cargo_bin()
        .args(args)
        .output()
        .expect("Failed to run check-dependencies")
}

#[test]
fn test_clean_project_exits_zero() {
    let dir = project(&json!({ "dependencies": { "a": "^1.0.0" } }));
    install(dir.path(), "a", "1.4.0");

    let output = run(&["--package-dir", dir.path().to_str().unwrap()]);
    assert!(output.status.success(), "stderr: {}", program_stderr(&output));
    assert!(!program_stderr(&output).contains("not installed"));
}

#[test]
fn test_missing_dependency_exits_one() {
    let dir = project(&json!({ "dependencies": { "a": "^1.0.0", "b": "2.0.0" } }));
    install(dir.path(), "a", "1.4.0");

    let output = run(&["--package-dir", dir.path().to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(1));

    let stderr = program_stderr(&output);
    assert!(stderr.contains("b: not installed!"), "stderr: {stderr}");
    assert!(
        stderr.contains("Invoke npm install to install missing packages"),
        "stderr: {stderr}"
    );
}

#[test]
fn test_json_report() {
    let dir = project(&json!({ "dependencies": { "a": "1.2.3" } }));
    install(dir.path(), "a", "1.2.4");

    let output = run(&["--json", "--package-dir", dir.path().to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(1));

    let stdout = String::from_utf8_lossy(&output.stdout);
    let report: Value = serde_json::from_str(&stdout).expect("stdout should be valid JSON");
    assert_eq!(
        report,
        json!({
            "status": 1,
            "depsWereOk": false,
            "log": [],
            "error": [
                "a: installed: 1.2.4, expected: 1.2.3",
                "Invoke npm install to install missing packages"
            ]
        })
    );
}

#[test]
fn test_verbose_prints_log_lines() {
    let dir = project(&json!({ "dependencies": { "a": "1.2.3" } }));
    install(dir.path(), "a", "1.2.3");

    let output = run(&["-v", "--package-dir", dir.path().to_str().unwrap()]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains("a: installed: 1.2.3, expected: 1.2.3"),
        "stdout: {stdout}"
    );
}

#[test]
fn test_only_specified_and_scope_list() {
    let dir = project(&json!({
        "dependencies": { "a": "1.2.3" },
        "devDependencies": { "b": "1.0.0" }
    }));
    install(dir.path(), "a", "1.2.3");
    install(dir.path(), "b", "1.0.0");

    let package_dir = dir.path().to_str().unwrap();
    let output = run(&["--package-dir", package_dir, "--scope-list", "dependencies"]);
    assert!(output.status.success(), "stderr: {}", program_stderr(&output));

    let output = run(&[
        "--json",
        "--package-dir",
        package_dir,
        "--scope-list",
        "dependencies",
        "--only-specified",
    ]);
    assert_eq!(output.status.code(), Some(1));
    let report: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(
        report["error"][0],
        "Package b installed, though it shouldn't be"
    );
}

#[test]
fn test_cwd_discovers_manifest() {
    let dir = project(&json!({ "dependencies": { "a": "1.2.3" } }));
    install(dir.path(), "a", "1.2.3");
    let nested = dir.path().join("lib");
    fs::create_dir_all(&nested).unwrap();

    let output = run(&["--json", "--cwd", nested.to_str().unwrap()]);
    assert!(output.status.success(), "stderr: {}", program_stderr(&output));

    let report: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["depsWereOk"], true);
}

#[test]
fn test_package_manager_from_env() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("bower.json"),
        json!({ "dependencies": { "jquery": "~1.11.0" } }).to_string(),
    )
    .unwrap();

    let output = cargo_bin()
        .args(["--json", "--blocking"])
        .env("CHECK_DEPENDENCIES_PACKAGE_MANAGER", "bower")
        .env("CHECK_DEPENDENCIES_PACKAGE_DIR", dir.path())
        .output()
        .expect("Failed to run check-dependencies");
    assert_eq!(output.status.code(), Some(1));

    let report: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(
        report["error"],
        json!([
            "jquery: not installed!",
            "Invoke bower install to install missing packages"
        ])
    );
}

#[test]
fn test_invalid_package_manager() {
    let dir = project(&json!({}));

    let output = run(&[
        "--json",
        "--package-manager",
        "1pm",
        "--package-dir",
        dir.path().to_str().unwrap(),
    ]);
    assert_eq!(output.status.code(), Some(1));

    let report: Value = serde_json::from_slice(&output.stdout).unwrap();
    let line = report["error"][0].as_str().unwrap();
    assert!(line.starts_with("The packageManager field value must match"), "{line}");
}

#[test]
fn test_blocking_install_failure_is_diagnostic() {
    let dir = project(&json!({ "dependencies": { "a": "1.0.0" } }));

    let output = run(&[
        "--blocking",
        "--install",
        "--package-manager",
        "checkdeps-no-such-package-manager",
        "--package-dir",
        dir.path().to_str().unwrap(),
    ]);
    assert!(!output.status.success());

    // Reported as a diagnostic, not as a report.
    assert!(output.stdout.is_empty());
    assert!(!program_stderr(&output).trim().is_empty());
}
