//! End-to-end CLI integration tests
//!
//! These tests invoke the compiled binary as a subprocess to verify
//! that the CLI behaves correctly from a user's perspective.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use tempfile::TempDir;

/// Returns a Command configured to run our binary.
///
/// Note: `cargo_bin` is marked deprecated for edge cases involving custom
/// cargo build directories, but works correctly for standard project layouts.
#[allow(deprecated)]
fn cmd() -> Command {
    let mut cmd = Command::cargo_bin(env!("CARGO_PKG_NAME")).unwrap();
    cmd.env_remove("READGATE_LOG_PATH")
        .env_remove("READGATE_LOG_DIR")
        .env_remove("RUST_LOG");
    cmd
}

/// A temp directory holding the given Markdown files.
fn docs(files: &[(&str, &str)]) -> TempDir {
    let tmp = TempDir::new().unwrap();
    for (name, body) in files {
        let path = tmp.path().join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, body).unwrap();
    }
    tmp
}

/// Run `--json analyze` in `dir` with extra args and parse stdout.
fn analyze_json(dir: &TempDir, extra: &[&str]) -> Value {
    let output = cmd()
        .args(["-C", dir.path().to_str().unwrap(), "--json", "analyze"])
        .args(extra)
        .output()
        .expect("failed to run command");
    serde_json::from_slice(&output.stdout).expect("invalid JSON output")
}

fn long_doc() -> String {
    "Line.\n".repeat(400)
}

// =============================================================================
// Help & Version
// =============================================================================

#[test]
fn help_flag_shows_usage() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:"))
        .stdout(predicate::str::contains("Commands:"))
        .stdout(predicate::str::contains("Options:"));
}

#[test]
fn short_help_flag_shows_usage() {
    cmd()
        .arg("-h")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:"));
}

#[test]
fn version_flag_shows_version() {
    cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn short_version_flag_shows_version() {
    cmd()
        .arg("-V")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn version_only_prints_bare_version() {
    cmd()
        .arg("--version-only")
        .assert()
        .success()
        .stdout(predicate::str::diff(format!(
            "{}\n",
            env!("CARGO_PKG_VERSION")
        )));
}

// =============================================================================
// Info Command
// =============================================================================

#[test]
fn info_shows_package_name_and_version() {
    cmd()
        .arg("info")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_NAME")))
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn info_json_outputs_valid_json() {
    let output = cmd().arg("info").arg("--json").assert().success();

    let stdout = String::from_utf8_lossy(&output.get_output().stdout);
    let json: serde_json::Value =
        serde_json::from_str(&stdout).expect("info --json should output valid JSON");

    assert_eq!(json["name"], env!("CARGO_PKG_NAME"));
    assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
}

#[test]
fn info_json_contains_expected_fields() {
    cmd()
        .arg("info")
        .arg("--json")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"name\""))
        .stdout(predicate::str::contains("\"version\""))
        .stdout(predicate::str::contains("\"thresholds\""))
        .stdout(predicate::str::contains("\"exclude\""));
}

#[test]
fn info_help_shows_command_options() {
    cmd()
        .args(["info", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--json"));
}

// =============================================================================
// Global Flags
// =============================================================================

#[test]
fn quiet_flag_accepted() {
    cmd().args(["--quiet", "info"]).assert().success();
}

#[test]
fn short_quiet_flag_accepted() {
    cmd().args(["-q", "info"]).assert().success();
}

#[test]
fn verbose_flag_accepted() {
    cmd().args(["--verbose", "info"]).assert().success();
}

#[test]
fn short_verbose_flag_accepted() {
    cmd().args(["-v", "info"]).assert().success();
}

#[test]
fn multiple_verbose_flags_accepted() {
    cmd().args(["-vv", "info"]).assert().success();
}

#[test]
fn color_auto_accepted() {
    cmd().args(["--color", "auto", "info"]).assert().success();
}

#[test]
fn color_always_accepted() {
    cmd().args(["--color", "always", "info"]).assert().success();
}

#[test]
fn color_never_accepted() {
    cmd().args(["--color", "never", "info"]).assert().success();
}

// =============================================================================
// Analyze: Output
// =============================================================================

#[test]
fn analyze_json_reports_metrics_per_file() {
    let tmp = docs(&[("guide.md", "# Guide\n\nThe cat sat on the mat.\n")]);
    let json = analyze_json(&tmp, &[]);

    let result = &json["results"][0];
    assert_eq!(result["path"], "./guide.md");
    assert_eq!(result["status"], "pass");
    assert_eq!(result["violations"], Value::Array(Vec::new()));
    assert_eq!(result["metrics"]["structure"]["words"], 7);
    assert_eq!(result["metrics"]["structure"]["sentences"], 2);
    assert_eq!(result["metrics"]["structure"]["headings"]["total"], 1);
    assert_eq!(json["summary"]["files"], 1);
    assert_eq!(json["summary"]["passed"], 1);
}

#[test]
fn analyze_json_names_violations() {
    let tmp = docs(&[("long.md", long_doc().as_str())]);
    let json = analyze_json(&tmp, &[]);

    let result = &json["results"][0];
    assert_eq!(result["status"], "fail");
    assert_eq!(result["violations"][0], "MaxLines");
    assert_eq!(json["summary"]["failed"], 1);
}

#[test]
fn analyze_table_is_default() {
    let tmp = docs(&[("a.md", "Short and clear.\n"), ("b.md", long_doc().as_str())]);
    cmd()
        .args(["-C", tmp.path().to_str().unwrap(), "analyze"])
        .assert()
        .success()
        .stdout(predicate::str::contains("FILE"))
        .stdout(predicate::str::contains("a.md"))
        .stdout(predicate::str::contains("FAIL"))
        .stdout(predicate::str::contains("2 files: 1 passed, 1 failed"));
}

#[test]
fn analyze_all_metrics_shows_issues() {
    let tmp = docs(&[("b.md", long_doc().as_str())]);
    cmd()
        .args(["-C", tmp.path().to_str().unwrap(), "analyze", "--all-metrics"])
        .assert()
        .success()
        .stdout(predicate::str::contains("SMOG"))
        .stdout(predicate::str::contains("Too many lines"));
}

#[test]
fn analyze_markdown_format() {
    let tmp = docs(&[("a.md", "Short and clear.\n")]);
    cmd()
        .args(["-C", tmp.path().to_str().unwrap(), "analyze", "--format", "markdown"])
        .assert()
        .success()
        .stdout(predicate::str::contains("## Documentation Readability Report"))
        .stdout(predicate::str::contains("| File | Lines | Words |"))
        .stdout(predicate::str::contains("✅"));
}

#[test]
fn analyze_summary_format() {
    let tmp = docs(&[("a.md", "Short and clear.\n"), ("b.md", long_doc().as_str())]);
    cmd()
        .args(["-C", tmp.path().to_str().unwrap(), "analyze", "-f", "summary"])
        .assert()
        .success()
        .stdout(predicate::str::contains("## Documentation Quality Summary"))
        .stdout(predicate::str::contains("### Files Requiring Attention"))
        .stdout(predicate::str::contains("### Readability Distribution"));
}

#[test]
fn analyze_single_file_target() {
    let tmp = docs(&[("notes.txt", "Plain words here.\n")]);
    let json = analyze_json(&tmp, &["notes.txt"]);
    assert_eq!(json["results"][0]["path"], "notes.txt");
}

#[test]
fn analyze_skips_default_excludes() {
    let tmp = docs(&[("CHANGELOG.md", long_doc().as_str()), ("README.md", "Hello there.\n")]);
    let json = analyze_json(&tmp, &[]);
    assert_eq!(json["summary"]["files"], 1);
    assert_eq!(json["results"][0]["path"], "./README.md");
}

#[test]
fn analyze_empty_directory_reports_nothing() {
    let tmp = docs(&[("notes.txt", "not markdown")]);
    cmd()
        .args(["-C", tmp.path().to_str().unwrap(), "analyze", "--check"])
        .assert()
        .success()
        .stderr(predicate::str::contains("No markdown files found"));
}

#[test]
fn analyze_missing_path_fails() {
    let tmp = TempDir::new().unwrap();
    cmd()
        .args(["-C", tmp.path().to_str().unwrap(), "analyze", "does-not-exist"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("does-not-exist"));
}

// =============================================================================
// Analyze: --check and threshold flags
// =============================================================================

#[test]
fn check_fails_on_long_file() {
    let tmp = docs(&[("long.md", long_doc().as_str())]);
    cmd()
        .args(["-C", tmp.path().to_str().unwrap(), "analyze", "--check"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("1 file(s) failed readability checks"));
}

#[test]
fn check_passes_on_simple_file() {
    let tmp = docs(&[("simple.md", "The cat sat on the mat.\n")]);
    cmd()
        .args(["-C", tmp.path().to_str().unwrap(), "analyze", "--check"])
        .assert()
        .success();
}

#[test]
fn max_lines_flag_overrides_default() {
    let tmp = docs(&[("long.md", long_doc().as_str())]);
    cmd()
        .args([
            "-C",
            tmp.path().to_str().unwrap(),
            "analyze",
            "--check",
            "--max-lines",
            "500",
        ])
        .assert()
        .success();
}

#[test]
fn max_lines_zero_disables_check() {
    let tmp = docs(&[("long.md", long_doc().as_str())]);
    let json = analyze_json(&tmp, &["--max-lines", "0"]);
    assert_eq!(json["results"][0]["status"], "pass");
}

#[test]
fn max_grade_flag_tightens_limit() {
    let text = "Comprehensive documentation necessitates considerable organizational \
                discipline, particularly regarding terminology, abbreviations, and \
                cross-referencing conventions throughout interconnected specifications.\n";
    let tmp = docs(&[("dense.md", text)]);
    let json = analyze_json(&tmp, &["--max-grade", "8"]);
    let violations = json["results"][0]["violations"].as_array().unwrap();
    assert!(violations.contains(&Value::from("MaxFleschKincaidGrade")));
}

#[test]
fn tables_flag_accepts_policies() {
    let tmp = docs(&[("t.md", "| Name | Role |\n|---|---|\n| Ada | Engineer |\n")]);
    let included = analyze_json(&tmp, &["--tables", "fragments"]);
    let excluded = analyze_json(&tmp, &["--tables", "exclude"]);
    assert!(included["results"][0]["metrics"]["structure"]["words"].as_u64().unwrap() > 0);
    assert_eq!(excluded["results"][0]["metrics"]["structure"]["words"], 0);
}

// =============================================================================
// Schema Command
// =============================================================================

#[test]
fn schema_prints_report_schema() {
    let output = cmd().arg("schema").assert().success();
    let stdout = String::from_utf8_lossy(&output.get_output().stdout);
    let json: Value = serde_json::from_str(&stdout).expect("schema should be valid JSON");
    assert_eq!(json["title"], "Report");
}

// =============================================================================
// Logging
// =============================================================================

#[test]
fn log_path_env_writes_jsonl() {
    let tmp = docs(&[("a.md", "Short and clear.\n")]);
    let log = tmp.path().join("logs").join("run.jsonl");
    cmd()
        .env("READGATE_LOG_PATH", &log)
        .args(["-C", tmp.path().to_str().unwrap(), "analyze"])
        .assert()
        .success();
    let contents = fs::read_to_string(&log).unwrap();
    assert!(contents.contains("batch complete"));
}

// =============================================================================
// Error Cases
// =============================================================================

#[test]
fn no_subcommand_shows_help() {
    // arg_required_else_help makes clap print help to stderr and exit 2
    cmd()
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Usage:"));
}

#[test]
fn invalid_subcommand_shows_error() {
    cmd()
        .arg("not-a-command")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error:"));
}

#[test]
fn invalid_flag_shows_error() {
    cmd()
        .arg("--not-a-flag")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error:"));
}

// =============================================================================
// Chdir Flag
// =============================================================================

#[test]
fn chdir_flag_changes_directory() {
    // The -C flag should be accepted and work without error
    // We use a path that definitely exists
    cmd().args(["-C", "/tmp", "info"]).assert().success();
}

#[test]
fn chdir_nonexistent_fails() {
    cmd()
        .args(["-C", "/nonexistent/path/that/does/not/exist", "info"])
        .assert()
        .failure();
}
