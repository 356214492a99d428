//! Configuration integration tests.
//!
//! These tests verify config discovery, format parsing, and precedence
//! from an end-to-end perspective using the compiled binary. Tests use
//! `info --json` to assert actual config values, and `analyze --json` to
//! check that those values reach the analysis.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Returns a Command configured to run our binary.
#[allow(deprecated)]
fn cmd() -> Command {
    let mut cmd = Command::cargo_bin(env!("CARGO_PKG_NAME")).unwrap();
    cmd.env_remove("READGATE_LOG_PATH")
        .env_remove("READGATE_LOG_DIR")
        .env_remove("RUST_LOG");
    cmd
}

/// Run `info --json` from a directory and parse the JSON output.
fn info_json(dir: &Path) -> Value {
    let output = cmd()
        .args(["-C", dir.to_str().unwrap(), "info", "--json"])
        .output()
        .expect("failed to run command");
    assert!(
        output.status.success(),
        "command failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("invalid JSON output")
}

fn limit(json: &Value, name: &str) -> Value {
    json["config"]["thresholds"][name]["limit"].clone()
}

// =============================================================================
// Config File Discovery
// =============================================================================

#[test]
fn runs_without_config_file() {
    let tmp = TempDir::new().unwrap();
    let json = info_json(tmp.path());

    assert_eq!(json["config"]["log_level"], "info");
    assert!(
        json["config"]["config_file"].is_null(),
        "no config file should be reported"
    );
    assert_eq!(limit(&json, "max_lines"), 375.0);
    assert_eq!(limit(&json, "max_flesch_kincaid_grade"), 14.0);
}

#[test]
fn discovers_dotfile_config_in_current_dir() {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join(".readgate.toml"),
        "[thresholds]\nmax_lines = 500\n",
    )
    .unwrap();

    let json = info_json(tmp.path());

    assert_eq!(limit(&json, "max_lines"), 500.0);
    let reported = json["config"]["config_file"].as_str().unwrap();
    assert!(
        reported.ends_with(".readgate.toml"),
        "should report dotfile: {reported}"
    );
}

#[test]
fn discovers_regular_config_in_current_dir() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("readgate.toml"), r#"tables = "exclude""#).unwrap();

    let json = info_json(tmp.path());

    assert_eq!(json["config"]["tables"], "exclude");
    let reported = json["config"]["config_file"].as_str().unwrap();
    assert!(
        reported.ends_with("readgate.toml"),
        "should report regular config: {reported}"
    );
}

#[test]
fn discovers_config_in_parent_directory() {
    let tmp = TempDir::new().unwrap();
    let sub_dir = tmp.path().join("nested").join("deep");
    fs::create_dir_all(&sub_dir).unwrap();

    fs::write(tmp.path().join(".readgate.toml"), r#"log_level = "debug""#).unwrap();

    let json = info_json(&sub_dir);

    assert_eq!(json["config"]["log_level"], "debug");
    assert!(
        json["config"]["config_file"].as_str().is_some(),
        "should find parent config"
    );
}

#[test]
fn regular_name_overrides_dotfile() {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join(".readgate.toml"),
        "[thresholds]\nmax_ari = 10\n",
    )
    .unwrap();
    fs::write(
        tmp.path().join("readgate.toml"),
        "[thresholds]\nmax_ari = 18\n",
    )
    .unwrap();

    let json = info_json(tmp.path());

    assert_eq!(limit(&json, "max_ari"), 18.0);
}

// =============================================================================
// Config Format Parsing
// =============================================================================

#[test]
fn parses_yaml_config() {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join(".readgate.yaml"),
        "thresholds:\n  max_smog: 12\nexclude: []\n",
    )
    .unwrap();

    let json = info_json(tmp.path());
    assert_eq!(limit(&json, "max_smog"), 12.0);
    assert_eq!(json["config"]["thresholds"]["max_smog"]["enabled"], true);
    assert_eq!(json["config"]["exclude"], Value::Array(Vec::new()));
}

#[test]
fn parses_yml_config() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join(".readgate.yml"), "keep_word_like_code: true\n").unwrap();

    let json = info_json(tmp.path());
    assert_eq!(json["config"]["keep_word_like_code"], true);
}

#[test]
fn parses_json_config() {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join(".readgate.json"),
        r#"{"rules": [{"paths": ["docs/**"], "thresholds": {"max_lines": 900}}]}"#,
    )
    .unwrap();

    let json = info_json(tmp.path());
    assert_eq!(json["config"]["rules"], 1);
}

#[test]
fn zero_threshold_disables_it() {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join(".readgate.toml"),
        "[thresholds]\nmax_lines = 0\n",
    )
    .unwrap();

    let json = info_json(tmp.path());
    assert_eq!(json["config"]["thresholds"]["max_lines"]["enabled"], false);
}

// =============================================================================
// Config Precedence
// =============================================================================

#[test]
fn closer_config_takes_precedence() {
    let tmp = TempDir::new().unwrap();
    let sub_dir = tmp.path().join("project");
    fs::create_dir_all(&sub_dir).unwrap();

    fs::write(
        tmp.path().join(".readgate.toml"),
        "[thresholds]\nmax_lines = 100\n",
    )
    .unwrap();
    fs::write(sub_dir.join(".readgate.toml"), "[thresholds]\nmax_lines = 200\n").unwrap();

    let json = info_json(&sub_dir);

    assert_eq!(limit(&json, "max_lines"), 200.0, "closer config should win");
}

#[test]
fn later_extension_overrides_earlier_in_same_directory() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join(".readgate.toml"), r#"log_level = "debug""#).unwrap();
    fs::write(tmp.path().join(".readgate.yaml"), "log_level: error\n").unwrap();

    let json = info_json(tmp.path());
    assert_eq!(
        json["config"]["log_level"], "error",
        "later extension (YAML) should override earlier (TOML) in merge"
    );
}

#[test]
fn explicit_config_overrides_discovered() {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join(".readgate.toml"),
        "[thresholds]\nmax_flesch_kincaid_grade = 8\n",
    )
    .unwrap();
    let explicit = tmp.path().join("override.toml");
    fs::write(&explicit, "[thresholds]\nmax_flesch_kincaid_grade = 16\n").unwrap();

    let output = cmd()
        .args([
            "-C",
            tmp.path().to_str().unwrap(),
            "--config",
            explicit.to_str().unwrap(),
            "info",
            "--json",
        ])
        .output()
        .expect("failed to run command");
    assert!(output.status.success());

    let json: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(limit(&json, "max_flesch_kincaid_grade"), 16.0);
    let reported = json["config"]["config_file"].as_str().unwrap();
    assert!(
        reported.ends_with("override.toml"),
        "--config path should be reported: {reported}"
    );
}

#[test]
fn env_var_overrides_config_file() {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join(".readgate.toml"),
        "[thresholds]\nmax_lines = 100\n",
    )
    .unwrap();

    let output = cmd()
        .env("READGATE_THRESHOLDS__MAX_LINES", "250")
        .args(["-C", tmp.path().to_str().unwrap(), "info", "--json"])
        .output()
        .expect("failed to run command");
    assert!(output.status.success());

    let json: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(limit(&json, "max_lines"), 250.0);
}

// =============================================================================
// Config Reaches Analysis
// =============================================================================

#[test]
fn config_threshold_applies_to_analyze() {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join(".readgate.toml"),
        "[thresholds]\nmax_lines = 5\n",
    )
    .unwrap();
    fs::write(tmp.path().join("notes.md"), "Line.\n".repeat(10)).unwrap();

    cmd()
        .args(["-C", tmp.path().to_str().unwrap(), "analyze", "--check"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("1 file(s) failed readability checks"));
}

#[test]
fn path_rule_relaxes_matching_files() {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join(".readgate.toml"),
        "[[rules]]\npaths = [\"reference/**\"]\n[rules.thresholds]\nmax_lines = 1000\n",
    )
    .unwrap();
    fs::create_dir(tmp.path().join("reference")).unwrap();
    fs::write(tmp.path().join("reference/api.md"), "Line.\n".repeat(400)).unwrap();

    cmd()
        .args(["-C", tmp.path().to_str().unwrap(), "analyze", "reference", "--check"])
        .assert()
        .success();
}

#[test]
fn exclude_config_skips_files() {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join(".readgate.toml"),
        "exclude = [\"**/drafts/**\"]\n",
    )
    .unwrap();
    fs::create_dir(tmp.path().join("drafts")).unwrap();
    fs::write(tmp.path().join("drafts/wip.md"), "Line.\n".repeat(400)).unwrap();
    fs::write(tmp.path().join("README.md"), "Short and clear.\n").unwrap();

    let output = cmd()
        .args(["-C", tmp.path().to_str().unwrap(), "--json", "analyze", "--check"])
        .output()
        .expect("failed to run command");
    assert!(output.status.success());

    let json: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["summary"]["files"], 1);
}

// =============================================================================
// Error Cases
// =============================================================================

#[test]
fn invalid_toml_config_shows_error() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join(".readgate.toml"), "this is not valid toml [[[").unwrap();

    cmd()
        .args(["-C", tmp.path().to_str().unwrap(), "info"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("configuration").or(predicate::str::contains("config")));
}

#[test]
fn invalid_json_config_shows_error() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join(".readgate.json"), "{not valid json}").unwrap();

    cmd()
        .args(["-C", tmp.path().to_str().unwrap(), "info"])
        .assert()
        .failure();
}

#[test]
fn unknown_config_field_is_ignored() {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join(".readgate.toml"),
        "log_level = \"info\"\nunknown_field = \"should be ignored\"\n",
    )
    .unwrap();

    let json = info_json(tmp.path());
    assert_eq!(json["config"]["log_level"], "info");
}

// =============================================================================
// Boundary Marker Tests
// =============================================================================

#[test]
fn git_boundary_stops_config_search() {
    let tmp = TempDir::new().unwrap();
    let parent = tmp.path().join("parent");
    let repo = parent.join("repo");
    let src = repo.join("src");
    fs::create_dir_all(&src).unwrap();

    fs::write(parent.join(".readgate.toml"), "[thresholds]\nmax_lines = 10\n").unwrap();
    fs::create_dir(repo.join(".git")).unwrap();

    let json = info_json(&src);

    assert_eq!(limit(&json, "max_lines"), 375.0, "boundary stops search");
    assert!(json["config"]["config_file"].is_null());
}

#[test]
fn config_in_same_dir_as_git_is_found() {
    let tmp = TempDir::new().unwrap();
    let repo = tmp.path().join("repo");
    let src = repo.join("src");
    fs::create_dir_all(&src).unwrap();

    fs::create_dir(repo.join(".git")).unwrap();
    fs::write(repo.join(".readgate.toml"), r#"log_level = "debug""#).unwrap();

    let json = info_json(&src);

    assert_eq!(json["config"]["log_level"], "debug");
    assert!(json["config"]["config_file"].as_str().is_some());
}
