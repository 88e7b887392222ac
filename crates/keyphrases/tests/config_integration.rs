//! Configuration integration tests.
//!
//! Config discovery, format parsing and precedence, checked end to end
//! through `info --json` and the pipeline commands.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

#[allow(deprecated)]
fn cmd() -> Command {
    Command::cargo_bin(env!("CARGO_PKG_NAME")).unwrap()
}

/// Run `info --json` from a directory and parse the `config` object.
fn config_json(dir: &Path) -> Value {
    let output = cmd()
        .args(["-C", dir.to_str().unwrap(), "info", "--json"])
        .output()
        .expect("failed to run command");
    assert!(
        output.status.success(),
        "command failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let json: Value = serde_json::from_slice(&output.stdout).expect("invalid JSON output");
    json["config"].clone()
}

fn write_corpus(dir: &Path) {
    fs::write(
        dir.join("a.txt"),
        "The river delta is wide. The river delta was green.",
    )
    .unwrap();
    fs::write(dir.join("b.txt"), "The river delta is large.").unwrap();
}

// =============================================================================
// Discovery
// =============================================================================

#[test]
fn defaults_without_config_file() {
    let tmp = TempDir::new().unwrap();
    let config = config_json(tmp.path());

    assert!(config["config_file"].is_null());
    assert_eq!(config["pattern"], "*.txt");
    assert_eq!(config["total_freq_thresh"], 2);
    assert_eq!(config["cross_doc_freq_thresh"], 2);
    assert_eq!(config["output"], "keyphrases.html");
    assert_eq!(config["stylesheet"], "static/style.css");
    assert_eq!(config["highlight_class"], "keyphrase");
}

#[test]
fn discovers_dotfile_config() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join(".keyphrases.toml"), "total_freq_thresh = 4\n").unwrap();

    let config = config_json(tmp.path());
    assert_eq!(config["total_freq_thresh"], 4);
    let reported = config["config_file"].as_str().unwrap();
    assert!(reported.ends_with(".keyphrases.toml"), "{reported}");
}

#[test]
fn discovers_config_in_parent_directory() {
    let tmp = TempDir::new().unwrap();
    let nested = tmp.path().join("notes").join("2024");
    fs::create_dir_all(&nested).unwrap();
    fs::write(tmp.path().join(".keyphrases.toml"), "pattern = \"**/*.txt\"\n").unwrap();

    let config = config_json(&nested);
    assert_eq!(config["pattern"], "**/*.txt");
}

#[test]
fn regular_name_overrides_dotfile() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join(".keyphrases.toml"), "cross_doc_freq_thresh = 3\n").unwrap();
    fs::write(tmp.path().join("keyphrases.toml"), "cross_doc_freq_thresh = 5\n").unwrap();

    assert_eq!(config_json(tmp.path())["cross_doc_freq_thresh"], 5);
}

#[test]
fn closer_config_takes_precedence() {
    let tmp = TempDir::new().unwrap();
    let project = tmp.path().join("project");
    fs::create_dir_all(&project).unwrap();
    fs::write(tmp.path().join(".keyphrases.toml"), "title = \"Outer\"\n").unwrap();
    fs::write(project.join(".keyphrases.toml"), "title = \"Inner\"\n").unwrap();

    // title is not reported by info; the closer file is
    let config = config_json(&project);
    let reported = config["config_file"].as_str().unwrap();
    assert!(reported.contains("project"), "{reported}");
}

#[test]
fn git_boundary_stops_config_search() {
    let tmp = TempDir::new().unwrap();
    let parent = tmp.path().join("parent");
    let repo = parent.join("repo");
    let src = repo.join("src");
    fs::create_dir_all(&src).unwrap();
    fs::write(parent.join(".keyphrases.toml"), "total_freq_thresh = 9\n").unwrap();
    fs::create_dir(repo.join(".git")).unwrap();

    let config = config_json(&src);
    assert_eq!(config["total_freq_thresh"], 2);
    assert!(config["config_file"].is_null());
}

// =============================================================================
// Formats
// =============================================================================

#[test]
fn parses_yaml_config() {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join(".keyphrases.yaml"),
        "pos_pattern: nouns\nhighlight_class: hit\n",
    )
    .unwrap();

    let config = config_json(tmp.path());
    assert_eq!(config["pos_pattern"], "nouns");
    assert_eq!(config["highlight_class"], "hit");
}

#[test]
fn parses_json_config() {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join(".keyphrases.json"),
        r#"{"output": "out/report.html", "max_input_bytes": 1024}"#,
    )
    .unwrap();

    let config = config_json(tmp.path());
    assert_eq!(config["output"], "out/report.html");
    assert_eq!(config["max_input_bytes"], 1024);
}

#[test]
fn disable_input_limit_reports_no_limit() {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join(".keyphrases.toml"),
        "max_input_bytes = 10\ndisable_input_limit = true\n",
    )
    .unwrap();

    assert!(config_json(tmp.path())["max_input_bytes"].is_null());
}

#[test]
fn unknown_config_field_is_ignored() {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join(".keyphrases.toml"),
        "total_freq_thresh = 3\nsimilarity = 0.8\n",
    )
    .unwrap();

    assert_eq!(config_json(tmp.path())["total_freq_thresh"], 3);
}

// =============================================================================
// Precedence
// =============================================================================

#[test]
fn explicit_config_overrides_discovered() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join(".keyphrases.toml"), "total_freq_thresh = 3\n").unwrap();
    let explicit = tmp.path().join("override.toml");
    fs::write(&explicit, "total_freq_thresh = 6\n").unwrap();

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
    assert_eq!(json["config"]["total_freq_thresh"], 6);
    let reported = json["config"]["config_file"].as_str().unwrap();
    assert!(reported.ends_with("override.toml"), "{reported}");
}

#[test]
fn env_overrides_config_file() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join(".keyphrases.toml"), "total_freq_thresh = 3\n").unwrap();

    let output = cmd()
        .env("KEYPHRASES_TOTAL_FREQ_THRESH", "7")
        .args(["-C", tmp.path().to_str().unwrap(), "info", "--json"])
        .output()
        .expect("failed to run command");
    assert!(output.status.success());

    let json: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["config"]["total_freq_thresh"], 7);
}

#[test]
fn config_thresholds_drive_filter() {
    let tmp = TempDir::new().unwrap();
    write_corpus(tmp.path());
    fs::write(tmp.path().join(".keyphrases.toml"), "total_freq_thresh = 10\n").unwrap();

    let output = cmd()
        .args(["-C", tmp.path().to_str().unwrap(), "--json", "filter"])
        .output()
        .expect("failed to run command");
    assert!(output.status.success());

    let json: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["summary"]["thresholds"]["total_freq"], 10);
    assert_eq!(json["keyphrases"].as_array().unwrap().len(), 0);
}

#[test]
fn cli_flag_overrides_config_threshold() {
    let tmp = TempDir::new().unwrap();
    write_corpus(tmp.path());
    fs::write(tmp.path().join(".keyphrases.toml"), "total_freq_thresh = 10\n").unwrap();

    let output = cmd()
        .args(["-C", tmp.path().to_str().unwrap(), "--json", "filter", "-t", "3"])
        .output()
        .expect("failed to run command");
    assert!(output.status.success());

    let json: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["keyphrases"][0]["phrase"], "river delta");
}

#[test]
fn config_output_path_used_by_report() {
    let tmp = TempDir::new().unwrap();
    write_corpus(tmp.path());
    fs::write(
        tmp.path().join(".keyphrases.toml"),
        "output = \"site/index.html\"\ntitle = \"Delta Notes\"\n",
    )
    .unwrap();

    cmd()
        .args(["-C", tmp.path().to_str().unwrap(), "-q", "report"])
        .assert()
        .success();

    let html = fs::read_to_string(tmp.path().join("site").join("index.html")).unwrap();
    assert!(html.contains("Delta Notes"));
}

// =============================================================================
// Errors
// =============================================================================

#[test]
fn invalid_toml_config_shows_error() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join(".keyphrases.toml"), "not valid toml [[[").unwrap();

    cmd()
        .args(["-C", tmp.path().to_str().unwrap(), "info"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("configuration"));
}

#[test]
fn zero_threshold_in_config_is_rejected() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join(".keyphrases.toml"), "cross_doc_freq_thresh = 0\n").unwrap();

    cmd()
        .args(["-C", tmp.path().to_str().unwrap(), "info"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cross_doc_freq_thresh"));
}

#[test]
fn invalid_pos_pattern_in_config_is_rejected() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join(".keyphrases.toml"), "pos_pattern = \"<NN\"\n").unwrap();

    cmd()
        .args(["-C", tmp.path().to_str().unwrap(), "info"])
        .assert()
        .failure();
}
