//! CLI integration tests against the built binary.

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;

fn arbscout() -> Command {
    cargo_bin_cmd!("arbscout")
}

fn write(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).expect("write temp file");
    path
}

/// A config whose sources refuse connections and that never waits between
/// attempts.
fn offline_config(dir: &Path) -> PathBuf {
    let report = dir.join("discarded.json");
    let toml = format!(
        r#"
[pipeline]
scrape_workers = 2
fetch_timeout_ms = 2000
flush_retry_delay_ms = 0

[pacing]
max_attempts = 1
max_delay_ms = 0

[pacing.buff]
min_delay_ms = 0
jitter_ms = 0

[pacing.steam]
min_delay_ms = 0
jitter_ms = 0

[sources]
buff_base_url = "http://127.0.0.1:1/buff/"
steam_base_url = "http://127.0.0.1:1/steam/"
connect_timeout_ms = 500

[storage]
database = "{database}"

[report]
discarded_path = "{report}"
"#,
        database = dir.join("arbscout.db").display(),
        report = report.display(),
    );
    write(dir, "config.toml", &toml)
}

const CANDIDATES: &str = r#"{"name":"AK-47 | Redline","quality":"Field-Tested","buff_locator":"goods/1","steam_locator":"listings/730/1"}
# comment lines are skipped
{"name":"Charm | Lil' Squirt","buff_locator":"goods/2","steam_locator":"listings/730/2"}
{"name":"AWP | Asiimov","stattrak":true,"buff_url":"goods/3","steam_url":"listings/730/3"}
"#;

#[test]
fn help_lists_commands() {
    arbscout()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("arbscout"))
        .stdout(predicate::str::contains("run"))
        .stdout(predicate::str::contains("config"));
}

#[test]
fn version_is_printed() {
    arbscout()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn config_init_writes_the_example() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("config.toml");

    arbscout()
        .args(["config", "init"])
        .arg(&path)
        .assert()
        .success();

    let written = fs::read_to_string(&path).unwrap();
    assert!(written.contains("[pipeline]"));

    arbscout()
        .args(["config", "init"])
        .arg(&path)
        .assert()
        .failure();
    arbscout()
        .args(["config", "init", "--force"])
        .arg(&path)
        .assert()
        .success();
}

#[test]
fn config_validate_accepts_the_example() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(
        dir.path(),
        "config.toml",
        include_str!("../config.toml.example"),
    );

    arbscout()
        .args(["config", "validate", "--config"])
        .arg(&path)
        .assert()
        .success();
}

#[test]
fn cli_returns_nonzero_on_config_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(dir.path(), "config.toml", "[pipeline]\nscrape_workers = 9\n");

    let output = arbscout()
        .args(["config", "validate", "--config"])
        .arg(&path)
        .output()
        .expect("run arbscout");

    assert!(!output.status.success(), "Expected nonzero exit code");
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        format!("{stdout}{stderr}").contains("scrape_workers"),
        "Expected error message about invalid config.\nstdout: {stdout}\nstderr: {stderr}"
    );
}

#[test]
fn malformed_config_is_reported_with_its_location() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(dir.path(), "config.toml", "[pipeline\nscrape_workers = 2\n");

    arbscout()
        .args(["config", "validate", "--config"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("config"));
}

#[test]
fn config_show_json_reports_effective_values() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(dir.path(), "config.toml", "profile = \"balanced\"\n");

    let output = arbscout()
        .args(["--json", "config", "show", "--config"])
        .arg(&path)
        .env("ARBSCOUT_DATABASE", "/tmp/override.db")
        .output()
        .expect("run arbscout");
    assert!(output.status.success());

    let value: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout is one JSON object");
    assert_eq!(value["command"], "config.show");
    assert_eq!(value["profile"], "balanced");
    assert_eq!(value["pipeline"]["scrape_workers"], 2);
    assert_eq!(value["database"], "/tmp/override.db");
}

#[test]
fn missing_config_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    arbscout()
        .args(["config", "show", "--config"])
        .arg(dir.path().join("absent.toml"))
        .assert()
        .failure();
}

#[test]
fn dry_run_against_unreachable_sources_reports_discards() {
    let dir = tempfile::tempdir().unwrap();
    let config = offline_config(dir.path());
    let candidates = write(dir.path(), "items.jsonl", CANDIDATES);

    let output = arbscout()
        .args(["--json", "run", "--dry-run", "--config"])
        .arg(&config)
        .arg("--candidates")
        .arg(&candidates)
        .env_remove("ARBSCOUT_DATABASE")
        .timeout(std::time::Duration::from_secs(60))
        .output()
        .expect("run arbscout");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        output.status.success(),
        "run failed\nstdout: {stdout}\nstderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let last = stdout.lines().last().expect("summary line");
    let value: serde_json::Value = serde_json::from_str(last).unwrap();
    assert_eq!(value["command"], "run");
    let summary = &value["summary"];
    assert_eq!(summary["seen"], 2);
    assert_eq!(summary["excluded"], 1);
    assert_eq!(summary["accepted"], 0);
    assert_eq!(summary["persisted"], 0);

    let report: serde_json::Value =
        serde_json::from_slice(&fs::read(dir.path().join("discarded.json")).unwrap()).unwrap();
    assert_eq!(report.as_array().unwrap().len(), 2);
    assert!(!dir.path().join("arbscout.db").exists());
}

#[test]
fn run_requires_a_candidate_file() {
    arbscout().args(["run", "--dry-run"]).assert().failure();
}

#[test]
fn run_fails_when_the_candidate_file_is_missing() {
    let dir = tempfile::tempdir().unwrap();
    let config = offline_config(dir.path());

    arbscout()
        .args(["run", "--dry-run", "--config"])
        .arg(&config)
        .arg("--candidates")
        .arg(dir.path().join("absent.jsonl"))
        .timeout(std::time::Duration::from_secs(60))
        .assert()
        .failure();
}
