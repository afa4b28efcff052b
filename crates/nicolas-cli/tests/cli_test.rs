use assert_cmd::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

fn repo_root() -> PathBuf {
    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
    manifest_dir
        .parent()
        .and_then(|p| p.parent())
        .expect("expected crates/<name> layout")
        .to_path_buf()
}

fn fixture(name: &str) -> PathBuf {
    let path = repo_root().join("fixtures").join("schemas").join(name);
    assert!(path.exists(), "fixture missing: {}", path.display());
    path
}

fn run_json(args: &[&str]) -> Value {
    let exe = assert_cmd::cargo_bin!("nicolas-cli");
    let output = Command::new(exe).args(args).output().expect("run nicolas-cli");
    assert!(
        output.status.success(),
        "nicolas-cli failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("stdout is JSON")
}

#[test]
fn cli_lays_out_selected_nodes_from_a_file() {
    let path = fixture("account_star.json");
    let out = run_json(&["layout", "--report", path.to_string_lossy().as_ref()]);

    let positions = out["positions"].as_object().expect("positions object");
    assert_eq!(positions.len(), 6);
    assert!(positions.get("lead").is_none());
    assert_eq!(out["depth"], "oneLevel");
    assert_eq!(out["layers"]["account"], 0);

    let account_y = positions["account"]["y"].as_f64().unwrap();
    for owned in ["case", "contact", "invoice", "opportunity", "quote"] {
        assert_eq!(out["layers"][owned], 1, "{owned} layer");
        assert!(account_y < positions[owned]["y"].as_f64().unwrap(), "account above {owned}");
    }
}

#[test]
fn cli_reads_stdin_and_is_deterministic() {
    let text = fs::read_to_string(fixture("crm.json")).expect("read fixture");

    let run = || {
        let exe = assert_cmd::cargo_bin!("nicolas-cli");
        assert_cmd::Command::new(exe)
            .arg("layout")
            .write_stdin(text.clone())
            .assert()
            .success()
            .get_output()
            .stdout
            .clone()
    };
    let first = run();
    assert_eq!(first, run());

    let value: Value = serde_json::from_slice(&first).expect("stdout is JSON");
    assert_eq!(value["positions"].as_object().unwrap().len(), 16);
}

#[test]
fn cli_report_includes_pipeline_details() {
    let path = fixture("crm.json");
    let out = run_json(&["layout", "--report", path.to_string_lossy().as_ref()]);

    assert_eq!(out["depth"], "twoLevel");
    assert_eq!(out["communities"].as_object().unwrap().len(), 16);
    assert_eq!(out["layers"]["account"], 0);
    assert!(!out["rectangles"].as_array().unwrap().is_empty());
}

#[test]
fn cli_applies_config_overrides() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let config = tmp.path().join("config.json");
    fs::write(&config, r#"{"startX": 0, "startY": 0}"#).expect("write config");

    let single = tmp.path().join("single.json");
    fs::write(&single, r#"{"nodes": ["only"]}"#).expect("write input");

    let out = run_json(&[
        "layout",
        "--config",
        config.to_string_lossy().as_ref(),
        single.to_string_lossy().as_ref(),
    ]);
    assert_eq!(out["positions"]["only"]["x"], 0.0);
    assert_eq!(out["positions"]["only"]["y"], 0.0);
}

#[test]
fn cli_rejects_invalid_config() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let config = tmp.path().join("config.json");
    fs::write(&config, r#"{"intraSpacingX": -10}"#).expect("write config");

    let exe = assert_cmd::cargo_bin!("nicolas-cli");
    Command::new(exe)
        .args(["validate-config", config.to_string_lossy().as_ref()])
        .assert()
        .code(1);
}

#[test]
fn cli_validate_config_prints_effective_values() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let config = tmp.path().join("config.json");
    fs::write(&config, r#"{"cardWidth": 240}"#).expect("write config");

    let out = run_json(&["validate-config", config.to_string_lossy().as_ref()]);
    assert_eq!(out["cardWidth"], 240.0);
    assert_eq!(out["minCommunitySize"], 6);
}

#[test]
fn cli_unknown_flag_is_a_usage_error() {
    let exe = assert_cmd::cargo_bin!("nicolas-cli");
    Command::new(exe).arg("--bogus").assert().code(2);
}
