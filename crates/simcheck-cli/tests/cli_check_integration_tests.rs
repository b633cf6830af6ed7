//! CLI integration tests
//!
//! Run the built binary against temporary tolerance tables and run inputs.

use serde_json::Value;
use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};
use tempfile::TempDir;

const THRESHOLDS: &str = "\
# defaults
*, * = 0.1, -1
K, * = 0.2, -1
K, Hourly = 0.5, -1
kWh, Monthly = 5.0, 0.005
";

const RUN_INPUT: &str = r#"{
    "comparisons": [
        {"entity_id": "zone-a", "entity_type": "ThermalZone", "location": "Ground floor",
         "reference_value": 20.0, "candidate_value": 20.4, "unit": "K", "aggregation": "Hourly"},
        {"entity_id": "zone-a", "entity_type": "ThermalZone", "location": "Ground floor",
         "reference_value": 20.0, "candidate_value": 20.3, "unit": "K", "aggregation": "Monthly"}
    ],
    "missing_properties": [
        {"entity_id": "wall-7", "entity_type": "OuterWall", "property_name": "u_value"}
    ],
    "entities_considered": 4
}"#;

fn write_fixture(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

fn run(args: &[&str]) -> Output {
    let cli_bin = env!("CARGO_BIN_EXE_simcheck-cli");
    Command::new(cli_bin)
        .env("RUST_LOG", "off")
        .args(args)
        .output()
        .expect("Failed to execute CLI")
}

#[test]
fn test_cli_check_prints_summary_json() {
    let temp_dir = TempDir::new().unwrap();
    let thresholds = write_fixture(&temp_dir, "thresholds.txt", THRESHOLDS);
    let input = write_fixture(&temp_dir, "run.json", RUN_INPUT);

    let output = run(&[
        "check",
        "--thresholds",
        thresholds.to_str().unwrap(),
        "--input",
        input.to_str().unwrap(),
    ]);
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let summary: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(summary["total_findings"], 2);
    assert_eq!(summary["affected_entities"], 2);
    assert_eq!(summary["entities_considered"], 4);
    assert_eq!(summary["category_totals"]["difference:K/Monthly"], 1);
    assert_eq!(summary["category_totals"]["missing_property:u_value"], 1);
    assert_eq!(summary["entity_types"][0]["entity_type"], "ThermalZone");
    assert_eq!(summary["thresholds_digest"].as_str().unwrap().len(), 64);
}

#[test]
fn test_cli_check_writes_output_file() {
    let temp_dir = TempDir::new().unwrap();
    let thresholds = write_fixture(&temp_dir, "thresholds.txt", THRESHOLDS);
    let input = write_fixture(&temp_dir, "run.json", RUN_INPUT);
    let out_path = temp_dir.path().join("summary.json");

    let output = run(&[
        "check",
        "-t",
        thresholds.to_str().unwrap(),
        "-i",
        input.to_str().unwrap(),
        "-o",
        out_path.to_str().unwrap(),
        "--include-passing",
        "--threads",
        "2",
    ]);
    assert!(output.status.success());

    let summary: Value = serde_json::from_str(&fs::read_to_string(&out_path).unwrap()).unwrap();
    // The passing K/Hourly comparison is listed but is not an issue
    assert_eq!(summary["total_findings"], 3);
    assert_eq!(summary["total_issues"], 2);
}

#[test]
fn test_cli_bad_rule_line_reports_line_and_fails() {
    let temp_dir = TempDir::new().unwrap();
    let thresholds = write_fixture(&temp_dir, "thresholds.txt", "*, * = 0.1, -1\nK, Hourly = x, 1\n");
    let input = write_fixture(&temp_dir, "run.json", RUN_INPUT);

    let output = run(&[
        "check",
        "--thresholds",
        thresholds.to_str().unwrap(),
        "--input",
        input.to_str().unwrap(),
    ]);
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("ERR_CONFIG_PARSE"), "stderr: {}", stderr);
    assert!(stderr.contains("line 2"), "stderr: {}", stderr);
    assert!(stderr.contains("K, Hourly = x, 1"), "stderr: {}", stderr);
    assert!(output.stdout.is_empty());
}

#[test]
fn test_cli_missing_default_fails() {
    let temp_dir = TempDir::new().unwrap();
    let thresholds = write_fixture(&temp_dir, "thresholds.txt", "K, * = 0.2, -1\n");
    let input = write_fixture(&temp_dir, "run.json", RUN_INPUT);

    let output = run(&[
        "check",
        "--thresholds",
        thresholds.to_str().unwrap(),
        "--input",
        input.to_str().unwrap(),
    ]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("ERR_NO_DEFAULT_THRESHOLD"));
}

#[test]
fn test_cli_resolve_reports_tier() {
    let temp_dir = TempDir::new().unwrap();
    let thresholds = write_fixture(&temp_dir, "thresholds.txt", THRESHOLDS);

    let output = run(&[
        "resolve",
        "--thresholds",
        thresholds.to_str().unwrap(),
        "--unit",
        "K",
        "--aggregation",
        "Monthly",
    ]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("K, * = 0.2, -1"), "stdout: {}", stdout);
    assert!(stdout.contains("matched: unit (line 3)"));
}

#[test]
fn test_cli_rules_output_reloads() {
    let temp_dir = TempDir::new().unwrap();
    let thresholds = write_fixture(&temp_dir, "thresholds.txt", THRESHOLDS);

    let output = run(&["rules", "--thresholds", thresholds.to_str().unwrap()]);
    assert!(output.status.success());
    let normalized = String::from_utf8(output.stdout).unwrap();
    assert!(normalized.contains("# 4 rules, digest "));

    // The printed table is itself a valid tolerance table
    let reprinted = write_fixture(&temp_dir, "normalized.txt", &normalized);
    let again = run(&["rules", "--thresholds", reprinted.to_str().unwrap()]);
    assert_eq!(String::from_utf8(again.stdout).unwrap(), normalized);
}
