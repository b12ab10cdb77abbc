//! CLI integration tests.

use std::fs;

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const PROBLEM: &str = r#"{
    "variables": ["x"],
    "constraints": [],
    "objectiveSummands": [
        {"constant": -0.5, "variables": ["x"], "coefficients": [1.0], "weight": 1.0, "squared": false}
    ]
}"#;

fn reasoner() -> Command {
    let mut cmd = cargo_bin_cmd!("cvx_reasoner");
    cmd.env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_solves_problem_file() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("problem.json");
    let output = dir.path().join("out").join("solution.json");
    fs::write(&input, PROBLEM).unwrap();

    reasoner()
        .arg(&input)
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("cvxpy_reasoner - Reading problem"))
        .stdout(predicate::str::contains("cvxpy_reasoner - Problem reading complete in"))
        .stdout(predicate::str::contains("cvxpy_reasoner - Beginning optimization"))
        .stdout(predicate::str::contains("cvxpy_reasoner - Result writing complete in"));

    let doc: serde_json::Value = serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
    let x = doc["solution"]["x"].as_f64().unwrap();
    assert!((-1e-6..=0.5 + 1e-4).contains(&x), "x = {x}");
}

#[test]
fn test_relative_paths() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("problem.json"), PROBLEM).unwrap();

    reasoner()
        .current_dir(dir.path())
        .args(["problem.json", "solution.json"])
        .assert()
        .success();

    assert!(dir.path().join("solution.json").is_file());
}

#[test]
fn test_help_prints_usage() {
    for arg in ["help", "--help", "-h-e-l-p", "HELP"] {
        reasoner()
            .arg(arg)
            .assert()
            .code(1)
            .stdout(predicate::str::contains("<input path> <output path>"))
            .stdout(predicate::str::contains("input path  - the path to a JSON file"));
    }
}

#[test]
fn test_help_with_paths_prints_usage() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("out.json");
    reasoner()
        .arg("in.json")
        .arg(&output)
        .arg("--help")
        .assert()
        .code(1)
        .stdout(predicate::str::starts_with("USAGE: "));
    assert!(!output.exists());
}

#[test]
fn test_wrong_argument_count_prints_usage() {
    reasoner().assert().code(1).stdout(predicate::str::contains("USAGE: "));
    reasoner()
        .arg("only-one.json")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("USAGE: "));
    reasoner()
        .args(["a.json", "b.json", "c.json"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("USAGE: "));
}

#[test]
fn test_missing_input_fails_without_output() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("missing.json");
    let output = dir.path().join("out").join("solution.json");

    reasoner()
        .arg(&input)
        .arg(&output)
        .assert()
        .failure()
        .stderr(predicate::str::contains("input path does not exist"));

    assert!(!output.exists());
    assert!(!dir.path().join("out").exists());
}

#[test]
fn test_malformed_json_fails() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("problem.json");
    fs::write(&input, "{\"variables\": [\"x\"").unwrap();

    reasoner()
        .arg(&input)
        .arg(dir.path().join("solution.json"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("JSON error"));
}

#[test]
fn test_infeasible_problem_fails() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("problem.json");
    fs::write(
        &input,
        r#"{"variables": ["x"], "constraints": [
            {"constant": 2, "variables": ["x"], "coefficients": [-1], "weight": -1, "squared": false}]}"#,
    )
    .unwrap();
    let output = dir.path().join("solution.json");

    reasoner()
        .arg(&input)
        .arg(&output)
        .assert()
        .failure()
        .stderr(predicate::str::contains("infeasible"));
    assert!(!output.exists());
}

#[test]
fn test_invalid_config_fails() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("problem.json");
    fs::write(&input, PROBLEM).unwrap();

    reasoner()
        .env("CVX_REASONER_MAX_ITER", "lots")
        .arg(&input)
        .arg(dir.path().join("solution.json"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("CVX_REASONER_MAX_ITER"));
}
