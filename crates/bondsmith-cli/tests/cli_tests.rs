//! End-to-end tests for the bondsmith binary.

use std::io::Write;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::Builder;

fn bondsmith() -> Command {
    let mut cmd = Command::cargo_bin("bondsmith").unwrap();
    cmd.env_remove("BONDSMITH_CONFIG").env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_universe_summary() {
    bondsmith()
        .args(["universe", "--summary"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Universe: 150 bonds"))
        .stdout(predicate::str::contains("AAA"));
}

#[test]
fn test_universe_limit_csv() {
    let output = bondsmith()
        .args(["--format", "csv", "universe", "--limit", "5"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let text = String::from_utf8(output.stdout).unwrap();
    // header plus five bonds
    assert_eq!(text.lines().count(), 6);
    assert!(text.starts_with("id,issuer,sector,rating"));
}

#[test]
fn test_optimize_json() {
    let output = bondsmith()
        .args(["optimize", "--format", "json", "--breakdown"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let doc: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let allocations = doc["allocations"].as_array().unwrap();
    assert!(!allocations.is_empty());
    assert!(doc["metrics"]["duration"].as_f64().unwrap() > 0.0);
    assert!(doc["breakdown"]["by_rating"].is_object());
}

#[test]
fn test_optimize_unreachable_duration_fails() {
    bondsmith()
        .args(["optimize", "--target-duration", "50"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Optimization failed"));
}

#[test]
fn test_invalid_override_is_rejected() {
    bondsmith()
        .args(["optimize", "--max-allocation", "1.5"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("max_allocation"));
}

#[test]
fn test_stress_csv_lists_every_scenario() {
    let output = bondsmith()
        .args(["--format", "csv", "stress"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let text = String::from_utf8(output.stdout).unwrap();
    assert_eq!(text.lines().count(), 8);
    assert!(text.contains("Credit Crisis"));
}

#[test]
fn test_stress_selected_scenarios() {
    bondsmith()
        .args(["stress", "--scenario", "rate_shock_up_200"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Worst scenario:"));
}

#[test]
fn test_monte_carlo_json_is_reproducible() {
    let run = || {
        bondsmith()
            .args(["monte-carlo", "-n", "500", "--seed", "7", "--format", "json"])
            .output()
            .unwrap()
    };
    let first = run();
    let second = run();
    assert!(first.status.success());
    assert_eq!(first.stdout, second.stdout);

    let doc: serde_json::Value = serde_json::from_slice(&first.stdout).unwrap();
    assert_eq!(doc["n_simulations"], 500);
    assert_eq!(doc["var_cvar"].as_array().unwrap().len(), 3);
}

#[test]
fn test_backtest_quarterly() {
    let output = bondsmith()
        .args(["backtest", "--cadence", "quarterly", "--periods", "4", "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let doc: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(doc["cadence"], "quarterly");
    // period zero plus four simulated periods
    assert_eq!(doc["time_series"].as_array().unwrap().len(), 5);
}

#[test]
fn test_frontier_table() {
    bondsmith()
        .args(["frontier", "--points", "3", "--min-duration", "3", "--max-duration", "7"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Efficient Frontier"));
}

#[test]
fn test_config_file() {
    let mut file = Builder::new().suffix(".toml").tempfile().unwrap();
    writeln!(
        file,
        r#"
[market]
n_bonds = 40
seed = 3
"#
    )
    .unwrap();

    bondsmith()
        .args(["universe", "--summary", "--config"])
        .arg(file.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Universe: 40 bonds"));
}

#[test]
fn test_missing_config_file() {
    bondsmith()
        .args(["universe", "--config", "/nonexistent/engine.toml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("I/O error"));
}
