//! Integration tests for bondsmith-config.

use std::io::Write;

use bondsmith_config::{ConfigError, EngineConfig, Validate};
use bondsmith_market::DataSource;
use bondsmith_portfolio::Objective;
use bondsmith_risk::Cadence;
use tempfile::Builder;

fn write_temp(suffix: &str, contents: &str) -> tempfile::NamedTempFile {
    let mut file = Builder::new().suffix(suffix).tempfile().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn load_partial_toml() {
    let file = write_temp(
        ".toml",
        r#"
[market]
source = "csv"
csv_path = "data/real_bonds.csv"

[optimization]
objective = "OptimizeSharpe"
max_sector_allocation = 0.4
junk_ratings = ["B", "CCC", "D"]

[stress]
scenario_keys = ["rate_shock_up_200", "2008_replay"]

[backtest]
cadence = "quarterly"
n_periods = 8
"#,
    );

    let config = EngineConfig::load(file.path()).unwrap();
    assert_eq!(config.market.source, DataSource::Csv);
    assert_eq!(config.market.n_bonds, 150);

    let request = config.allocation_request().unwrap();
    assert_eq!(request.objective, Objective::OptimizeSharpe);
    assert!((request.constraints.max_sector_allocation - 0.4).abs() < 1e-12);
    assert!((request.constraints.max_allocation - 0.2).abs() < 1e-12);
    assert_eq!(request.constraints.junk_ratings.len(), 9);

    assert_eq!(config.stress.scenarios().len(), 2);
    assert_eq!(config.backtest.cadence, Cadence::Quarterly);
    assert_eq!(config.backtest.n_periods, 8);
    assert_eq!(config.monte_carlo.n_simulations, 10_000);
}

#[test]
fn load_json() {
    let file = write_temp(
        ".json",
        r#"{ "monte_carlo": { "n_simulations": 500, "confidence_levels": [0.975] } }"#,
    );
    let config = EngineConfig::load(file.path()).unwrap();
    assert_eq!(config.monte_carlo.n_simulations, 500);
    assert_eq!(config.monte_carlo.confidence_levels, vec![0.975]);
}

#[test]
fn load_rejects_invalid_values() {
    let file = write_temp(
        ".toml",
        r#"
[monte_carlo]
n_simulations = 0
"#,
    );
    let err = EngineConfig::load(file.path()).unwrap_err();
    assert!(matches!(
        err,
        ConfigError::Validation { ref field, .. } if field == "monte_carlo.n_simulations"
    ));
}

#[test]
fn load_rejects_malformed_file() {
    let file = write_temp(".toml", "[optimization\ncapital = 5");
    assert!(matches!(
        EngineConfig::load(file.path()),
        Err(ConfigError::Deserialization(_))
    ));

    let file = write_temp(".json", r#"{ "optimization": { "capital": "lots" } }"#);
    assert!(matches!(
        EngineConfig::load(file.path()),
        Err(ConfigError::Deserialization(_))
    ));
}

#[test]
fn load_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    assert!(matches!(
        EngineConfig::load(dir.path().join("absent.toml")),
        Err(ConfigError::Io { .. })
    ));
}

#[test]
fn save_and_reload_both_formats() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = EngineConfig::default();
    config.optimization.target_duration = 7.5;
    config.backtest.cadence = Cadence::Quarterly;
    config.stress.scenario_keys = Some(vec!["credit_crisis".into()]);

    for name in ["engine.toml", "engine.json"] {
        let path = dir.path().join(name);
        config.save(&path).unwrap();
        let reloaded = EngineConfig::load(&path).unwrap();
        assert_eq!(reloaded, config);
    }
}

#[test]
fn default_config_is_valid() {
    assert!(EngineConfig::default().is_valid());
    assert!(EngineConfig::default().validate_or_error().is_ok());
}
