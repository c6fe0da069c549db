//! The `EngineConfig` aggregate and its sections.

use std::path::Path;

use bondsmith_core::CreditRating;
use bondsmith_market::{DataSource, MarketConfig};
use bondsmith_portfolio::{AllocationConstraints, AllocationRequest, FrontierConfig, Objective};
use bondsmith_risk::stress::standard;
use bondsmith_risk::{BacktestConfig, MonteCarloConfig, StressConfig};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ConfigError, ConfigResult, Validate, ValidationError};

// =============================================================================
// OPTIMIZATION SECTION
// =============================================================================

/// Allocation request settings as written in a config file.
///
/// The objective and junk ratings stay as text here so a bad label surfaces
/// as a validation error naming the field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizationSettings {
    /// `MaximizeYield` or `OptimizeSharpe`.
    pub objective: String,
    /// Required portfolio duration in years.
    pub target_duration: f64,
    /// Capital to allocate.
    pub capital: f64,
    /// Per-instrument weight cap.
    pub max_allocation: f64,
    /// Aggregate junk cap.
    pub max_junk_allocation: f64,
    /// Per-sector cap.
    pub max_sector_allocation: f64,
    /// Ratings counted as junk. Letter grades cover their notches.
    pub junk_ratings: Vec<String>,
    /// Risk-free rate for Sharpe ratios.
    pub risk_free_rate: f64,
}

impl Default for OptimizationSettings {
    fn default() -> Self {
        let request = AllocationRequest::default();
        Self {
            objective: request.objective.name().to_string(),
            target_duration: request.constraints.target_duration,
            capital: request.capital,
            max_allocation: request.constraints.max_allocation,
            max_junk_allocation: request.constraints.max_junk_allocation,
            max_sector_allocation: request.constraints.max_sector_allocation,
            junk_ratings: ["BB", "B", "CCC", "D"].map(String::from).to_vec(),
            risk_free_rate: request.risk_free_rate,
        }
    }
}

impl OptimizationSettings {
    /// Parsed objective.
    pub fn objective(&self) -> ConfigResult<Objective> {
        self.objective
            .parse()
            .map_err(|e: bondsmith_portfolio::PortfolioError| ConfigError::Validation {
                field: "optimization.objective".into(),
                message: e.to_string(),
            })
    }

    /// Junk labels expanded to notches, sorted and deduplicated.
    pub fn junk_ratings(&self) -> ConfigResult<Vec<CreditRating>> {
        let mut ratings = Vec::new();
        for label in &self.junk_ratings {
            let grade =
                CreditRating::parse_grade(label).ok_or_else(|| ConfigError::Validation {
                    field: "optimization.junk_ratings".into(),
                    message: format!("unknown rating '{label}'"),
                })?;
            ratings.extend(grade);
        }
        ratings.sort();
        ratings.dedup();
        Ok(ratings)
    }

    /// Constraint set.
    pub fn constraints(&self) -> ConfigResult<AllocationConstraints> {
        Ok(AllocationConstraints::default()
            .with_target_duration(self.target_duration)
            .with_max_allocation(self.max_allocation)
            .with_max_junk_allocation(self.max_junk_allocation)
            .with_max_sector_allocation(self.max_sector_allocation)
            .with_junk_ratings(self.junk_ratings()?))
    }

    /// Solver request.
    pub fn request(&self) -> ConfigResult<AllocationRequest> {
        Ok(AllocationRequest::new(self.objective()?)
            .with_constraints(self.constraints()?)
            .with_capital(self.capital)
            .with_risk_free_rate(self.risk_free_rate))
    }
}

fn unit_interval(errors: &mut Vec<ValidationError>, field: &str, value: f64) {
    if !(0.0..=1.0).contains(&value) {
        errors.push(ValidationError::with_rule(
            field,
            format!("must be in [0, 1], got {value}"),
            "unit_interval",
        ));
    }
}

fn positive(errors: &mut Vec<ValidationError>, field: &str, value: f64) {
    if !(value.is_finite() && value > 0.0) {
        errors.push(ValidationError::with_rule(
            field,
            format!("must be positive, got {value}"),
            "positive",
        ));
    }
}

impl Validate for OptimizationSettings {
    fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        if self.objective.parse::<Objective>().is_err() {
            errors.push(ValidationError::with_rule(
                "objective",
                format!(
                    "unknown objective '{}' (expected MaximizeYield or OptimizeSharpe)",
                    self.objective
                ),
                "known_objective",
            ));
        }

        positive(&mut errors, "target_duration", self.target_duration);
        positive(&mut errors, "capital", self.capital);

        if !(self.max_allocation > 0.0 && self.max_allocation <= 1.0) {
            errors.push(ValidationError::with_rule(
                "max_allocation",
                format!("must be in (0, 1], got {}", self.max_allocation),
                "half_open_unit_interval",
            ));
        }
        unit_interval(&mut errors, "max_junk_allocation", self.max_junk_allocation);
        unit_interval(&mut errors, "max_sector_allocation", self.max_sector_allocation);

        for label in &self.junk_ratings {
            if CreditRating::parse_grade(label).is_none() {
                errors.push(ValidationError::with_rule(
                    "junk_ratings",
                    format!("unknown rating '{label}'"),
                    "known_rating",
                ));
            }
        }

        if !self.risk_free_rate.is_finite() {
            errors.push(ValidationError::new("risk_free_rate", "must be finite"));
        }

        errors
    }
}

// =============================================================================
// SECTION VALIDATION
// =============================================================================

impl Validate for MarketConfig {
    fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        if self.source == DataSource::Synthetic && self.n_bonds == 0 {
            errors.push(ValidationError::with_rule(
                "n_bonds",
                "must be positive",
                "positive",
            ));
        }
        if self.source == DataSource::Csv && self.csv_path.is_none() {
            errors.push(ValidationError::new(
                "csv_path",
                "required when source is csv",
            ));
        }
        if self.universe_ttl_secs == 0 {
            errors.push(ValidationError::new("universe_ttl_secs", "must be positive"));
        }
        if self.curve_ttl_secs == 0 {
            errors.push(ValidationError::new("curve_ttl_secs", "must be positive"));
        }

        errors
    }
}

impl Validate for MonteCarloConfig {
    fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        if self.n_simulations == 0 {
            errors.push(ValidationError::with_rule(
                "n_simulations",
                "must be positive",
                "positive",
            ));
        }
        if self.time_horizon_days == 0 {
            errors.push(ValidationError::with_rule(
                "time_horizon_days",
                "must be positive",
                "positive",
            ));
        }
        if self.histogram_bins == 0 {
            errors.push(ValidationError::new("histogram_bins", "must be positive"));
        }
        for (i, cl) in self.confidence_levels.iter().enumerate() {
            if !(*cl > 0.0 && *cl < 1.0) {
                errors.push(ValidationError::with_rule(
                    format!("confidence_levels[{i}]"),
                    format!("must be in (0, 1), got {cl}"),
                    "open_unit_interval",
                ));
            }
        }

        errors
    }
}

impl Validate for StressConfig {
    fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        for key in self.scenario_keys.iter().flatten() {
            if standard::by_key(key).is_none() {
                errors.push(ValidationError::with_rule(
                    "scenario_keys",
                    format!(
                        "unknown scenario '{key}' (expected one of {})",
                        standard::KEYS.join(", ")
                    ),
                    "known_scenario",
                ));
            }
        }
        if !self.risk_free_rate.is_finite() {
            errors.push(ValidationError::new("risk_free_rate", "must be finite"));
        }

        errors
    }
}

impl Validate for BacktestConfig {
    fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        if self.n_periods == 0 {
            errors.push(ValidationError::with_rule(
                "n_periods",
                "must be positive",
                "positive",
            ));
        }
        if !(self.risk_free_rate.is_finite() && self.risk_free_rate >= 0.0) {
            errors.push(ValidationError::new(
                "risk_free_rate",
                format!("must be non-negative, got {}", self.risk_free_rate),
            ));
        }

        errors
    }
}

impl Validate for FrontierConfig {
    fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        positive(&mut errors, "min_duration", self.min_duration);
        if self.max_duration < self.min_duration {
            errors.push(ValidationError::new(
                "max_duration",
                format!(
                    "must be at least min_duration ({}), got {}",
                    self.min_duration, self.max_duration
                ),
            ));
        }
        if self.points == 0 {
            errors.push(ValidationError::new("points", "must be positive"));
        }

        errors
    }
}

// =============================================================================
// ENGINE CONFIG
// =============================================================================

/// Complete engine configuration.
///
/// # Example
///
/// ```rust
/// use bondsmith_config::{EngineConfig, Validate};
///
/// let config = EngineConfig::from_toml_str(r#"
///     [optimization]
///     objective = "OptimizeSharpe"
///     target_duration = 6.5
///
///     [monte_carlo]
///     n_simulations = 2000
/// "#).unwrap();
///
/// assert_eq!(config.optimization.target_duration, 6.5);
/// assert_eq!(config.optimization.capital, 100_000.0);
/// assert_eq!(config.monte_carlo.n_simulations, 2000);
/// assert!(config.is_valid());
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Universe and curve acquisition.
    pub market: MarketConfig,
    /// Allocation request.
    pub optimization: OptimizationSettings,
    /// Efficient frontier sweep.
    pub frontier: FrontierConfig,
    /// Monte Carlo VaR.
    pub monte_carlo: MonteCarloConfig,
    /// Stress testing.
    pub stress: StressConfig,
    /// Backtesting.
    pub backtest: BacktestConfig,
}

impl EngineConfig {
    /// Parses TOML. Absent sections and fields keep their defaults.
    pub fn from_toml_str(s: &str) -> ConfigResult<Self> {
        Ok(toml::from_str(s)?)
    }

    /// Parses JSON. Absent sections and fields keep their defaults.
    pub fn from_json_str(s: &str) -> ConfigResult<Self> {
        Ok(serde_json::from_str(s)?)
    }

    /// Reads a `.toml` or `.json` file, then validates it.
    ///
    /// # Errors
    ///
    /// I/O, format, parse and validation failures.
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let format = Format::from_path(path)?;
        let text = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::io(path.display().to_string(), e.to_string()))?;
        let config = match format {
            Format::Toml => Self::from_toml_str(&text)?,
            Format::Json => Self::from_json_str(&text)?,
        };
        config.validate_or_error()?;
        debug!(path = %path.display(), "configuration loaded");
        Ok(config)
    }

    /// Writes the configuration in the format named by the extension.
    pub fn save(&self, path: impl AsRef<Path>) -> ConfigResult<()> {
        let path = path.as_ref();
        let text = match Format::from_path(path)? {
            Format::Toml => self.to_toml_string()?,
            Format::Json => self.to_json_string()?,
        };
        std::fs::write(path, text)
            .map_err(|e| ConfigError::io(path.display().to_string(), e.to_string()))
    }

    /// TOML rendering.
    pub fn to_toml_string(&self) -> ConfigResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Pretty JSON rendering.
    pub fn to_json_string(&self) -> ConfigResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Solver request built from the optimization section.
    pub fn allocation_request(&self) -> ConfigResult<AllocationRequest> {
        self.optimization.request()
    }
}

impl Validate for EngineConfig {
    fn validate(&self) -> Vec<ValidationError> {
        // Section types also carry inherent `validate` methods returning
        // `Result`; the trait form collects every problem.
        let sections: [(&str, Vec<ValidationError>); 6] = [
            ("market", Validate::validate(&self.market)),
            ("optimization", Validate::validate(&self.optimization)),
            ("frontier", Validate::validate(&self.frontier)),
            ("monte_carlo", Validate::validate(&self.monte_carlo)),
            ("stress", Validate::validate(&self.stress)),
            ("backtest", Validate::validate(&self.backtest)),
        ];
        sections
            .into_iter()
            .flat_map(|(name, errors)| errors.into_iter().map(move |e| e.within(name)))
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Toml,
    Json,
}

impl Format {
    fn from_path(path: &Path) -> ConfigResult<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("toml") => Ok(Self::Toml),
            Some("json") => Ok(Self::Json),
            _ => Err(ConfigError::UnsupportedFormat {
                path: path.display().to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        let opt = &config.optimization;
        assert_eq!(opt.objective, "MaximizeYield");
        assert_relative_eq!(opt.target_duration, 5.0);
        assert_relative_eq!(opt.capital, 100_000.0);
        assert_relative_eq!(opt.max_allocation, 0.20);
        assert_relative_eq!(opt.max_junk_allocation, 0.30);
        assert_relative_eq!(opt.max_sector_allocation, 0.25);
        assert_relative_eq!(opt.risk_free_rate, 0.01);
        assert_eq!(opt.junk_ratings, vec!["BB", "B", "CCC", "D"]);

        assert_eq!(config.monte_carlo.n_simulations, 10_000);
        assert_eq!(config.monte_carlo.time_horizon_days, 252);
        assert_eq!(config.monte_carlo.seed, 42);
        assert_relative_eq!(config.stress.risk_free_rate, 0.04);
        assert_eq!(config.backtest.n_periods, 12);
        assert_eq!(config.market.n_bonds, 150);
        assert_eq!(config.market.universe_ttl_secs, 3600);
        assert_eq!(config.market.curve_ttl_secs, 900);
        assert!(config.is_valid());
    }

    #[test]
    fn test_junk_labels_expand_to_notches() {
        let opt = OptimizationSettings::default();
        let junk = opt.junk_ratings().unwrap();
        assert!(junk.contains(&CreditRating::BBPlus));
        assert!(junk.contains(&CreditRating::BMinus));
        assert!(junk.contains(&CreditRating::C));
        assert!(junk.contains(&CreditRating::D));
        assert!(!junk.contains(&CreditRating::BBBMinus));
        assert_eq!(junk, CreditRating::non_investment_grade());
    }

    #[test]
    fn test_request_mirrors_settings() {
        let opt = OptimizationSettings {
            objective: "Optimize Sharpe Ratio".into(),
            target_duration: 7.0,
            capital: 1_000_000.0,
            ..OptimizationSettings::default()
        };
        let request = opt.request().unwrap();
        assert_eq!(request.objective, Objective::OptimizeSharpe);
        assert_relative_eq!(request.constraints.target_duration, 7.0);
        assert_relative_eq!(request.capital, 1_000_000.0);
    }

    #[test]
    fn test_validation_collects_every_section() {
        let mut config = EngineConfig::default();
        config.optimization.objective = "MinimizeRisk".into();
        config.optimization.max_allocation = 0.0;
        config.optimization.junk_ratings.push("ZZ".into());
        config.monte_carlo.n_simulations = 0;
        config.monte_carlo.confidence_levels = vec![0.95, 1.0];
        config.stress.scenario_keys = Some(vec!["credit_crisis".into(), "alien_invasion".into()]);
        config.backtest.n_periods = 0;

        let fields: Vec<String> = config.validate().into_iter().map(|e| e.field).collect();
        assert_eq!(
            fields,
            vec![
                "optimization.objective",
                "optimization.max_allocation",
                "optimization.junk_ratings",
                "monte_carlo.n_simulations",
                "monte_carlo.confidence_levels[1]",
                "stress.scenario_keys",
                "backtest.n_periods",
            ]
        );
    }

    #[test]
    fn test_objective_error_names_field() {
        let opt = OptimizationSettings {
            objective: "Whatever".into(),
            ..OptimizationSettings::default()
        };
        assert!(matches!(
            opt.request(),
            Err(ConfigError::Validation { ref field, .. }) if field == "optimization.objective"
        ));
    }

    #[test]
    fn test_partial_json() {
        let config = EngineConfig::from_json_str(
            r#"{ "backtest": { "cadence": "quarterly" }, "market": { "n_bonds": 40 } }"#,
        )
        .unwrap();
        assert_eq!(config.backtest.cadence, bondsmith_risk::Cadence::Quarterly);
        assert_eq!(config.backtest.n_periods, 12);
        assert_eq!(config.market.n_bonds, 40);
        assert_eq!(config.market.seed, 42);
    }

    #[test]
    fn test_unknown_extension() {
        assert!(matches!(
            Format::from_path(Path::new("engine.yaml")),
            Err(ConfigError::UnsupportedFormat { .. })
        ));
        assert_eq!(Format::from_path(Path::new("a.TOML")).unwrap(), Format::Toml);
    }
}
