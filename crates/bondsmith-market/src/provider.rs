//! Market data service: universe and curve behind TTL caches.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use bondsmith_core::Instrument;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::cache::{Clock, SystemClock, TtlCache};
use crate::csv_loader::CsvBondLoader;
use crate::curve::{CurveSource, FallbackCurveSource, TreasuryCurve};
use crate::error::{MarketError, MarketResult};
use crate::synthetic::{SyntheticConfig, SyntheticMarket, DEFAULT_BOND_COUNT, DEFAULT_SEED};

/// Default universe time-to-live in seconds.
pub const UNIVERSE_TTL_SECS: u64 = 3600;

/// Default curve time-to-live in seconds.
pub const CURVE_TTL_SECS: u64 = 900;

/// Where the universe comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataSource {
    /// Seeded synthetic generator.
    #[default]
    Synthetic,
    /// Curated real-bond CSV file.
    Csv,
}

impl std::fmt::Display for DataSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Synthetic => f.write_str("synthetic"),
            Self::Csv => f.write_str("csv"),
        }
    }
}

impl std::str::FromStr for DataSource {
    type Err = MarketError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "synthetic" => Ok(Self::Synthetic),
            "csv" | "real" => Ok(Self::Csv),
            other => Err(MarketError::invalid_config(format!(
                "unknown data source '{other}'"
            ))),
        }
    }
}

/// Market data settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketConfig {
    /// Universe source.
    pub source: DataSource,
    /// Synthetic universe size.
    pub n_bonds: usize,
    /// Seed for the generator and for CSV volatility noise.
    pub seed: u64,
    /// Universe cache lifetime in seconds.
    pub universe_ttl_secs: u64,
    /// Curve cache lifetime in seconds.
    pub curve_ttl_secs: u64,
    /// Bond file, required when `source` is `csv`.
    pub csv_path: Option<PathBuf>,
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            source: DataSource::Synthetic,
            n_bonds: DEFAULT_BOND_COUNT,
            seed: DEFAULT_SEED,
            universe_ttl_secs: UNIVERSE_TTL_SECS,
            curve_ttl_secs: CURVE_TTL_SECS,
            csv_path: None,
        }
    }
}

impl MarketConfig {
    /// Checks the settings are usable.
    pub fn validate(&self) -> MarketResult<()> {
        match self.source {
            DataSource::Synthetic if self.n_bonds == 0 => {
                Err(MarketError::invalid_config("n_bonds must be positive"))
            }
            DataSource::Csv if self.csv_path.is_none() => Err(MarketError::invalid_config(
                "csv source requires csv_path",
            )),
            _ => Ok(()),
        }
    }

    fn synthetic(&self) -> SyntheticConfig {
        SyntheticConfig {
            n_bonds: self.n_bonds,
            seed: self.seed,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum UniverseKey {
    Synthetic { n_bonds: usize, seed: u64 },
    Csv { path: PathBuf, seed: u64 },
}

/// Supplies universes and curves, reusing them until their TTL lapses.
pub struct MarketDataService<C: Clock = SystemClock> {
    config: MarketConfig,
    curve_source: Box<dyn CurveSource>,
    universes: TtlCache<UniverseKey, Vec<Instrument>, C>,
    curves: TtlCache<(), TreasuryCurve, C>,
}

impl MarketDataService<SystemClock> {
    /// Creates a service on the wall clock with the fallback curve.
    pub fn new(config: MarketConfig) -> MarketResult<Self> {
        Self::with_clock(config, Arc::new(SystemClock::new()))
    }
}

impl<C: Clock> MarketDataService<C> {
    /// Creates a service reading time from `clock`.
    ///
    /// # Errors
    ///
    /// Returns an error if `config` fails validation.
    pub fn with_clock(config: MarketConfig, clock: Arc<C>) -> MarketResult<Self> {
        config.validate()?;
        let universes = TtlCache::new(
            Duration::from_secs(config.universe_ttl_secs),
            Arc::clone(&clock),
        );
        let curves = TtlCache::new(Duration::from_secs(config.curve_ttl_secs), clock);
        Ok(Self {
            config,
            curve_source: Box::new(FallbackCurveSource),
            universes,
            curves,
        })
    }

    /// Replaces the curve source.
    #[must_use]
    pub fn with_curve_source(mut self, source: impl CurveSource + 'static) -> Self {
        self.curve_source = Box::new(source);
        self.curves.clear();
        self
    }

    /// Active settings.
    pub fn config(&self) -> &MarketConfig {
        &self.config
    }

    /// Current treasury curve.
    pub fn curve(&mut self) -> MarketResult<TreasuryCurve> {
        if let Some(curve) = self.curves.get(&()) {
            debug!("curve cache hit");
            return Ok(curve);
        }
        let curve = self.curve_source.fetch()?;
        debug!(source = self.curve_source.name(), "curve fetched");
        self.curves.insert((), curve.clone());
        Ok(curve)
    }

    /// Current bond universe for the configured source.
    pub fn universe(&mut self) -> MarketResult<Vec<Instrument>> {
        let key = self.universe_key()?;
        if let Some(bonds) = self.universes.get(&key) {
            debug!(n_bonds = bonds.len(), "universe cache hit");
            return Ok(bonds);
        }

        let bonds = match &key {
            UniverseKey::Synthetic { .. } => {
                let curve = self.curve()?;
                SyntheticMarket::generate(self.config.synthetic(), &curve)?
            }
            UniverseKey::Csv { path, seed } => CsvBondLoader::new(*seed).load_path(path)?,
        };
        self.universes.insert(key, bonds.clone());
        Ok(bonds)
    }

    /// Drops every cached universe and curve.
    pub fn invalidate(&mut self) {
        self.universes.clear();
        self.curves.clear();
    }

    fn universe_key(&self) -> MarketResult<UniverseKey> {
        match self.config.source {
            DataSource::Synthetic => Ok(UniverseKey::Synthetic {
                n_bonds: self.config.n_bonds,
                seed: self.config.seed,
            }),
            DataSource::Csv => {
                let path = self
                    .config
                    .csv_path
                    .clone()
                    .ok_or_else(|| MarketError::invalid_config("csv source requires csv_path"))?;
                Ok(UniverseKey::Csv {
                    path,
                    seed: self.config.seed,
                })
            }
        }
    }
}

impl<C: Clock> std::fmt::Debug for MarketDataService<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MarketDataService")
            .field("config", &self.config)
            .field("curve_source", &self.curve_source.name())
            .finish()
    }
}
