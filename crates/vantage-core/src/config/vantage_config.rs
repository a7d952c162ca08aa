//! Global scanner configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::ScanError;

/// Weights for the five priority signals.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PriorityWeights {
    pub needs_human: f64,
    pub risk: f64,
    pub staleness: f64,
    pub impact: f64,
    pub confidence: f64,
}

impl Default for PriorityWeights {
    fn default() -> Self {
        Self {
            needs_human: 40.0,
            risk: 25.0,
            staleness: 15.0,
            impact: 15.0,
            confidence: 10.0,
        }
    }
}

impl PriorityWeights {
    /// All weights finite and non-negative.
    pub fn is_valid(&self) -> bool {
        [
            self.needs_human,
            self.risk,
            self.staleness,
            self.impact,
            self.confidence,
        ]
        .iter()
        .all(|w| w.is_finite() && *w >= 0.0)
    }
}

/// Configuration loaded from `~/.config/vantage/config.toml`.
///
/// Every field is optional; `effective_*()` accessors apply the
/// documented defaults. Invalid values never fail a scan; they fall
/// back to defaults and surface as warnings.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct VantageConfig {
    pub weights: Option<PriorityWeights>,
    /// Score at or above which a project lands in the attention list.
    /// Default: 50.0.
    pub attention_threshold: Option<f64>,
    /// Maximum directory depth when discovering projects. Default: 5.
    pub scan_depth: Option<usize>,
    /// Days until staleness saturates at 1.0. Default: 30.
    pub staleness_horizon_days: Option<f64>,
    /// Persisted cache location. Default: `<data-dir>/vantage/status.db`.
    pub cache_path: Option<PathBuf>,
}

/// Upper bound on configurable scan depth.
const MAX_SCAN_DEPTH: usize = 64;

impl VantageConfig {
    pub fn effective_weights(&self) -> PriorityWeights {
        self.weights.unwrap_or_default()
    }

    pub fn effective_attention_threshold(&self) -> f64 {
        self.attention_threshold.unwrap_or(50.0)
    }

    pub fn effective_scan_depth(&self) -> usize {
        self.scan_depth.unwrap_or(5)
    }

    pub fn effective_staleness_horizon_days(&self) -> f64 {
        self.staleness_horizon_days.unwrap_or(30.0)
    }

    /// Cache database location, `None` when no data directory exists.
    pub fn effective_cache_path(&self) -> Option<PathBuf> {
        self.cache_path
            .clone()
            .or_else(|| dirs::data_dir().map(|d| d.join("vantage").join("status.db")))
    }

    /// Load configuration, falling back to defaults on any problem.
    ///
    /// `explicit` wins over `$VANTAGE_CONFIG`, which wins over the
    /// default location. A missing file at the default location is
    /// normal; anything else wrong becomes a warning, never an error.
    pub fn load(explicit: Option<&Path>) -> (Self, Vec<ScanError>) {
        let mut warnings = Vec::new();

        let env_path = std::env::var_os("VANTAGE_CONFIG").map(PathBuf::from);
        let requested = explicit.map(Path::to_path_buf).or(env_path);

        let mut config = match requested {
            Some(path) => match Self::load_from(&path) {
                Ok(config) => config,
                Err(e) => {
                    warnings.push(e);
                    Self::default()
                }
            },
            None => match Self::default_path() {
                Some(path) if path.exists() => match Self::load_from(&path) {
                    Ok(config) => config,
                    Err(e) => {
                        warnings.push(e);
                        Self::default()
                    }
                },
                _ => Self::default(),
            },
        };

        warnings.extend(config.sanitize());
        (config, warnings)
    }

    /// Strict load from one file.
    pub fn load_from(path: &Path) -> Result<Self, ScanError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| ScanError::io_unavailable(path, &e))?;
        toml::from_str(&content).map_err(|e| ScanError::ConfigInvalid {
            field: path.display().to_string(),
            message: e.to_string(),
        })
    }

    fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("vantage").join("config.toml"))
    }

    /// Replace invalid values with their defaults, returning one
    /// warning per rejected field.
    pub fn sanitize(&mut self) -> Vec<ScanError> {
        let mut warnings = Vec::new();

        if let Some(weights) = self.weights {
            if !weights.is_valid() {
                warnings.push(ScanError::ConfigInvalid {
                    field: "weights".to_string(),
                    message: "weights must be finite and non-negative".to_string(),
                });
                self.weights = None;
            }
        }

        if let Some(threshold) = self.attention_threshold {
            if !threshold.is_finite() {
                warnings.push(ScanError::ConfigInvalid {
                    field: "attention_threshold".to_string(),
                    message: "threshold must be finite".to_string(),
                });
                self.attention_threshold = None;
            }
        }

        if let Some(depth) = self.scan_depth {
            if depth == 0 || depth > MAX_SCAN_DEPTH {
                warnings.push(ScanError::ConfigInvalid {
                    field: "scan_depth".to_string(),
                    message: format!("depth must be in 1..={MAX_SCAN_DEPTH}, got {depth}"),
                });
                self.scan_depth = None;
            }
        }

        if let Some(horizon) = self.staleness_horizon_days {
            if !horizon.is_finite() || horizon <= 0.0 {
                warnings.push(ScanError::ConfigInvalid {
                    field: "staleness_horizon_days".to_string(),
                    message: "horizon must be a positive number of days".to_string(),
                });
                self.staleness_horizon_days = None;
            }
        }

        warnings
    }
}
