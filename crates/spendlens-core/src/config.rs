//! Engine configuration
//!
//! Holds the category table, budget limits and the detection/trend thresholds.
//!
//! ## Configuration Resolution
//!
//! Config is loaded with a two-layer resolution:
//! 1. An explicit path, or the override in the data dir
//!    (~/.local/share/spendlens/config/spendlens.toml)
//! 2. Fall back to embedded defaults (compiled into binary)

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::budget::DEFAULT_WARNING_THRESHOLD;
use crate::categorize::{CategoryRule, CategoryTable};
use crate::error::{Error, Result};
use crate::models::BudgetLimits;
use crate::recurring::{DetectionConfig, RecordPolicy};
use crate::trends::TrendThresholds;

/// Embedded default config (compiled into binary)
const DEFAULT_CONFIG: &str = include_str!("../../../config/spendlens.toml");

/// Full engine configuration
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    pub detection: DetectionConfig,
    pub warning_threshold: f64,
    pub limits: BudgetLimits,
    pub trends: TrendThresholds,
    pub categories: CategoryTable,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            detection: DetectionConfig::default(),
            warning_threshold: DEFAULT_WARNING_THRESHOLD,
            limits: BudgetLimits::new(),
            trends: TrendThresholds::default(),
            categories: CategoryTable::default(),
        }
    }
}

impl EngineConfig {
    /// Load from `path` if given and present, else the data-dir override,
    /// else the embedded defaults
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let content = match path.map(Path::to_path_buf).or_else(default_config_path) {
            Some(p) if p.exists() => {
                debug!(path = %p.display(), "Loading config override");
                fs::read_to_string(&p).map_err(|e| {
                    Error::Config(format!("Failed to read {}: {}", p.display(), e))
                })?
            }
            _ => DEFAULT_CONFIG.to_string(),
        };

        Self::from_toml_str(&content)
    }

    /// The embedded defaults
    pub fn embedded() -> Result<Self> {
        Self::from_toml_str(DEFAULT_CONFIG)
    }

    /// Parse config from TOML content. Missing keys keep their defaults.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let raw: RawConfig = toml::from_str(content)
            .map_err(|e| Error::Config(format!("Invalid config TOML: {}", e)))?;

        let mut config = Self::default();

        if let Some(detection) = raw.detection {
            if let Some(min) = detection.min_occurrences {
                config.detection.min_occurrences = min;
            }
            if let Some(tolerance) = detection.tolerance_days {
                if tolerance < 0 {
                    return Err(Error::Config(format!(
                        "detection.tolerance_days must be non-negative, got {}",
                        tolerance
                    )));
                }
                config.detection.tolerance_days = tolerance;
            }
            if let Some(policy) = detection.record_policy {
                config.detection.record_policy = policy;
            }
        }

        if let Some(budget) = raw.budget {
            if let Some(threshold) = budget.warning_threshold {
                if !threshold.is_finite() || threshold < 0.0 {
                    return Err(Error::Config(format!(
                        "budget.warning_threshold must be a non-negative number, got {}",
                        threshold
                    )));
                }
                config.warning_threshold = threshold;
            }
            if let Some(limits) = budget.limits {
                config.limits = limits;
            }
        }

        if let Some(trends) = raw.trends {
            if let Some(direction) = trends.direction_threshold {
                config.trends.direction = direction;
            }
            if let Some(volatility) = trends.volatility_threshold {
                config.trends.volatility = volatility;
            }
        }

        if let Some(categories) = raw.categories {
            if !categories.is_empty() {
                if let Some(c) = categories
                    .iter()
                    .find(|c| c.keywords.iter().any(|k| k.trim().is_empty()))
                {
                    return Err(Error::Config(format!(
                        "categories.{}: keywords must not be empty",
                        c.label
                    )));
                }
                let rules = categories
                    .into_iter()
                    .map(|c| CategoryRule::new(c.label, c.keywords))
                    .collect();
                config.categories = CategoryTable::new(rules);
            }
        }

        Ok(config)
    }
}

/// Default config override path
pub fn default_config_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("spendlens").join("config").join("spendlens.toml"))
}

/// Raw config structure for TOML parsing
#[derive(Debug, Deserialize)]
struct RawConfig {
    detection: Option<RawDetection>,
    budget: Option<RawBudget>,
    trends: Option<RawTrends>,
    categories: Option<Vec<RawCategory>>,
}

#[derive(Debug, Deserialize)]
struct RawDetection {
    min_occurrences: Option<usize>,
    tolerance_days: Option<i64>,
    record_policy: Option<RecordPolicy>,
}

#[derive(Debug, Deserialize)]
struct RawBudget {
    warning_threshold: Option<f64>,
    limits: Option<BTreeMap<String, f64>>,
}

#[derive(Debug, Deserialize)]
struct RawTrends {
    direction_threshold: Option<f64>,
    volatility_threshold: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct RawCategory {
    label: String,
    #[serde(default)]
    keywords: Vec<String>,
}
