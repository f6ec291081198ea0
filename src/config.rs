// Planner configuration

use std::fmt::Display;
use std::str::FromStr;

use tracing::debug;

use crate::algorithms::enumerator::{ScoringMetrics, WaveEnumerator};
use crate::error::ConfigError;
use crate::utils::ranking::{ItemRange, RankingPolicy};

/// Largest candidate set enumerated by default (2^20 - 1 rows)
pub const DEFAULT_MAX_CANDIDATES: usize = 20;

/// Tunables of the planning pipeline
#[derive(Debug, Clone, PartialEq)]
pub struct PlannerConfig {
    /// Ceiling on the number of candidates handed to the enumerator
    pub max_candidates: usize,

    /// Item window used by `WaveSession::plan` when a request does not carry one
    pub item_range: ItemRange,

    pub ranking: RankingPolicy,

    pub metrics: ScoringMetrics,

    /// Score subsets on the rayon pool
    pub parallel: bool,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            max_candidates: DEFAULT_MAX_CANDIDATES,
            item_range: ItemRange::default(),
            ranking: RankingPolicy::default(),
            metrics: ScoringMetrics::default(),
            parallel: true,
        }
    }
}

impl PlannerConfig {
    /// Load configuration from environment variables, reading `.env` if present
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds a configuration from `lookup`, falling back to defaults for unset names
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let max_candidates = match lookup("WAVES_MAX_CANDIDATES") {
            Some(value) => parse_value("WAVES_MAX_CANDIDATES", &value)?,
            None => defaults.max_candidates,
        };

        let min_items = match lookup("WAVES_MIN_ITEMS") {
            Some(value) => parse_value("WAVES_MIN_ITEMS", &value)?,
            None => defaults.item_range.min,
        };
        let max_items = match lookup("WAVES_MAX_ITEMS") {
            Some(value) => parse_value("WAVES_MAX_ITEMS", &value)?,
            None => defaults.item_range.max,
        };
        let item_range =
            ItemRange::new(min_items, max_items).map_err(|e| ConfigError::InvalidValue {
                name: "WAVES_MIN_ITEMS",
                value: min_items.to_string(),
                reason: e.to_string(),
            })?;

        let ranking = match lookup("WAVES_RANKING") {
            Some(value) => parse_value("WAVES_RANKING", &value)?,
            None => defaults.ranking,
        };

        let lower_quartile = match lookup("WAVES_LOWER_QUARTILE") {
            Some(value) => parse_flag("WAVES_LOWER_QUARTILE", &value)?,
            None => defaults.metrics.lower_quartile,
        };

        let parallel = match lookup("WAVES_PARALLEL") {
            Some(value) => parse_flag("WAVES_PARALLEL", &value)?,
            None => defaults.parallel,
        };

        let config = Self {
            max_candidates,
            item_range,
            ranking,
            metrics: ScoringMetrics { lower_quartile },
            parallel,
        };
        debug!("Planner configuration: {:?}", config);
        Ok(config)
    }

    pub fn enumerator(&self) -> WaveEnumerator {
        WaveEnumerator::new(self.metrics, self.parallel)
    }
}

fn parse_value<T>(name: &'static str, value: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
{
    value.trim().parse().map_err(|e: T::Err| ConfigError::InvalidValue {
        name,
        value: value.to_string(),
        reason: e.to_string(),
    })
}

fn parse_flag(name: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            name,
            value: value.to_string(),
            reason: "expected true or false".to_string(),
        }),
    }
}
