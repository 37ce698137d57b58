use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::error::AnalyticsError;

/// Upper bound for `sum_bucket_count`; no game has a wider sum range.
pub const MAX_SUM_BUCKETS: usize = 1_000;
/// Upper bound for the trend window fields.
pub const MAX_TREND_WINDOW: usize = 1_000_000;

/// Tunable heuristics of the engine. Missing fields in a JSON file fall back to the defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsConfig {
    /// Hot: count above `average * hot_multiplier`.
    pub hot_multiplier: f64,
    /// Cold: count below `average * cold_multiplier`.
    pub cold_multiplier: f64,
    pub secondary_hot_multiplier: f64,
    pub secondary_cold_multiplier: f64,
    pub hot_cold_limit: usize,
    /// Fixed trend window. When unset the window follows the history length.
    pub trend_window: Option<usize>,
    pub trend_window_fraction: f64,
    pub trend_min_window: usize,
    pub sum_bucket_count: usize,
    /// Half width of the recommended sum range when there is no history.
    pub empty_range_half_width: u32,
    pub pair_limit: usize,
    pub position_top: usize,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            hot_multiplier: 1.3,
            cold_multiplier: 0.7,
            secondary_hot_multiplier: 1.2,
            secondary_cold_multiplier: 0.8,
            hot_cold_limit: 10,
            trend_window: None,
            trend_window_fraction: 0.2,
            trend_min_window: 10,
            sum_bucket_count: 10,
            empty_range_half_width: 10,
            pair_limit: 20,
            position_top: 5,
        }
    }
}

impl AnalyticsConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("No se pudo leer la configuración {:?}", path))?;
        let config: AnalyticsConfig = serde_json::from_str(&json)
            .with_context(|| format!("Configuración inválida en {:?}", path))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), AnalyticsError> {
        let positive = [
            ("hot_multiplier", self.hot_multiplier),
            ("cold_multiplier", self.cold_multiplier),
            ("secondary_hot_multiplier", self.secondary_hot_multiplier),
            ("secondary_cold_multiplier", self.secondary_cold_multiplier),
        ];
        for (field, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(AnalyticsError::InvalidConfig {
                    field,
                    reason: format!("must be a positive number, got {value}"),
                });
            }
        }

        if !(self.trend_window_fraction > 0.0 && self.trend_window_fraction <= 1.0) {
            return Err(AnalyticsError::InvalidConfig {
                field: "trend_window_fraction",
                reason: format!("must be in (0, 1], got {}", self.trend_window_fraction),
            });
        }

        let non_zero = [
            ("hot_cold_limit", self.hot_cold_limit),
            ("trend_window", self.trend_window.unwrap_or(1)),
            ("trend_min_window", self.trend_min_window),
            ("sum_bucket_count", self.sum_bucket_count),
            ("pair_limit", self.pair_limit),
            ("position_top", self.position_top),
        ];
        for (field, value) in non_zero {
            if value == 0 {
                return Err(AnalyticsError::InvalidConfig {
                    field,
                    reason: "must be at least 1".to_string(),
                });
            }
        }

        let bounded = [
            ("sum_bucket_count", self.sum_bucket_count, MAX_SUM_BUCKETS),
            ("trend_window", self.trend_window.unwrap_or(1), MAX_TREND_WINDOW),
            ("trend_min_window", self.trend_min_window, MAX_TREND_WINDOW),
        ];
        for (field, value, max) in bounded {
            if value > max {
                return Err(AnalyticsError::InvalidConfig {
                    field,
                    reason: format!("must be at most {max}, got {value}"),
                });
            }
        }
        Ok(())
    }

    /// Size of each of the two windows compared by the trend detector.
    pub fn trend_window_for(&self, total_draws: usize) -> usize {
        let window = self.trend_window.unwrap_or_else(|| {
            let proportional = (total_draws as f64 * self.trend_window_fraction).floor() as usize;
            proportional.max(self.trend_min_window)
        });
        window.max(1)
    }
}
