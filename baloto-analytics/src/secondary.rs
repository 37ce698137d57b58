use serde::Serialize;

use baloto_db::models::{Draw, GameSpec, Pool};

use crate::config::AnalyticsConfig;
use crate::frequency::{cold_numbers, hot_numbers, FrequencyTable, NumberCount};
use crate::gaps::{compute_gaps, GapRecord};
use crate::trends::{detect_trends, Trends};

/// Frequency, hot/cold, gap and trend analysis of the super balota.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SecondaryAnalysis {
    pub frequencies: Vec<NumberCount>,
    pub hot: Vec<NumberCount>,
    pub cold: Vec<NumberCount>,
    pub gaps: Vec<GapRecord>,
    pub trends: Trends,
}

/// `None` for games without a secondary number, whatever the history holds.
pub fn analyze_secondary(
    history: &[Draw],
    spec: &GameSpec,
    config: &AnalyticsConfig,
) -> Option<SecondaryAnalysis> {
    if !spec.has_secondary {
        return None;
    }
    let pool_size = Pool::Secondary.size(spec)?;

    let table = FrequencyTable::build(history, Pool::Secondary, pool_size);
    let window = config.trend_window_for(history.len());

    Some(SecondaryAnalysis {
        frequencies: table.iter().collect(),
        hot: hot_numbers(&table, config.secondary_hot_multiplier, config.hot_cold_limit),
        cold: cold_numbers(&table, config.secondary_cold_multiplier, config.hot_cold_limit),
        gaps: compute_gaps(history, Pool::Secondary, pool_size),
        trends: detect_trends(history, Pool::Secondary, pool_size, window),
    })
}
