use std::collections::BTreeMap;

use serde::Serialize;

use baloto_db::models::{Draw, DrawOrder, GameSpec, Pool};

use crate::config::AnalyticsConfig;
use crate::error::AnalyticsError;
use crate::frequency::{hot_cold, FrequencyTable, HotCold};
use crate::gaps::{compute_gaps, GapRecord};
use crate::pairs::{PairCount, PairTable};
use crate::positions::{analyze_positions, PositionStat};
use crate::secondary::{analyze_secondary, SecondaryAnalysis};
use crate::sums::{sum_distribution, SumDistribution};
use crate::synthesis::{synthesize, Recommendation, SynthesisInput};
use crate::trends::{detect_trends, Trends};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FrequencyChart {
    pub numbers: BTreeMap<u8, u32>,
}

/// Everything computed for one game from one history snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalyticsResult {
    pub frequency_chart: FrequencyChart,
    pub hot_cold: HotCold,
    pub gaps: Vec<GapRecord>,
    pub trends: Trends,
    pub sum_distribution: SumDistribution,
    pub pairs: Vec<PairCount>,
    pub position_analysis: Vec<PositionStat>,
    pub position_order: DrawOrder,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub super_analysis: Option<SecondaryAnalysis>,
    pub recommendation: Recommendation,
    pub total_draws: usize,
}

/// Runs every analyzer over `history` (oldest first) for the game described by `game`.
///
/// Fails only on a structurally invalid `game` or `config`; short or empty
/// histories give empty or zeroed sections instead.
pub fn analyze(
    history: &[Draw],
    game: &GameSpec,
    config: &AnalyticsConfig,
) -> Result<AnalyticsResult, AnalyticsError> {
    game.validate()?;
    config.validate()?;

    let table = FrequencyTable::build(history, Pool::Main, game.pool_size);
    let hot_cold = hot_cold(
        &table,
        config.hot_multiplier,
        config.cold_multiplier,
        config.hot_cold_limit,
    );
    let gaps = compute_gaps(history, Pool::Main, game.pool_size);

    let window = config.trend_window_for(history.len());
    let trends = detect_trends(history, Pool::Main, game.pool_size, window);

    let sum_distribution = sum_distribution(
        history,
        game.pool_size,
        game.draw_size,
        config.sum_bucket_count,
        config.empty_range_half_width,
    );

    let mut pairs = PairTable::build(history).ranked();
    pairs.truncate(config.pair_limit);

    let positions = analyze_positions(history, game.pool_size, game.draw_size, config.position_top);
    let super_analysis = analyze_secondary(history, game, config);

    let ranking = table.ranking();
    let recommendation = synthesize(&SynthesisInput {
        draw_size: game.draw_size,
        total_draws: history.len(),
        ranking: &ranking,
        hot: &hot_cold.hot,
        gaps: &gaps,
        trending_up: &trends.trending_up,
        sum_range: sum_distribution.recommended_range,
        secondary: super_analysis.as_ref(),
    });

    log::debug!(
        "analyzed {} draws: {} hot, {} cold, trend window {}",
        history.len(),
        hot_cold.hot.len(),
        hot_cold.cold.len(),
        window,
    );

    Ok(AnalyticsResult {
        frequency_chart: FrequencyChart { numbers: table.to_map() },
        hot_cold,
        gaps,
        trends,
        sum_distribution,
        pairs,
        position_analysis: positions.positions,
        position_order: positions.order,
        super_analysis,
        recommendation,
        total_draws: history.len(),
    })
}
