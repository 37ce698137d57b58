use serde::Serialize;

use crate::frequency::NumberCount;
use crate::gaps::GapRecord;
use crate::secondary::SecondaryAnalysis;
use crate::sums::SumRange;
use crate::trends::TrendRecord;

const HOT_PICKS: usize = 3;
const OVERDUE_PICKS: usize = 2;
const TRENDING_PICKS: usize = 2;

/// Why the combination was chosen, as data for the consumer to phrase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Rationale {
    pub hot: Vec<u8>,
    pub overdue: Vec<u8>,
    pub trending: Vec<u8>,
    pub sum_range: SumRange,
    pub combination_sum: u32,
    pub within_sum_range: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Recommendation {
    pub numbers: Vec<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secondary: Option<u8>,
    pub rationale: Rationale,
}

/// Analyzer outputs the synthesizer draws from.
#[derive(Debug, Clone, Copy)]
pub struct SynthesisInput<'a> {
    pub draw_size: usize,
    pub total_draws: usize,
    /// Full frequency ranking, used to complete short combinations.
    pub ranking: &'a [NumberCount],
    pub hot: &'a [NumberCount],
    pub gaps: &'a [GapRecord],
    pub trending_up: &'a [TrendRecord],
    pub sum_range: SumRange,
    pub secondary: Option<&'a SecondaryAnalysis>,
}

/// Hot, then overdue, then trending numbers, deduplicated in that order.
///
/// When these give fewer than `draw_size` numbers the rest comes from the
/// frequency ranking, so an empty history yields the lowest numbers of the pool.
pub fn synthesize(input: &SynthesisInput<'_>) -> Recommendation {
    let hot: Vec<u8> = input.hot.iter().take(HOT_PICKS).map(|c| c.number).collect();
    let overdue: Vec<u8> = input.gaps.iter().take(OVERDUE_PICKS).map(|g| g.number).collect();
    let trending: Vec<u8> = input
        .trending_up
        .iter()
        .take(TRENDING_PICKS)
        .map(|t| t.number)
        .collect();

    let mut numbers: Vec<u8> = Vec::with_capacity(input.draw_size);
    let fill = input.ranking.iter().map(|c| c.number);
    for n in hot.iter().chain(&overdue).chain(&trending).copied().chain(fill) {
        if numbers.len() == input.draw_size {
            break;
        }
        if !numbers.contains(&n) {
            numbers.push(n);
        }
    }

    let combination_sum: u32 = numbers.iter().map(|&n| n as u32).sum();

    Recommendation {
        secondary: recommend_secondary(input.secondary, input.total_draws),
        rationale: Rationale {
            hot,
            overdue,
            trending,
            sum_range: input.sum_range,
            combination_sum,
            within_sum_range: input.sum_range.contains(combination_sum),
        },
        numbers,
    }
}

/// Hottest, else most overdue, else 1.
fn recommend_secondary(secondary: Option<&SecondaryAnalysis>, total_draws: usize) -> Option<u8> {
    let analysis = secondary?;
    if total_draws == 0 {
        return Some(1);
    }
    let pick = analysis
        .hot
        .first()
        .map(|c| c.number)
        .or_else(|| analysis.gaps.first().map(|g| g.number))
        .unwrap_or(1);
    Some(pick)
}
