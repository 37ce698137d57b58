use std::borrow::Cow;

use serde::Serialize;

use baloto_db::models::{Draw, DrawOrder};

use crate::frequency::{FrequencyTable, NumberCount};
use crate::index_of;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PositionStat {
    pub position: usize,
    pub top_numbers: Vec<NumberCount>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionAnalysis {
    /// `Sorted` means slots are ranks within each sorted draw, not physical draw order.
    pub order: DrawOrder,
    pub positions: Vec<PositionStat>,
}

/// Slots follow draw order only if every draw in the history kept it.
fn effective_order(history: &[Draw]) -> DrawOrder {
    if !history.is_empty() && history.iter().all(|d| d.order == DrawOrder::Drawn) {
        DrawOrder::Drawn
    } else {
        DrawOrder::Sorted
    }
}

pub fn analyze_positions(
    history: &[Draw],
    pool_size: u8,
    draw_size: usize,
    top_n: usize,
) -> PositionAnalysis {
    let order = effective_order(history);
    if order == DrawOrder::Sorted && !history.is_empty() {
        log::debug!("draw order not preserved by every draw, using sorted positions");
    }

    let size = pool_size as usize;
    let mut slots = vec![vec![0u32; size]; draw_size];

    for draw in history {
        let numbers: Cow<'_, [u8]> = match order {
            DrawOrder::Drawn => Cow::Borrowed(&draw.numbers),
            DrawOrder::Sorted => {
                let mut sorted = draw.numbers.clone();
                sorted.sort_unstable();
                Cow::Owned(sorted)
            }
        };
        for (slot, &n) in numbers.iter().take(draw_size).enumerate() {
            if let Some(idx) = index_of(n, size) {
                slots[slot][idx] += 1;
            }
        }
    }

    let positions = slots
        .into_iter()
        .enumerate()
        .map(|(i, counts)| PositionStat {
            position: i + 1,
            top_numbers: FrequencyTable::from_counts(counts)
                .ranking()
                .into_iter()
                .filter(|c| c.frequency > 0)
                .take(top_n)
                .collect(),
        })
        .collect();

    PositionAnalysis { order, positions }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::draw;
    use baloto_db::models::Game;

    fn numbers_at(analysis: &PositionAnalysis, position: usize) -> Vec<u8> {
        analysis.positions[position - 1]
            .top_numbers
            .iter()
            .map(|c| c.number)
            .collect()
    }

    #[test]
    fn test_drawn_order_slots() {
        let history = vec![
            draw(Game::Miloto, 0, &[30, 2, 17, 9, 5], None),
            draw(Game::Miloto, 1, &[30, 4, 17, 8, 1], None),
        ];
        let analysis = analyze_positions(&history, 39, 5, 5);
        assert_eq!(analysis.order, DrawOrder::Drawn);
        assert_eq!(analysis.positions.len(), 5);
        assert_eq!(analysis.positions[0].top_numbers[0], NumberCount { number: 30, frequency: 2 });
        assert_eq!(numbers_at(&analysis, 2), vec![2, 4]);
        assert_eq!(numbers_at(&analysis, 5), vec![1, 5]);
    }

    #[test]
    fn test_sorted_fallback_when_any_draw_is_sorted() {
        let mut sorted = draw(Game::Miloto, 1, &[1, 4, 8, 17, 30], None);
        sorted.order = DrawOrder::Sorted;
        let history = vec![draw(Game::Miloto, 0, &[30, 2, 17, 9, 5], None), sorted];
        let analysis = analyze_positions(&history, 39, 5, 5);
        assert_eq!(analysis.order, DrawOrder::Sorted);
        // first draw is re-sorted to [2, 5, 9, 17, 30]
        assert_eq!(numbers_at(&analysis, 1), vec![1, 2]);
        assert_eq!(numbers_at(&analysis, 5), vec![30]);
        assert_eq!(analysis.positions[4].top_numbers[0].frequency, 2);
    }

    #[test]
    fn test_top_n_and_empty_history() {
        let history: Vec<_> = (0..8u8)
            .map(|i| draw(Game::Miloto, i as usize, &[i + 1, 20, 21, 22, 23], None))
            .collect();
        let analysis = analyze_positions(&history, 39, 5, 3);
        assert_eq!(analysis.positions[0].top_numbers.len(), 3);
        assert_eq!(numbers_at(&analysis, 1), vec![1, 2, 3]);

        let empty = analyze_positions(&[], 39, 5, 5);
        assert_eq!(empty.order, DrawOrder::Sorted);
        assert_eq!(empty.positions.len(), 5);
        assert!(empty.positions.iter().all(|p| p.top_numbers.is_empty()));
    }
}
