use serde::Serialize;

use baloto_db::models::{Draw, Pool};

use crate::frequency::FrequencyTable;
use crate::round1;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrendRecord {
    pub number: u8,
    pub change_pct: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Trends {
    pub trending_up: Vec<TrendRecord>,
    pub trending_down: Vec<TrendRecord>,
    /// Window actually compared; absent when the history was too short.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub window: Option<usize>,
}

impl Trends {
    pub fn is_empty(&self) -> bool {
        self.trending_up.is_empty() && self.trending_down.is_empty()
    }
}

/// Compares the last `window` draws with the `window` draws before them.
///
/// `change_pct = (recent - prior) / max(prior, 1) * 100`, one decimal.
/// Needs at least `2 * window` draws, otherwise both lists are empty.
pub fn detect_trends(history: &[Draw], pool: Pool, pool_size: u8, window: usize) -> Trends {
    let n = history.len();
    let needed = match window.checked_mul(2) {
        Some(needed) if window > 0 && n >= needed => needed,
        _ => {
            log::debug!("trend window {window} too large for a history of {n} draws");
            return Trends::default();
        }
    };

    let recent = FrequencyTable::build(&history[n - window..], pool, pool_size);
    let prior = FrequencyTable::build(&history[n - needed..n - window], pool, pool_size);

    let mut trending_up = Vec::new();
    let mut trending_down = Vec::new();

    for number in 1..=pool_size {
        let r = recent.count(number) as f64;
        let p = prior.count(number) as f64;
        let change_pct = round1((r - p) / p.max(1.0) * 100.0);
        let record = TrendRecord { number, change_pct };
        if change_pct > 0.0 {
            trending_up.push(record);
        } else if change_pct < 0.0 {
            trending_down.push(record);
        }
    }

    trending_up.sort_by(|a, b| b.change_pct.total_cmp(&a.change_pct).then(a.number.cmp(&b.number)));
    trending_down.sort_by(|a, b| a.change_pct.total_cmp(&b.change_pct).then(a.number.cmp(&b.number)));

    Trends {
        trending_up,
        trending_down,
        window: Some(window),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{draw, repeated};
    use baloto_db::models::Game;

    fn change_of(records: &[TrendRecord], number: u8) -> Option<f64> {
        records.iter().find(|r| r.number == number).map(|r| r.change_pct)
    }

    #[test]
    fn test_insufficient_history_is_empty() {
        let history = repeated(Game::Miloto, &[1, 2, 3, 4, 5], None, 19);
        let trends = detect_trends(&history, Pool::Main, 39, 10);
        assert!(trends.is_empty());
        assert_eq!(trends.window, None);

        assert!(detect_trends(&[], Pool::Main, 39, 10).is_empty());
    }

    #[test]
    fn test_window_too_large_is_empty() {
        let history = repeated(Game::Miloto, &[1, 2, 3, 4, 5], None, 40);
        assert!(detect_trends(&history, Pool::Main, 39, usize::MAX).is_empty());
        assert!(detect_trends(&history, Pool::Main, 39, usize::MAX / 2 + 1).is_empty());
        assert!(detect_trends(&history, Pool::Main, 39, 0).is_empty());
    }

    #[test]
    fn test_change_pct_and_ordering() {
        // prior window: 1..5 twice, 6..10 once; recent window: 6..10 twice, 11..15 once
        let mut history = vec![
            draw(Game::Miloto, 0, &[1, 2, 3, 4, 5], None),
            draw(Game::Miloto, 1, &[1, 2, 3, 4, 5], None),
            draw(Game::Miloto, 2, &[6, 7, 8, 9, 10], None),
        ];
        history.extend(vec![
            draw(Game::Miloto, 3, &[6, 7, 8, 9, 10], None),
            draw(Game::Miloto, 4, &[6, 7, 8, 9, 10], None),
            draw(Game::Miloto, 5, &[11, 12, 13, 14, 15], None),
        ]);
        let trends = detect_trends(&history, Pool::Main, 39, 3);
        assert_eq!(trends.window, Some(3));

        // 6: 1 -> 2 = +100%, 11: 0 -> 1 = +100% (prior floored at 1), 1: 2 -> 0 = -100%
        assert_eq!(change_of(&trends.trending_up, 6), Some(100.0));
        assert_eq!(change_of(&trends.trending_up, 11), Some(100.0));
        assert_eq!(change_of(&trends.trending_down, 1), Some(-100.0));
        assert_eq!(change_of(&trends.trending_up, 20), None);
        assert_eq!(change_of(&trends.trending_down, 20), None);

        assert_eq!(trends.trending_up[0].number, 6);
        assert!(trends.trending_up.windows(2).all(|w| w[0].change_pct >= w[1].change_pct));
        assert!(trends.trending_down.windows(2).all(|w| w[0].change_pct <= w[1].change_pct));
    }

    #[test]
    fn test_only_uses_two_latest_windows() {
        let mut history = repeated(Game::Miloto, &[30, 31, 32, 33, 34], None, 5);
        history.extend(vec![
            draw(Game::Miloto, 5, &[1, 2, 3, 4, 5], None),
            draw(Game::Miloto, 6, &[1, 2, 3, 4, 6], None),
            draw(Game::Miloto, 7, &[1, 2, 3, 4, 7], None),
        ]);
        let trends = detect_trends(&history, Pool::Main, 39, 1);
        // prior = {1,2,3,4,6}, recent = {1,2,3,4,7}
        assert_eq!(change_of(&trends.trending_up, 7), Some(100.0));
        assert_eq!(change_of(&trends.trending_down, 6), Some(-100.0));
        assert_eq!(trends.trending_up.len(), 1);
        assert_eq!(trends.trending_down.len(), 1);
    }

    #[test]
    fn test_rounding_to_one_decimal() {
        let mut history = Vec::new();
        for i in 0..6 {
            let numbers: &[u8] = if i == 2 { &[2, 3, 4, 5, 6] } else { &[1, 3, 4, 5, 6] };
            history.push(draw(Game::Miloto, i, numbers, None));
        }
        for i in 6..12 {
            let numbers: &[u8] = if i >= 10 { &[2, 3, 4, 5, 6] } else { &[1, 3, 4, 5, 6] };
            history.push(draw(Game::Miloto, i, numbers, None));
        }
        // prior (0..6): 1 appears 5 times; recent (6..12): 1 appears 4 times -> -20%
        let trends = detect_trends(&history, Pool::Main, 39, 6);
        assert_eq!(change_of(&trends.trending_down, 1), Some(-20.0));
        // 2: prior 1, recent 2 -> +100%
        assert_eq!(change_of(&trends.trending_up, 2), Some(100.0));

        let history: Vec<_> = (0..6)
            .map(|i| {
                let numbers: &[u8] = if i < 3 || i == 5 { &[1, 3, 4, 5, 6] } else { &[2, 3, 4, 5, 6] };
                draw(Game::Miloto, i, numbers, None)
            })
            .collect();
        // prior (0..3): 1 three times; recent (3..6): 1 once -> -66.7%
        let trends = detect_trends(&history, Pool::Main, 39, 3);
        assert_eq!(change_of(&trends.trending_down, 1), Some(-66.7));
    }
}
