use chrono::{Days, NaiveDate};

use baloto_db::models::{Draw, DrawOrder, Game};

pub(crate) fn day(i: usize) -> NaiveDate {
    NaiveDate::from_ymd_opt(2020, 1, 1).unwrap() + Days::new(i as u64)
}

pub(crate) fn draw(game: Game, i: usize, numbers: &[u8], secondary: Option<u8>) -> Draw {
    Draw {
        game,
        date: day(i),
        numbers: numbers.to_vec(),
        secondary,
        order: DrawOrder::Drawn,
    }
}

/// `n` copies of the same result on consecutive days.
pub(crate) fn repeated(game: Game, numbers: &[u8], secondary: Option<u8>, n: usize) -> Vec<Draw> {
    (0..n).map(|i| draw(game, i, numbers, secondary)).collect()
}

/// Deterministic history cycling through seven disjoint blocks of five numbers.
pub(crate) fn make_draws(game: Game, n: usize) -> Vec<Draw> {
    (0..n)
        .map(|i| {
            let base = (i % 7) as u8 * 5;
            let numbers = [base + 1, base + 2, base + 3, base + 4, base + 5];
            let secondary = match game {
                Game::Baloto => Some((i % 16) as u8 + 1),
                Game::Miloto => None,
            };
            draw(game, i, &numbers, secondary)
        })
        .collect()
}
