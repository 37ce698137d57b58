use anyhow::{bail, Result};
use chrono::Datelike;
use rand::distr::weighted::WeightedIndex;
use rand::prelude::Distribution;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;

use baloto_db::models::{Draw, GameSpec, Pool};

use crate::frequency::FrequencyTable;

/// A random combination weighted by past frequency.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Suggestion {
    pub numbers: Vec<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secondary: Option<u8>,
    /// Product of `p / uniform` over the picked numbers; above 1 means favoured by history.
    pub score: f64,
}

/// Today's date as `YYYYMMDD`, so suggestions are stable for a whole day.
pub fn date_seed() -> u64 {
    let today = chrono::Local::now().date_naive();
    let y = today.year() as u64;
    let m = today.month() as u64;
    let d = today.day() as u64;
    y * 10_000 + m * 100 + d
}

/// Probability of each number, weighted `count + 1` so unseen numbers stay possible.
fn probabilities(table: &FrequencyTable) -> Vec<(u8, f64)> {
    let total = (table.total() as usize + table.pool_size()) as f64;
    table
        .iter()
        .map(|c| (c.number, (c.frequency + 1) as f64 / total))
        .collect()
}

pub fn generate_suggestions(
    history: &[Draw],
    spec: &GameSpec,
    count: usize,
    seed: u64,
) -> Result<Vec<Suggestion>> {
    spec.validate()?;

    let mut rng = StdRng::seed_from_u64(seed);

    let main = probabilities(&FrequencyTable::build(history, Pool::Main, spec.pool_size));
    let uniform_main = 1.0 / spec.pool_size as f64;

    let secondary = match Pool::Secondary.size(spec) {
        Some(size) if spec.has_secondary => Some((
            probabilities(&FrequencyTable::build(history, Pool::Secondary, size)),
            1.0 / size as f64,
        )),
        _ => None,
    };

    let mut suggestions = Vec::with_capacity(count);
    for _ in 0..count {
        let (mut numbers, mut score) =
            sample_without_replacement(&main, Pool::Main.pick_count(spec), uniform_main, &mut rng)?;
        numbers.sort_unstable();

        let secondary_pick = match &secondary {
            Some((probs, uniform)) => {
                let picks = Pool::Secondary.pick_count(spec);
                let (picked, s) = sample_without_replacement(probs, picks, *uniform, &mut rng)?;
                score *= s;
                picked.first().copied()
            }
            None => None,
        };

        suggestions.push(Suggestion {
            numbers,
            secondary: secondary_pick,
            score,
        });
    }

    log::debug!("generated {} suggestions with seed {}", suggestions.len(), seed);
    Ok(suggestions)
}

fn sample_without_replacement(
    probs: &[(u8, f64)],
    count: usize,
    uniform_prob: f64,
    rng: &mut StdRng,
) -> Result<(Vec<u8>, f64)> {
    if count > probs.len() {
        bail!("No se pueden elegir {} números de {}", count, probs.len());
    }
    let mut available = probs.to_vec();
    let mut selected = Vec::with_capacity(count);
    let mut score = 1.0f64;

    for _ in 0..count {
        let weights: Vec<f64> = available.iter().map(|(_, w)| *w).collect();
        let dist = WeightedIndex::new(&weights)?;
        let idx = dist.sample(rng);

        let (number, prob) = available.remove(idx);
        selected.push(number);
        score *= prob / uniform_prob;
    }

    Ok((selected, score))
}
