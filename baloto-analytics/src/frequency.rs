use std::collections::BTreeMap;

use serde::Serialize;

use baloto_db::models::{Draw, Pool};

use crate::index_of;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NumberCount {
    pub number: u8,
    pub frequency: u32,
}

/// Appearance counts for every number of a pool, zero-filled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyTable {
    counts: Vec<u32>,
}

impl FrequencyTable {
    pub fn build(history: &[Draw], pool: Pool, pool_size: u8) -> Self {
        let mut counts = vec![0u32; pool_size as usize];
        for draw in history {
            for &n in pool.numbers_from(draw) {
                if let Some(idx) = index_of(n, counts.len()) {
                    counts[idx] += 1;
                }
            }
        }
        Self { counts }
    }

    /// `counts[i]` is the count of number `i + 1`.
    pub fn from_counts(counts: Vec<u32>) -> Self {
        Self { counts }
    }

    pub fn pool_size(&self) -> usize {
        self.counts.len()
    }

    pub fn count(&self, number: u8) -> u32 {
        index_of(number, self.counts.len())
            .map(|idx| self.counts[idx])
            .unwrap_or(0)
    }

    pub fn total(&self) -> u32 {
        self.counts.iter().sum()
    }

    /// Mean count over the whole pool, drawn or not.
    pub fn average(&self) -> f64 {
        if self.counts.is_empty() {
            return 0.0;
        }
        self.total() as f64 / self.counts.len() as f64
    }

    pub fn iter(&self) -> impl Iterator<Item = NumberCount> + '_ {
        self.counts.iter().enumerate().map(|(i, &frequency)| NumberCount {
            number: (i + 1) as u8,
            frequency,
        })
    }

    /// Most frequent first, ties by ascending number.
    pub fn ranking(&self) -> Vec<NumberCount> {
        let mut ranked: Vec<NumberCount> = self.iter().collect();
        ranked.sort_by(|a, b| b.frequency.cmp(&a.frequency).then(a.number.cmp(&b.number)));
        ranked
    }

    pub fn to_map(&self) -> BTreeMap<u8, u32> {
        self.iter().map(|c| (c.number, c.frequency)).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HotCold {
    pub hot: Vec<NumberCount>,
    pub cold: Vec<NumberCount>,
}

pub fn hot_numbers(table: &FrequencyTable, multiplier: f64, limit: usize) -> Vec<NumberCount> {
    let threshold = table.average() * multiplier;
    table
        .ranking()
        .into_iter()
        .filter(|c| c.frequency as f64 > threshold)
        .take(limit)
        .collect()
}

/// Least frequent first, ties by ascending number.
pub fn cold_numbers(table: &FrequencyTable, multiplier: f64, limit: usize) -> Vec<NumberCount> {
    let threshold = table.average() * multiplier;
    let mut cold: Vec<NumberCount> = table
        .iter()
        .filter(|c| (c.frequency as f64) < threshold)
        .collect();
    cold.sort_by(|a, b| a.frequency.cmp(&b.frequency).then(a.number.cmp(&b.number)));
    cold.truncate(limit);
    cold
}

pub fn hot_cold(
    table: &FrequencyTable,
    hot_multiplier: f64,
    cold_multiplier: f64,
    limit: usize,
) -> HotCold {
    HotCold {
        hot: hot_numbers(table, hot_multiplier, limit),
        cold: cold_numbers(table, cold_multiplier, limit),
    }
}
