use std::collections::HashMap;

use serde::Serialize;

use baloto_db::models::Draw;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PairCount {
    pub pair: [u8; 2],
    pub frequency: u32,
}

/// Co-occurrence counts of the pairs that actually appeared together.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PairTable {
    counts: HashMap<(u8, u8), u32>,
}

fn normalize(a: u8, b: u8) -> (u8, u8) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

impl PairTable {
    pub fn build(history: &[Draw]) -> Self {
        let mut counts = HashMap::new();
        for draw in history {
            let numbers = &draw.numbers;
            for i in 0..numbers.len() {
                for j in (i + 1)..numbers.len() {
                    *counts.entry(normalize(numbers[i], numbers[j])).or_insert(0) += 1;
                }
            }
        }
        Self { counts }
    }

    pub fn count(&self, a: u8, b: u8) -> u32 {
        self.counts.get(&normalize(a, b)).copied().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Most frequent first, ties by the pair in ascending order.
    pub fn ranked(&self) -> Vec<PairCount> {
        let mut ranked: Vec<PairCount> = self
            .counts
            .iter()
            .map(|(&(a, b), &frequency)| PairCount { pair: [a, b], frequency })
            .collect();
        ranked.sort_by(|x, y| y.frequency.cmp(&x.frequency).then(x.pair.cmp(&y.pair)));
        ranked
    }
}
