use serde::Serialize;

use baloto_db::models::Draw;

use crate::round1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SumBucket {
    pub range_start: u32,
    pub range_end: u32,
    pub count: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SumRange {
    pub low: u32,
    pub high: u32,
}

impl SumRange {
    pub fn contains(&self, sum: u32) -> bool {
        self.low <= sum && sum <= self.high
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SumDistribution {
    pub distribution: Vec<SumBucket>,
    pub average: f64,
    pub min: u32,
    pub max: u32,
    pub std_dev: f64,
    pub recommended_range: SumRange,
}

/// Smallest and largest possible sums of `draw_size` distinct numbers from `1..=pool_size`.
pub fn theoretical_bounds(pool_size: u8, draw_size: usize) -> (u32, u32) {
    let k = draw_size as u32;
    let n = pool_size as u32;
    let min = k * (k + 1) / 2;
    let max = (k * n).saturating_sub(k * k.saturating_sub(1) / 2);
    (min, max.max(min))
}

fn empty_buckets(min: u32, max: u32, bucket_count: usize) -> (Vec<SumBucket>, u32) {
    let buckets = u32::try_from(bucket_count).unwrap_or(u32::MAX).max(1);
    let width = (max - min + 1).div_ceil(buckets);
    let mut distribution = Vec::with_capacity(buckets as usize);
    let mut start = min;
    while start <= max {
        distribution.push(SumBucket {
            range_start: start,
            range_end: (start + width - 1).min(max),
            count: 0,
        });
        start += width;
    }
    (distribution, width)
}

pub fn sum_distribution(
    history: &[Draw],
    pool_size: u8,
    draw_size: usize,
    bucket_count: usize,
    empty_half_width: u32,
) -> SumDistribution {
    let (lo, hi) = theoretical_bounds(pool_size, draw_size);
    let (mut distribution, width) = empty_buckets(lo, hi, bucket_count);

    let sums: Vec<u32> = history
        .iter()
        .map(|d| d.numbers.iter().map(|&n| n as u32).sum())
        .collect();

    let last = distribution.len() - 1;
    for &sum in &sums {
        let idx = ((sum.saturating_sub(lo) / width) as usize).min(last);
        distribution[idx].count += 1;
    }

    if sums.is_empty() {
        let mid = (lo + hi) / 2;
        return SumDistribution {
            distribution,
            average: 0.0,
            min: 0,
            max: 0,
            std_dev: 0.0,
            recommended_range: SumRange {
                low: mid.saturating_sub(empty_half_width).max(lo),
                high: mid.saturating_add(empty_half_width).min(hi),
            },
        };
    }

    let n = sums.len() as f64;
    let mean = sums.iter().map(|&s| s as f64).sum::<f64>() / n;
    let variance = sums.iter().map(|&s| (s as f64 - mean).powi(2)).sum::<f64>() / n;
    let std_dev = variance.sqrt();

    let clamp = |x: f64| x.round().clamp(lo as f64, hi as f64) as u32;

    SumDistribution {
        distribution,
        average: round1(mean),
        min: sums.iter().copied().min().unwrap_or(0),
        max: sums.iter().copied().max().unwrap_or(0),
        std_dev: round1(std_dev),
        recommended_range: SumRange {
            low: clamp(mean - std_dev),
            high: clamp(mean + std_dev),
        },
    }
}
