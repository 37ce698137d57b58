use serde::Serialize;

use baloto_db::models::{Draw, Pool};

use crate::index_of;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GapRecord {
    pub number: u8,
    pub gap: u32,
}

/// Draws elapsed since each number last appeared, most overdue first (ties by ascending number).
///
/// The scan starts at the newest draw: a number in the newest draw has gap 0,
/// a number never drawn has gap `history.len()`.
pub fn compute_gaps(history: &[Draw], pool: Pool, pool_size: u8) -> Vec<GapRecord> {
    let size = pool_size as usize;
    let never_seen = history.len() as u32;
    let mut gaps: Vec<Option<u32>> = vec![None; size];
    let mut unseen = size;

    for (t, draw) in history.iter().rev().enumerate() {
        if unseen == 0 {
            break;
        }
        for &n in pool.numbers_from(draw) {
            if let Some(idx) = index_of(n, size) {
                if gaps[idx].is_none() {
                    gaps[idx] = Some(t as u32);
                    unseen -= 1;
                }
            }
        }
    }

    let mut records: Vec<GapRecord> = gaps
        .iter()
        .enumerate()
        .map(|(i, gap)| GapRecord {
            number: (i + 1) as u8,
            gap: gap.unwrap_or(never_seen),
        })
        .collect();
    records.sort_by(|a, b| b.gap.cmp(&a.gap).then(a.number.cmp(&b.number)));
    records
}
