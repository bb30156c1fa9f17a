use std::collections::HashMap;

use crate::tables::ScoreRow;

#[derive(Debug, Clone)]
pub struct TotalRecord {
    pub name: String,
    /// Day index (1-based) -> that day's score. Days the participant never
    /// appeared in have no entry; output rendering fills them as 0.
    pub per_day: HashMap<usize, u32>,
    pub total: u32,
}

/// Fold per-day scoreboards, in the order given, into cumulative totals.
/// Day indices start at 1. Records keep first-appearance order so the
/// consolidated output is stable across runs.
pub fn fold_days(days: &[Vec<ScoreRow>]) -> Vec<TotalRecord> {
    let mut totals: Vec<TotalRecord> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for (day0, rows) in days.iter().enumerate() {
        let day = day0 + 1;
        for row in rows {
            let slot = *index.entry(row.name.clone()).or_insert_with(|| {
                totals.push(TotalRecord {
                    name: row.name.clone(),
                    per_day: HashMap::new(),
                    total: 0,
                });
                totals.len() - 1
            });
            let record = &mut totals[slot];
            record.per_day.insert(day, row.score);
            record.total += row.score;
        }
    }
    totals
}
