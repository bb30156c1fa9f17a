use crate::scoring::ScoreRecord;

/// One tie bucket of the standings: everyone on `score`, sharing `place`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankGroup {
    pub place: usize,
    pub score: u32,
    pub names: Vec<String>,
}

/// Group entries into descending tie buckets with skip placement: k names
/// sharing place p push the next distinct score to place p + k. The sort is
/// stable, so names tied on score keep their incoming order.
pub fn rank_descending(entries: &[(String, u32)]) -> Vec<RankGroup> {
    let mut sorted: Vec<&(String, u32)> = entries.iter().collect();
    sorted.sort_by(|a, b| b.1.cmp(&a.1));

    let mut groups: Vec<RankGroup> = Vec::new();
    let mut seen = 0usize;
    for (name, score) in sorted {
        match groups.last_mut() {
            Some(group) if group.score == *score => group.names.push(name.clone()),
            _ => groups.push(RankGroup {
                place: seen + 1,
                score: *score,
                names: vec![name.clone()],
            }),
        }
        seen += 1;
    }
    groups
}

/// Place with its ordinal suffix. The suffix follows the last digit only;
/// 11 deliberately renders as "11st".
pub fn ordinal(place: usize) -> String {
    let suffix = match place % 10 {
        1 => "st",
        2 => "nd",
        3 => "rd",
        _ => "th",
    };
    format!("{place}{suffix}")
}

/// Consolation groupings below the standings proper.
#[derive(Debug, Clone, Default)]
pub struct Awards {
    /// Winning label -> names whose single point came from it, labels in
    /// first-seen order.
    pub lone_point: Vec<(String, Vec<String>)>,
    /// Names with no correct picks at all.
    pub shut_out: Vec<String>,
}

pub fn classify_awards(records: &[ScoreRecord]) -> Awards {
    let mut awards = Awards::default();
    for record in records {
        if record.score == 1 {
            let Some(guess) = record.correct.first() else {
                continue;
            };
            match awards
                .lone_point
                .iter_mut()
                .find(|(label, _)| *label == guess.prediction)
            {
                Some((_, names)) => names.push(record.name.clone()),
                None => awards
                    .lone_point
                    .push((guess.prediction.clone(), vec![record.name.clone()])),
            }
        } else if record.score == 0 {
            awards.shut_out.push(record.name.clone());
        }
    }
    awards
}
