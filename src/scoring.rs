use anyhow::{Result, anyhow, bail};

use crate::resolve::ContestBoard;
use crate::tables::Response;

#[derive(Debug, Clone)]
pub struct Guess {
    pub contest: String,
    pub prediction: String,
}

#[derive(Debug, Clone)]
pub struct ScoreRecord {
    pub name: String,
    pub score: u32,
    pub correct: Vec<Guess>,
    pub incorrect: Vec<Guess>,
}

/// Score every response against the board, filling the per-outcome voter
/// buckets along the way. Records come back in response order; callers sort
/// for ranking and output.
///
/// A prediction is correct when it equals the resolved outcome of its
/// contest exactly; chained contests compare against their canonical
/// contest's outcome. Empty predictions count as neither correct nor
/// incorrect and are not tallied. Non-empty predictions always land in the
/// bucket matching their literal label, right or wrong; a label with no
/// bucket aborts the run.
pub fn score_responses(
    board: &mut ContestBoard,
    responses: &[Response],
) -> Result<Vec<ScoreRecord>> {
    let mut records = Vec::with_capacity(responses.len());

    for response in responses {
        let mut record = ScoreRecord {
            name: response.name.clone(),
            score: 0,
            correct: Vec::new(),
            incorrect: Vec::new(),
        };
        for (contest_id, prediction) in &response.predictions {
            if prediction.is_empty() {
                continue;
            }
            let slot = board.lookup(contest_id).ok_or_else(|| {
                anyhow!(
                    "prediction by {:?} references contest {contest_id:?}, which is absent from the outcome file",
                    response.name
                )
            })?;
            let tally = &mut board.tallies[slot];
            let guess = Guess {
                contest: contest_id.clone(),
                prediction: prediction.clone(),
            };
            if *prediction == tally.outcome {
                record.score += 1;
                record.correct.push(guess);
            } else {
                record.incorrect.push(guess);
            }
            let Some(bucket) = tally.bucket_mut(prediction) else {
                bail!(
                    "unknown prediction {prediction:?} by {:?} for contest {contest_id:?}",
                    response.name
                );
            };
            bucket.push(response.name.clone());
        }
        records.push(record);
    }
    Ok(records)
}
