use std::collections::HashMap;

use anyhow::{Result, bail};

use crate::chooser::OutcomeChooser;
use crate::contest::{Contest, parse_contest, valid_outcomes, victory_label};
use crate::tables::OutcomeRow;

pub const ALIAS_PREFIX: &str = "alias=";

/// A canonical contest carrying its recorded outcome and the voter buckets
/// predictions are tallied into. Buckets keep menu order, with any
/// alias-synthesized labels appended after.
#[derive(Debug, Clone)]
pub struct ContestTally {
    pub contest: Contest,
    pub outcome: String,
    pub buckets: Vec<(String, Vec<String>)>,
}

impl ContestTally {
    pub fn bucket(&self, label: &str) -> Option<&[String]> {
        self.buckets
            .iter()
            .find(|(name, _)| name == label)
            .map(|(_, names)| names.as_slice())
    }

    pub fn bucket_mut(&mut self, label: &str) -> Option<&mut Vec<String>> {
        self.buckets
            .iter_mut()
            .find(|(name, _)| name == label)
            .map(|(_, names)| names)
    }
}

/// The day's resolved contests: canonical tallies in file order, with both
/// canonical and alias raw ids indexed onto them. Lookup stays O(1) while
/// report order is carried by the tally sequence itself.
#[derive(Debug, Clone)]
pub struct ContestBoard {
    pub tallies: Vec<ContestTally>,
    index: HashMap<String, usize>,
    pub aliases: HashMap<String, String>,
}

impl ContestBoard {
    /// Slot of the tally a raw id resolves to, following any alias link.
    pub fn lookup(&self, raw: &str) -> Option<usize> {
        self.index.get(raw).copied()
    }
}

struct Resolved {
    contest: Contest,
    /// Winning team name, `None` for a tie.
    winner: Option<String>,
    outcome: String,
}

/// Walk the day's contests in declaration order, assigning an outcome to
/// each canonical contest through the chooser and marking chained contests
/// as aliases of the contest whose result determines their second side.
///
/// A contest is chained when its team B names a side of the retained
/// (most recent stand-alone) contest but not that contest's winner: the
/// schedule guessed the wrong advancing team, so the true opponent is only
/// known through the earlier result. When team B *is* the retained winner
/// the schedule guessed right and the contest gets its own outcome. In
/// either adjacent case the retained contest is left as it was.
pub fn record_outcomes(
    contests: &[Contest],
    chooser: &mut dyn OutcomeChooser,
) -> Result<Vec<OutcomeRow>> {
    let mut rows = Vec::with_capacity(contests.len());
    let mut retained: Option<Resolved> = None;

    for contest in contests {
        match &retained {
            Some(prev)
                if contest.team_b == prev.contest.team_a
                    || contest.team_b == prev.contest.team_b =>
            {
                if prev.winner.as_deref() == Some(contest.team_b.as_str()) {
                    let resolved = assign_outcome(contest, chooser)?;
                    rows.push(OutcomeRow {
                        contest: contest.raw.clone(),
                        outcome: resolved.outcome,
                    });
                } else {
                    rows.push(OutcomeRow {
                        contest: contest.raw.clone(),
                        outcome: format!("{ALIAS_PREFIX}{}", prev.contest.raw),
                    });
                }
            }
            _ => {
                let resolved = assign_outcome(contest, chooser)?;
                rows.push(OutcomeRow {
                    contest: contest.raw.clone(),
                    outcome: resolved.outcome.clone(),
                });
                retained = Some(resolved);
            }
        }
    }
    Ok(rows)
}

fn assign_outcome(contest: &Contest, chooser: &mut dyn OutcomeChooser) -> Result<Resolved> {
    let outcomes = valid_outcomes(contest);
    // Re-request until the selection lands in range; the chooser cannot
    // force a selection outside the menu through this loop.
    let idx = loop {
        match chooser.choose(contest, &outcomes)? {
            Some(idx) if idx < outcomes.len() => break idx,
            _ => {}
        }
    };
    Ok(Resolved {
        contest: contest.clone(),
        winner: winner_for_index(contest, idx),
        outcome: outcomes[idx].clone(),
    })
}

fn winner_for_index(contest: &Contest, idx: usize) -> Option<String> {
    let tie_slots = usize::from(contest.format.allows_tie());
    if contest.format.allows_tie() && idx == 0 {
        return None;
    }
    if idx == tie_slots {
        Some(contest.team_a.clone())
    } else {
        Some(contest.team_b.clone())
    }
}

/// Fold recorded outcome rows, in file order, into a board ready for
/// scoring. Canonical rows open their full bucket set; alias rows must name
/// a canonical contest resolved earlier in the file and contribute one
/// synthesized bucket for their own team B, leaving the canonical outcome
/// and labels untouched.
pub fn build_board(rows: &[OutcomeRow]) -> Result<ContestBoard> {
    let mut tallies: Vec<ContestTally> = Vec::new();
    let mut index = HashMap::new();
    let mut aliases = HashMap::new();

    for row in rows {
        if let Some(target) = row.outcome.strip_prefix(ALIAS_PREFIX) {
            let Some(&slot) = index.get(target) else {
                bail!(
                    "chained contest {:?} references {target:?}, which is not resolved earlier in the outcome file",
                    row.contest
                );
            };
            let alias = parse_contest(&row.contest)?;
            let label = victory_label(&alias.team_b);
            let tally: &mut ContestTally = &mut tallies[slot];
            if tally.bucket(&label).is_none() {
                tally.buckets.push((label, Vec::new()));
            }
            index.insert(row.contest.clone(), slot);
            aliases.insert(row.contest.clone(), target.to_string());
        } else {
            let contest = parse_contest(&row.contest)?;
            let outcomes = valid_outcomes(&contest);
            if !outcomes.iter().any(|label| label == &row.outcome) {
                bail!(
                    "recorded outcome {:?} is not a legal result of {:?}",
                    row.outcome,
                    row.contest
                );
            }
            index.insert(row.contest.clone(), tallies.len());
            tallies.push(ContestTally {
                contest,
                outcome: row.outcome.clone(),
                buckets: outcomes.into_iter().map(|label| (label, Vec::new())).collect(),
            });
        }
    }

    Ok(ContestBoard {
        tallies,
        index,
        aliases,
    })
}
