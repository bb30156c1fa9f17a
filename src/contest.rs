use anyhow::{Result, anyhow};

/// Long-form team names and the short names shown on outcome labels.
/// Unlisted names pass through unchanged.
const SHORT_NAMES: &[(&str, &str)] = &[
    ("Team Liquid", "Liquid"),
    ("Evil Geniuses", "EG"),
];

pub const TIE_LABEL: &str = "Tie";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContestFormat {
    /// Two-game series; a split is a legal final result.
    Bo2,
    /// Any other series length, decided one way or the other.
    Series(String),
}

impl ContestFormat {
    fn from_tag(tag: &str) -> Self {
        if tag == "Bo2" {
            ContestFormat::Bo2
        } else {
            ContestFormat::Series(tag.to_string())
        }
    }

    pub fn tag(&self) -> &str {
        match self {
            ContestFormat::Bo2 => "Bo2",
            ContestFormat::Series(tag) => tag,
        }
    }

    pub fn allows_tie(&self) -> bool {
        matches!(self, ContestFormat::Bo2)
    }
}

#[derive(Debug, Clone)]
pub struct Contest {
    /// The identifier exactly as the responses header declares it. Prediction
    /// records key on this string.
    pub raw: String,
    pub team_a: String,
    pub team_b: String,
    pub format: ContestFormat,
}

/// Decode `<team tokens> Vs <team tokens> (<tag>)`.
///
/// Tokens are split on single spaces; the final token is the parenthesized
/// format and the first literal `Vs` token divides the two team names. A team
/// name that itself contains a `Vs` token shifts the pivot and cannot be
/// represented by this grammar; such identifiers need renaming at the source.
pub fn parse_contest(raw: &str) -> Result<Contest> {
    let words: Vec<&str> = raw.split(' ').collect();
    let Some((last, team_words)) = words.split_last() else {
        return Err(anyhow!("empty contest id"));
    };
    let tag = last
        .strip_prefix('(')
        .and_then(|t| t.strip_suffix(')'))
        .ok_or_else(|| anyhow!("contest id {raw:?} does not end with a parenthesized format"))?;
    let pivot = team_words
        .iter()
        .position(|w| *w == "Vs")
        .ok_or_else(|| anyhow!("contest id {raw:?} has no 'Vs' separator"))?;
    Ok(Contest {
        raw: raw.to_string(),
        team_a: team_words[..pivot].join(" "),
        team_b: team_words[pivot + 1..].join(" "),
        format: ContestFormat::from_tag(tag),
    })
}

pub fn display_name(team: &str) -> &str {
    SHORT_NAMES
        .iter()
        .find(|(long, _)| *long == team)
        .map(|(_, short)| *short)
        .unwrap_or(team)
}

/// The outcome label recording a win for `team`.
pub fn victory_label(team: &str) -> String {
    format!("{} Victory", display_name(team))
}

/// Legal outcome labels for a contest, in menu order. Only a Bo2 can end
/// tied; every other format resolves to one of the two victory labels.
pub fn valid_outcomes(contest: &Contest) -> Vec<String> {
    let mut out = Vec::with_capacity(3);
    if contest.format.allows_tie() {
        out.push(TIE_LABEL.to_string());
    }
    out.push(victory_label(&contest.team_a));
    out.push(victory_label(&contest.team_b));
    out
}
