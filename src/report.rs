use crate::ranking::{Awards, RankGroup, ordinal};
use crate::resolve::ContestBoard;
use crate::scoring::ScoreRecord;

/// `@`-mention list, the shape the standings are pasted into chat with.
fn mention_list(names: &[String], separator: &str) -> String {
    names
        .iter()
        .map(|name| format!("@{name}"))
        .collect::<Vec<_>>()
        .join(separator)
}

/// Per-contest voting breakdown: the resolved outcome with its correct-guess
/// count, then every bucket with its voters. Aliased ids are folded into
/// their canonical contest, so each contest appears once, in file order.
pub fn render_match_breakdowns(board: &ContestBoard) -> String {
    let mut out = String::new();
    out.push_str("Match breakdowns\n----------------\n");
    for tally in &board.tallies {
        let correct = tally.bucket(&tally.outcome).map(|names| names.len()).unwrap_or(0);
        out.push_str(&format!(
            "{}: {} - {} correct guesses\n",
            tally.contest.raw, tally.outcome, correct
        ));
        for (label, names) in &tally.buckets {
            out.push_str(&format!("{} ({}): {}\n", label, names.len(), names.join(", ")));
        }
        out.push('\n');
    }
    out
}

pub fn render_rankings(title: &str, groups: &[RankGroup]) -> String {
    let mut out = String::new();
    out.push_str(title);
    out.push_str("\n----------------\n");
    for group in groups {
        out.push_str(&format!(
            "{}: {} ({}pts)\n",
            ordinal(group.place),
            mention_list(&group.names, " / "),
            group.score
        ));
    }
    out
}

pub fn render_awards(awards: &Awards) -> String {
    let mut out = String::new();
    for (label, names) in &awards.lone_point {
        out.push_str(&format!(
            "Lone point award ({label}): {}\n",
            mention_list(names, ", ")
        ));
    }
    if !awards.shut_out.is_empty() {
        out.push_str(&format!(
            "No correct picks award: {}\n",
            mention_list(&awards.shut_out, ", ")
        ));
    }
    out
}

pub fn render_individual(record: &ScoreRecord) -> String {
    let mut out = String::new();
    out.push_str(&format!("Individual breakdown: {}\n", record.name));
    out.push_str(&format!("----------------------{}\n\n", "-".repeat(record.name.len())));
    out.push_str(&format!("Correct guesses ({}):\n", record.correct.len()));
    for guess in &record.correct {
        out.push_str(&format!("{} - {}\n", guess.contest, guess.prediction));
    }
    out.push('\n');
    out.push_str(&format!("Incorrect guesses ({}):\n", record.incorrect.len()));
    for guess in &record.incorrect {
        out.push_str(&format!("{} - {}\n", guess.contest, guess.prediction));
    }
    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ranking::{classify_awards, rank_descending};
    use crate::resolve::build_board;
    use crate::scoring::{Guess, score_responses};
    use crate::tables::{OutcomeRow, Response};

    #[test]
    fn rankings_render_one_line_per_tie_group() {
        let groups = rank_descending(&[
            ("Alice".to_string(), 2),
            ("Bob".to_string(), 2),
            ("Carol".to_string(), 0),
        ]);
        let text = render_rankings("Today's Rankings", &groups);
        assert_eq!(
            text,
            "Today's Rankings\n----------------\n1st: @Alice / @Bob (2pts)\n3rd: @Carol (0pts)\n"
        );
    }

    #[test]
    fn breakdown_lists_outcome_and_buckets() {
        let mut board = build_board(&[OutcomeRow {
            contest: "Red Vs Blue (Bo1)".to_string(),
            outcome: "Red Victory".to_string(),
        }])
        .unwrap();
        let responses = vec![
            Response {
                name: "Alice".to_string(),
                predictions: vec![("Red Vs Blue (Bo1)".to_string(), "Red Victory".to_string())],
            },
            Response {
                name: "Bob".to_string(),
                predictions: vec![("Red Vs Blue (Bo1)".to_string(), "Blue Victory".to_string())],
            },
        ];
        score_responses(&mut board, &responses).unwrap();
        let text = render_match_breakdowns(&board);
        assert!(text.contains("Red Vs Blue (Bo1): Red Victory - 1 correct guesses"));
        assert!(text.contains("Red Victory (1): Alice"));
        assert!(text.contains("Blue Victory (1): Bob"));
    }

    #[test]
    fn awards_render_lone_point_and_shut_out_groups() {
        let records = vec![
            ScoreRecord {
                name: "Bob".to_string(),
                score: 1,
                correct: vec![Guess {
                    contest: "Red Vs Blue (Bo1)".to_string(),
                    prediction: "Red Victory".to_string(),
                }],
                incorrect: Vec::new(),
            },
            ScoreRecord {
                name: "Carol".to_string(),
                score: 0,
                correct: Vec::new(),
                incorrect: Vec::new(),
            },
        ];
        let text = render_awards(&classify_awards(&records));
        assert_eq!(
            text,
            "Lone point award (Red Victory): @Bob\nNo correct picks award: @Carol\n"
        );
    }

    #[test]
    fn individual_breakdown_lists_both_guess_groups() {
        let record = ScoreRecord {
            name: "Alice".to_string(),
            score: 1,
            correct: vec![Guess {
                contest: "Red Vs Blue (Bo1)".to_string(),
                prediction: "Red Victory".to_string(),
            }],
            incorrect: vec![Guess {
                contest: "Gold Vs Silver (Bo2)".to_string(),
                prediction: "Tie".to_string(),
            }],
        };
        let text = render_individual(&record);
        assert!(text.starts_with("Individual breakdown: Alice\n"));
        assert!(text.contains("Correct guesses (1):\nRed Vs Blue (Bo1) - Red Victory\n"));
        assert!(text.contains("Incorrect guesses (1):\nGold Vs Silver (Bo2) - Tie\n"));
    }
}
