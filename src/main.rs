use std::collections::HashSet;
use std::path::{Path, PathBuf};

use anyhow::{Result, anyhow, bail};

use predictions_pool::chooser::ConsoleChooser;
use predictions_pool::contest::parse_contest;
use predictions_pool::ranking::{classify_awards, rank_descending};
use predictions_pool::report;
use predictions_pool::resolve::{build_board, record_outcomes};
use predictions_pool::scoring::score_responses;
use predictions_pool::tables::{self, ScoreRow};
use predictions_pool::totals::fold_days;

const USAGE: &str = "\
Usage:
  predictions_pool matches --responses <file> --matches <out>
  predictions_pool scores --responses <file> --matches <file> --scores <out> [--individual <name>...]
  predictions_pool totals --scores <file>... --totals <out>";

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(command) = args.first() else {
        bail!("missing subcommand\n{USAGE}");
    };
    match command.as_str() {
        "matches" => run_matches(&args[1..]),
        "scores" => run_scores(&args[1..]),
        "totals" => run_totals(&args[1..]),
        other => bail!("unknown subcommand {other:?}\n{USAGE}"),
    }
}

/// Read the day's contests from the responses header, collect each canonical
/// result interactively, and write the match-outcome file.
fn run_matches(args: &[String]) -> Result<()> {
    let responses_path = required_flag(args, "--responses")?;
    let matches_out = required_flag(args, "--matches")?;

    let ids = tables::load_contest_ids(&responses_path)?;
    let mut contests = Vec::with_capacity(ids.len());
    for id in &ids {
        contests.push(parse_contest(id)?);
    }

    println!("\nResults\n-------");
    let mut chooser = ConsoleChooser::new();
    let rows = record_outcomes(&contests, &mut chooser)?;
    tables::store_outcomes(&matches_out, &rows)?;
    Ok(())
}

fn run_scores(args: &[String]) -> Result<()> {
    let responses_path = required_flag(args, "--responses")?;
    let matches_path = required_flag(args, "--matches")?;
    let scores_out = required_flag(args, "--scores")?;
    let individual: HashSet<String> = flag_values(args, "--individual").into_iter().collect();

    let outcome_rows = tables::load_outcomes(&matches_path)?;
    let mut board = build_board(&outcome_rows)?;
    let responses = tables::load_responses(&responses_path)?;
    let mut records = score_responses(&mut board, &responses)?;

    for record in &records {
        if individual.contains(&record.name) {
            print!("{}", report::render_individual(record));
        }
    }
    print!("{}", report::render_match_breakdowns(&board));

    records.sort_by(|a, b| b.score.cmp(&a.score));
    let standings: Vec<(String, u32)> = records
        .iter()
        .map(|record| (record.name.clone(), record.score))
        .collect();
    print!(
        "{}",
        report::render_rankings("Today's Rankings", &rank_descending(&standings))
    );
    println!();
    print!("{}", report::render_awards(&classify_awards(&records)));

    let rows: Vec<ScoreRow> = records
        .iter()
        .map(|record| ScoreRow {
            name: record.name.clone(),
            score: record.score,
        })
        .collect();
    tables::store_day_scores(&scores_out, &rows)?;
    Ok(())
}

fn run_totals(args: &[String]) -> Result<()> {
    let day_paths = flag_values(args, "--scores");
    if day_paths.is_empty() {
        bail!("totals needs at least one --scores file\n{USAGE}");
    }
    let totals_out = required_flag(args, "--totals")?;

    let mut days = Vec::with_capacity(day_paths.len());
    for path in &day_paths {
        days.push(tables::load_day_scores(Path::new(path))?);
    }

    let mut totals = fold_days(&days);
    totals.sort_by(|a, b| b.total.cmp(&a.total));

    let standings: Vec<(String, u32)> = totals
        .iter()
        .map(|record| (record.name.clone(), record.total))
        .collect();
    print!(
        "{}",
        report::render_rankings("All Rankings", &rank_descending(&standings))
    );

    tables::store_totals(&totals_out, &totals, days.len())?;
    Ok(())
}

fn flag_value(args: &[String], name: &str) -> Option<String> {
    let prefix = format!("{name}=");
    for (idx, arg) in args.iter().enumerate() {
        if let Some(value) = arg.strip_prefix(&prefix)
            && !value.trim().is_empty()
        {
            return Some(value.to_string());
        }
        if arg == name
            && let Some(next) = args.get(idx + 1)
            && !next.trim().is_empty()
        {
            return Some(next.clone());
        }
    }
    None
}

fn required_flag(args: &[String], name: &str) -> Result<PathBuf> {
    flag_value(args, name)
        .map(PathBuf::from)
        .ok_or_else(|| anyhow!("missing {name} <file>\n{USAGE}"))
}

/// All values following `name` up to the next flag, accepting both repeated
/// flags and space-separated lists.
fn flag_values(args: &[String], name: &str) -> Vec<String> {
    let prefix = format!("{name}=");
    let mut out = Vec::new();
    let mut taking = false;
    for arg in args {
        if arg == name {
            taking = true;
            continue;
        }
        if let Some(value) = arg.strip_prefix(&prefix) {
            if !value.trim().is_empty() {
                out.push(value.to_string());
            }
            taking = true;
            continue;
        }
        if arg.starts_with("--") {
            taking = false;
            continue;
        }
        if taking {
            out.push(arg.clone());
        }
    }
    out
}
