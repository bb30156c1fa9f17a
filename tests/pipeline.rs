use std::fs;
use std::path::PathBuf;

use predictions_pool::chooser::QueuedChooser;
use predictions_pool::contest::parse_contest;
use predictions_pool::ranking::{classify_awards, rank_descending};
use predictions_pool::resolve::{build_board, record_outcomes};
use predictions_pool::scoring::score_responses;
use predictions_pool::tables::{
    load_contest_ids, load_day_scores, load_outcomes, load_responses, store_day_scores,
    store_outcomes, store_totals, ScoreRow,
};
use predictions_pool::totals::fold_days;

fn fixture_path(name: &str) -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    path
}

fn scratch_dir(test: &str) -> PathBuf {
    let dir = std::env::temp_dir()
        .join(format!("predictions_pool_{}", std::process::id()))
        .join(test);
    fs::create_dir_all(&dir).expect("scratch dir should be creatable");
    dir
}

#[test]
fn responses_sheet_loads_in_header_order() {
    let responses = load_responses(&fixture_path("responses.csv")).expect("sheet should load");
    assert_eq!(responses.len(), 3);
    assert_eq!(responses[0].name, "Alice");
    let columns: Vec<&str> = responses[0]
        .predictions
        .iter()
        .map(|(contest, _)| contest.as_str())
        .collect();
    assert_eq!(
        columns,
        [
            "Red Vs Blue (Bo1)",
            "Winner Vs Red (Bo1)",
            "Gold Vs Silver (Bo2)"
        ]
    );
    // Carol left the first contest blank; the cell is carried as empty.
    assert_eq!(responses[2].predictions[0].1, "");
}

#[test]
fn truncated_sheet_rows_read_as_absent_predictions() {
    let responses =
        load_responses(&fixture_path("responses_short.csv")).expect("sheet should load");
    assert_eq!(responses[0].predictions.len(), 1);
    assert!(responses[1].predictions.is_empty());
}

#[test]
fn full_day_flows_from_responses_to_totals() {
    let dir = scratch_dir("full_day");
    let matches_path = dir.join("matches.csv");
    let day1_path = dir.join("day1_scores.csv");
    let totals_path = dir.join("totals.csv");

    // Record outcomes for the day's contests. The first two selections are
    // junk and out of range; the loop must keep asking.
    let ids = load_contest_ids(&fixture_path("responses.csv")).expect("header should load");
    let contests: Vec<_> = ids
        .iter()
        .map(|id| parse_contest(id).expect("header ids should parse"))
        .collect();
    let mut chooser = QueuedChooser::new([None, Some(9), Some(1), Some(0)]);
    let rows = record_outcomes(&contests, &mut chooser).expect("outcomes should record");
    store_outcomes(&matches_path, &rows).expect("outcome file should write");

    let written = fs::read_to_string(&matches_path).expect("outcome file should exist");
    assert_eq!(
        written,
        "match,outcome\n\
         Red Vs Blue (Bo1),Blue Victory\n\
         Winner Vs Red (Bo1),alias=Red Vs Blue (Bo1)\n\
         Gold Vs Silver (Bo2),Tie\n"
    );

    // Score the day from the files just written.
    let outcome_rows = load_outcomes(&matches_path).expect("outcome file should load");
    let mut board = build_board(&outcome_rows).expect("board should build");
    let responses = load_responses(&fixture_path("responses.csv")).expect("sheet should load");
    let mut records = score_responses(&mut board, &responses).expect("day should score");

    records.sort_by(|a, b| b.score.cmp(&a.score));
    let standings: Vec<(String, u32)> = records
        .iter()
        .map(|r| (r.name.clone(), r.score))
        .collect();
    assert_eq!(
        standings,
        [
            ("Alice".to_string(), 2),
            ("Bob".to_string(), 1),
            ("Carol".to_string(), 0)
        ]
    );

    // Alias votes land on the canonical contest's buckets.
    let opener = &board.tallies[0];
    assert_eq!(
        opener.bucket("Red Victory").unwrap(),
        &[
            "Alice".to_string(),
            "Bob".to_string(),
            "Carol".to_string()
        ]
    );
    assert_eq!(
        opener.bucket("Blue Victory").unwrap(),
        &["Alice".to_string(), "Bob".to_string()]
    );

    let groups = rank_descending(&standings);
    let places: Vec<usize> = groups.iter().map(|g| g.place).collect();
    assert_eq!(places, [1, 2, 3]);

    let awards = classify_awards(&records);
    assert_eq!(awards.lone_point.len(), 1);
    assert_eq!(awards.lone_point[0].0, "Blue Victory");
    assert_eq!(awards.lone_point[0].1, ["Bob"]);
    assert_eq!(awards.shut_out, ["Carol"]);

    let day_rows: Vec<ScoreRow> = records
        .iter()
        .map(|r| ScoreRow {
            name: r.name.clone(),
            score: r.score,
        })
        .collect();
    store_day_scores(&day1_path, &day_rows).expect("day-score file should write");
    assert_eq!(
        fs::read_to_string(&day1_path).expect("day-score file should exist"),
        "name,score\nAlice,2\nBob,1\nCarol,0\n"
    );

    // Fold the generated day together with a second day on file.
    let days = vec![
        load_day_scores(&day1_path).expect("day 1 should load"),
        load_day_scores(&fixture_path("day2_scores.csv")).expect("day 2 should load"),
    ];
    let mut totals = fold_days(&days);
    totals.sort_by(|a, b| b.total.cmp(&a.total));
    store_totals(&totals_path, &totals, days.len()).expect("totals file should write");

    assert_eq!(
        fs::read_to_string(&totals_path).expect("totals file should exist"),
        "name,total,day 1 score,day 2 score\n\
         Alice,3,2,1\n\
         Dave,3,0,3\n\
         Bob,1,1,0\n\
         Carol,0,0,0\n"
    );
}

#[test]
fn scoring_aborts_before_any_output_when_a_contest_is_unknown() {
    let dir = scratch_dir("unknown_contest");
    let matches_path = dir.join("matches.csv");

    // Outcome file covering only one of the sheet's three contests.
    let rows = vec![predictions_pool::tables::OutcomeRow {
        contest: "Red Vs Blue (Bo1)".to_string(),
        outcome: "Blue Victory".to_string(),
    }];
    store_outcomes(&matches_path, &rows).expect("outcome file should write");

    let outcome_rows = load_outcomes(&matches_path).expect("outcome file should load");
    let mut board = build_board(&outcome_rows).expect("board should build");
    let responses = load_responses(&fixture_path("responses.csv")).expect("sheet should load");
    let err = score_responses(&mut board, &responses).unwrap_err();
    assert!(err.to_string().contains("Winner Vs Red (Bo1)"));
}
