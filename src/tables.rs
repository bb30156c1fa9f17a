use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

use crate::totals::TotalRecord;

/// One participant's sheet row: name plus predictions in header column order.
/// Prediction order matters downstream (breakdown reports follow it), so it
/// is carried as an explicit sequence rather than a map.
#[derive(Debug, Clone)]
pub struct Response {
    pub name: String,
    pub predictions: Vec<(String, String)>,
}

/// A row of the match-outcome file. `outcome` is either a label from the
/// contest's outcome set or an `alias=<canonical raw id>` marker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutcomeRow {
    #[serde(rename = "match")]
    pub contest: String,
    pub outcome: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreRow {
    pub name: String,
    pub score: u32,
}

/// Contest ids declared by the responses header, i.e. every column after the
/// form timestamp and the participant name.
pub fn load_contest_ids(path: &Path) -> Result<Vec<String>> {
    let header = read_header(path)?;
    Ok(header.into_iter().skip(2).collect())
}

pub fn load_responses(path: &Path) -> Result<Vec<Response>> {
    let mut reader = sheet_reader(path)?;
    let mut rows = reader.records();
    let Some(header) = rows.next() else {
        bail!("responses file {} is empty", path.display());
    };
    let header = header.with_context(|| format!("read header of {}", path.display()))?;
    let columns: Vec<String> = header.iter().map(str::to_string).collect();

    let mut out = Vec::new();
    for (idx, record) in rows.enumerate() {
        let line = idx + 2;
        let record =
            record.with_context(|| format!("read row {line} of {}", path.display()))?;
        let Some(name) = record.get(1) else {
            bail!("row {line} of {} has no participant name", path.display());
        };
        if record.len() > columns.len() {
            bail!("row {line} of {} is wider than the header", path.display());
        }
        // Rows may stop short of the full width; missing cells are simply
        // absent predictions.
        let predictions = record
            .iter()
            .enumerate()
            .skip(2)
            .map(|(col, cell)| (columns[col].clone(), cell.to_string()))
            .collect();
        out.push(Response {
            name: name.to_string(),
            predictions,
        });
    }
    Ok(out)
}

pub fn load_outcomes(path: &Path) -> Result<Vec<OutcomeRow>> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("open match-outcome file {}", path.display()))?;
    let mut out = Vec::new();
    for row in reader.deserialize() {
        let row: OutcomeRow =
            row.with_context(|| format!("read match-outcome row in {}", path.display()))?;
        out.push(row);
    }
    Ok(out)
}

pub fn store_outcomes(path: &Path, rows: &[OutcomeRow]) -> Result<()> {
    write_committed(path, |writer| {
        for row in rows {
            writer.serialize(row)?;
        }
        Ok(())
    })
}

pub fn load_day_scores(path: &Path) -> Result<Vec<ScoreRow>> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("open day-score file {}", path.display()))?;
    let mut out = Vec::new();
    for row in reader.deserialize() {
        let row: ScoreRow =
            row.with_context(|| format!("read day-score row in {}", path.display()))?;
        out.push(row);
    }
    Ok(out)
}

pub fn store_day_scores(path: &Path, rows: &[ScoreRow]) -> Result<()> {
    write_committed(path, |writer| {
        for row in rows {
            writer.serialize(row)?;
        }
        Ok(())
    })
}

/// Consolidated totals, one full-width row per participant. Days a
/// participant never appeared in are rendered as `0`.
pub fn store_totals(path: &Path, totals: &[TotalRecord], day_count: usize) -> Result<()> {
    write_committed(path, |writer| {
        let mut header = vec!["name".to_string(), "total".to_string()];
        header.extend((1..=day_count).map(|day| format!("day {day} score")));
        writer.write_record(&header)?;
        for record in totals {
            let mut row = vec![record.name.clone(), record.total.to_string()];
            row.extend(
                (1..=day_count)
                    .map(|day| record.per_day.get(&day).copied().unwrap_or(0).to_string()),
            );
            writer.write_record(&row)?;
        }
        Ok(())
    })
}

fn sheet_reader(path: &Path) -> Result<csv::Reader<fs::File>> {
    // The header is consumed by hand because its columns are data (contest
    // ids), and flexible rows tolerate sheets truncated short of full width.
    csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("open responses file {}", path.display()))
}

fn read_header(path: &Path) -> Result<Vec<String>> {
    let mut reader = sheet_reader(path)?;
    let mut rows = reader.records();
    let Some(header) = rows.next() else {
        bail!("responses file {} is empty", path.display());
    };
    let header = header.with_context(|| format!("read header of {}", path.display()))?;
    Ok(header.iter().map(str::to_string).collect())
}

/// Outputs are committed only after the full row set has been produced:
/// write to a `.tmp` sibling, then rename over the target, so an aborted run
/// never leaves a partial or clobbered file behind.
fn write_committed<F>(path: &Path, fill: F) -> Result<()>
where
    F: FnOnce(&mut csv::Writer<fs::File>) -> csv::Result<()>,
{
    let tmp = tmp_sibling(path);
    let mut writer = csv::Writer::from_path(&tmp)
        .with_context(|| format!("create {}", tmp.display()))?;
    fill(&mut writer).with_context(|| format!("write {}", tmp.display()))?;
    writer
        .flush()
        .with_context(|| format!("flush {}", tmp.display()))?;
    drop(writer);
    fs::rename(&tmp, path).with_context(|| format!("commit {}", path.display()))?;
    Ok(())
}

fn tmp_sibling(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::tmp_sibling;
    use std::path::Path;

    #[test]
    fn tmp_sibling_keeps_directory() {
        let tmp = tmp_sibling(Path::new("out/day1.csv"));
        assert_eq!(tmp, Path::new("out/day1.csv.tmp"));
    }
}
