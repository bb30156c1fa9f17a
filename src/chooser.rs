use std::collections::VecDeque;
use std::io::{self, BufRead, Write};

use anyhow::{Context, Result, anyhow, bail};

use crate::contest::Contest;

/// Supplies the actual result of a contest as a zero-based index into its
/// outcome menu.
///
/// `Ok(None)` means the attempt was unusable (non-numeric input) and the
/// caller should ask again; `Err` means the input source itself failed and
/// the run aborts. Range checking happens at the single call site, so no
/// implementation can push an out-of-range selection through.
pub trait OutcomeChooser {
    fn choose(&mut self, contest: &Contest, outcomes: &[String]) -> Result<Option<usize>>;
}

/// Interactive chooser reading selections from stdin. The option menu is
/// reprinted on every attempt.
#[derive(Debug, Default)]
pub struct ConsoleChooser {
    announced: Option<String>,
}

impl ConsoleChooser {
    pub fn new() -> Self {
        Self::default()
    }
}

impl OutcomeChooser for ConsoleChooser {
    fn choose(&mut self, contest: &Contest, outcomes: &[String]) -> Result<Option<usize>> {
        // Introduce the contest once, even across retries.
        if self.announced.as_deref() != Some(contest.raw.as_str()) {
            println!(
                "\n{} v. {} - {}",
                contest.team_a,
                contest.team_b,
                contest.format.tag()
            );
            self.announced = Some(contest.raw.clone());
        }
        for (idx, label) in outcomes.iter().enumerate() {
            println!("{idx} - {label}");
        }
        print!("Please enter the match result: ");
        io::stdout().flush().context("flush result prompt")?;

        let mut line = String::new();
        let read = io::stdin()
            .lock()
            .read_line(&mut line)
            .context("read result selection")?;
        if read == 0 {
            bail!("input closed before a result was chosen for {:?}", contest.raw);
        }
        Ok(line.trim().parse::<usize>().ok())
    }
}

/// Scripted chooser that pops pre-recorded selections, oldest first. Used for
/// batch runs and tests; running out of selections is an error rather than an
/// endless re-prompt.
#[derive(Debug, Default)]
pub struct QueuedChooser {
    queue: VecDeque<Option<usize>>,
}

impl QueuedChooser {
    pub fn new<I>(selections: I) -> Self
    where
        I: IntoIterator<Item = Option<usize>>,
    {
        Self {
            queue: selections.into_iter().collect(),
        }
    }
}

impl OutcomeChooser for QueuedChooser {
    fn choose(&mut self, contest: &Contest, _outcomes: &[String]) -> Result<Option<usize>> {
        self.queue
            .pop_front()
            .ok_or_else(|| anyhow!("no selection queued for contest {:?}", contest.raw))
    }
}
