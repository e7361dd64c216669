/// Interactive ranking session: drives a `Ranker` with human answers.
///
/// The engine only speaks in terms of the new item being better or worse
/// than the probe. Here the two songs are shown as options 1 and 2, with
/// the new song on a random side unless sides are fixed, and the choice is
/// mapped back.
use anyhow::Result;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use songrank_core::{ComparisonAnswer, Item, PendingComparison, RankingState, Ranker};
use std::io::{BufRead, Write};
use tracing::debug;

/// A human's response to one question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    First,
    Second,
    Unknown,
    /// Stop here and keep the current state as a draft.
    Pause,
}

/// Progress shown alongside each question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub answered: usize,
    pub estimated_left: usize,
}

/// Source of answers. Implemented by the terminal prompt and by tests.
pub trait Judge {
    fn judge(&mut self, first: &Item, second: &Item, progress: Progress) -> Result<Verdict>;
}

/// Asks questions on `output` and reads answers line by line from `input`.
pub struct TerminalJudge<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> TerminalJudge<R, W> {
    pub fn new(input: R, output: W) -> Self {
        TerminalJudge { input, output }
    }
}

fn parse_verdict(line: &str) -> Option<Verdict> {
    match line.trim().to_ascii_lowercase().as_str() {
        "1" => Some(Verdict::First),
        "2" => Some(Verdict::Second),
        "?" | "0" | "u" => Some(Verdict::Unknown),
        "s" | "q" => Some(Verdict::Pause),
        _ => None,
    }
}

impl<R: BufRead, W: Write> Judge for TerminalJudge<R, W> {
    fn judge(&mut self, first: &Item, second: &Item, progress: Progress) -> Result<Verdict> {
        writeln!(
            self.output,
            "\n[{} answered, at most {} to go] Which is better?",
            progress.answered, progress.estimated_left,
        )?;
        writeln!(self.output, "  1) {first}")?;
        writeln!(self.output, "  2) {second}")?;
        writeln!(self.output, "  ?) don't know    s) save and quit")?;

        loop {
            write!(self.output, "> ")?;
            self.output.flush()?;

            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                // EOF: keep what we have
                return Ok(Verdict::Pause);
            }
            match parse_verdict(&line) {
                Some(verdict) => return Ok(verdict),
                None => writeln!(self.output, "Please answer 1, 2, ? or s.")?,
            }
        }
    }
}

/// Decides which side the new song is shown on.
pub enum SidePicker {
    /// New song always shown first.
    Fixed,
    Random(StdRng),
}

impl SidePicker {
    pub fn random(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        SidePicker::Random(rng)
    }

    fn new_item_first(&mut self) -> bool {
        match self {
            SidePicker::Fixed => true,
            SidePicker::Random(rng) => rng.random_bool(0.5),
        }
    }
}

fn to_answer(verdict: Verdict, new_item_first: bool) -> Option<ComparisonAnswer> {
    match (verdict, new_item_first) {
        (Verdict::First, true) | (Verdict::Second, false) => Some(ComparisonAnswer::Better),
        (Verdict::Second, true) | (Verdict::First, false) => Some(ComparisonAnswer::Worse),
        (Verdict::Unknown, _) => Some(ComparisonAnswer::Unknown),
        (Verdict::Pause, _) => None,
    }
}

/// How a session ended.
#[derive(Debug)]
pub enum SessionOutcome {
    Completed(RankingState),
    Paused(RankingState),
}

/// Ask questions until the ranking is complete or the judge pauses.
pub fn run_session<J: Judge>(mut ranker: Ranker, judge: &mut J, sides: &mut SidePicker) -> Result<SessionOutcome> {
    while let Some(pending) = ranker.pending().cloned() {
        let progress = Progress {
            answered: ranker.comparison_count(),
            estimated_left: ranker.estimate_remaining_comparisons(),
        };

        let new_item_first = sides.new_item_first();
        let PendingComparison { new_item, probe_item, .. } = &pending;
        let verdict = if new_item_first {
            judge.judge(new_item, probe_item, progress)?
        } else {
            judge.judge(probe_item, new_item, progress)?
        };

        let Some(answer) = to_answer(verdict, new_item_first) else {
            debug!(remaining = ranker.remaining().len(), "session paused");
            return Ok(SessionOutcome::Paused(ranker.into_state()));
        };
        ranker.submit_answer(&pending, answer)?;
    }

    Ok(SessionOutcome::Completed(ranker.into_state()))
}
