/// Binary-insertion ranking state machine.
///
/// Pure and synchronous: the caller asks the engine for its pending
/// comparison, gets an answer from a human, and hands both back. Each answer
/// either narrows the search for the current item, places it, or drops it.
///
/// States run `Bootstrapping -> Inserting -> Complete`. Bootstrapping only
/// happens when there is no existing order: the first two pooled items are
/// compared directly to seed a two-item list.
use tracing::{debug, trace, warn};

use crate::constants::{ceil_log2, probe_ceiling};
use crate::error::{RankError, Result};
use crate::merge;
use crate::types::{ComparisonAnswer, ComparisonKind, DraftSnapshot, Item, PendingComparison, RankingState};

/// Search bounds for the item at the head of `remaining`:
/// `(low, high, probe_index)`.
type SearchBounds = (usize, usize, u32);

#[derive(Debug, Clone)]
pub struct Ranker {
    state: RankingState,
}

impl Ranker {
    /// Rank `items` from scratch.
    pub fn new(items: Vec<Item>) -> Self {
        Self::with_existing(items, Vec::new())
    }

    /// Extend an existing best-first ordering with `items`.
    ///
    /// Items already present in `existing` (by the identity rule) are dropped
    /// from the pool and never compared. Duplicates inside `items` keep their
    /// first occurrence.
    pub fn with_existing(items: Vec<Item>, existing: Vec<Item>) -> Self {
        let pool = merge::dedupe_pool(items);
        let extension = merge::partition_for_extension(&existing, pool);

        debug!(
            existing = existing.len(),
            already_ranked = extension.already_ranked.len(),
            to_rank = extension.to_rank.len(),
            "starting ranking run"
        );

        let mut ranker = Ranker {
            state: RankingState {
                ranked: existing,
                remaining: extension.to_rank,
                ..RankingState::default()
            },
        };
        ranker.advance(None);
        ranker
    }

    /// Rebuild an engine from a stored snapshot.
    ///
    /// `ranked`, `remaining` and the pending comparison are restored verbatim,
    /// so no already answered question is asked again. A snapshot with items
    /// left but no pending comparison gets a fresh question for the head of
    /// `remaining`.
    pub fn resume(mut snapshot: DraftSnapshot) -> Result<Self> {
        if let Some(pending) = snapshot.pending_comparison.as_mut() {
            merge::infer_kind(&snapshot.ranked, pending);
        }
        merge::validate_snapshot(&snapshot)?;
        let needs_question = snapshot.pending_comparison.is_none() && !snapshot.remaining.is_empty();

        let mut ranker = Ranker { state: snapshot };
        if needs_question {
            ranker.advance(None);
        }

        debug!(
            ranked = ranker.state.ranked.len(),
            remaining = ranker.state.remaining.len(),
            comparisons = ranker.state.comparison_count,
            "resumed ranking run"
        );
        Ok(ranker)
    }

    pub fn state(&self) -> &RankingState {
        &self.state
    }

    pub fn into_state(self) -> RankingState {
        self.state
    }

    pub fn pending(&self) -> Option<&PendingComparison> {
        self.state.pending_comparison.as_ref()
    }

    pub fn ranked(&self) -> &[Item] {
        &self.state.ranked
    }

    pub fn remaining(&self) -> &[Item] {
        &self.state.remaining
    }

    pub fn skipped(&self) -> &[Item] {
        &self.state.skipped
    }

    pub fn comparison_count(&self) -> usize {
        self.state.comparison_count
    }

    pub fn is_complete(&self) -> bool {
        self.state.is_complete()
    }

    /// Feed back the answer to `pending`.
    ///
    /// `pending` must be exactly the comparison the engine last emitted; any
    /// other value is rejected and the state is left untouched.
    pub fn submit_answer(&mut self, pending: &PendingComparison, answer: ComparisonAnswer) -> Result<&RankingState> {
        let Some(current) = self.state.pending_comparison.take() else {
            return Err(if self.state.is_complete() {
                RankError::AlreadyComplete
            } else {
                RankError::NoPendingComparison
            });
        };

        if &current != pending {
            let err = RankError::StaleComparison {
                submitted: pending.to_string(),
                expected: current.to_string(),
            };
            self.state.pending_comparison = Some(current);
            return Err(err);
        }

        trace!(comparison = %current, ?answer, "answer received");

        match (current.kind, answer) {
            (_, ComparisonAnswer::Unknown) => {
                self.skip_head();
                self.advance(None);
            }
            (ComparisonKind::Seed, decisive) => {
                self.state.comparison_count += 1;
                let mut seed: Vec<Item> = self.state.remaining.drain(..2).collect();
                if decisive == ComparisonAnswer::Worse {
                    seed.reverse();
                }
                debug!(first = %seed[0], second = %seed[1], "seed comparison resolved");
                self.state.ranked = seed;
                self.advance(None);
            }
            (ComparisonKind::Insertion, ComparisonAnswer::Better) => {
                self.state.comparison_count += 1;
                if current.probe_position == current.low_bound {
                    self.place_head(current.low_bound);
                    self.advance(None);
                } else {
                    self.advance(Some((current.low_bound, current.probe_position - 1, current.probe_index + 1)));
                }
            }
            (ComparisonKind::Insertion, ComparisonAnswer::Worse) => {
                self.state.comparison_count += 1;
                self.advance(Some((current.probe_position + 1, current.high_bound, current.probe_index + 1)));
            }
        }

        Ok(&self.state)
    }

    /// Worst-case number of decisive answers still needed to finish,
    /// assuming no further `Unknown` answers.
    pub fn estimate_remaining_comparisons(&self) -> usize {
        let Some(pending) = &self.state.pending_comparison else {
            return 0;
        };

        let (mut total, mut placed, rest) = match pending.kind {
            ComparisonKind::Seed => (1, 2, self.state.remaining.len().saturating_sub(2)),
            ComparisonKind::Insertion => {
                let span = pending.high_bound - pending.low_bound + 1;
                (
                    ceil_log2(span + 1) as usize,
                    self.state.ranked.len() + 1,
                    self.state.remaining.len().saturating_sub(1),
                )
            }
        };

        for _ in 0..rest {
            total += ceil_log2(placed + 1) as usize;
            placed += 1;
        }
        total
    }

    /// Emit the next question, placing or bootstrapping items that need no
    /// question, until a comparison is pending or the pool is exhausted.
    ///
    /// `search` carries the narrowed bounds for the head of `remaining`;
    /// `None` starts a fresh search over the whole ranked list.
    fn advance(&mut self, mut search: Option<SearchBounds>) {
        loop {
            if self.state.remaining.is_empty() {
                self.state.pending_comparison = None;
                debug!(
                    ranked = self.state.ranked.len(),
                    skipped = self.state.skipped.len(),
                    comparisons = self.state.comparison_count,
                    "ranking complete"
                );
                return;
            }

            if self.state.ranked.is_empty() {
                if self.state.remaining.len() == 1 {
                    let only = self.state.remaining.remove(0);
                    debug!(item = %only, "single item ranked without comparison");
                    self.state.ranked.push(only);
                    continue;
                }
                let seed = PendingComparison::seed(self.state.remaining[0].clone(), self.state.remaining[1].clone());
                trace!(comparison = %seed, "asking seed comparison");
                self.state.pending_comparison = Some(seed);
                return;
            }

            let (low, high, probe_index) = search.take().unwrap_or((0, self.state.ranked.len() - 1, 0));

            if low > high {
                self.place_head(low);
                continue;
            }

            if probe_index >= probe_ceiling(self.state.ranked.len()) {
                warn!(
                    item = %self.state.remaining[0],
                    low,
                    high,
                    probe_index,
                    "probe ceiling reached, placing item at low bound"
                );
                self.place_head(low);
                continue;
            }

            let mid = low + (high - low) / 2;
            let pending = PendingComparison {
                kind: ComparisonKind::Insertion,
                new_item: self.state.remaining[0].clone(),
                probe_item: self.state.ranked[mid].clone(),
                probe_position: mid,
                low_bound: low,
                high_bound: high,
                probe_index,
            };
            trace!(comparison = %pending, "asking insertion comparison");
            self.state.pending_comparison = Some(pending);
            return;
        }
    }

    /// Move the head of `remaining` into `ranked` at `position`.
    fn place_head(&mut self, position: usize) {
        let item = self.state.remaining.remove(0);
        let position = position.min(self.state.ranked.len());
        debug!(item = %item, rank = position + 1, "item placed");
        self.state.ranked.insert(position, item);
    }

    /// Drop the head of `remaining` from this run.
    fn skip_head(&mut self) {
        let item = self.state.remaining.remove(0);
        debug!(item = %item, "item skipped");
        self.state.skipped.push(item);
    }
}

/// Step function over plain state values.
///
/// Equivalent to resuming a [`Ranker`] from `state` and submitting one
/// answer. `state` itself is never modified.
pub fn submit_answer(state: &RankingState, answer: ComparisonAnswer, pending: &PendingComparison) -> Result<RankingState> {
    if state.is_complete() {
        return Err(RankError::AlreadyComplete);
    }
    let mut ranker = Ranker::resume(state.clone())?;
    let mut pending = pending.clone();
    merge::infer_kind(&state.ranked, &mut pending);
    ranker.submit_answer(&pending, answer)?;
    Ok(ranker.into_state())
}
